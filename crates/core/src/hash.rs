//! Stable non-cryptographic hashing for the wire contract
//!
//! The snapshot checksum and the registry identifiers are part of the
//! persisted format, so the hash must be portable: identical bytes produce
//! identical values on every host, process, and build. The function is the
//! classic djb2 construction (seed 5381, multiply by 33, add byte), widened
//! to 64 bits.
//!
//! These hashes detect corruption and identify invariant sets. They are
//! explicitly NOT cryptographic digests and must never be substituted for
//! one: external witnesses compute their own digest over the same canonical
//! bytes.

/// djb2 over a byte slice, 64-bit accumulator
///
/// Used for the snapshot corruption checksum and to derive registry
/// identifiers from invariant-set descriptions.
pub fn djb2_64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 5381;
    for &b in bytes {
        hash = hash.wrapping_mul(33).wrapping_add(u64::from(b));
    }
    hash
}

/// Render a 64-bit hash as 16 lowercase hex digits
pub fn hex16(hash: u64) -> String {
    format!("{hash:016x}")
}
