//! Winternitz base-w chunking with an appended checksum.
//!
//! `encode(digest, w, v_msg, v_chk) -> [0, w) chunks` such that the sum of
//! `(w - 1 - chunk_i)` over every chunk is exactly the checksum value,
//! making the whole vector "incomparable": no two distinct digests produce
//! chunk vectors where one dominates the other in every coordinate.

use crate::error::{ConfigError, EncodingError};

/// Chunk widths this encoding supports, expressed as the Winternitz base.
pub const SUPPORTED_W: [u32; 4] = [2, 4, 16, 256];

fn bits_per_chunk(w: u32) -> Result<u32, ConfigError> {
    match w {
        2 => Ok(1),
        4 => Ok(2),
        16 => Ok(4),
        256 => Ok(8),
        other => Err(ConfigError::UnsupportedWinternitzW(other)),
    }
}

/// Extract `count` chunks of `bits`-width, least-significant-bit-first
/// within each byte, from the front of `bytes`.
fn chunks_from_bytes(bytes: &[u8], bits: u32, count: usize) -> Vec<u32> {
    let chunks_per_byte = 8 / bits;
    let mask = (1u32 << bits) - 1;
    (0..count)
        .map(|i| {
            let byte = bytes[i / chunks_per_byte as usize];
            let shift = (i as u32 % chunks_per_byte) * bits;
            ((byte as u32) >> shift) & mask
        })
        .collect()
}

/// Number of whole bytes needed to hold `count` chunks of `bits` width.
fn bytes_needed(bits: u32, count: usize) -> usize {
    let chunks_per_byte = (8 / bits) as usize;
    count.div_ceil(chunks_per_byte)
}

/// Encode a message digest into `v_msg + v_chk` base-`w` chunks.
pub fn encode(
    digest: &[u8],
    w: u32,
    v_msg: usize,
    v_chk: usize,
) -> Result<Vec<u32>, EncodingError> {
    let bits = bits_per_chunk(w).map_err(|_| EncodingError::UnsupportedWinternitzW(w))?;

    let required = bytes_needed(bits, v_msg);
    if digest.len() < required {
        return Err(EncodingError::InsufficientDigest {
            required,
            actual: digest.len(),
            v_msg,
            w,
        });
    }

    let mut chunks = chunks_from_bytes(digest, bits, v_msg);

    let checksum: u64 = chunks.iter().map(|&c| (w - 1 - c) as u64).sum();
    let checksum_bytes = checksum.to_le_bytes();
    let checksum_chunks = chunks_from_bytes(&checksum_bytes, bits, v_chk);
    chunks.extend(checksum_chunks);

    Ok(chunks)
}

/// Validate that `v_chk` base-`w` chunks can represent any checksum value
/// that `v_msg` chunks could produce (`ConfigError::ChecksumChainsTooFew`).
pub fn validate_checksum_capacity(
    w: u32,
    v_msg: usize,
    v_chk: usize,
) -> Result<(), ConfigError> {
    let bits = bits_per_chunk(w)?;
    let max_checksum = (v_msg as u64) * (w as u64 - 1);
    let mut needed = 0usize;
    let mut capacity: u64 = 0;
    while capacity <= max_checksum {
        needed += 1;
        capacity = (capacity + 1).checked_shl(bits).unwrap_or(u64::MAX);
        if needed > 64 {
            break;
        }
    }
    if v_chk < needed {
        return Err(ConfigError::ChecksumChainsTooFew {
            num_checksum_chains: v_chk,
            winternitz_w: w,
            max_checksum,
            needed,
        });
    }
    Ok(())
}
