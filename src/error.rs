//! Error taxonomy for the scheme: one small enum per failing component,
//! matching how the rest of the tree reports errors per-module rather than
//! through a single catch-all type.

use thiserror::Error;

/// Errors raised by field arithmetic (`crate::field`).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("cannot invert zero in the KoalaBear field")]
    ZeroInverse,
}

/// Errors raised when constructing a permutation, parameter set, or other
/// configuration object out of invalid inputs.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("poseidon2 width {0} has no shipped round-constant table (supported: 16, 24)")]
    UnsupportedWidth(usize),
    #[error("winternitz_w {0} is not a supported chunk width (supported: 2, 4, 16, 256)")]
    UnsupportedWinternitzW(u32),
    #[error(
        "num_checksum_chains {num_checksum_chains} is too small to represent the maximum \
         checksum value {max_checksum} in base winternitz_w={winternitz_w} (need at least {needed})"
    )]
    ChecksumChainsTooFew {
        num_checksum_chains: usize,
        winternitz_w: u32,
        max_checksum: u64,
        needed: usize,
    },
    #[error("lifetime_log2 {0} is too large; 2^lifetime_log2 epochs must fit in a u64 counter")]
    LifetimeTooLarge(u32),
    #[error("num_message_chains must be nonzero")]
    ZeroMessageChains,
    #[error("hash_output_len {0} must be nonzero")]
    ZeroHashOutputLen(usize),
    #[error("parameter_len {0} must be nonzero")]
    ZeroParameterLen(usize),
    #[error(
        "parameter_len {parameter_len} + tweak_len {tweak_len} + hash_output_len {hash_output_len} \
         does not fit a single-block compression at width {width_16} (chain/message hashing)"
    )]
    SingleBlockOverflow {
        parameter_len: usize,
        tweak_len: usize,
        hash_output_len: usize,
        width_16: usize,
    },
    #[error(
        "parameter_len {parameter_len} + tweak_len {tweak_len} + 2*hash_output_len {hash_output_len} \
         does not fit a two-block compression at width {width_24} (merkle internal nodes)"
    )]
    TwoBlockOverflow {
        parameter_len: usize,
        tweak_len: usize,
        hash_output_len: usize,
        width_24: usize,
    },
}

/// Errors raised while encoding a message digest into base-w chunks (`crate::encoding`).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EncodingError {
    #[error("digest has {actual} bytes, but encoding num_message_chains={v_msg} at winternitz_w={w} requires at least {required}")]
    InsufficientDigest {
        required: usize,
        actual: usize,
        v_msg: usize,
        w: u32,
    },
    #[error("winternitz_w {0} is not a supported chunk width (supported: 2, 4, 16, 256)")]
    UnsupportedWinternitzW(u32),
}

/// Errors raised while decoding the fixed wire format (`crate::serialize`).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WireError {
    #[error("truncated wire data: expected at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
}

/// Errors raised while signing (`crate::signer`).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SignError {
    #[error("epoch {epoch} is out of range: must satisfy {min} <= epoch < {limit}")]
    EpochOutOfRange { epoch: u64, min: u64, limit: u64 },
    #[error("randomness rejection sampling did not converge within {attempts} attempts")]
    RandomnessExhausted { attempts: u32 },
    #[error(transparent)]
    Field(#[from] FieldError),
}
