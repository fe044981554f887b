//! `XmssParams`: the validated set of scheme parameters every other module
//! is built against. Constructed once via [`XmssParams::new`], which rejects
//! every invalid combination up front so KeyGen/Sign/Verify never discover a
//! bad parameter choice mid-hash.

use serde::{Deserialize, Serialize};

use crate::encoding;
use crate::error::ConfigError;
use crate::poseidon2;
use crate::tweak::TWEAK_LEN;

/// A fully validated, immutable parameter set for one instantiation of the
/// scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmssParams {
    /// `L`: usable epochs = `2^lifetime_log2`; also the Merkle tree depth.
    pub lifetime_log2: u32,
    /// `w`: base of the chunk encoding; each chain has `w - 1` steps.
    pub winternitz_w: u32,
    /// `v_msg`: message-digest chunk count.
    pub num_message_chains: usize,
    /// `v_chk`: checksum chunk count.
    pub num_checksum_chains: usize,
    /// `h`/`n`: width of leaf compression and of each chain element vector.
    pub hash_output_len: usize,
    /// `P`: public parameter length.
    pub parameter_len: usize,
}

impl XmssParams {
    /// Validate and build a parameter set. Every rejected combination
    /// returns the `ConfigError` variant named for the violated constraint.
    pub fn new(
        lifetime_log2: u32,
        winternitz_w: u32,
        num_message_chains: usize,
        num_checksum_chains: usize,
        hash_output_len: usize,
        parameter_len: usize,
    ) -> Result<Self, ConfigError> {
        if num_message_chains == 0 {
            return Err(ConfigError::ZeroMessageChains);
        }
        if hash_output_len == 0 {
            return Err(ConfigError::ZeroHashOutputLen(hash_output_len));
        }
        if parameter_len == 0 {
            return Err(ConfigError::ZeroParameterLen(parameter_len));
        }
        if lifetime_log2 >= 64 {
            return Err(ConfigError::LifetimeTooLarge(lifetime_log2));
        }

        encoding::validate_checksum_capacity(
            winternitz_w,
            num_message_chains,
            num_checksum_chains,
        )?;

        // Single-block compression (chain/message hashing) uses width 16;
        // two-block compression (Merkle internal nodes) uses width 24. Both
        // must be among the shipped widths, and the parameter/tweak/value
        // lengths must actually fit the corresponding state.
        poseidon2::check_supported_width(poseidon2::WIDTH_16)?;
        poseidon2::check_supported_width(poseidon2::WIDTH_24)?;

        if parameter_len + TWEAK_LEN + hash_output_len > poseidon2::WIDTH_16 {
            return Err(ConfigError::SingleBlockOverflow {
                parameter_len,
                tweak_len: TWEAK_LEN,
                hash_output_len,
                width_16: poseidon2::WIDTH_16,
            });
        }
        if parameter_len + TWEAK_LEN + 2 * hash_output_len > poseidon2::WIDTH_24 {
            return Err(ConfigError::TwoBlockOverflow {
                parameter_len,
                tweak_len: TWEAK_LEN,
                hash_output_len,
                width_24: poseidon2::WIDTH_24,
            });
        }

        Ok(Self {
            lifetime_log2,
            winternitz_w,
            num_message_chains,
            num_checksum_chains,
            hash_output_len,
            parameter_len,
        })
    }

    /// `v = v_msg + v_chk`, the total number of Winternitz chains.
    pub fn num_chains(&self) -> usize {
        self.num_message_chains + self.num_checksum_chains
    }

    /// `2^lifetime_log2`, the number of usable epochs.
    pub fn num_epochs(&self) -> u64 {
        1u64 << self.lifetime_log2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> (u32, u32, usize, usize, usize, usize) {
        (8, 256, 20, 2, 7, 5)
    }

    #[test]
    fn accepts_the_canonical_parameter_set() {
        let (l, w, vm, vc, h, p) = base();
        assert!(XmssParams::new(l, w, vm, vc, h, p).is_ok());
    }

    #[test]
    fn rejects_unsupported_winternitz_w() {
        let (l, _, vm, vc, h, p) = base();
        let err = XmssParams::new(l, 3, vm, vc, h, p).unwrap_err();
        assert_eq!(err, ConfigError::UnsupportedWinternitzW(3));
    }

    #[test]
    fn rejects_too_few_checksum_chains() {
        let (l, w, vm, _, h, p) = base();
        let err = XmssParams::new(l, w, vm, 1, h, p).unwrap_err();
        assert!(matches!(err, ConfigError::ChecksumChainsTooFew { .. }));
    }

    #[test]
    fn rejects_zero_message_chains() {
        let (l, w, _, vc, h, p) = base();
        let err = XmssParams::new(l, w, 0, vc, h, p).unwrap_err();
        assert_eq!(err, ConfigError::ZeroMessageChains);
    }

    #[test]
    fn rejects_oversized_lifetime() {
        let (_, w, vm, vc, h, p) = base();
        let err = XmssParams::new(64, w, vm, vc, h, p).unwrap_err();
        assert_eq!(err, ConfigError::LifetimeTooLarge(64));
    }

    #[test]
    fn num_chains_and_num_epochs_are_derived_correctly() {
        let (l, w, vm, vc, h, p) = base();
        let params = XmssParams::new(l, w, vm, vc, h, p).unwrap();
        assert_eq!(params.num_chains(), 22);
        assert_eq!(params.num_epochs(), 256);
    }

    #[test]
    fn rejects_hash_output_len_too_large_for_single_block_width() {
        let (l, w, vm, vc, _, p) = base();
        // parameter_len(5) + tweak_len(3) + hash_output_len must be <= 16.
        let err = XmssParams::new(l, w, vm, vc, 9, p).unwrap_err();
        assert!(matches!(err, ConfigError::SingleBlockOverflow { .. }));
    }

    #[test]
    fn rejects_parameter_len_too_large_for_two_block_width() {
        let (l, w, vm, vc, _, _) = base();
        // hash_output_len=10, parameter_len=2: single block (2+3+10=15<=16)
        // fits, but two-block (2+3+20=25>24) does not.
        let err = XmssParams::new(l, w, vm, vc, 10, 2).unwrap_err();
        assert!(matches!(err, ConfigError::TwoBlockOverflow { .. }));
    }
}
