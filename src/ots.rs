//! Winternitz one-time signature chains: PRF-derived starts, tweakable-hash
//! steps, and the partial/full walks used by signing, verification, and
//! key generation respectively.

use crate::field::FieldElement;
use crate::hash::TweakableHash;
use crate::prf::{self, PrfKey};
use crate::tweak::Tweak;

/// `chain_start(i)`: the PRF-derived starting vector of chain `i` at `epoch`.
pub fn chain_start(
    prf_key: &PrfKey,
    epoch: u64,
    chain_index: u32,
    hash_len: usize,
) -> Vec<FieldElement> {
    prf::get_domain_element(prf_key, epoch, chain_index as u64, hash_len)
}

/// Walk a chain forward `steps` steps from `start`, where `start` is
/// understood to sit at step 0. Returns the value at step
/// `from_step + steps`.
pub fn walk(
    parameter: &[FieldElement],
    hash: &TweakableHash,
    epoch: u64,
    chain_index: u32,
    start: &[FieldElement],
    from_step: u32,
    steps: u32,
) -> Vec<FieldElement> {
    let mut value = start.to_vec();
    for step in (from_step + 1)..=(from_step + steps) {
        let tweak = Tweak::Chain {
            epoch,
            chain_index,
            step,
        };
        value = hash.hash(parameter, tweak, &[&value]);
    }
    value
}

/// Walk chain `i` all the way from its start (step 0) to its end (step
/// `w - 1`), the value embedded in the OTS public key / leaf.
pub fn chain_end(
    parameter: &[FieldElement],
    hash: &TweakableHash,
    prf_key: &PrfKey,
    epoch: u64,
    chain_index: u32,
    w: u32,
    hash_len: usize,
) -> Vec<FieldElement> {
    let start = chain_start(prf_key, epoch, chain_index, hash_len);
    walk(parameter, hash, epoch, chain_index, &start, 0, w - 1)
}
