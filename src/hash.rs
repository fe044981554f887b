//! The tweakable hash: `H(parameter, tweak, blocks) -> F^h`, built from the
//! Poseidon2 permutation. One block uses a width-16 compression, two blocks
//! a width-24 compression, and three or more blocks (leaf compression over
//! the whole chain table) a width-24 sponge, all sharing the same
//! parameter/tweak prefix and the same feed-forward discipline.

use crate::field::FieldElement;
use crate::poseidon2::{self, WIDTH_16, WIDTH_24};
use crate::tweak::Tweak;

/// Sponge capacity (in field elements) reserved for domain separation when
/// hashing more than two blocks.
const SPONGE_CAPACITY: usize = 9;
const SPONGE_RATE: usize = WIDTH_24 - SPONGE_CAPACITY;

/// A configured tweakable hash: fixes the parameter length and the output
/// (and per-block) width so every call site agrees on layout.
#[derive(Debug, Clone, Copy)]
pub struct TweakableHash {
    pub parameter_len: usize,
    pub hash_len: usize,
}

impl TweakableHash {
    pub fn new(parameter_len: usize, hash_len: usize) -> Self {
        Self {
            parameter_len,
            hash_len,
        }
    }

    /// Hash `parameter || tweak || blocks` down to `hash_len` field elements.
    /// `blocks` must be non-empty and every block must have `hash_len`
    /// elements.
    pub fn hash(
        &self,
        parameter: &[FieldElement],
        tweak: Tweak,
        blocks: &[&[FieldElement]],
    ) -> Vec<FieldElement> {
        debug_assert_eq!(parameter.len(), self.parameter_len);
        debug_assert!(!blocks.is_empty());
        debug_assert!(blocks.iter().all(|b| b.len() == self.hash_len));

        let tweak_fe = tweak.to_field_elements();

        match blocks.len() {
            1 => {
                debug_assert!(self.parameter_len + tweak_fe.len() + self.hash_len <= WIDTH_16);
                let mut input = Vec::with_capacity(WIDTH_16);
                input.extend_from_slice(parameter);
                input.extend_from_slice(&tweak_fe);
                input.extend_from_slice(blocks[0]);
                self.compress16(&input)
            }
            2 => {
                debug_assert!(
                    self.parameter_len + tweak_fe.len() + 2 * self.hash_len <= WIDTH_24
                );
                let mut input = Vec::with_capacity(WIDTH_24);
                input.extend_from_slice(parameter);
                input.extend_from_slice(&tweak_fe);
                input.extend_from_slice(blocks[0]);
                input.extend_from_slice(blocks[1]);
                self.compress24(&input)
            }
            n => self.sponge(parameter, &tweak_fe, blocks, n),
        }
    }

    fn compress16(&self, input: &[FieldElement]) -> Vec<FieldElement> {
        let mut state = [FieldElement::ZERO; WIDTH_16];
        state[..input.len()].copy_from_slice(input);
        let original = state;
        poseidon2::permute16(&mut state);
        for i in 0..WIDTH_16 {
            state[i] += original[i];
        }
        state[..self.hash_len].to_vec()
    }

    fn compress24(&self, input: &[FieldElement]) -> Vec<FieldElement> {
        let mut state = [FieldElement::ZERO; WIDTH_24];
        state[..input.len()].copy_from_slice(input);
        let original = state;
        poseidon2::permute24(&mut state);
        for i in 0..WIDTH_24 {
            state[i] += original[i];
        }
        state[..self.hash_len].to_vec()
    }

    fn sponge(
        &self,
        parameter: &[FieldElement],
        tweak_fe: &[FieldElement],
        blocks: &[&[FieldElement]],
        num_blocks: usize,
    ) -> Vec<FieldElement> {
        let mut input: Vec<FieldElement> = Vec::with_capacity(
            self.parameter_len + tweak_fe.len() + num_blocks * self.hash_len,
        );
        input.extend_from_slice(parameter);
        input.extend_from_slice(tweak_fe);
        for block in blocks {
            input.extend_from_slice(block);
        }

        let mut state = [FieldElement::ZERO; WIDTH_24];
        // Capacity carries a domain separator over (parameter_len, tweak_len,
        // num_blocks, hash_len) so that a sponge call can never be confused
        // with a compression call over differently-shaped input.
        state[SPONGE_RATE] = FieldElement::from_canonical(self.parameter_len as u32);
        state[SPONGE_RATE + 1] = FieldElement::from_canonical(tweak_fe.len() as u32);
        state[SPONGE_RATE + 2] = FieldElement::from_canonical(num_blocks as u32);
        state[SPONGE_RATE + 3] = FieldElement::from_canonical(self.hash_len as u32);

        let mut idx = 0;
        while idx < input.len() {
            let chunk_len = SPONGE_RATE.min(input.len() - idx);
            for i in 0..chunk_len {
                state[i] += input[idx + i];
            }
            poseidon2::permute24(&mut state);
            idx += chunk_len;
        }
        // Absorb a final empty block if the input was an exact multiple of
        // the rate, matching the usual sponge padding discipline.
        if input.len() % SPONGE_RATE == 0 {
            poseidon2::permute24(&mut state);
        }

        let mut output = Vec::with_capacity(self.hash_len);
        while output.len() < self.hash_len {
            let take = SPONGE_RATE.min(self.hash_len - output.len());
            output.extend_from_slice(&state[..take]);
            if output.len() < self.hash_len {
                poseidon2::permute24(&mut state);
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(len: usize) -> Vec<FieldElement> {
        (0..len)
            .map(|i| FieldElement::from_canonical(i as u32 + 1))
            .collect()
    }

    fn block(len: usize, offset: u32) -> Vec<FieldElement> {
        (0..len)
            .map(|i| FieldElement::from_canonical(i as u32 + offset))
            .collect()
    }

    #[test]
    fn single_block_is_deterministic() {
        let th = TweakableHash::new(5, 7);
        let p = param(5);
        let b = block(7, 10);
        let tweak = Tweak::Chain {
            epoch: 1,
            chain_index: 2,
            step: 3,
        };
        let out1 = th.hash(&p, tweak, &[&b]);
        let out2 = th.hash(&p, tweak, &[&b]);
        assert_eq!(out1, out2);
        assert_eq!(out1.len(), 7);
    }

    #[test]
    fn two_block_differs_from_swapped_order() {
        let th = TweakableHash::new(5, 7);
        let p = param(5);
        let left = block(7, 1);
        let right = block(7, 100);
        let tweak = Tweak::Tree {
            level: 1,
            position: 0,
        };
        let forward = th.hash(&p, tweak, &[&left, &right]);
        let backward = th.hash(&p, tweak, &[&right, &left]);
        assert_ne!(forward, backward);
    }

    #[test]
    fn sponge_over_many_blocks_is_deterministic_and_sized() {
        let th = TweakableHash::new(5, 7);
        let p = param(5);
        let blocks: Vec<Vec<FieldElement>> = (0..20).map(|i| block(7, i * 13)).collect();
        let refs: Vec<&[FieldElement]> = blocks.iter().map(|b| b.as_slice()).collect();
        let tweak = Tweak::Tree {
            level: 0,
            position: 42,
        };
        let out1 = th.hash(&p, tweak, &refs);
        let out2 = th.hash(&p, tweak, &refs);
        assert_eq!(out1, out2);
        assert_eq!(out1.len(), 7);
    }

    #[test]
    fn different_tweaks_give_different_output() {
        let th = TweakableHash::new(5, 7);
        let p = param(5);
        let b = block(7, 0);
        let out_a = th.hash(
            &p,
            Tweak::Chain {
                epoch: 0,
                chain_index: 0,
                step: 1,
            },
            &[&b],
        );
        let out_b = th.hash(
            &p,
            Tweak::Chain {
                epoch: 0,
                chain_index: 0,
                step: 2,
            },
            &[&b],
        );
        assert_ne!(out_a, out_b);
    }
}
