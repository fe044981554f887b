//! Merkle tree over the `2^L` OTS leaves: bottom-up construction during
//! KeyGen, authentication-path extraction during Sign, and path-climbing
//! verification during Verify. Every internal node is
//! `TweakableHash.hash(parameter, TreeTweak(level, position), left ‖ right)`.

use serde::{Deserialize, Serialize};

use crate::field::FieldElement;
use crate::hash::TweakableHash;
use crate::tweak::Tweak;

/// A complete binary Merkle tree built once at KeyGen time and read-only
/// thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerkleTree {
    /// `levels[0]` are the leaves; `levels[levels.len() - 1]` holds the
    /// single root node.
    levels: Vec<Vec<Vec<FieldElement>>>,
}

impl MerkleTree {
    /// Build the tree from `2^depth` leaves.
    pub fn build(
        leaves: Vec<Vec<FieldElement>>,
        parameter: &[FieldElement],
        hash: &TweakableHash,
        depth: u32,
    ) -> Self {
        assert_eq!(leaves.len(), 1usize << depth, "leaf count must be 2^depth");

        let mut levels = Vec::with_capacity(depth as usize + 1);
        levels.push(leaves);

        for level in 0..depth {
            let prev = &levels[level as usize];
            let next: Vec<Vec<FieldElement>> = prev
                .chunks(2)
                .enumerate()
                .map(|(position, pair)| {
                    let tweak = Tweak::Tree {
                        level: (level + 1) as u8,
                        position: position as u64,
                    };
                    hash.hash(parameter, tweak, &[&pair[0], &pair[1]])
                })
                .collect();
            levels.push(next);
        }

        Self { levels }
    }

    /// The tree root, i.e. the single node at the top level.
    pub fn root(&self) -> &[FieldElement] {
        &self.levels[self.levels.len() - 1][0]
    }

    pub fn depth(&self) -> u32 {
        (self.levels.len() - 1) as u32
    }

    /// The authentication path for `leaf_index`: one sibling node per level,
    /// from the leaf's sibling up to the child of the root.
    pub fn auth_path(&self, leaf_index: u64) -> Vec<Vec<FieldElement>> {
        let depth = self.depth();
        let mut path = Vec::with_capacity(depth as usize);
        let mut index = leaf_index;
        for level in 0..depth {
            let sibling_index = index ^ 1;
            path.push(self.levels[level as usize][sibling_index as usize].clone());
            index >>= 1;
        }
        path
    }
}

/// Recompute the root from a leaf, its index, and its authentication path,
/// for comparison against the public key's stored root.
pub fn compute_root(
    parameter: &[FieldElement],
    hash: &TweakableHash,
    leaf: &[FieldElement],
    leaf_index: u64,
    auth_path: &[Vec<FieldElement>],
) -> Vec<FieldElement> {
    let mut node = leaf.to_vec();
    let mut index = leaf_index;
    for (level, sibling) in auth_path.iter().enumerate() {
        let tweak = Tweak::Tree {
            level: (level + 1) as u8,
            position: index >> 1,
        };
        node = if index & 1 == 0 {
            hash.hash(parameter, tweak, &[&node, sibling])
        } else {
            hash.hash(parameter, tweak, &[sibling, &node])
        };
        index >>= 1;
    }
    node
}
