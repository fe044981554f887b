//! KeyGen / Sign / Verify: the top-level operations that tie the field,
//! Poseidon2, tweakable hash, PRF, encoding, chain-walk, and Merkle-tree
//! layers together into the signature scheme itself.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info_span, trace_span};
use zeroize::Zeroize;

use crate::config::XmssParams;
use crate::encoding;
use crate::error::{ConfigError, SignError};
use crate::field::FieldElement;
use crate::hash::TweakableHash;
use crate::merkle::{self, MerkleTree};
use crate::ots;
use crate::prf::{self, PrfKey};
use crate::tweak::Tweak;

/// The 32-byte root secret consumed once by [`keygen`]. Zeroized on drop.
#[derive(Clone, Zeroize, Serialize, Deserialize)]
#[zeroize(drop)]
pub struct Seed(pub [u8; 32]);

impl std::fmt::Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Seed(..)")
    }
}

/// The public key: the Poseidon2 parameter, the Merkle root, and the
/// lifetime tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    pub parameter: Vec<FieldElement>,
    pub root: Vec<FieldElement>,
    pub lifetime_log2: u8,
}

/// The secret key: the root seed, the derived PRF key and parameter, the
/// precomputed (read-only) Merkle tree, and the monotonic epoch counter that
/// is the only mutable state in the scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretKey {
    seed: Seed,
    prf_key: PrfKey,
    parameter: Vec<FieldElement>,
    tree: MerkleTree,
    next_epoch: u64,
    params: XmssParams,
}

impl SecretKey {
    /// The epoch the next [`sign`] call must target.
    pub fn next_epoch(&self) -> u64 {
        self.next_epoch
    }

    /// True once every epoch in `[0, 2^L)` has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.next_epoch >= self.params.num_epochs()
    }
}

/// A one-time signature: the sampled randomness, the `v` chain values at the
/// signed step, and the `L`-node authentication path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub randomness: Vec<FieldElement>,
    pub chain_values: Vec<Vec<FieldElement>>,
    pub auth_path: Vec<Vec<FieldElement>>,
}

/// Split a flat vector of field elements into fixed-size blocks, the last
/// zero-padded if necessary. Used to feed arbitrary-length inputs (message
/// bytes plus randomness) into the block-oriented tweakable hash.
fn to_blocks(elems: &[FieldElement], block_len: usize) -> Vec<Vec<FieldElement>> {
    let mut blocks = Vec::new();
    let mut idx = 0;
    while idx < elems.len() {
        let mut block = vec![FieldElement::ZERO; block_len];
        let take = block_len.min(elems.len() - idx);
        block[..take].copy_from_slice(&elems[idx..idx + take]);
        blocks.push(block);
        idx += take;
    }
    if blocks.is_empty() {
        blocks.push(vec![FieldElement::ZERO; block_len]);
    }
    blocks
}

/// Map raw message bytes into field elements, 4 little-endian bytes per
/// element, zero-padding the final partial group.
fn message_to_field_elements(message: &[u8]) -> Vec<FieldElement> {
    message
        .chunks(4)
        .map(|chunk| {
            let mut b = [0u8; 4];
            b[..chunk.len()].copy_from_slice(chunk);
            FieldElement::from_le_bytes(b)
        })
        .collect()
}

fn message_digest(
    hash: &TweakableHash,
    parameter: &[FieldElement],
    epoch: u64,
    message: &[u8],
    randomness: &[FieldElement],
) -> Vec<FieldElement> {
    let message_fe = message_to_field_elements(message);
    let mut combined = randomness.to_vec();
    combined.extend(message_fe);
    let blocks = to_blocks(&combined, hash.hash_len);
    let block_refs: Vec<&[FieldElement]> = blocks.iter().map(|b| b.as_slice()).collect();
    hash.hash(parameter, Tweak::Message { epoch }, &block_refs)
}

fn digest_to_chunks(
    digest: &[FieldElement],
    params: &XmssParams,
) -> Result<Vec<u32>, SignError> {
    let digest_bytes: Vec<u8> = digest.iter().flat_map(|fe| fe.to_le_bytes()).collect();
    encoding::encode(
        &digest_bytes,
        params.winternitz_w,
        params.num_message_chains,
        params.num_checksum_chains,
    )
    .map_err(|_| SignError::RandomnessExhausted { attempts: 1 })
}

fn compute_leaf(
    hash: &TweakableHash,
    parameter: &[FieldElement],
    epoch: u64,
    chain_ends: &[Vec<FieldElement>],
) -> Vec<FieldElement> {
    let refs: Vec<&[FieldElement]> = chain_ends.iter().map(|v| v.as_slice()).collect();
    hash.hash(
        parameter,
        Tweak::Tree {
            level: 0,
            position: epoch,
        },
        &refs,
    )
}

/// `KeyGen(seed) -> (PublicKey, SecretKey)`. Leaf computation is dispatched
/// across a Rayon thread pool (each epoch's leaf depends only on
/// `(Parameter, PrfKey, epoch)`); the Merkle fold afterwards is sequential.
pub fn keygen(seed: [u8; 32], params: &XmssParams) -> Result<(PublicKey, SecretKey), ConfigError> {
    let span = info_span!("xmss_keygen", lifetime_log2 = params.lifetime_log2);
    let _guard = span.enter();

    let (prf_key, parameter) = prf::expand_seed(seed, params.parameter_len);
    let hash = TweakableHash::new(params.parameter_len, params.hash_output_len);
    let num_epochs = params.num_epochs();
    let num_chains = params.num_chains();

    tracing::event!(tracing::Level::INFO, num_epochs, "expanded seed, computing leaves");

    let leaves: Vec<Vec<FieldElement>> = (0..num_epochs)
        .into_par_iter()
        .map(|epoch| {
            let _fold_span = trace_span!("leaf", epoch).entered();
            let chain_ends: Vec<Vec<FieldElement>> = (0..num_chains as u32)
                .map(|chain_index| {
                    ots::chain_end(
                        &parameter,
                        &hash,
                        &prf_key,
                        epoch,
                        chain_index,
                        params.winternitz_w,
                        params.hash_output_len,
                    )
                })
                .collect();
            compute_leaf(&hash, &parameter, epoch, &chain_ends)
        })
        .collect();

    tracing::event!(tracing::Level::INFO, "leaves computed, folding merkle tree");

    let tree = MerkleTree::build(leaves, &parameter, &hash, params.lifetime_log2);

    let public_key = PublicKey {
        parameter: parameter.clone(),
        root: tree.root().to_vec(),
        lifetime_log2: params.lifetime_log2 as u8,
    };
    let secret_key = SecretKey {
        seed: Seed(seed),
        prf_key,
        parameter,
        tree,
        next_epoch: 0,
        params: *params,
    };

    Ok((public_key, secret_key))
}

/// `Sign(SecretKey, message, epoch) -> Signature`. `epoch` must be the
/// secret key's current `next_epoch`, enforcing the monotonic
/// `Ready(e) -> Ready(e+1)` state machine and making double-signing
/// impossible through this API.
pub fn sign(
    secret_key: &mut SecretKey,
    message: &[u8],
    epoch: u64,
) -> Result<Signature, SignError> {
    let span = info_span!("xmss_sign", epoch);
    let _guard = span.enter();

    let params = &secret_key.params;
    let limit = params.num_epochs();
    if epoch != secret_key.next_epoch || epoch >= limit {
        return Err(SignError::EpochOutOfRange {
            epoch,
            min: secret_key.next_epoch,
            limit,
        });
    }

    let hash = TweakableHash::new(params.parameter_len, params.hash_output_len);
    // No target-sum constraint is configured in this scheme instance, so the
    // rejection-sampling counter never needs to advance past 0.
    let randomness = prf::get_randomness(
        &secret_key.prf_key,
        epoch,
        message,
        0,
        params.hash_output_len,
    );

    let digest = message_digest(&hash, &secret_key.parameter, epoch, message, &randomness);
    let chunks = digest_to_chunks(&digest, params)?;

    let chain_values: Vec<Vec<FieldElement>> = chunks
        .iter()
        .enumerate()
        .map(|(i, &x_i)| {
            let _walk_span = trace_span!("chain_walk", chain = i, steps = x_i).entered();
            let start = ots::chain_start(&secret_key.prf_key, epoch, i as u32, params.hash_output_len);
            ots::walk(&secret_key.parameter, &hash, epoch, i as u32, &start, 0, x_i)
        })
        .collect();

    let auth_path = secret_key.tree.auth_path(epoch);

    secret_key.next_epoch += 1;

    Ok(Signature {
        randomness,
        chain_values,
        auth_path,
    })
}

/// `Verify(PublicKey, message, epoch, Signature) -> bool`. Never returns an
/// error: a malformed or forged signature is simply invalid.
pub fn verify(
    public_key: &PublicKey,
    message: &[u8],
    epoch: u64,
    signature: &Signature,
    params: &XmssParams,
) -> bool {
    let span = info_span!("xmss_verify", epoch);
    let _guard = span.enter();

    if epoch >= params.num_epochs() {
        return false;
    }
    if signature.chain_values.len() != params.num_chains() {
        return false;
    }

    let hash = TweakableHash::new(params.parameter_len, params.hash_output_len);
    let digest = message_digest(
        &hash,
        &public_key.parameter,
        epoch,
        message,
        &signature.randomness,
    );
    let chunks = match digest_to_chunks(&digest, params) {
        Ok(c) => c,
        Err(_) => return false,
    };
    if chunks.len() != signature.chain_values.len() {
        return false;
    }

    let chain_ends: Vec<Vec<FieldElement>> = chunks
        .iter()
        .zip(signature.chain_values.iter())
        .enumerate()
        .map(|(i, (&x_i, value))| {
            let remaining = params.winternitz_w - 1 - x_i;
            let _walk_span = trace_span!("chain_walk", chain = i, steps = remaining).entered();
            ots::walk(
                &public_key.parameter,
                &hash,
                epoch,
                i as u32,
                value,
                x_i,
                remaining,
            )
        })
        .collect();

    let leaf_candidate = compute_leaf(&hash, &public_key.parameter, epoch, &chain_ends);
    let recomputed_root = merkle::compute_root(
        &public_key.parameter,
        &hash,
        &leaf_candidate,
        epoch,
        &signature.auth_path,
    );

    recomputed_root == public_key.root
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_params(lifetime_log2: u32) -> XmssParams {
        XmssParams::new(lifetime_log2, 256, 20, 2, 7, 5).unwrap()
    }

    #[test]
    fn keygen_sign_verify_round_trip() {
        let params = test_params(4);
        let (pk, mut sk) = keygen([0x42; 32], &params).unwrap();

        let sig = sign(&mut sk, b"hello", 0).unwrap();
        assert!(verify(&pk, b"hello", 0, &sig, &params));
        assert!(!verify(&pk, b"goodbye", 0, &sig, &params));
    }

    #[test]
    fn different_messages_give_different_signatures_but_both_verify() {
        let params = test_params(4);
        let (pk, mut sk) = keygen([0x42; 32], &params).unwrap();

        let sig_hello = sign(&mut sk, b"hello", 0).unwrap();

        let (_, mut sk2) = keygen([0x42; 32], &params).unwrap();
        let sig_world = sign(&mut sk2, b"world", 0).unwrap();

        assert_ne!(sig_hello, sig_world);
        assert!(verify(&pk, b"hello", 0, &sig_hello, &params));
        assert!(verify(&pk, b"world", 0, &sig_world, &params));
    }

    #[test]
    fn keygen_is_deterministic() {
        let params = test_params(3);
        let (pk1, _) = keygen([7; 32], &params).unwrap();
        let (pk2, _) = keygen([7; 32], &params).unwrap();
        assert_eq!(pk1, pk2);
    }

    #[test]
    fn signing_out_of_order_epoch_is_rejected() {
        let params = test_params(3);
        let (_, mut sk) = keygen([1; 32], &params).unwrap();
        let err = sign(&mut sk, b"msg", 2).unwrap_err();
        assert_eq!(
            err,
            SignError::EpochOutOfRange {
                epoch: 2,
                min: 0,
                limit: 8,
            }
        );
    }

    #[test]
    fn double_signing_the_same_epoch_is_rejected() {
        let params = test_params(3);
        let (_, mut sk) = keygen([1; 32], &params).unwrap();
        sign(&mut sk, b"first", 0).unwrap();
        let err = sign(&mut sk, b"second", 0).unwrap_err();
        assert_eq!(
            err,
            SignError::EpochOutOfRange {
                epoch: 0,
                min: 1,
                limit: 8,
            }
        );
    }

    #[test]
    fn signing_past_the_lifetime_is_rejected() {
        let params = test_params(1);
        let (_, mut sk) = keygen([1; 32], &params).unwrap();
        sign(&mut sk, b"a", 0).unwrap();
        sign(&mut sk, b"b", 1).unwrap();
        assert!(sk.is_exhausted());
        let err = sign(&mut sk, b"c", 2).unwrap_err();
        assert_eq!(
            err,
            SignError::EpochOutOfRange {
                epoch: 2,
                min: 2,
                limit: 2,
            }
        );
    }

    #[test]
    fn tampered_signature_fails_verification() {
        let params = test_params(3);
        let (pk, mut sk) = keygen([1; 32], &params).unwrap();
        let mut sig = sign(&mut sk, b"msg", 0).unwrap();
        sig.chain_values[0][0] += FieldElement::ONE;
        assert!(!verify(&pk, b"msg", 0, &sig, &params));
    }

    #[test]
    fn wrong_epoch_fails_verification() {
        let params = test_params(3);
        let (pk, mut sk) = keygen([1; 32], &params).unwrap();
        let sig = sign(&mut sk, b"msg", 0).unwrap();
        assert!(!verify(&pk, b"msg", 1, &sig, &params));
    }

    #[test]
    fn tampering_any_authentication_path_node_fails_verification() {
        let params = test_params(3);
        let (pk, mut sk) = keygen([1; 32], &params).unwrap();
        let sig = sign(&mut sk, b"msg", 0).unwrap();
        assert!(verify(&pk, b"msg", 0, &sig, &params));

        for node_index in 0..sig.auth_path.len() {
            let mut tampered = sig.clone();
            tampered.auth_path[node_index][0] += FieldElement::ONE;
            assert!(
                !verify(&pk, b"msg", 0, &tampered, &params),
                "flipping a bit in authentication node {node_index} must invalidate the signature"
            );
        }
    }
}
