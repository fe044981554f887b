//! Deterministic randomness: a ChaCha12-based seed expander that turns the
//! 32-byte root seed into a PRF key and public parameter, and a SHAKE-128
//! based PRF that maps `(key, epoch, index)` or `(key, epoch, message,
//! counter)` to field-element vectors.

use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha12Rng;
use rand_core::RngCore;
use sha3::digest::{ExtendableOutput, Update, XofReader};
use serde::{Deserialize, Serialize};
use sha3::Shake128;
use zeroize::Zeroize;

use crate::field::FieldElement;

/// Domain separator absorbed before every `ShakePRFtoF` query, distinguishing
/// this PRF's output space from any other use of Shake128 in the scheme.
const DOMAIN_SEPARATOR: [u8; 16] = [
    0xAE, 0xAE, 0x22, 0xFF, 0x00, 0x01, 0xFA, 0xFF, 0x21, 0xAF, 0x12, 0x00, 0x01, 0x11, 0xFF, 0x00,
];
const SEP_DOMAIN_ELEMENT: u8 = 0x00;
const SEP_RANDOMNESS: u8 = 0x01;

/// 32-byte secret key to the chain-start / randomness PRF. Zeroized on drop.
#[derive(Clone, Zeroize, Serialize, Deserialize)]
#[zeroize(drop)]
pub struct PrfKey(pub [u8; 32]);

impl PrfKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for PrfKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrfKey(..)")
    }
}

/// Expands a 32-byte root seed into a [`PrfKey`] and a `parameter_len`-element
/// public parameter, using the ChaCha12 keystream with an all-zero nonce.
/// The first 32 keystream bytes become the PRF key; each following 4-byte
/// little-endian chunk becomes one parameter field element, reduced mod p.
pub fn expand_seed(seed: [u8; 32], parameter_len: usize) -> (PrfKey, Vec<FieldElement>) {
    let mut rng = ChaCha12Rng::from_seed(seed);
    let mut buf = vec![0u8; 32 + 4 * parameter_len];
    rng.fill_bytes(&mut buf);

    let mut key = [0u8; 32];
    key.copy_from_slice(&buf[..32]);

    let parameter = buf[32..]
        .chunks_exact(4)
        .map(|chunk| {
            let mut b = [0u8; 4];
            b.copy_from_slice(chunk);
            FieldElement::from_le_bytes(b)
        })
        .collect();

    (PrfKey(key), parameter)
}

fn squeeze_field_elements(absorbed: &[&[u8]], count: usize) -> Vec<FieldElement> {
    let mut hasher = Shake128::default();
    for chunk in absorbed {
        hasher.update(chunk);
    }
    let mut reader = hasher.finalize_xof();
    let mut out = Vec::with_capacity(count);
    let mut group = [0u8; 8];
    for _ in 0..count {
        reader.read(&mut group);
        out.push(FieldElement::from_canonical_u64(u64::from_be_bytes(group)));
    }
    out
}

/// `ShakePRFtoF.get_domain_element`: the chain-start vector for `(key, epoch,
/// index)`.
pub fn get_domain_element(key: &PrfKey, epoch: u64, index: u64, domain_len: usize) -> Vec<FieldElement> {
    let epoch_be = (epoch as u32).to_be_bytes();
    let index_be = index.to_be_bytes();
    squeeze_field_elements(
        &[
            &DOMAIN_SEPARATOR,
            &[SEP_DOMAIN_ELEMENT],
            key.as_bytes(),
            &epoch_be,
            &index_be,
        ],
        domain_len,
    )
}

/// `ShakePRFtoF.get_randomness`: the per-signature randomness for `(key,
/// epoch, message, counter)`.
pub fn get_randomness(
    key: &PrfKey,
    epoch: u64,
    message: &[u8],
    counter: u64,
    rand_len: usize,
) -> Vec<FieldElement> {
    let epoch_be = (epoch as u32).to_be_bytes();
    let counter_be = counter.to_be_bytes();
    squeeze_field_elements(
        &[
            &DOMAIN_SEPARATOR,
            &[SEP_RANDOMNESS],
            key.as_bytes(),
            &epoch_be,
            message,
            &counter_be,
        ],
        rand_len,
    )
}
