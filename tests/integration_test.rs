//! End-to-end KeyGen/Sign/Verify scenarios, exercising the scheme the way a
//! caller would: build a parameter set, generate a key, sign a few epochs
//! in order, and verify against the public key and the wire format.

use xmss_koalabear::signer::SecretKey;
use xmss_koalabear::{config::XmssParams, keygen, sign, verify, PublicKey, Signature};

fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

fn scheme_params() -> XmssParams {
    // L = 8, w = 256, v_msg = 20, v_chk = 2.
    XmssParams::new(8, 256, 20, 2, 7, 5).unwrap()
}

#[test]
fn hello_at_epoch_zero_verifies() {
    init_tracing();
    let params = scheme_params();
    let (pk, mut sk) = keygen([0x42; 32], &params).unwrap();
    let sig = sign(&mut sk, b"hello", 0).unwrap();
    assert!(verify(&pk, b"hello", 0, &sig, &params));
}

#[test]
fn world_at_epoch_zero_verifies_and_differs_from_hello() {
    let params = scheme_params();
    let (pk, mut sk) = keygen([0x42; 32], &params).unwrap();
    let sig_hello = sign(&mut sk, b"hello", 0).unwrap();

    let (_, mut sk2) = keygen([0x42; 32], &params).unwrap();
    let sig_world = sign(&mut sk2, b"world", 0).unwrap();

    assert!(verify(&pk, b"world", 0, &sig_world, &params));
    assert_ne!(sig_hello, sig_world);
}

#[test]
fn last_epoch_of_the_lifetime_verifies() {
    let params = scheme_params();
    let (pk, mut sk) = keygen([0x42; 32], &params).unwrap();

    for epoch in 0..255u64 {
        sign(&mut sk, b"filler", epoch).unwrap();
    }
    let sig = sign(&mut sk, b"hello", 255).unwrap();
    assert!(verify(&pk, b"hello", 255, &sig, &params));
    assert!(sk.is_exhausted());
}

#[test]
fn epoch_past_the_lifetime_is_rejected() {
    let params = scheme_params();
    let (_, mut sk) = keygen([0x42; 32], &params).unwrap();
    let err = sign(&mut sk, b"hello", 256);
    assert!(err.is_err());
}

#[test]
fn signature_size_matches_the_wire_format_formula() {
    let params = scheme_params();
    let (_, mut sk) = keygen([0x1; 32], &params).unwrap();
    let sig = sign(&mut sk, b"hello", 0).unwrap();
    let bytes = sig.to_bytes();

    let rand_len = params.hash_output_len;
    let v = params.num_chains();
    let n = params.hash_output_len;
    let l = params.lifetime_log2 as usize;
    let h = params.hash_output_len;
    let expected = 4 * rand_len + 4 * v * n + 4 * l * h;

    assert_eq!(bytes.len(), expected);
}

#[test]
fn public_key_and_signature_wire_round_trip() {
    let params = scheme_params();
    let (pk, mut sk) = keygen([0x7; 32], &params).unwrap();
    let sig = sign(&mut sk, b"round trip", 0).unwrap();

    let pk_bytes = pk.to_bytes();
    let sig_bytes = sig.to_bytes();

    let decoded_pk = PublicKey::from_bytes(&pk_bytes, &params).unwrap();
    let decoded_sig = Signature::from_bytes(&sig_bytes, &params).unwrap();

    assert!(verify(&decoded_pk, b"round trip", 0, &decoded_sig, &params));
}

#[test]
fn config_validation_is_checked_before_any_key_material_is_touched() {
    let rejected = XmssParams::new(8, 3, 20, 2, 7, 5);
    assert!(rejected.is_err());
}

#[test]
fn secret_key_bincode_round_trip_preserves_signing_state() {
    let params = scheme_params();
    let (pk, mut sk) = keygen([0x11; 32], &params).unwrap();
    sign(&mut sk, b"first", 0).unwrap();

    let encoded = bincode::serialize(&sk).expect("secret key must serialize");
    let mut restored: SecretKey =
        bincode::deserialize(&encoded).expect("secret key must deserialize");

    assert_eq!(restored.next_epoch(), sk.next_epoch());
    let sig = sign(&mut restored, b"second", 1).unwrap();
    assert!(verify(&pk, b"second", 1, &sig, &params));
}

#[test]
fn tampered_wire_signature_fails_verification() {
    let params = scheme_params();
    let (pk, mut sk) = keygen([0x9; 32], &params).unwrap();
    let sig = sign(&mut sk, b"hello", 0).unwrap();
    let mut bytes = sig.to_bytes();
    bytes[0] ^= 0xFF;
    let decoded = Signature::from_bytes(&bytes, &params).unwrap();
    assert!(!verify(&pk, b"hello", 0, &decoded, &params));
}
