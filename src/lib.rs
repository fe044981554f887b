//! Generalized XMSS, a hash-based, stateful, many-time digital signature
//! scheme over the KoalaBear field, built from a Poseidon2 tweakable hash.
//!
//! The public surface is [`config::XmssParams`] plus three operations:
//! [`signer::keygen`], [`signer::sign`], and [`signer::verify`].

pub mod config;
pub mod encoding;
pub mod error;
pub mod field;
pub mod hash;
pub mod merkle;
pub mod ots;
pub mod poseidon2;
pub mod prf;
pub mod serialize;
pub mod signer;
pub mod tweak;

pub use config::XmssParams;
pub use error::{ConfigError, EncodingError, FieldError, SignError, WireError};
pub use signer::{keygen, sign, verify, PublicKey, SecretKey, Signature};
