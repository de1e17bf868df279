//! The hashing capability injected into the signer.
//!
//! SigV4 needs exactly two primitives: SHA-256 digests (for payload and
//! canonical-request hashing) and HMAC-SHA256 (for the signing-key chain and
//! the final signature). Both are expressed as the [`HashProvider`] trait so
//! the backend is an explicit constructor argument rather than something the
//! crate detects at load time.

use std::fmt;

use hmac::{Hmac, KeyInit, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Hashing capability required by the signer.
///
/// Implementations must be cheap to call repeatedly; the signer invokes
/// `hmac_sha256` five times per request (four key-derivation stages plus the
/// signature) and `sha256_hex` up to twice (payload and canonical request).
pub trait HashProvider: fmt::Debug + Send + Sync {
    /// Compute the SHA-256 digest of `data` and return it hex-encoded.
    fn sha256_hex(&self, data: &[u8]) -> String;

    /// Compute HMAC-SHA256 of `data` under `key` and return the raw bytes.
    fn hmac_sha256(&self, key: &[u8], data: &[u8]) -> Vec<u8>;
}

/// Default [`HashProvider`] backed by the RustCrypto `sha2`/`hmac` crates.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoProvider;

impl HashProvider for RustCryptoProvider {
    fn sha256_hex(&self, data: &[u8]) -> String {
        hex::encode(Sha256::digest(data))
    }

    fn hmac_sha256(&self, key: &[u8], data: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }
}
