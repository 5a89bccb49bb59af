//! RSA PKCS#1 v1.5 with PEM-framed keys
//!
//! Encryption takes a public key (`PUBLIC KEY` SPKI or `RSA PUBLIC KEY`
//! PKCS#1). Decryption takes a private key (`RSA PRIVATE KEY` PKCS#1 or
//! `PRIVATE KEY` PKCS#8). Plaintext is bounded by the modulus size minus 11
//! bytes; larger inputs fail.

use super::{Decryptor, Encryptor};
use crate::exceptions::{FileprocError, Result};
use ::rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey};
use ::rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey};
use ::rsa::{Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use log::debug;
use pem::Pem;
use rand::rngs::OsRng;

pub const PUBLIC_KEY_TAG: &str = "PUBLIC KEY";
pub const RSA_PUBLIC_KEY_TAG: &str = "RSA PUBLIC KEY";
pub const RSA_PRIVATE_KEY_TAG: &str = "RSA PRIVATE KEY";
pub const PRIVATE_KEY_TAG: &str = "PRIVATE KEY";

fn key_error(msg: impl Into<String>) -> FileprocError {
    FileprocError::Encryption(msg.into())
}

fn parse_public_key(key: &[u8]) -> Result<RsaPublicKey> {
    let parsed = pem::parse(key).map_err(|e| {
        key_error(format!("failed to parse PEM block containing the public key: {e}"))
    })?;

    match parsed.tag() {
        PUBLIC_KEY_TAG => RsaPublicKey::from_public_key_der(parsed.contents())
            .map_err(|e| key_error(format!("invalid public key: {e}"))),
        RSA_PUBLIC_KEY_TAG => RsaPublicKey::from_pkcs1_der(parsed.contents())
            .map_err(|e| key_error(format!("invalid public key: {e}"))),
        other => Err(key_error(format!("unsupported public key type: {other}"))),
    }
}

fn parse_private_key(key: &[u8]) -> Result<RsaPrivateKey> {
    let parsed = pem::parse(key).map_err(|e| {
        key_error(format!("failed to parse PEM block containing the private key: {e}"))
    })?;

    match parsed.tag() {
        RSA_PRIVATE_KEY_TAG => RsaPrivateKey::from_pkcs1_der(parsed.contents())
            .map_err(|e| key_error(format!("invalid private key: {e}"))),
        PRIVATE_KEY_TAG => RsaPrivateKey::from_pkcs8_der(parsed.contents())
            .map_err(|e| key_error(format!("invalid private key: {e}"))),
        other => Err(key_error(format!("unsupported private key type: {other}"))),
    }
}

/// Generate a key pair, returned as (private PEM, public PEM)
pub fn generate_key_pair(bits: usize) -> Result<(String, String)> {
    debug!("🔑 Generating {bits}-bit RSA key pair");
    let private_key = RsaPrivateKey::new(&mut OsRng, bits)
        .map_err(|e| key_error(format!("failed to generate RSA key pair: {e}")))?;

    let private_der = private_key
        .to_pkcs1_der()
        .map_err(|e| key_error(format!("failed to encode private key: {e}")))?;
    let public_der = RsaPublicKey::from(&private_key)
        .to_public_key_der()
        .map_err(|e| key_error(format!("failed to marshal public key: {e}")))?;

    let private_pem = pem::encode(&Pem::new(RSA_PRIVATE_KEY_TAG, private_der.as_bytes()));
    let public_pem = pem::encode(&Pem::new(PUBLIC_KEY_TAG, public_der.as_bytes()));
    Ok((private_pem, public_pem))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RsaEncryptor;

impl Encryptor for RsaEncryptor {
    fn encrypt(&self, data: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        let public_key = parse_public_key(key)?;
        public_key
            .encrypt(&mut OsRng, Pkcs1v15Encrypt, data)
            .map_err(|e| key_error(format!("RSA encryption failed: {e}")))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RsaDecryptor;

impl Decryptor for RsaDecryptor {
    fn decrypt(&self, data: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        let private_key = parse_private_key(key)?;
        private_key
            .decrypt(Pkcs1v15Encrypt, data)
            .map_err(|e| key_error(format!("RSA decryption failed: {e}")))
    }
}
