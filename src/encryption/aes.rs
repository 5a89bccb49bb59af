//! AES-GCM with a random nonce prepended to the ciphertext

use super::{Decryptor, Encryptor};
use crate::exceptions::{FileprocError, Result};
use aes_gcm::aead::{Aead, KeyInit, Nonce};
use aes_gcm::{Aes128Gcm, Aes256Gcm};
use rand::RngCore;
use rand::rngs::OsRng;

/// GCM standard nonce length
pub const NONCE_SIZE: usize = 12;

/// Length of generated keys (AES-256)
pub const KEY_SIZE: usize = 32;

/// Fresh random AES-256 key
pub fn generate_key() -> Vec<u8> {
    let mut key = vec![0u8; KEY_SIZE];
    OsRng.fill_bytes(&mut key);
    key
}

fn invalid_key(len: usize) -> FileprocError {
    FileprocError::Encryption(format!(
        "invalid AES key size: {len} bytes (expected 16 or 32)"
    ))
}

fn seal<C: Aead + KeyInit>(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let cipher = C::new_from_slice(key).map_err(|_| invalid_key(key.len()))?;

    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(Nonce::<C>::from_slice(&nonce), data)
        .map_err(|_| FileprocError::Encryption("AES-GCM encryption failed".to_string()))?;

    let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    sealed.extend_from_slice(&nonce);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

fn open<C: Aead + KeyInit>(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let cipher = C::new_from_slice(key).map_err(|_| invalid_key(key.len()))?;

    if data.len() < NONCE_SIZE {
        return Err(FileprocError::Encryption(format!(
            "ciphertext too short: {} bytes",
            data.len()
        )));
    }
    let (nonce, ciphertext) = data.split_at(NONCE_SIZE);

    cipher
        .decrypt(Nonce::<C>::from_slice(nonce), ciphertext)
        .map_err(|_| {
            FileprocError::Encryption("AES-GCM authentication failed".to_string())
        })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AesEncryptor;

impl Encryptor for AesEncryptor {
    fn encrypt(&self, data: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        match key.len() {
            16 => seal::<Aes128Gcm>(key, data),
            32 => seal::<Aes256Gcm>(key, data),
            n => Err(invalid_key(n)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AesDecryptor;

impl Decryptor for AesDecryptor {
    fn decrypt(&self, data: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        match key.len() {
            16 => open::<Aes128Gcm>(key, data),
            32 => open::<Aes256Gcm>(key, data),
            n => Err(invalid_key(n)),
        }
    }
}
