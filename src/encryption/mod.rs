//! Encryption collaborators: AES-GCM and RSA PKCS#1 v1.5

pub mod aes;
pub mod keys;
pub mod logging;
pub mod rsa;

pub use self::aes::{AesDecryptor, AesEncryptor};
pub use self::rsa::{RsaDecryptor, RsaEncryptor};
pub use keys::{FileKeyLoader, KeyLoader, generate_key};
pub use logging::{with_logging_decryptor, with_logging_encryptor};

use crate::exceptions::{FileprocError, Result};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Supported ciphers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncryptionType {
    Aes,
    Rsa,
}

impl fmt::Display for EncryptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncryptionType::Aes => write!(f, "aes"),
            EncryptionType::Rsa => write!(f, "rsa"),
        }
    }
}

impl FromStr for EncryptionType {
    type Err = FileprocError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "aes" => Ok(EncryptionType::Aes),
            "rsa" => Ok(EncryptionType::Rsa),
            _ => Err(FileprocError::Config(format!(
                "unknown encryption type: {s}"
            ))),
        }
    }
}

pub trait Encryptor: fmt::Debug + Send + Sync {
    fn encrypt(&self, data: &[u8], key: &[u8]) -> Result<Vec<u8>>;
}

pub trait Decryptor: fmt::Debug + Send + Sync {
    fn decrypt(&self, data: &[u8], key: &[u8]) -> Result<Vec<u8>>;
}

pub type EncryptorFactory = fn() -> Box<dyn Encryptor>;
pub type DecryptorFactory = fn() -> Box<dyn Decryptor>;

/// Cipher to constructor table, built once
#[derive(Debug, Clone)]
pub struct Registry {
    encryptors: HashMap<EncryptionType, EncryptorFactory>,
    decryptors: HashMap<EncryptionType, DecryptorFactory>,
}

impl Registry {
    pub fn builtin() -> Self {
        let mut registry = Registry {
            encryptors: HashMap::new(),
            decryptors: HashMap::new(),
        };
        registry.register(EncryptionType::Aes, aes_encryptor, aes_decryptor);
        registry.register(EncryptionType::Rsa, rsa_encryptor, rsa_decryptor);
        registry
    }

    pub fn register(
        &mut self,
        kind: EncryptionType,
        encryptor: EncryptorFactory,
        decryptor: DecryptorFactory,
    ) {
        self.encryptors.insert(kind, encryptor);
        self.decryptors.insert(kind, decryptor);
    }

    pub fn encryptor(&self, kind: EncryptionType) -> Result<Box<dyn Encryptor>> {
        self.encryptors
            .get(&kind)
            .map(|factory| factory())
            .ok_or_else(|| FileprocError::Config(format!("no encryptor registered for {kind}")))
    }

    pub fn decryptor(&self, kind: EncryptionType) -> Result<Box<dyn Decryptor>> {
        self.decryptors
            .get(&kind)
            .map(|factory| factory())
            .ok_or_else(|| FileprocError::Config(format!("no decryptor registered for {kind}")))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn aes_encryptor() -> Box<dyn Encryptor> {
    Box::new(AesEncryptor)
}

fn aes_decryptor() -> Box<dyn Decryptor> {
    Box::new(AesDecryptor)
}

fn rsa_encryptor() -> Box<dyn Encryptor> {
    Box::new(RsaEncryptor)
}

fn rsa_decryptor() -> Box<dyn Decryptor> {
    Box::new(RsaDecryptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exceptions::ErrorKind;

    #[test]
    fn test_type_parsing() {
        assert_eq!("AES".parse::<EncryptionType>().unwrap(), EncryptionType::Aes);
        assert_eq!("rsa".parse::<EncryptionType>().unwrap(), EncryptionType::Rsa);
        assert_eq!(
            "des".parse::<EncryptionType>().unwrap_err().kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn test_registry_aes_round_trip() {
        let registry = Registry::builtin();
        let key = [7u8; 32];
        let sealed = registry
            .encryptor(EncryptionType::Aes)
            .unwrap()
            .encrypt(b"registry", &key)
            .unwrap();
        let opened = registry
            .decryptor(EncryptionType::Aes)
            .unwrap()
            .decrypt(&sealed, &key)
            .unwrap();
        assert_eq!(opened, b"registry");
    }
}
