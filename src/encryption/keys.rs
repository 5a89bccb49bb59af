//! Key loading and key generation

use super::EncryptionType;
use crate::exceptions::{FileprocError, Result};
use log::info;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Owner read/write only
pub const KEY_FILE_PERMS: u32 = 0o600;

/// Supplies raw key bytes for a key-file path
pub trait KeyLoader: fmt::Debug + Send + Sync {
    fn load(&self, path: &Path) -> Result<Vec<u8>>;
}

/// Reads the whole key file from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct FileKeyLoader;

impl KeyLoader for FileKeyLoader {
    fn load(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|source| FileprocError::KeyFile {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// `key` -> `key.priv`
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

fn write_secret(path: &Path, bytes: &[u8]) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(KEY_FILE_PERMS)
            .open(path)?;
        file.write_all(bytes)?;
        file.flush()?;
    }
    #[cfg(not(unix))]
    {
        let mut file = fs::File::create(path)?;
        file.write_all(bytes)?;
        file.flush()?;
    }
    Ok(())
}

/// Generate key material for `kind` and return the files written.
///
/// AES writes 32 random bytes to `path`. RSA writes `path.priv` (PKCS#1 PEM)
/// and `path.pub` (SPKI PEM).
pub fn generate_key(kind: EncryptionType, path: &Path, rsa_bits: usize) -> Result<Vec<PathBuf>> {
    match kind {
        EncryptionType::Aes => {
            write_secret(path, &super::aes::generate_key())?;
            info!("🔑 AES key written to {}", path.display());
            Ok(vec![path.to_path_buf()])
        }
        EncryptionType::Rsa => {
            let (private_pem, public_pem) = super::rsa::generate_key_pair(rsa_bits)?;
            let private_path = with_suffix(path, "priv");
            let public_path = with_suffix(path, "pub");
            write_secret(&private_path, private_pem.as_bytes())?;
            fs::write(&public_path, public_pem.as_bytes())?;
            info!(
                "🔑 RSA key pair written to {} and {}",
                private_path.display(),
                public_path.display()
            );
            Ok(vec![private_path, public_path])
        }
    }
}
