//! Per-call option records.
//!
//! Every operation takes its options explicitly. There are no process-wide
//! defaults to mutate; `Default` gives the stock values and the `with_*`
//! setters adjust a copy.

use serde::{Deserialize, Serialize};

use crate::digest::HashAlgorithm;
use crate::encoding::Encoding;
use crate::kdf::KdfParams;

pub const DEFAULT_PASSWORD_KEY_LENGTH: usize = 48;
pub const DEFAULT_PASSWORD_SALT_LENGTH: usize = 16;
pub const DEFAULT_SYMMETRIC_ALGORITHM: &str = "aes-256-gcm";
pub const DEFAULT_SALT_LENGTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordOptions {
    /// Bytes of derived key stored in the envelope, 1..=255.
    pub key_length: usize,
    /// Bytes of random salt, 1..=255.
    pub salt_length: usize,
    /// `None` yields raw envelope bytes.
    pub encoding: Option<Encoding>,
    pub kdf: KdfParams,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self {
            key_length: DEFAULT_PASSWORD_KEY_LENGTH,
            salt_length: DEFAULT_PASSWORD_SALT_LENGTH,
            encoding: Some(Encoding::Base64Url),
            kdf: KdfParams::default(),
        }
    }
}

impl PasswordOptions {
    pub fn with_key_length(mut self, key_length: usize) -> Self {
        self.key_length = key_length;
        self
    }

    pub fn with_salt_length(mut self, salt_length: usize) -> Self {
        self.salt_length = salt_length;
        self
    }

    pub fn with_encoding(mut self, encoding: Option<Encoding>) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_kdf(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymmetricOptions {
    /// Cipher identifier, resolved through the algorithm registry.
    pub algorithm: String,
    pub encoding: Option<Encoding>,
    /// Bound into the tag for AEAD modes only.
    pub aad: Option<Vec<u8>>,
    /// Used by `symmetric::generate_key`.
    pub kdf: KdfParams,
}

impl Default for SymmetricOptions {
    fn default() -> Self {
        Self {
            algorithm: DEFAULT_SYMMETRIC_ALGORITHM.to_string(),
            encoding: Some(Encoding::Base64Url),
            aad: None,
            kdf: KdfParams::default(),
        }
    }
}

impl SymmetricOptions {
    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = algorithm.into();
        self
    }

    pub fn with_encoding(mut self, encoding: Option<Encoding>) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_aad(mut self, aad: Option<Vec<u8>>) -> Self {
        self.aad = aad;
        self
    }

    pub fn with_kdf(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureOptions {
    pub algorithm: HashAlgorithm,
    /// Secret length for `signature::generate_secret`; the hash block size
    /// when unset.
    pub key_length: Option<usize>,
    pub encoding: Option<Encoding>,
}

impl Default for SignatureOptions {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::Sha256,
            key_length: None,
            encoding: Some(Encoding::Base64),
        }
    }
}

impl SignatureOptions {
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_key_length(mut self, key_length: Option<usize>) -> Self {
        self.key_length = key_length;
        self
    }

    pub fn with_encoding(mut self, encoding: Option<Encoding>) -> Self {
        self.encoding = encoding;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestOptions {
    pub encoding: Option<Encoding>,
}

impl Default for DigestOptions {
    fn default() -> Self {
        Self {
            encoding: Some(Encoding::Hex),
        }
    }
}

impl DigestOptions {
    pub fn with_encoding(mut self, encoding: Option<Encoding>) -> Self {
        self.encoding = encoding;
        self
    }
}
