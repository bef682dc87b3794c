//! One-shot message digests.

use std::fmt;
use std::str::FromStr;

use sha2::Digest;
use serde::{Deserialize, Serialize};

use crate::config::DigestOptions;
use crate::encoding::{Blob, BlobRef};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    #[serde(rename = "sha512-224")]
    Sha512_224,
    #[serde(rename = "sha512-256")]
    Sha512_256,
    #[serde(rename = "sha3-224")]
    Sha3_224,
    #[serde(rename = "sha3-256")]
    Sha3_256,
    #[serde(rename = "sha3-384")]
    Sha3_384,
    #[serde(rename = "sha3-512")]
    Sha3_512,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 12] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha224,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
        HashAlgorithm::Sha512_224,
        HashAlgorithm::Sha512_256,
        HashAlgorithm::Sha3_224,
        HashAlgorithm::Sha3_256,
        HashAlgorithm::Sha3_384,
        HashAlgorithm::Sha3_512,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha224 => "sha224",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Sha512_224 => "sha512-224",
            HashAlgorithm::Sha512_256 => "sha512-256",
            HashAlgorithm::Sha3_224 => "sha3-224",
            HashAlgorithm::Sha3_256 => "sha3-256",
            HashAlgorithm::Sha3_384 => "sha3-384",
            HashAlgorithm::Sha3_512 => "sha3-512",
        }
    }

    /// Internal block size in bytes. Also the default HMAC key length.
    pub fn block_size(self) -> usize {
        match self {
            HashAlgorithm::Md5
            | HashAlgorithm::Sha1
            | HashAlgorithm::Sha224
            | HashAlgorithm::Sha256 => 64,
            HashAlgorithm::Sha384
            | HashAlgorithm::Sha512
            | HashAlgorithm::Sha512_224
            | HashAlgorithm::Sha512_256 => 128,
            HashAlgorithm::Sha3_224 => 144,
            HashAlgorithm::Sha3_256 => 136,
            HashAlgorithm::Sha3_384 => 104,
            HashAlgorithm::Sha3_512 => 72,
        }
    }

    pub fn output_size(self) -> usize {
        match self {
            HashAlgorithm::Md5 => 16,
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha224 | HashAlgorithm::Sha512_224 | HashAlgorithm::Sha3_224 => 28,
            HashAlgorithm::Sha256 | HashAlgorithm::Sha512_256 | HashAlgorithm::Sha3_256 => 32,
            HashAlgorithm::Sha384 | HashAlgorithm::Sha3_384 => 48,
            HashAlgorithm::Sha512 | HashAlgorithm::Sha3_512 => 64,
        }
    }

    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        fn run<D: Digest>(data: &[u8]) -> Vec<u8> {
            D::digest(data).to_vec()
        }

        match self {
            HashAlgorithm::Md5 => run::<md5::Md5>(data),
            HashAlgorithm::Sha1 => run::<sha1::Sha1>(data),
            HashAlgorithm::Sha224 => run::<sha2::Sha224>(data),
            HashAlgorithm::Sha256 => run::<sha2::Sha256>(data),
            HashAlgorithm::Sha384 => run::<sha2::Sha384>(data),
            HashAlgorithm::Sha512 => run::<sha2::Sha512>(data),
            HashAlgorithm::Sha512_224 => run::<sha2::Sha512_224>(data),
            HashAlgorithm::Sha512_256 => run::<sha2::Sha512_256>(data),
            HashAlgorithm::Sha3_224 => run::<sha3::Sha3_224>(data),
            HashAlgorithm::Sha3_256 => run::<sha3::Sha3_256>(data),
            HashAlgorithm::Sha3_384 => run::<sha3::Sha3_384>(data),
            HashAlgorithm::Sha3_512 => run::<sha3::Sha3_512>(data),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        HashAlgorithm::ALL
            .into_iter()
            .find(|alg| alg.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownAlgorithm(s.to_string()))
    }
}

/// Hashes `value` and presents the digest per `options.encoding`.
///
/// Text input is hashed as its UTF-8 bytes.
pub fn hash<'a>(
    algorithm: HashAlgorithm,
    value: impl Into<BlobRef<'a>>,
    options: &DigestOptions,
) -> Blob {
    let digest = match value.into() {
        BlobRef::Bytes(bytes) => algorithm.digest(bytes),
        BlobRef::Text(text) => algorithm.digest(text.as_bytes()),
    };
    Blob::new(digest, options.encoding)
}

pub fn md5<'a>(value: impl Into<BlobRef<'a>>, options: &DigestOptions) -> Blob {
    hash(HashAlgorithm::Md5, value, options)
}

pub fn sha1<'a>(value: impl Into<BlobRef<'a>>, options: &DigestOptions) -> Blob {
    hash(HashAlgorithm::Sha1, value, options)
}

pub fn sha224<'a>(value: impl Into<BlobRef<'a>>, options: &DigestOptions) -> Blob {
    hash(HashAlgorithm::Sha224, value, options)
}

pub fn sha256<'a>(value: impl Into<BlobRef<'a>>, options: &DigestOptions) -> Blob {
    hash(HashAlgorithm::Sha256, value, options)
}

pub fn sha384<'a>(value: impl Into<BlobRef<'a>>, options: &DigestOptions) -> Blob {
    hash(HashAlgorithm::Sha384, value, options)
}

pub fn sha512<'a>(value: impl Into<BlobRef<'a>>, options: &DigestOptions) -> Blob {
    hash(HashAlgorithm::Sha512, value, options)
}
