//! Raw or ASCII-safe text presentation of envelopes, keys and digests.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Hex,
    Base64,
    /// URL-safe alphabet, no padding
    Base64Url,
}

impl Encoding {
    pub fn encode(self, bytes: &[u8]) -> String {
        match self {
            Encoding::Hex => hex::encode(bytes),
            Encoding::Base64 => STANDARD.encode(bytes),
            Encoding::Base64Url => URL_SAFE_NO_PAD.encode(bytes),
        }
    }

    pub fn decode(self, text: &str) -> Result<Vec<u8>> {
        match self {
            Encoding::Hex => hex::decode(text).map_err(|e| Error::Encoding(format!("hex: {e}"))),
            Encoding::Base64 => STANDARD
                .decode(text)
                .map_err(|e| Error::Encoding(format!("base64: {e}"))),
            // tolerate padded input
            Encoding::Base64Url => URL_SAFE_NO_PAD
                .decode(text.trim_end_matches('='))
                .map_err(|e| Error::Encoding(format!("base64url: {e}"))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Encoding::Hex => "hex",
            Encoding::Base64 => "base64",
            Encoding::Base64Url => "base64url",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(Encoding::Hex),
            "base64" => Ok(Encoding::Base64),
            "base64url" => Ok(Encoding::Base64Url),
            other => Err(Error::Encoding(format!("unknown encoding '{other}'"))),
        }
    }
}

/// Output of an operation: raw bytes when no encoding is configured,
/// text otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Blob {
    Bytes(Vec<u8>),
    Text(String),
}

impl Blob {
    pub fn new(bytes: Vec<u8>, encoding: Option<Encoding>) -> Self {
        match encoding {
            Some(encoding) => Blob::Text(encoding.encode(&bytes)),
            None => Blob::Bytes(bytes),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Blob::Text(text) => Some(text),
            Blob::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Blob::Bytes(bytes) => Some(bytes),
            Blob::Text(_) => None,
        }
    }

    pub fn as_blob_ref(&self) -> BlobRef<'_> {
        match self {
            Blob::Bytes(bytes) => BlobRef::Bytes(bytes),
            Blob::Text(text) => BlobRef::Text(text),
        }
    }
}

impl fmt::Display for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Blob::Text(text) => f.write_str(text),
            Blob::Bytes(bytes) => f.write_str(&hex::encode(bytes)),
        }
    }
}

/// Input accepted wherever an envelope, key or signature is read back.
///
/// Raw bytes are used as they are. Text is decoded with the configured
/// encoding, or taken as UTF-8 bytes when no encoding is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobRef<'a> {
    Bytes(&'a [u8]),
    Text(&'a str),
}

impl BlobRef<'_> {
    pub fn to_bytes(self, encoding: Option<Encoding>) -> Result<Vec<u8>> {
        match (self, encoding) {
            (BlobRef::Bytes(bytes), _) => Ok(bytes.to_vec()),
            (BlobRef::Text(text), Some(encoding)) => encoding.decode(text),
            (BlobRef::Text(text), None) => Ok(text.as_bytes().to_vec()),
        }
    }
}

impl<'a> From<&'a [u8]> for BlobRef<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        BlobRef::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for BlobRef<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        BlobRef::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for BlobRef<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        BlobRef::Bytes(bytes)
    }
}

impl<'a> From<&'a str> for BlobRef<'a> {
    fn from(text: &'a str) -> Self {
        BlobRef::Text(text)
    }
}

impl<'a> From<&'a String> for BlobRef<'a> {
    fn from(text: &'a String) -> Self {
        BlobRef::Text(text)
    }
}

impl<'a> From<&'a Blob> for BlobRef<'a> {
    fn from(blob: &'a Blob) -> Self {
        blob.as_blob_ref()
    }
}
