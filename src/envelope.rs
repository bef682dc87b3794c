//! Wire formats for password hashes and symmetric ciphertext.
//!
//! Password envelope:
//! ```text
//! SALT_LEN (1) | KEY_LEN (1) | SALT (SALT_LEN) | KEY (KEY_LEN)
//! ```
//!
//! Cipher envelope:
//! ```text
//! IV (iv_len) | CIPHERTEXT | TAG (tag_len)
//! ```
//!
//! Neither format records which algorithm produced it. For the cipher
//! envelope `iv_len` and `tag_len` come from the algorithm descriptor at
//! decode time, so the caller has to keep the algorithm identifier alongside.

use crate::cursor::Cursor;
use crate::error::{Error, Result};

/// Bounds of the 1-byte length prefixes.
pub const MIN_FIELD_LEN: usize = 1;
pub const MAX_FIELD_LEN: usize = u8::MAX as usize;

const PREFIX_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordEnvelope {
    pub salt: Vec<u8>,
    pub key: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherEnvelope {
    pub iv: Vec<u8>,
    pub ciphertext: Vec<u8>,
    /// Empty for modes without an authentication tag.
    pub tag: Vec<u8>,
}

/// Checks that `value` fits a 1-byte length prefix.
pub fn check_field_len(field: &'static str, value: usize) -> Result<u8> {
    if !(MIN_FIELD_LEN..=MAX_FIELD_LEN).contains(&value) {
        return Err(Error::InvalidLength { field, value });
    }
    Ok(value as u8)
}

pub fn encode_password_envelope(salt: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    let salt_len = check_field_len("saltLength", salt.len())?;
    let key_len = check_field_len("keyLength", key.len())?;

    let mut cursor = Cursor::allocate(PREFIX_LEN + salt.len() + key.len());
    cursor
        .write_fixed(salt_len)?
        .write_fixed(key_len)?
        .write(salt)?
        .write(key)?;

    Ok(cursor.into_inner())
}

/// Parses a password envelope.
///
/// # Errors
///
/// Returns an error if:
/// - a length prefix is zero (`InvalidLength`)
/// - the data is shorter than its prefixes declare (`Truncated`)
/// - bytes follow the declared key (`TrailingData`)
pub fn decode_password_envelope(data: &[u8]) -> Result<PasswordEnvelope> {
    if data.len() < PREFIX_LEN {
        return Err(Error::Truncated {
            needed: PREFIX_LEN,
            available: data.len(),
        });
    }

    let mut cursor = Cursor::from_bytes(data);
    let salt_len = check_field_len("saltLength", cursor.read_fixed::<u8>()? as usize)?;
    let key_len = check_field_len("keyLength", cursor.read_fixed::<u8>()? as usize)?;

    let needed = PREFIX_LEN + salt_len as usize + key_len as usize;
    if data.len() < needed {
        return Err(Error::Truncated {
            needed,
            available: data.len(),
        });
    }
    if data.len() > needed {
        return Err(Error::TrailingData(data.len() - needed));
    }

    let salt = cursor.read(salt_len as usize)?.to_vec();
    let key = cursor.read(key_len as usize)?.to_vec();

    Ok(PasswordEnvelope { salt, key })
}

pub fn encode_cipher_envelope(iv: &[u8], ciphertext: &[u8], tag: &[u8]) -> Result<Vec<u8>> {
    let mut cursor = Cursor::allocate(iv.len() + ciphertext.len() + tag.len());
    cursor.write(iv)?.write(ciphertext)?.write(tag)?;
    Ok(cursor.into_inner())
}

pub fn decode_cipher_envelope(data: &[u8], iv_len: usize, tag_len: usize) -> Result<CipherEnvelope> {
    let truncated = |needed| Error::Truncated {
        needed,
        available: data.len(),
    };
    let needed = iv_len.checked_add(tag_len).ok_or_else(|| truncated(usize::MAX))?;
    if data.len() < needed {
        return Err(truncated(needed));
    }

    let mut cursor = Cursor::from_bytes(data);
    let iv = cursor.read(iv_len)?.to_vec();
    let ciphertext = cursor.read_all_but(tag_len)?.to_vec();
    let tag = cursor.read_remaining().to_vec();

    Ok(CipherEnvelope {
        iv,
        ciphertext,
        tag,
    })
}
