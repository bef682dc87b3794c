//! Salted password verification hashes.
//!
//! A hash is a password envelope holding the random salt and the key derived
//! from the password with that salt. Verification re-derives the key from
//! the candidate and compares in constant time.
//!
//! ```no_run
//! use cryptshelf::config::PasswordOptions;
//! use cryptshelf::password::{compare_password, hash_password};
//!
//! let opts = PasswordOptions::default();
//! let hash = hash_password("hunter2", &opts)?;
//! assert!(compare_password("hunter2", &hash, &opts)?);
//! # Ok::<(), cryptshelf::Error>(())
//! ```

use subtle::ConstantTimeEq;

use crate::config::PasswordOptions;
use crate::encoding::{Blob, BlobRef};
use crate::envelope::{self, check_field_len};
use crate::error::Result;
use crate::kdf::derive_key;
use crate::random::random_bytes;

pub fn hash_password(password: &str, options: &PasswordOptions) -> Result<Blob> {
    // fail before paying for the derivation
    check_field_len("saltLength", options.salt_length)?;
    check_field_len("keyLength", options.key_length)?;

    let salt = random_bytes(options.salt_length)?;
    let key = derive_key(password.as_bytes(), &salt, options.key_length, &options.kdf)?;

    let bytes = envelope::encode_password_envelope(&salt, &key)?;
    Ok(Blob::new(bytes, options.encoding))
}

/// Checks `clear` against a hash produced by [`hash_password`].
///
/// The key length and salt come from the envelope; only `options.encoding`
/// and `options.kdf` need to match the values used when hashing.
pub fn compare_password<'a>(
    clear: &str,
    hash: impl Into<BlobRef<'a>>,
    options: &PasswordOptions,
) -> Result<bool> {
    let bytes = hash.into().to_bytes(options.encoding)?;
    let parsed = envelope::decode_password_envelope(&bytes)?;

    let candidate = derive_key(clear.as_bytes(), &parsed.salt, parsed.key.len(), &options.kdf)?;

    Ok(bool::from(candidate.as_slice().ct_eq(&parsed.key)))
}
