//! Passphrase-keyed symmetric encryption producing cipher envelopes.

use zeroize::Zeroizing;

use crate::cipher::{self, registry};
use crate::config::{DEFAULT_SALT_LENGTH, SymmetricOptions};
use crate::encoding::{Blob, BlobRef, Encoding};
use crate::error::{Error, Result};
use crate::kdf::derive_key;
use crate::random::random_bytes;

/// Salt used by [`generate_key`] when the caller supplies none.
///
/// A fixed salt makes the key a pure function of the passphrase. Callers that
/// can store a salt should pass one from [`generate_salt`].
pub const DEFAULT_SALT: [u8; 32] = [
    0x12, 0xed, 0xfb, 0xda, 0x66, 0x1d, 0x51, 0xc7, 0x4e, 0xce, 0x8d, 0x8a, 0xac, 0x27, 0x5a, 0xbf,
    0x6b, 0x70, 0x37, 0x90, 0x9b, 0x4d, 0xc9, 0xb3, 0x1a, 0x7b, 0xd1, 0x2b, 0x1c, 0x6f, 0xe5, 0x17,
];

/// Random salt of `len` bytes (32 when `None`).
pub fn generate_salt(len: Option<usize>, encoding: Option<Encoding>) -> Result<Blob> {
    let salt = random_bytes(len.unwrap_or(DEFAULT_SALT_LENGTH))?;
    Ok(Blob::new(salt, encoding))
}

/// Derives a key sized for `options.algorithm` from `passphrase`.
///
/// A text salt is decoded with `options.encoding`.
pub fn generate_key(
    passphrase: &str,
    salt: Option<BlobRef<'_>>,
    options: &SymmetricOptions,
) -> Result<Zeroizing<Vec<u8>>> {
    let descriptor = registry::lookup(&options.algorithm)?;

    let salt = match salt {
        Some(salt) => salt.to_bytes(options.encoding)?,
        None => DEFAULT_SALT.to_vec(),
    };
    tracing::debug!(
        algorithm = descriptor.name,
        key_len = descriptor.key_len,
        kdf = ?options.kdf,
        "deriving symmetric key"
    );

    derive_key(passphrase.as_bytes(), &salt, descriptor.key_len, &options.kdf)
}

/// Encrypts `plaintext` (text is taken as UTF-8) into an envelope.
pub fn encrypt<'a>(
    key: &[u8],
    plaintext: impl Into<BlobRef<'a>>,
    options: &SymmetricOptions,
) -> Result<Blob> {
    let plaintext = Zeroizing::new(plaintext.into().to_bytes(None)?);
    let envelope = cipher::encrypt(
        &options.algorithm,
        key,
        &plaintext,
        options.aad.as_deref(),
    )?;
    Ok(Blob::new(envelope, options.encoding))
}

/// Opens an envelope produced by [`encrypt`] with the same options.
pub fn decrypt<'a>(
    key: &[u8],
    input: impl Into<BlobRef<'a>>,
    options: &SymmetricOptions,
) -> Result<Zeroizing<Vec<u8>>> {
    let envelope = input.into().to_bytes(options.encoding)?;
    cipher::decrypt(&options.algorithm, key, &envelope, options.aad.as_deref())
}

/// [`decrypt`] for plaintext that is known to be UTF-8.
pub fn decrypt_to_string<'a>(
    key: &[u8],
    input: impl Into<BlobRef<'a>>,
    options: &SymmetricOptions,
) -> Result<Zeroizing<String>> {
    let plaintext = decrypt(key, input, options)?;
    let text = std::str::from_utf8(&plaintext)
        .map_err(|e| Error::Encoding(format!("plaintext is not UTF-8: {e}")))?;
    Ok(Zeroizing::new(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kdf::TEST_PARAMS;

    fn opts(algorithm: &str) -> SymmetricOptions {
        SymmetricOptions::default()
            .with_algorithm(algorithm)
            .with_kdf(TEST_PARAMS)
    }

    #[test]
    fn default_salt_matches_published_value() {
        assert_eq!(
            Encoding::Base64.encode(&DEFAULT_SALT),
            "Eu372mYdUcdOzo2KrCdav2twN5CbTcmzGnvRKxxv5Rc="
        );
    }

    #[test]
    fn key_length_follows_algorithm() {
        let k128 = generate_key("pass", None, &opts("aes-128-gcm")).unwrap();
        let k256 = generate_key("pass", None, &opts("aes-256-gcm")).unwrap();

        assert_eq!(k128.len(), 16);
        assert_eq!(k256.len(), 32);
        assert_eq!(&k256[..16], &k128[..]);
    }

    #[test]
    fn salt_changes_key() {
        let o = opts("aes-256-gcm");
        let salt = generate_salt(None, o.encoding).unwrap();

        let default_key = generate_key("pass", None, &o).unwrap();
        let salted_key = generate_key("pass", Some(salt.as_blob_ref()), &o).unwrap();
        let again = generate_key("pass", Some(salt.as_blob_ref()), &o).unwrap();

        assert_ne!(default_key, salted_key);
        assert_eq!(salted_key, again);
    }

    #[test]
    fn generate_salt_lengths() {
        let raw = generate_salt(Some(8), None).unwrap();
        assert_eq!(raw.as_bytes().unwrap().len(), 8);

        let text = generate_salt(None, Some(Encoding::Hex)).unwrap();
        assert_eq!(text.as_text().unwrap().len(), 64);
    }

    #[test]
    fn roundtrip_with_text() {
        let o = opts("aes-256-gcm");
        let key = generate_key("pass", None, &o).unwrap();

        let sealed = encrypt(&key, "hello world", &o).unwrap();
        assert!(sealed.as_text().is_some());

        let opened = decrypt_to_string(&key, &sealed, &o).unwrap();
        assert_eq!(opened.as_str(), "hello world");
    }

    #[test]
    fn aad_must_match() {
        let o = opts("chacha20-poly1305").with_aad(Some(b"test".to_vec()));
        let key = generate_key("pass", None, &o).unwrap();
        let sealed = encrypt(&key, "payload", &o).unwrap();

        assert!(decrypt(&key, &sealed, &o).is_ok());
        for aad in [Some(b"tset".to_vec()), None] {
            let other = o.clone().with_aad(aad);
            assert!(matches!(
                decrypt(&key, &sealed, &other),
                Err(Error::AuthenticationFailed)
            ));
        }
    }

    #[test]
    fn wrong_key_fails_authentication() {
        let o = opts("aes-128-ocb");
        let key = generate_key("pass", None, &o).unwrap();
        let other = generate_key("other", None, &o).unwrap();
        let sealed = encrypt(&key, "payload", &o).unwrap();

        assert!(matches!(
            decrypt(&other, &sealed, &o),
            Err(Error::AuthenticationFailed)
        ));
    }

    #[test]
    fn non_utf8_plaintext_is_rejected_as_string() {
        let o = opts("aes-256-ctr").with_encoding(None);
        let key = generate_key("pass", None, &o).unwrap();
        let sealed = encrypt(&key, &[0xffu8, 0xfe], &o).unwrap();

        assert_eq!(decrypt(&key, &sealed, &o).unwrap().as_slice(), &[0xff, 0xfe]);
        assert!(matches!(
            decrypt_to_string(&key, &sealed, &o),
            Err(Error::Encoding(_))
        ));
    }

    #[test]
    fn unknown_algorithm_fails() {
        assert!(matches!(
            generate_key("pass", None, &opts("des-ede3")),
            Err(Error::UnknownAlgorithm(_))
        ));
    }
}
