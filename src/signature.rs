//! HMAC signing and verification.

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};

use crate::config::SignatureOptions;
use crate::digest::HashAlgorithm;
use crate::encoding::{Blob, BlobRef};
use crate::error::{Error, Result};
use crate::random::random_bytes;

macro_rules! with_hmac {
    ($algorithm:expr, $op:ident($($arg:expr),*)) => {
        match $algorithm {
            HashAlgorithm::Md5 => $op::<Hmac<md5::Md5>>($($arg),*),
            HashAlgorithm::Sha1 => $op::<Hmac<sha1::Sha1>>($($arg),*),
            HashAlgorithm::Sha224 => $op::<Hmac<sha2::Sha224>>($($arg),*),
            HashAlgorithm::Sha256 => $op::<Hmac<sha2::Sha256>>($($arg),*),
            HashAlgorithm::Sha384 => $op::<Hmac<sha2::Sha384>>($($arg),*),
            HashAlgorithm::Sha512 => $op::<Hmac<sha2::Sha512>>($($arg),*),
            HashAlgorithm::Sha512_224 => $op::<Hmac<sha2::Sha512_224>>($($arg),*),
            HashAlgorithm::Sha512_256 => $op::<Hmac<sha2::Sha512_256>>($($arg),*),
            HashAlgorithm::Sha3_224 => $op::<Hmac<sha3::Sha3_224>>($($arg),*),
            HashAlgorithm::Sha3_256 => $op::<Hmac<sha3::Sha3_256>>($($arg),*),
            HashAlgorithm::Sha3_384 => $op::<Hmac<sha3::Sha3_384>>($($arg),*),
            HashAlgorithm::Sha3_512 => $op::<Hmac<sha3::Sha3_512>>($($arg),*),
        }
    };
}

/// Random HMAC secret, `options.key_length` bytes or the hash block size.
pub fn generate_secret(options: &SignatureOptions) -> Result<Blob> {
    let len = options
        .key_length
        .unwrap_or_else(|| options.algorithm.block_size());
    if len == 0 {
        return Err(Error::InvalidLength {
            field: "keyLength",
            value: len,
        });
    }

    Ok(Blob::new(random_bytes(len)?, options.encoding))
}

/// Signs `data` (text is taken as UTF-8). A text secret is decoded with
/// `options.encoding`.
pub fn create_signature<'a, 'b>(
    secret: impl Into<BlobRef<'a>>,
    data: impl Into<BlobRef<'b>>,
    options: &SignatureOptions,
) -> Result<Blob> {
    let secret = secret.into().to_bytes(options.encoding)?;
    let data = data.into().to_bytes(None)?;

    let tag = with_hmac!(options.algorithm, sign(&secret, &data))?;
    Ok(Blob::new(tag, options.encoding))
}

/// Constant-time check of `signature` over `data`.
///
/// A signature of the wrong length verifies as `false`.
pub fn verify_signature<'a, 'b, 'c>(
    secret: impl Into<BlobRef<'a>>,
    signature: impl Into<BlobRef<'b>>,
    data: impl Into<BlobRef<'c>>,
    options: &SignatureOptions,
) -> Result<bool> {
    let secret = secret.into().to_bytes(options.encoding)?;
    let signature = signature.into().to_bytes(options.encoding)?;
    let data = data.into().to_bytes(None)?;

    with_hmac!(options.algorithm, verify(&secret, &data, &signature))
}

fn keyed<M: Mac + KeyInit>(secret: &[u8], data: &[u8]) -> Result<M> {
    let mut mac = <M as KeyInit>::new_from_slice(secret).map_err(|e| Error::Misconfigured {
        algorithm: "hmac",
        reason: e.to_string(),
    })?;
    mac.update(data);
    Ok(mac)
}

fn sign<M: Mac + KeyInit>(secret: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    Ok(keyed::<M>(secret, data)?.finalize().into_bytes().to_vec())
}

fn verify<M: Mac + KeyInit>(secret: &[u8], data: &[u8], signature: &[u8]) -> Result<bool> {
    Ok(keyed::<M>(secret, data)?.verify_slice(signature).is_ok())
}
