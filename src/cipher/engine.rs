//! Encrypt/decrypt driven by algorithm metadata.
//!
//! The IV and tag lengths of a cipher envelope are never stored. They are
//! resolved from the [`AlgorithmDescriptor`] on both sides, so decryption
//! needs the same algorithm identifier that encryption used.

use aes::{Aes128, Aes192, Aes256};
use aes_gcm::AesGcm;
use aes_kw::Kek;
use cbc::cipher::block_padding::{NoPadding, Pkcs7};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, BlockSizeUser, KeyIvInit, StreamCipher};
use ccm::Ccm;
use chacha20poly1305::ChaCha20Poly1305;
use chacha20poly1305::aead::consts::{U12, U16};
use chacha20poly1305::aead::generic_array::GenericArray;
use chacha20poly1305::aead::generic_array::typenum::Unsigned;
use chacha20poly1305::aead::{AeadCore, AeadInPlace, KeyInit};
use ocb3::Ocb3;
use zeroize::Zeroizing;

use super::registry::{self, AlgorithmDescriptor, Mode, Primitive};
use crate::envelope;
use crate::error::{Error, Result};
use crate::random::random_bytes;

type Aes128Gcm = AesGcm<Aes128, U12>;
type Aes192Gcm = AesGcm<Aes192, U12>;
type Aes256Gcm = AesGcm<Aes256, U12>;
type AesCcm<C> = Ccm<C, U16, U12>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    Pkcs7,
    /// Plaintext is processed at its exact length. Block modes then only
    /// accept whole blocks.
    None,
}

/// Structural parameters of one encrypt or decrypt call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherParams {
    pub iv_len: usize,
    pub tag_len: usize,
    pub padding: Padding,
}

impl CipherParams {
    pub fn resolve(descriptor: &AlgorithmDescriptor) -> Self {
        let padding = match descriptor.mode {
            Mode::Cbc | Mode::Ecb => Padding::Pkcs7,
            // CCM frames the exact message length
            Mode::Ccm => Padding::None,
            Mode::Gcm | Mode::Ocb | Mode::Poly1305 | Mode::Ctr | Mode::Wrap => Padding::None,
        };
        Self {
            iv_len: descriptor.iv_len,
            tag_len: descriptor.tag_len(),
            padding,
        }
    }
}

/// Ciphertext and detached tag (empty for non-AEAD modes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub ciphertext: Vec<u8>,
    pub tag: Vec<u8>,
}

/// Encrypts `plaintext` into a `IV || CIPHERTEXT || TAG` envelope.
///
/// `aad` is bound only for AEAD modes; other modes ignore it.
pub fn encrypt(
    algorithm: &str,
    key: &[u8],
    plaintext: &[u8],
    aad: Option<&[u8]>,
) -> Result<Vec<u8>> {
    let descriptor = registry::lookup(algorithm)?;
    let params = CipherParams::resolve(descriptor);
    tracing::trace!(algorithm = descriptor.name, ?params, "encrypting");

    let iv = random_bytes(params.iv_len)?;
    let sealed = seal(descriptor, &params, key, &iv, aad, plaintext)?;

    envelope::encode_cipher_envelope(&iv, &sealed.ciphertext, &sealed.tag)
}

/// Decrypts an envelope produced by [`encrypt`] with the same algorithm.
///
/// Fails closed: on a tag mismatch no plaintext is returned.
pub fn decrypt(
    algorithm: &str,
    key: &[u8],
    data: &[u8],
    aad: Option<&[u8]>,
) -> Result<Zeroizing<Vec<u8>>> {
    let descriptor = registry::lookup(algorithm)?;
    let params = CipherParams::resolve(descriptor);
    tracing::trace!(algorithm = descriptor.name, ?params, "decrypting");

    let parsed = envelope::decode_cipher_envelope(data, params.iv_len, params.tag_len)?;

    open(
        descriptor,
        &params,
        key,
        &parsed.iv,
        aad,
        &parsed.ciphertext,
        &parsed.tag,
    )
}

fn check_key(descriptor: &AlgorithmDescriptor, key: &[u8]) -> Result<()> {
    if key.len() != descriptor.key_len {
        return Err(invalid_key(descriptor, key));
    }
    Ok(())
}

fn invalid_key(descriptor: &AlgorithmDescriptor, key: &[u8]) -> Error {
    Error::InvalidKeyLength {
        algorithm: descriptor.name,
        expected: descriptor.key_len,
        got: key.len(),
    }
}

fn aad_for<'a>(descriptor: &AlgorithmDescriptor, aad: Option<&'a [u8]>) -> &'a [u8] {
    match aad {
        Some(aad) if descriptor.is_aead() => aad,
        _ => &[],
    }
}

fn check_padding(descriptor: &AlgorithmDescriptor, padding: Padding) -> Result<()> {
    let block_mode = matches!(descriptor.mode, Mode::Cbc | Mode::Ecb);
    if padding == Padding::Pkcs7 && !block_mode {
        return Err(Error::Misconfigured {
            algorithm: descriptor.name,
            reason: format!("mode {} does not pad", descriptor.mode),
        });
    }
    Ok(())
}

/// Encrypts with a caller-supplied IV.
pub(crate) fn seal(
    descriptor: &AlgorithmDescriptor,
    params: &CipherParams,
    key: &[u8],
    iv: &[u8],
    aad: Option<&[u8]>,
    plaintext: &[u8],
) -> Result<Sealed> {
    check_key(descriptor, key)?;
    check_padding(descriptor, params.padding)?;
    let aad = aad_for(descriptor, aad);
    let padding = params.padding;

    let untagged = |ciphertext| Sealed {
        ciphertext,
        tag: Vec::new(),
    };

    use Primitive as P;
    match (descriptor.mode, descriptor.primitive) {
        (Mode::Gcm, P::Aes128) => seal_aead::<Aes128Gcm>(descriptor, key, iv, aad, plaintext),
        (Mode::Gcm, P::Aes192) => seal_aead::<Aes192Gcm>(descriptor, key, iv, aad, plaintext),
        (Mode::Gcm, P::Aes256) => seal_aead::<Aes256Gcm>(descriptor, key, iv, aad, plaintext),
        (Mode::Ccm, P::Aes128) => seal_aead::<AesCcm<Aes128>>(descriptor, key, iv, aad, plaintext),
        (Mode::Ccm, P::Aes192) => seal_aead::<AesCcm<Aes192>>(descriptor, key, iv, aad, plaintext),
        (Mode::Ccm, P::Aes256) => seal_aead::<AesCcm<Aes256>>(descriptor, key, iv, aad, plaintext),
        (Mode::Ocb, P::Aes128) => seal_aead::<Ocb3<Aes128>>(descriptor, key, iv, aad, plaintext),
        (Mode::Ocb, P::Aes192) => seal_aead::<Ocb3<Aes192>>(descriptor, key, iv, aad, plaintext),
        (Mode::Ocb, P::Aes256) => seal_aead::<Ocb3<Aes256>>(descriptor, key, iv, aad, plaintext),
        (Mode::Poly1305, P::ChaCha20) => {
            seal_aead::<ChaCha20Poly1305>(descriptor, key, iv, aad, plaintext)
        }
        (Mode::Cbc, P::Aes128) => {
            seal_cbc::<cbc::Encryptor<Aes128>>(descriptor, key, iv, padding, plaintext).map(untagged)
        }
        (Mode::Cbc, P::Aes192) => {
            seal_cbc::<cbc::Encryptor<Aes192>>(descriptor, key, iv, padding, plaintext).map(untagged)
        }
        (Mode::Cbc, P::Aes256) => {
            seal_cbc::<cbc::Encryptor<Aes256>>(descriptor, key, iv, padding, plaintext).map(untagged)
        }
        (Mode::Ecb, P::Aes128) => {
            seal_ecb::<ecb::Encryptor<Aes128>>(descriptor, key, padding, plaintext).map(untagged)
        }
        (Mode::Ecb, P::Aes192) => {
            seal_ecb::<ecb::Encryptor<Aes192>>(descriptor, key, padding, plaintext).map(untagged)
        }
        (Mode::Ecb, P::Aes256) => {
            seal_ecb::<ecb::Encryptor<Aes256>>(descriptor, key, padding, plaintext).map(untagged)
        }
        (Mode::Ctr, P::Aes128) => {
            apply_ctr::<ctr::Ctr128BE<Aes128>>(descriptor, key, iv, plaintext).map(untagged)
        }
        (Mode::Ctr, P::Aes192) => {
            apply_ctr::<ctr::Ctr128BE<Aes192>>(descriptor, key, iv, plaintext).map(untagged)
        }
        (Mode::Ctr, P::Aes256) => {
            apply_ctr::<ctr::Ctr128BE<Aes256>>(descriptor, key, iv, plaintext).map(untagged)
        }
        (Mode::Wrap, P::Aes128 | P::Aes192 | P::Aes256) => {
            wrap(descriptor, key, plaintext).map(untagged)
        }
        (mode, primitive) => Err(unpaired(descriptor, mode, primitive)),
    }
}

/// Decrypts with a caller-supplied IV and expected tag.
pub(crate) fn open(
    descriptor: &AlgorithmDescriptor,
    params: &CipherParams,
    key: &[u8],
    iv: &[u8],
    aad: Option<&[u8]>,
    ciphertext: &[u8],
    tag: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    check_key(descriptor, key)?;
    check_padding(descriptor, params.padding)?;
    let aad = aad_for(descriptor, aad);
    let padding = params.padding;

    use Primitive as P;
    match (descriptor.mode, descriptor.primitive) {
        (Mode::Gcm, P::Aes128) => open_aead::<Aes128Gcm>(descriptor, key, iv, aad, ciphertext, tag),
        (Mode::Gcm, P::Aes192) => open_aead::<Aes192Gcm>(descriptor, key, iv, aad, ciphertext, tag),
        (Mode::Gcm, P::Aes256) => open_aead::<Aes256Gcm>(descriptor, key, iv, aad, ciphertext, tag),
        (Mode::Ccm, P::Aes128) => {
            open_aead::<AesCcm<Aes128>>(descriptor, key, iv, aad, ciphertext, tag)
        }
        (Mode::Ccm, P::Aes192) => {
            open_aead::<AesCcm<Aes192>>(descriptor, key, iv, aad, ciphertext, tag)
        }
        (Mode::Ccm, P::Aes256) => {
            open_aead::<AesCcm<Aes256>>(descriptor, key, iv, aad, ciphertext, tag)
        }
        (Mode::Ocb, P::Aes128) => open_aead::<Ocb3<Aes128>>(descriptor, key, iv, aad, ciphertext, tag),
        (Mode::Ocb, P::Aes192) => open_aead::<Ocb3<Aes192>>(descriptor, key, iv, aad, ciphertext, tag),
        (Mode::Ocb, P::Aes256) => open_aead::<Ocb3<Aes256>>(descriptor, key, iv, aad, ciphertext, tag),
        (Mode::Poly1305, P::ChaCha20) => {
            open_aead::<ChaCha20Poly1305>(descriptor, key, iv, aad, ciphertext, tag)
        }
        (Mode::Cbc, P::Aes128) => {
            open_cbc::<cbc::Decryptor<Aes128>>(descriptor, key, iv, padding, ciphertext)
        }
        (Mode::Cbc, P::Aes192) => {
            open_cbc::<cbc::Decryptor<Aes192>>(descriptor, key, iv, padding, ciphertext)
        }
        (Mode::Cbc, P::Aes256) => {
            open_cbc::<cbc::Decryptor<Aes256>>(descriptor, key, iv, padding, ciphertext)
        }
        (Mode::Ecb, P::Aes128) => {
            open_ecb::<ecb::Decryptor<Aes128>>(descriptor, key, padding, ciphertext)
        }
        (Mode::Ecb, P::Aes192) => {
            open_ecb::<ecb::Decryptor<Aes192>>(descriptor, key, padding, ciphertext)
        }
        (Mode::Ecb, P::Aes256) => {
            open_ecb::<ecb::Decryptor<Aes256>>(descriptor, key, padding, ciphertext)
        }
        (Mode::Ctr, P::Aes128) => {
            apply_ctr::<ctr::Ctr128BE<Aes128>>(descriptor, key, iv, ciphertext).map(Zeroizing::new)
        }
        (Mode::Ctr, P::Aes192) => {
            apply_ctr::<ctr::Ctr128BE<Aes192>>(descriptor, key, iv, ciphertext).map(Zeroizing::new)
        }
        (Mode::Ctr, P::Aes256) => {
            apply_ctr::<ctr::Ctr128BE<Aes256>>(descriptor, key, iv, ciphertext).map(Zeroizing::new)
        }
        (Mode::Wrap, P::Aes128 | P::Aes192 | P::Aes256) => unwrap(descriptor, key, ciphertext),
        (mode, primitive) => Err(unpaired(descriptor, mode, primitive)),
    }
}

fn unpaired(descriptor: &AlgorithmDescriptor, mode: Mode, primitive: Primitive) -> Error {
    Error::Misconfigured {
        algorithm: descriptor.name,
        reason: format!("mode {mode} is not available for {primitive:?}"),
    }
}

fn check_nonce<A: AeadCore>(descriptor: &AlgorithmDescriptor, iv: &[u8]) -> Result<()> {
    if iv.len() != A::NonceSize::USIZE {
        return Err(Error::Misconfigured {
            algorithm: descriptor.name,
            reason: format!(
                "expected a {}-byte nonce, got {}",
                A::NonceSize::USIZE,
                iv.len()
            ),
        });
    }
    Ok(())
}

fn seal_aead<A: KeyInit + AeadInPlace>(
    descriptor: &AlgorithmDescriptor,
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Sealed> {
    check_nonce::<A>(descriptor, iv)?;
    let cipher = A::new_from_slice(key).map_err(|_| invalid_key(descriptor, key))?;

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(iv), aad, &mut buffer)
        .map_err(|_| Error::UnsupportedState {
            algorithm: descriptor.name,
            reason: "message length not accepted by the AEAD".into(),
        })?;

    Ok(Sealed {
        ciphertext: buffer,
        tag: tag.to_vec(),
    })
}

fn open_aead<A: KeyInit + AeadInPlace>(
    descriptor: &AlgorithmDescriptor,
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    check_nonce::<A>(descriptor, iv)?;
    if tag.len() != A::TagSize::USIZE {
        return Err(Error::AuthenticationFailed);
    }
    let cipher = A::new_from_slice(key).map_err(|_| invalid_key(descriptor, key))?;

    let mut buffer = Zeroizing::new(ciphertext.to_vec());
    cipher
        .decrypt_in_place_detached(
            GenericArray::from_slice(iv),
            aad,
            &mut buffer,
            GenericArray::from_slice(tag),
        )
        .map_err(|_| Error::AuthenticationFailed)?;

    Ok(buffer)
}

fn seal_cbc<M: KeyIvInit + BlockEncryptMut>(
    descriptor: &AlgorithmDescriptor,
    key: &[u8],
    iv: &[u8],
    padding: Padding,
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    let cipher = M::new_from_slices(key, iv).map_err(|_| invalid_key(descriptor, key))?;
    encrypt_blocks(descriptor, cipher, padding, plaintext)
}

fn open_cbc<M: KeyIvInit + BlockDecryptMut>(
    descriptor: &AlgorithmDescriptor,
    key: &[u8],
    iv: &[u8],
    padding: Padding,
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    let cipher = M::new_from_slices(key, iv).map_err(|_| invalid_key(descriptor, key))?;
    decrypt_blocks(descriptor, cipher, padding, ciphertext)
}

fn seal_ecb<M: KeyInit + BlockEncryptMut>(
    descriptor: &AlgorithmDescriptor,
    key: &[u8],
    padding: Padding,
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    let cipher = M::new_from_slice(key).map_err(|_| invalid_key(descriptor, key))?;
    encrypt_blocks(descriptor, cipher, padding, plaintext)
}

fn open_ecb<M: KeyInit + BlockDecryptMut>(
    descriptor: &AlgorithmDescriptor,
    key: &[u8],
    padding: Padding,
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    let cipher = M::new_from_slice(key).map_err(|_| invalid_key(descriptor, key))?;
    decrypt_blocks(descriptor, cipher, padding, ciphertext)
}

fn encrypt_blocks<M: BlockEncryptMut>(
    descriptor: &AlgorithmDescriptor,
    cipher: M,
    padding: Padding,
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    match padding {
        Padding::Pkcs7 => Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
        Padding::None => {
            check_whole_blocks::<M>(descriptor, plaintext.len())?;
            Ok(cipher.encrypt_padded_vec_mut::<NoPadding>(plaintext))
        }
    }
}

fn decrypt_blocks<M: BlockDecryptMut>(
    descriptor: &AlgorithmDescriptor,
    cipher: M,
    padding: Padding,
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    let opened = match padding {
        Padding::Pkcs7 => cipher.decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        Padding::None => {
            check_whole_blocks::<M>(descriptor, ciphertext.len())?;
            cipher.decrypt_padded_vec_mut::<NoPadding>(ciphertext)
        }
    };
    opened
        .map(Zeroizing::new)
        .map_err(|_| Error::AuthenticationFailed)
}

fn check_whole_blocks<M: BlockSizeUser>(
    descriptor: &AlgorithmDescriptor,
    len: usize,
) -> Result<()> {
    let block = M::BlockSize::USIZE;
    if len % block != 0 {
        return Err(Error::UnsupportedState {
            algorithm: descriptor.name,
            reason: format!("unpadded input must be a multiple of {block} bytes, got {len}"),
        });
    }
    Ok(())
}

fn apply_ctr<M: KeyIvInit + StreamCipher>(
    descriptor: &AlgorithmDescriptor,
    key: &[u8],
    iv: &[u8],
    input: &[u8],
) -> Result<Vec<u8>> {
    let mut cipher = M::new_from_slices(key, iv).map_err(|_| invalid_key(descriptor, key))?;
    let mut buffer = input.to_vec();
    cipher.apply_keystream(&mut buffer);
    Ok(buffer)
}

fn wrap(descriptor: &AlgorithmDescriptor, key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let wrapped = match descriptor.primitive {
        Primitive::Aes128 => Kek::<Aes128>::try_from(key).map(|kek| kek.wrap_vec(plaintext)),
        Primitive::Aes192 => Kek::<Aes192>::try_from(key).map(|kek| kek.wrap_vec(plaintext)),
        Primitive::Aes256 => Kek::<Aes256>::try_from(key).map(|kek| kek.wrap_vec(plaintext)),
        Primitive::ChaCha20 => {
            return Err(unpaired(descriptor, descriptor.mode, descriptor.primitive));
        }
    };

    // key wrap only accepts whole 64-bit semiblocks
    wrapped
        .map_err(|_| invalid_key(descriptor, key))?
        .map_err(|e| Error::UnsupportedState {
            algorithm: descriptor.name,
            reason: e.to_string(),
        })
}

fn unwrap(
    descriptor: &AlgorithmDescriptor,
    key: &[u8],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    let unwrapped = match descriptor.primitive {
        Primitive::Aes128 => Kek::<Aes128>::try_from(key).map(|kek| kek.unwrap_vec(ciphertext)),
        Primitive::Aes192 => Kek::<Aes192>::try_from(key).map(|kek| kek.unwrap_vec(ciphertext)),
        Primitive::Aes256 => Kek::<Aes256>::try_from(key).map(|kek| kek.unwrap_vec(ciphertext)),
        Primitive::ChaCha20 => {
            return Err(unpaired(descriptor, descriptor.mode, descriptor.primitive));
        }
    };

    unwrapped
        .map_err(|_| invalid_key(descriptor, key))?
        .map(Zeroizing::new)
        .map_err(|_| Error::AuthenticationFailed)
}
