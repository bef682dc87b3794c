//! Static table of the cipher algorithms linked into this crate.

use std::fmt;

use crate::error::{Error, Result};

/// Length of the authentication tag produced by every AEAD mode here.
pub const AEAD_TAG_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Gcm,
    Ccm,
    Ocb,
    /// ChaCha20 with a Poly1305 authenticator
    Poly1305,
    Cbc,
    Ctr,
    Ecb,
    /// RFC 3394 key wrap
    Wrap,
}

impl Mode {
    pub fn is_aead(self) -> bool {
        matches!(self, Mode::Gcm | Mode::Ccm | Mode::Ocb | Mode::Poly1305)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Gcm => "gcm",
            Mode::Ccm => "ccm",
            Mode::Ocb => "ocb",
            Mode::Poly1305 => "poly1305",
            Mode::Cbc => "cbc",
            Mode::Ctr => "ctr",
            Mode::Ecb => "ecb",
            Mode::Wrap => "wrap",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Aes128,
    Aes192,
    Aes256,
    ChaCha20,
}

/// Read-only metadata for one algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlgorithmDescriptor {
    pub name: &'static str,
    pub primitive: Primitive,
    pub mode: Mode,
    pub key_len: usize,
    /// 0 for modes without an IV
    pub iv_len: usize,
}

impl AlgorithmDescriptor {
    pub fn is_aead(&self) -> bool {
        self.mode.is_aead()
    }

    pub fn tag_len(&self) -> usize {
        if self.is_aead() { AEAD_TAG_LEN } else { 0 }
    }
}

const fn describe(name: &'static str, primitive: Primitive, mode: Mode) -> AlgorithmDescriptor {
    let key_len = match primitive {
        Primitive::Aes128 => 16,
        Primitive::Aes192 => 24,
        Primitive::Aes256 | Primitive::ChaCha20 => 32,
    };
    let iv_len = match mode {
        Mode::Gcm | Mode::Ccm | Mode::Ocb | Mode::Poly1305 => 12,
        Mode::Cbc | Mode::Ctr => 16,
        Mode::Ecb | Mode::Wrap => 0,
    };
    AlgorithmDescriptor {
        name,
        primitive,
        mode,
        key_len,
        iv_len,
    }
}

use Mode::*;
use Primitive::*;

static DESCRIPTORS: &[AlgorithmDescriptor] = &[
    describe("aes-128-cbc", Aes128, Cbc),
    describe("aes-192-cbc", Aes192, Cbc),
    describe("aes-256-cbc", Aes256, Cbc),
    describe("aes-128-ccm", Aes128, Ccm),
    describe("aes-192-ccm", Aes192, Ccm),
    describe("aes-256-ccm", Aes256, Ccm),
    describe("aes-128-ctr", Aes128, Ctr),
    describe("aes-192-ctr", Aes192, Ctr),
    describe("aes-256-ctr", Aes256, Ctr),
    describe("aes-128-ecb", Aes128, Ecb),
    describe("aes-192-ecb", Aes192, Ecb),
    describe("aes-256-ecb", Aes256, Ecb),
    describe("aes-128-gcm", Aes128, Gcm),
    describe("aes-192-gcm", Aes192, Gcm),
    describe("aes-256-gcm", Aes256, Gcm),
    describe("aes-128-ocb", Aes128, Ocb),
    describe("aes-192-ocb", Aes192, Ocb),
    describe("aes-256-ocb", Aes256, Ocb),
    describe("chacha20-poly1305", ChaCha20, Poly1305),
    describe("id-aes128-wrap", Aes128, Wrap),
    describe("id-aes192-wrap", Aes192, Wrap),
    describe("id-aes256-wrap", Aes256, Wrap),
];

/// Short names resolving to a canonical descriptor.
static ALIASES: &[(&str, &str)] = &[
    ("aes128", "aes-128-cbc"),
    ("aes192", "aes-192-cbc"),
    ("aes256", "aes-256-cbc"),
];

pub fn descriptors() -> &'static [AlgorithmDescriptor] {
    DESCRIPTORS
}

/// Every identifier the registry answers to, aliases included.
pub fn identifiers() -> impl Iterator<Item = &'static str> {
    DESCRIPTORS
        .iter()
        .map(|d| d.name)
        .chain(ALIASES.iter().map(|(alias, _)| *alias))
}

/// Case-insensitive lookup by canonical name or alias.
pub fn lookup(name: &str) -> Result<&'static AlgorithmDescriptor> {
    let canonical = ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
        .map_or(name, |(_, canonical)| *canonical);

    DESCRIPTORS
        .iter()
        .find(|d| d.name.eq_ignore_ascii_case(canonical))
        .ok_or_else(|| Error::UnknownAlgorithm(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let d = lookup("AES-256-GCM").unwrap();

        assert_eq!(d.name, "aes-256-gcm");
        assert_eq!(d.key_len, 32);
        assert_eq!(d.iv_len, 12);
        assert_eq!(d.tag_len(), 16);
    }

    #[test]
    fn aliases_resolve_to_canonical() {
        let d = lookup("aes128").unwrap();

        assert_eq!(d.name, "aes-128-cbc");
        assert_eq!(d.iv_len, 16);
        assert!(!d.is_aead());
    }

    #[test]
    fn unknown_name_fails() {
        match lookup("rot13") {
            Err(Error::UnknownAlgorithm(name)) => assert_eq!(name, "rot13"),
            other => panic!("expected UnknownAlgorithm, got: {other:?}"),
        }
    }

    #[test]
    fn aead_modes_have_tags() {
        for d in descriptors() {
            let expected = matches!(d.mode, Gcm | Ccm | Ocb | Poly1305);
            assert_eq!(d.is_aead(), expected, "{}", d.name);
            assert_eq!(d.tag_len(), if expected { 16 } else { 0 }, "{}", d.name);
        }
    }

    #[test]
    fn chacha_descriptor() {
        let d = lookup("chacha20-poly1305").unwrap();

        assert_eq!(d.key_len, 32);
        assert_eq!(d.iv_len, 12);
        assert!(d.is_aead());
    }

    #[test]
    fn identifiers_are_unique_and_resolvable() {
        let ids: Vec<_> = identifiers().collect();
        let mut deduped = ids.clone();
        deduped.sort_unstable();
        deduped.dedup();

        assert_eq!(ids.len(), deduped.len());
        assert_eq!(ids.len(), DESCRIPTORS.len() + ALIASES.len());
        for id in ids {
            lookup(id).unwrap();
        }
    }
}
