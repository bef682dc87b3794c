//! Which registered algorithms actually work, and which of those to prefer.

use std::cmp::{Ordering, Reverse};
use std::sync::OnceLock;

use super::engine;
use super::registry::{self, AlgorithmDescriptor};
use crate::error::{Error, Result};
use crate::random::random_bytes;

const CHACHA20_POLY1305: &str = "chacha20-poly1305";
const TRIAL_PAYLOAD: &[u8] = b"test";

static USABLE: OnceLock<Vec<&'static str>> = OnceLock::new();

/// Trial-encrypts a short payload with a throwaway key.
///
/// `Ok(false)` means the algorithm refused the trial because of the data it
/// was handed. Any other failure, misconfigured metadata included, is
/// returned as is.
pub fn is_usable(algorithm: &str) -> Result<bool> {
    trial(registry::lookup(algorithm)?)
}

fn trial(descriptor: &AlgorithmDescriptor) -> Result<bool> {
    let params = engine::CipherParams::resolve(descriptor);
    let key = random_bytes(descriptor.key_len)?;
    let iv = random_bytes(params.iv_len)?;

    match engine::seal(descriptor, &params, &key, &iv, None, TRIAL_PAYLOAD) {
        Ok(_) => Ok(true),
        Err(Error::UnsupportedState { reason, .. }) => {
            tracing::debug!(algorithm = descriptor.name, %reason, "algorithm not usable");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Every identifier (aliases included) that survives a trial encryption.
///
/// Computed once per process; later calls return the cached list.
pub fn list_usable_algorithms() -> Result<&'static [&'static str]> {
    if let Some(usable) = USABLE.get() {
        return Ok(usable);
    }

    let mut usable = Vec::new();
    for id in registry::identifiers() {
        if is_usable(id)? {
            usable.push(id);
        }
    }
    tracing::debug!(count = usable.len(), "trialled cipher algorithms");

    Ok(USABLE.get_or_init(|| usable))
}

/// Drops identifiers that are unauthenticated, malleable or aliases.
pub fn filter_safe<S: AsRef<str>>(ids: &[S]) -> Vec<String> {
    ids.iter()
        .map(|id| id.as_ref())
        .filter(|id| is_safe(id))
        .map(str::to_string)
        .collect()
}

fn is_safe(id: &str) -> bool {
    if id == CHACHA20_POLY1305 {
        return true;
    }

    id.starts_with("aes")
        && !["ecb", "ofb", "cbc", "ctr", "ccm"]
            .iter()
            .any(|suffix| id.ends_with(suffix))
        && !id.contains("cfb")
        && id.len() > 6
}

/// Sorts strongest-first: ChaCha20-Poly1305, then OCB > GCM > CCM > other
/// modes, then larger keys, then identifier descending.
pub fn rank_by_preference<S: AsRef<str>>(ids: &[S]) -> Vec<String> {
    let mut ranked: Vec<String> = ids.iter().map(|id| id.as_ref().to_string()).collect();
    ranked.sort_by(|a, b| compare(a, b));
    ranked
}

fn compare(a: &str, b: &str) -> Ordering {
    let key = |id: &str| {
        (
            id != CHACHA20_POLY1305,
            mode_rank(id),
            Reverse(key_bits(id)),
        )
    };
    key(a).cmp(&key(b)).then_with(|| b.cmp(a))
}

fn mode_rank(id: &str) -> u8 {
    if id.ends_with("ocb") {
        0
    } else if id.ends_with("gcm") {
        1
    } else if id.ends_with("ccm") {
        2
    } else {
        3
    }
}

// "aes-256-gcm" -> 256
fn key_bits(id: &str) -> u32 {
    id.get(4..7).and_then(|bits| bits.parse().ok()).unwrap_or(0)
}

/// Usable, safe and ranked.
pub fn recommended_algorithms() -> Result<Vec<String>> {
    let usable = list_usable_algorithms()?;
    Ok(rank_by_preference(&filter_safe(usable)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::registry::{Mode, Primitive};

    #[test]
    fn filter_keeps_authenticated_modes() {
        let safe = filter_safe(&[
            "aes-256-cbc",
            "aes-256-gcm",
            "chacha20-poly1305",
            "aes-128-ecb",
        ]);

        assert_eq!(safe, vec!["aes-256-gcm", "chacha20-poly1305"]);
    }

    #[test]
    fn filter_drops_aliases_and_legacy_modes() {
        let safe = filter_safe(&["aes256", "aes-128-cfb8", "aes-192-ofb", "aes-128-ccm", "des"]);

        assert!(safe.is_empty());
    }

    #[test]
    fn rank_prefers_chacha_then_ocb() {
        let ranked = rank_by_preference(&["aes-256-gcm", "chacha20-poly1305", "aes-256-ocb"]);

        assert_eq!(ranked, vec!["chacha20-poly1305", "aes-256-ocb", "aes-256-gcm"]);
    }

    #[test]
    fn rank_orders_key_size_within_mode() {
        let ranked = rank_by_preference(&[
            "aes-128-gcm",
            "aes-256-ccm",
            "aes-256-gcm",
            "aes-192-gcm",
        ]);

        assert_eq!(
            ranked,
            vec!["aes-256-gcm", "aes-192-gcm", "aes-128-gcm", "aes-256-ccm"]
        );
    }

    #[test]
    fn rank_reads_only_the_trailing_mode() {
        let ranked = rank_by_preference(&["aes-128-ocb-cbc", "aes-128-gcm", "aes-256-gcm-ctr"]);

        assert_eq!(ranked, vec!["aes-128-gcm", "aes-256-gcm-ctr", "aes-128-ocb-cbc"]);
        assert_eq!(mode_rank("aes-128-ocb-cbc"), 3);
        assert_eq!(mode_rank("aes-128-ocb"), 0);
    }

    #[test]
    fn misconfigured_descriptor_is_an_error() {
        let long_nonce = AlgorithmDescriptor {
            name: "aes-256-gcm",
            primitive: Primitive::Aes256,
            mode: Mode::Gcm,
            key_len: 32,
            iv_len: 16,
        };
        let chacha_ocb = AlgorithmDescriptor {
            name: "chacha20-ocb",
            primitive: Primitive::ChaCha20,
            mode: Mode::Ocb,
            key_len: 32,
            iv_len: 12,
        };

        assert!(matches!(trial(&long_nonce), Err(Error::Misconfigured { .. })));
        assert!(matches!(trial(&chacha_ocb), Err(Error::Misconfigured { .. })));
    }

    #[test]
    fn consistent_descriptor_passes_trial() {
        assert!(trial(registry::lookup("aes-128-ctr").unwrap()).unwrap());
        assert!(!trial(registry::lookup("id-aes192-wrap").unwrap()).unwrap());
    }

    #[test]
    fn wrap_modes_are_not_usable() {
        let usable = list_usable_algorithms().unwrap();

        assert!(usable.contains(&"aes-256-gcm"));
        assert!(usable.contains(&"aes256"));
        assert!(!usable.iter().any(|id| id.ends_with("wrap")));
        assert!(!is_usable("id-aes128-wrap").unwrap());
    }

    #[test]
    fn usable_list_is_cached() {
        let first = list_usable_algorithms().unwrap();
        let second = list_usable_algorithms().unwrap();

        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn recommended_starts_with_chacha() {
        let recommended = recommended_algorithms().unwrap();

        assert_eq!(recommended[0], "chacha20-poly1305");
        assert_eq!(recommended[1], "aes-256-ocb");
        assert!(recommended.iter().all(|id| !id.ends_with("cbc")));
    }

    #[test]
    fn unknown_name_propagates() {
        assert!(matches!(is_usable("serpent"), Err(Error::UnknownAlgorithm(_))));
    }
}
