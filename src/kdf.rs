//! Passphrase -> key derivation with a memory-hard function.

use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Work-factor parameters for the derivation function.
///
/// The parameters are not stored in any envelope, so the same value has to be
/// supplied when hashing and when verifying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "function", rename_all = "lowercase")]
pub enum KdfParams {
    Scrypt {
        /// log2 of the CPU/memory cost `N`
        log_n: u8,
        /// block size
        r: u32,
        /// parallelization
        p: u32,
    },
    Argon2id {
        mem_cost_kib: u32,
        time_cost: u32,
        parallelism: u32,
    },
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::SCRYPT_DEFAULT
    }
}

impl KdfParams {
    /// N = 16384, r = 8, p = 1
    pub const SCRYPT_DEFAULT: Self = Self::Scrypt {
        log_n: 14,
        r: 8,
        p: 1,
    };

    pub const ARGON2ID_DEFAULT: Self = Self::Argon2id {
        // 64 MiB
        mem_cost_kib: 64 * 1024,
        time_cost: 3,
        parallelism: 1,
    };

    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Scrypt { log_n, r, p } => {
                scrypt::Params::new(log_n, r, p, scrypt::Params::RECOMMENDED_LEN)
                    .map_err(|e| Error::DerivationFailed(format!("invalid scrypt params: {e}")))?;
            }
            Self::Argon2id {
                mem_cost_kib,
                time_cost,
                parallelism,
            } => {
                if time_cost < 1 {
                    return Err(Error::DerivationFailed(
                        "argon2 time cost must be >= 1".into(),
                    ));
                }
                if parallelism < 1 {
                    return Err(Error::DerivationFailed(
                        "argon2 parallelism must be >= 1".into(),
                    ));
                }
                if mem_cost_kib < 8 * parallelism {
                    return Err(Error::DerivationFailed(
                        "argon2 memory cost must be at least 8 * parallelism".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Derives `output_len` bytes from `secret` and `salt`.
///
/// Deterministic in all four inputs. Intentionally slow; run it off any
/// latency-sensitive thread.
pub fn derive_key(
    secret: &[u8],
    salt: &[u8],
    output_len: usize,
    params: &KdfParams,
) -> Result<Zeroizing<Vec<u8>>> {
    params.validate()?;
    tracing::trace!(?params, output_len, "deriving key");

    let mut key = Zeroizing::new(vec![0u8; output_len]);

    match *params {
        KdfParams::Scrypt { log_n, r, p } => {
            let scrypt_params = scrypt::Params::new(log_n, r, p, scrypt::Params::RECOMMENDED_LEN)
                .map_err(|e| Error::DerivationFailed(format!("invalid scrypt params: {e}")))?;
            scrypt::scrypt(secret, salt, &scrypt_params, &mut key)
                .map_err(|e| Error::DerivationFailed(format!("scrypt rejected output: {e}")))?;
        }
        KdfParams::Argon2id {
            mem_cost_kib,
            time_cost,
            parallelism,
        } => {
            let argon2_params = Params::new(mem_cost_kib, time_cost, parallelism, Some(output_len))
                .map_err(|e| Error::DerivationFailed(format!("invalid argon2 params: {e}")))?;
            Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params)
                .hash_password_into(secret, salt, &mut key)
                .map_err(|e| Error::DerivationFailed(format!("argon2 failed: {e}")))?;
        }
    }

    Ok(key)
}

#[cfg(test)]
pub(crate) const TEST_PARAMS: KdfParams = KdfParams::Scrypt {
    log_n: 4,
    r: 8,
    p: 1,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kdf_is_deterministic() {
        let salt = [42u8; 16];

        let k1 = derive_key(b"password", &salt, 32, &TEST_PARAMS).unwrap();
        let k2 = derive_key(b"password", &salt, 32, &TEST_PARAMS).unwrap();

        assert_eq!(k1, k2);
        assert_eq!(k1.len(), 32);
    }

    #[test]
    fn output_length_is_honoured() {
        for len in [1, 16, 48, 255] {
            let key = derive_key(b"pw", b"salt", len, &TEST_PARAMS).unwrap();
            assert_eq!(key.len(), len);
        }
    }

    #[test]
    fn salt_and_secret_affect_output() {
        let base = derive_key(b"pw", b"salt-a", 32, &TEST_PARAMS).unwrap();

        assert_ne!(base, derive_key(b"pw", b"salt-b", 32, &TEST_PARAMS).unwrap());
        assert_ne!(base, derive_key(b"pw2", b"salt-a", 32, &TEST_PARAMS).unwrap());
    }

    #[test]
    fn params_affect_output() {
        let other = KdfParams::Scrypt {
            log_n: 5,
            r: 8,
            p: 1,
        };

        let k1 = derive_key(b"pw", b"salt", 32, &TEST_PARAMS).unwrap();
        let k2 = derive_key(b"pw", b"salt", 32, &other).unwrap();

        assert_ne!(k1, k2);
    }

    #[test]
    fn matches_rfc7914_vector() {
        // scrypt("password", "NaCl", N=1024, r=8, p=16, 64)
        let params = KdfParams::Scrypt {
            log_n: 10,
            r: 8,
            p: 16,
        };
        let key = derive_key(b"password", b"NaCl", 64, &params).unwrap();

        assert_eq!(
            hex::encode(&key[..16]),
            "fdbabe1c9d3472007856e7190d01e9fe"
        );
    }

    #[test]
    fn argon2id_roundtrip() {
        let params = KdfParams::Argon2id {
            mem_cost_kib: 64,
            time_cost: 1,
            parallelism: 1,
        };

        let k1 = derive_key(b"pw", b"saltsalt", 24, &params).unwrap();
        let k2 = derive_key(b"pw", b"saltsalt", 24, &params).unwrap();

        assert_eq!(k1, k2);
        assert_ne!(k1, derive_key(b"pw", b"saltsalt", 24, &TEST_PARAMS).unwrap());
    }

    #[test]
    fn empty_output_fails() {
        assert!(matches!(
            derive_key(b"pw", b"salt", 0, &TEST_PARAMS),
            Err(Error::DerivationFailed(_))
        ));
    }

    #[test]
    fn invalid_params_fail_gracefully() {
        // N must stay below 2^(16 * r)
        let scrypt = KdfParams::Scrypt {
            log_n: 20,
            r: 1,
            p: 1,
        };
        let argon2 = KdfParams::Argon2id {
            mem_cost_kib: 0,
            time_cost: 0,
            parallelism: 0,
        };

        assert!(matches!(
            derive_key(b"pw", b"salt", 32, &scrypt),
            Err(Error::DerivationFailed(_))
        ));
        assert!(matches!(
            derive_key(b"pw", b"saltsalt", 32, &argon2),
            Err(Error::DerivationFailed(_))
        ));
    }

    #[test]
    fn argon2_rejects_short_output() {
        assert!(matches!(
            derive_key(b"pw", b"saltsalt", 2, &KdfParams::ARGON2ID_DEFAULT),
            Err(Error::DerivationFailed(_))
        ));
    }
}
