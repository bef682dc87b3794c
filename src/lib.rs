//! Self-describing binary envelopes for salted password hashes and
//! authenticated symmetric ciphertext.
//!
//! ```no_run
//! use cryptshelf::config::SymmetricOptions;
//! use cryptshelf::symmetric;
//!
//! let opts = SymmetricOptions::default();
//! let key = symmetric::generate_key("correct horse battery staple", None, &opts)?;
//!
//! let sealed = symmetric::encrypt(&key, "attack at dawn", &opts)?;
//! let opened = symmetric::decrypt_to_string(&key, &sealed, &opts)?;
//! assert_eq!(opened.as_str(), "attack at dawn");
//! # Ok::<(), cryptshelf::Error>(())
//! ```
//!
//! The lower layers are public as well: [`cursor`] for offset-tracked byte
//! access, [`envelope`] for the wire formats, [`kdf`] for passphrase
//! derivation and [`cipher`] for the algorithm table, the engine and the
//! capability prober.

pub mod cipher;
pub mod config;
pub mod cursor;
pub mod digest;
pub mod encoding;
pub mod envelope;
mod error;
pub mod kdf;
pub mod password;
mod random;
pub mod signature;
pub mod symmetric;

pub use crate::config::{DigestOptions, PasswordOptions, SignatureOptions, SymmetricOptions};
pub use crate::digest::HashAlgorithm;
pub use crate::encoding::{Blob, BlobRef, Encoding};
pub use crate::error::{Error, Result};
pub use crate::kdf::KdfParams;
pub use crate::password::{compare_password, hash_password};
