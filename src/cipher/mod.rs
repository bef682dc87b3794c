//! Symmetric ciphers: the algorithm table, the encrypt/decrypt engine and
//! the capability prober.

pub mod engine;
pub mod probe;
pub mod registry;

pub use engine::{CipherParams, Padding, decrypt, encrypt};
pub use probe::{filter_safe, list_usable_algorithms, rank_by_preference, recommended_algorithms};
pub use registry::{AlgorithmDescriptor, Mode, Primitive, lookup};
