use getrandom::fill;

use crate::error::{Error, Result};

/// Fill buffer with cryptographically secure random bytes
pub(crate) fn secure_random(buf: &mut [u8]) -> Result<()> {
    fill(buf).map_err(|_| Error::Random)
}

pub(crate) fn random_bytes(len: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    secure_random(&mut buf)?;
    Ok(buf)
}
