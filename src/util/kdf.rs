// ============================================================================
// src/util/kdf.rs – PBKDF2-HMAC evaluator over the supported PRFs
// ============================================================================

use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::space::Algorithm;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KdfError {
    #[error("iteration count must be >= 1")]
    ZeroIterations,
    #[error("derived-key length must be >= 1")]
    ZeroLength,
}

/// Derive `dklen` bytes from `password` and `salt` with PBKDF2 under the
/// given PRF. The only rejectable inputs are the degenerate ones the
/// underlying primitive would misbehave on; a `ParamSpace` never produces
/// them, so callers treat an error here as a fault and propagate it.
pub fn derive(
    algorithm: Algorithm,
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    dklen: usize,
) -> Result<Zeroizing<Vec<u8>>, KdfError> {
    if iterations == 0 {
        return Err(KdfError::ZeroIterations);
    }
    if dklen == 0 {
        return Err(KdfError::ZeroLength);
    }

    let mut out = Zeroizing::new(vec![0u8; dklen]);
    match algorithm {
        Algorithm::Sha1 => pbkdf2_hmac::<Sha1>(password, salt, iterations, &mut out),
        Algorithm::Sha256 => pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut out),
        Algorithm::Sha512 => pbkdf2_hmac::<Sha512>(password, salt, iterations, &mut out),
    }
    tracing::trace!(%algorithm, iterations, dklen, "derived candidate key");
    Ok(out)
}
