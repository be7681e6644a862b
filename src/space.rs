// ============================================================================
// src/space.rs – candidate parameter space (PRF × iterations × dklen)
// ============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Derived-key length tried for every PRF in addition to its natural
/// digest size. Matches the storage layout of the systems this tool is
/// pointed at (32-byte keys regardless of PRF).
pub const FALLBACK_DKLEN: usize = 32;

/// Default iteration ladder, lowest rung first.
pub const DEFAULT_LADDER: [u32; 7] = [1000, 2000, 5000, 10000, 20000, 50000, 100000];

/// Rungs appended when the operator asks to broaden an exhausted sweep.
pub const BROADEN_RUNGS: [u32; 3] = [200_000, 500_000, 1_000_000];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("unrecognized digest algorithm: {0:?} (expected sha1, sha256 or sha512)")]
    UnknownAlgorithm(String),
    #[error("algorithm roster is empty")]
    EmptyRoster,
    #[error("iteration ladder is empty")]
    EmptyLadder,
    #[error("iteration ladder contains a zero rung")]
    ZeroRung,
    #[error("fallback derived-key length must be non-zero")]
    ZeroFallback,
}

/// HMAC pseudorandom functions the sweep can try.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Sha1,
    Sha256,
    Sha512,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Sha1, Algorithm::Sha256, Algorithm::Sha512];

    /// Natural digest size in bytes; the first dklen candidate per PRF.
    pub fn digest_len(self) -> usize {
        match self {
            Algorithm::Sha1 => 20,
            Algorithm::Sha256 => 32,
            Algorithm::Sha512 => 64,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Sha1 => "sha1",
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha1" | "sha-1" => Ok(Algorithm::Sha1),
            "sha256" | "sha-256" => Ok(Algorithm::Sha256),
            "sha512" | "sha-512" => Ok(Algorithm::Sha512),
            other => Err(ParamError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// One point in the search space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub algorithm: Algorithm,
    pub iterations: u32,
    pub dklen: usize,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "alg={} iters={} dklen={}",
            self.algorithm, self.iterations, self.dklen
        )
    }
}

/// Validated enumeration of every candidate tuple, ordered PRF-outer,
/// then iteration count, then dklen (natural first, fallback second).
/// Both dklen candidates are kept even when they coincide, so the
/// enumeration size is always roster × ladder × 2.
#[derive(Debug, Clone)]
pub struct ParamSpace {
    roster: Vec<Algorithm>,
    ladder: Vec<u32>,
    fallback_dklen: usize,
}

impl ParamSpace {
    pub fn new(
        roster: Vec<Algorithm>,
        ladder: Vec<u32>,
        fallback_dklen: usize,
    ) -> Result<Self, ParamError> {
        if roster.is_empty() {
            return Err(ParamError::EmptyRoster);
        }
        if ladder.is_empty() {
            return Err(ParamError::EmptyLadder);
        }
        if ladder.iter().any(|&rung| rung == 0) {
            return Err(ParamError::ZeroRung);
        }
        if fallback_dklen == 0 {
            return Err(ParamError::ZeroFallback);
        }
        Ok(Self {
            roster,
            ladder,
            fallback_dklen,
        })
    }

    pub fn roster(&self) -> &[Algorithm] {
        &self.roster
    }

    pub fn ladder(&self) -> &[u32] {
        &self.ladder
    }

    pub fn fallback_dklen(&self) -> usize {
        self.fallback_dklen
    }

    pub fn combinations(&self) -> usize {
        self.roster.len() * self.ladder.len() * 2
    }

    pub fn candidates(&self) -> Vec<Candidate> {
        let mut out = Vec::with_capacity(self.combinations());
        for &algorithm in &self.roster {
            for &iterations in &self.ladder {
                for dklen in [algorithm.digest_len(), self.fallback_dklen] {
                    out.push(Candidate {
                        algorithm,
                        iterations,
                        dklen,
                    });
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_space() -> ParamSpace {
        ParamSpace::new(Algorithm::ALL.to_vec(), DEFAULT_LADDER.to_vec(), FALLBACK_DKLEN).unwrap()
    }

    #[test]
    fn default_space_enumerates_42_tuples() {
        let space = default_space();
        assert_eq!(space.combinations(), 42);
        assert_eq!(space.candidates().len(), 42);
    }

    #[test]
    fn enumeration_is_deterministic() {
        let space = default_space();
        assert_eq!(space.candidates(), space.candidates());
    }

    #[test]
    fn order_is_algorithm_outer_then_ladder_then_dklen() {
        let candidates = default_space().candidates();
        assert_eq!(
            candidates[0],
            Candidate {
                algorithm: Algorithm::Sha1,
                iterations: 1000,
                dklen: 20
            }
        );
        assert_eq!(
            candidates[1],
            Candidate {
                algorithm: Algorithm::Sha1,
                iterations: 1000,
                dklen: 32
            }
        );
        assert_eq!(
            candidates[2],
            Candidate {
                algorithm: Algorithm::Sha1,
                iterations: 2000,
                dklen: 20
            }
        );
        // sha256 keeps its coinciding natural/fallback pair
        let sha256_first = candidates
            .iter()
            .position(|c| c.algorithm == Algorithm::Sha256)
            .unwrap();
        assert_eq!(candidates[sha256_first].dklen, 32);
        assert_eq!(candidates[sha256_first + 1].dklen, 32);
        // last tuple is sha512 at the top rung, fallback length
        assert_eq!(
            *candidates.last().unwrap(),
            Candidate {
                algorithm: Algorithm::Sha512,
                iterations: 100000,
                dklen: 32
            }
        );
    }

    #[test]
    fn algorithm_parses_case_insensitively() {
        assert_eq!("SHA1".parse::<Algorithm>().unwrap(), Algorithm::Sha1);
        assert_eq!("sha-256".parse::<Algorithm>().unwrap(), Algorithm::Sha256);
        assert_eq!(" sha512 ".parse::<Algorithm>().unwrap(), Algorithm::Sha512);
        assert!(matches!(
            "md5".parse::<Algorithm>(),
            Err(ParamError::UnknownAlgorithm(_))
        ));
    }

    #[test]
    fn natural_digest_lengths() {
        assert_eq!(Algorithm::Sha1.digest_len(), 20);
        assert_eq!(Algorithm::Sha256.digest_len(), 32);
        assert_eq!(Algorithm::Sha512.digest_len(), 64);
    }

    #[test]
    fn constructor_rejects_degenerate_spaces() {
        assert_eq!(
            ParamSpace::new(vec![], vec![1000], 32).unwrap_err(),
            ParamError::EmptyRoster
        );
        assert_eq!(
            ParamSpace::new(vec![Algorithm::Sha1], vec![], 32).unwrap_err(),
            ParamError::EmptyLadder
        );
        assert_eq!(
            ParamSpace::new(vec![Algorithm::Sha1], vec![1000, 0], 32).unwrap_err(),
            ParamError::ZeroRung
        );
        assert_eq!(
            ParamSpace::new(vec![Algorithm::Sha1], vec![1000], 0).unwrap_err(),
            ParamError::ZeroFallback
        );
    }
}
