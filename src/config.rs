// ============================================================================
// src/config.rs – strict config loader
// ============================================================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::space::{Algorithm, ParamSpace, BROADEN_RUNGS, DEFAULT_LADDER, FALLBACK_DKLEN};

pub const DEFAULT_CONFIG_PATH: &str = "hashprobe.toml";

/// The recovered-from-storage inputs. All optional at the file level;
/// probe startup enforces presence after CLI overrides and prompts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetCfg {
    /// Known plaintext candidate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Salt, base64 as stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt_b64: Option<String>,
    /// Digest to reproduce, base64 as stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_b64: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCfg {
    #[serde(default = "default_ladder")]
    pub iterations: Vec<u32>,
    #[serde(default = "default_roster")]
    pub algorithms: Vec<Algorithm>,
    #[serde(default = "default_fallback_dklen")]
    pub fallback_dklen: usize,
}

fn default_ladder() -> Vec<u32> {
    DEFAULT_LADDER.to_vec()
}

fn default_roster() -> Vec<Algorithm> {
    Algorithm::ALL.to_vec()
}

fn default_fallback_dklen() -> usize {
    FALLBACK_DKLEN
}

impl Default for SearchCfg {
    fn default() -> Self {
        Self {
            iterations: default_ladder(),
            algorithms: default_roster(),
            fallback_dklen: default_fallback_dklen(),
        }
    }
}

impl SearchCfg {
    /// Append the broadening rungs that are not already on the ladder.
    /// Returns how many were added.
    pub fn broaden(&mut self) -> usize {
        let mut added = 0;
        for rung in BROADEN_RUNGS {
            if !self.iterations.contains(&rung) {
                self.iterations.push(rung);
                added += 1;
            }
        }
        added
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default)]
    pub target: TargetCfg,
    #[serde(default)]
    pub search: SearchCfg,
    /// Where this config was loaded from, if anywhere; broadened ladders
    /// are persisted back here on request.
    #[serde(skip)]
    pub path: Option<PathBuf>,
}

impl ProbeConfig {
    pub fn load<P: AsRef<Path>>(p: P) -> Result<Self> {
        let s = fs::read_to_string(&p)
            .with_context(|| format!("read config: {}", p.as_ref().display()))?;
        let mut cfg: Self = if p.as_ref().extension().and_then(|e| e.to_str()) == Some("toml") {
            toml::from_str(&s).context("toml parse")?
        } else {
            serde_yaml::from_str(&s).context("yaml parse")?
        };
        cfg.path = Some(p.as_ref().to_path_buf());
        Ok(cfg)
    }

    /// Explicit paths must exist; the conventional `hashprobe.toml` is
    /// picked up when present and silently skipped otherwise.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let conventional = Path::new(DEFAULT_CONFIG_PATH);
                if conventional.exists() {
                    Self::load(conventional)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Build the validated sweep space from the search section.
    pub fn space(&self) -> Result<ParamSpace> {
        ParamSpace::new(
            self.search.algorithms.clone(),
            self.search.iterations.clone(),
            self.search.fallback_dklen,
        )
        .context("invalid search configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn toml_round_trip_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe.toml");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(
            f,
            "[target]\npassword = \"test\"\nsalt_b64 = \"AAAAAAAAAAAAAAAAAAAAAA==\"\nhash_b64 = \"MZZHO7yrw24XzMnnVXF++2xj2ccEFTgLacfDarcgJME=\"\n"
        )
        .unwrap();

        let cfg = ProbeConfig::load(&path).unwrap();
        assert_eq!(cfg.target.password.as_deref(), Some("test"));
        // search section omitted entirely: defaults apply
        assert_eq!(cfg.search.iterations, DEFAULT_LADDER.to_vec());
        assert_eq!(cfg.search.algorithms, Algorithm::ALL.to_vec());
        assert_eq!(cfg.search.fallback_dklen, FALLBACK_DKLEN);
        assert_eq!(cfg.path.as_deref(), Some(path.as_path()));
        assert_eq!(cfg.space().unwrap().combinations(), 42);
    }

    #[test]
    fn yaml_is_accepted_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe.yaml");
        fs::write(
            &path,
            "search:\n  iterations: [500]\n  algorithms: [sha512]\n",
        )
        .unwrap();

        let cfg = ProbeConfig::load(&path).unwrap();
        assert_eq!(cfg.search.iterations, vec![500]);
        assert_eq!(cfg.search.algorithms, vec![Algorithm::Sha512]);
        assert_eq!(cfg.space().unwrap().combinations(), 2);
    }

    #[test]
    fn broaden_appends_only_missing_rungs() {
        let mut search = SearchCfg::default();
        assert_eq!(search.broaden(), 3);
        assert!(search.iterations.ends_with(&[200_000, 500_000, 1_000_000]));
        // idempotent on a second pass
        assert_eq!(search.broaden(), 0);
        assert_eq!(search.iterations.len(), DEFAULT_LADDER.len() + 3);
    }

    #[test]
    fn zero_rung_config_is_rejected_at_space_build() {
        let cfg = ProbeConfig {
            search: SearchCfg {
                iterations: vec![0],
                ..SearchCfg::default()
            },
            ..ProbeConfig::default()
        };
        assert!(cfg.space().is_err());
    }
}
