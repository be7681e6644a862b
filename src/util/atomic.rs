// ============================================================================
// src/util/atomic.rs – Durable, permissioned atomic config writes
// ============================================================================

use anyhow::{bail, Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

fn parent_dir(path: &Path) -> Result<PathBuf> {
    path.parent()
        .map(|p| p.to_path_buf())
        .context("Target path has no parent directory")
}

/// Fsync a directory to persist metadata (like rename).
fn fsync_dir(dir: &Path) -> Result<()> {
    let f = File::open(dir).with_context(|| format!("Open dir for fsync: {dir:?}"))?;
    f.sync_all()
        .with_context(|| format!("Fsync dir failed: {dir:?}"))?;
    Ok(())
}

/// Reject writes if target is a symlink (avoid TOCTOU surprises at the
/// destination).
fn reject_symlink_target(path: &Path) -> Result<()> {
    if let Ok(meta) = fs::symlink_metadata(path) {
        if meta.file_type().is_symlink() {
            bail!("Refusing to write to symlink: {}", path.display());
        }
    }
    Ok(())
}

/// Core atomic write: bytes go to a temp file in the same directory,
/// the file is fsynced, renamed into place, then the parent directory is
/// fsynced. Exact 0600 mode, umask ignored.
fn atomic_write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    reject_symlink_target(path)?;

    let dir = parent_dir(path)?;
    if !dir.as_os_str().is_empty() && !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Create parent directory failed: {dir:?}"))?;
    }
    let dir = if dir.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        dir
    };

    let file_name = path
        .file_name()
        .context("Target path missing file name")?
        .to_string_lossy()
        .into_owned();

    // Unique temp name alongside the target (low-collision approach).
    let mut tmp = dir.join(format!("{file_name}.tmp"));
    for _ in 0..8 {
        tmp.set_file_name(format!("{file_name}.tmp-{}", nanoid::nanoid!(8)));
        if !tmp.exists() {
            break;
        }
    }

    let mut f = OpenOptions::new()
        .create_new(true)
        .write(true)
        .mode(0o600)
        .open(&tmp)
        .with_context(|| format!("Open temp file failed: {tmp:?}"))?;

    f.write_all(bytes).context("Write to temp file failed")?;
    f.sync_all().context("Fsync temp file failed")?;

    fs::rename(&tmp, path).with_context(|| {
        format!(
            "Atomic rename failed ({} -> {})",
            tmp.display(),
            path.display()
        )
    })?;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .with_context(|| format!("Set permissions failed for {}", path.display()))?;

    fsync_dir(&dir)?;

    Ok(())
}

/// Atomic replace of a TOML-serializable config with 0600 permissions.
pub fn atomic_write_toml<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = toml::to_string_pretty(value).context("Serialize TOML failed")?;
    atomic_write_bytes(path, s.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Doc {
        name: String,
        rungs: Vec<u32>,
    }

    #[test]
    fn writes_and_replaces_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe.toml");
        let doc = Doc {
            name: "sweep".into(),
            rungs: vec![1000, 2000],
        };

        atomic_write_toml(&path, &doc).unwrap();
        let first = fs::read_to_string(&path).unwrap();
        assert!(first.contains("2000"));
        assert!(!first.contains("500000"));

        let doc = Doc {
            name: "sweep".into(),
            rungs: vec![1000, 2000, 500000],
        };
        atomic_write_toml(&path, &doc).unwrap();
        let second = fs::read_to_string(&path).unwrap();
        assert!(second.contains("500000"));

        // No stray temp files left behind.
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp-"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
