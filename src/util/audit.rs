// ============================================================================
// src/util/audit.rs – Minimal append-only audit trail
// ============================================================================

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::os::unix::fs::OpenOptionsExt;
use std::path::PathBuf;

/// Append a timestamped event to the session log (0600 permissions).
/// Silent failure if the log is unwritable – the probe must never stall
/// on bookkeeping. Parameters and outcomes only; no passwords, salts or
/// digest bytes.
pub fn audit_log(event: &str, detail: &str) {
    let path = audit_path();
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600)
        .open(path)
    {
        let ts = Local::now().format("%Y-%m-%d %H:%M:%S");
        let _ = writeln!(file, "[{ts}] {event}: {detail}");
    }
}

/// `~/.hashprobe.log`, falling back to the system temp dir when no home
/// directory is resolvable (containers, stripped service accounts).
fn audit_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home).join(".hashprobe.log"),
        _ => std::env::temp_dir().join("hashprobe.log"),
    }
}
