// ============================================================================
// src/cmd/selftest.rs – Verify the evaluator against known-answer vectors
// ============================================================================

use anyhow::{anyhow, Result};
use zeroize::Zeroizing;

use crate::space::{Algorithm, Candidate, ParamSpace, DEFAULT_LADDER, FALLBACK_DKLEN};
use crate::sweep::{run_sweep, SweepInput};
use crate::ui::{Pace, Timing, UX};
use crate::util::audit::audit_log;
use crate::util::encode::encode_b64;
use crate::util::kdf;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Status {
    Pass,
    Fail,
}

impl Status {
    fn label(self) -> &'static str {
        match self {
            Status::Pass => "[PASS]",
            Status::Fail => "[FAIL]",
        }
    }
}

struct CheckEntry {
    name: &'static str,
    status: Status,
    detail: String,
}

/// Published PBKDF2 vectors: RFC 6070 for HMAC-SHA1 plus the standard
/// "password"/"salt" vectors for HMAC-SHA256 and HMAC-SHA512.
const KNOWN_ANSWERS: &[(Algorithm, u32, usize, &str)] = &[
    (Algorithm::Sha1, 1, 20, "0c60c80f961f0e71f3a9b524af6012062fe037a6"),
    (Algorithm::Sha1, 2, 20, "ea6c014dc72d6f8ccd1ed92ace1d41f0d8de8957"),
    (
        Algorithm::Sha1,
        4096,
        20,
        "4b007901b765489abead49d926f721d065a429c1",
    ),
    (
        Algorithm::Sha256,
        1,
        32,
        "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b",
    ),
    (
        Algorithm::Sha256,
        4096,
        32,
        "c5e478d59288c841aa530db6845c4c8d962893a001ce4e11a4963873aa98134a",
    ),
    (
        Algorithm::Sha512,
        1,
        64,
        "867f70cf1ade02cff3752599a3a53dc4af34c7a669815ae5d513554e1c8cf252c02d470a285a0501bad999bfe943c08f050235d7d68b1da55e63f73b60a57fce",
    ),
];

pub fn run_selftest(ui: &UX, timing: &Timing) -> Result<()> {
    ui.banner();
    ui.phase("Evaluator Self-Test // Known-Answer Vectors");

    let mut report: Vec<CheckEntry> = Vec::new();

    // ---------------------------------------------------------------------
    // Known-answer vectors
    // ---------------------------------------------------------------------
    for (alg, iterations, dklen, expected_hex) in KNOWN_ANSWERS {
        let name = match alg {
            Algorithm::Sha1 => "PBKDF2-HMAC-SHA1 vector",
            Algorithm::Sha256 => "PBKDF2-HMAC-SHA256 vector",
            Algorithm::Sha512 => "PBKDF2-HMAC-SHA512 vector",
        };
        match kdf::derive(*alg, b"password", b"salt", *iterations, *dklen) {
            Ok(dk) if hex::encode(&*dk) == *expected_hex => log_entry(
                &mut report,
                ui,
                timing,
                name,
                Status::Pass,
                format!("c={iterations} dklen={dklen} reproduced"),
            ),
            Ok(dk) => log_entry(
                &mut report,
                ui,
                timing,
                name,
                Status::Fail,
                format!(
                    "c={iterations} dklen={dklen}: got {}, want {}",
                    hex::encode(&*dk),
                    expected_hex
                ),
            ),
            Err(err) => log_entry(
                &mut report,
                ui,
                timing,
                name,
                Status::Fail,
                format!("evaluator rejected valid parameters: {err}"),
            ),
        }
    }

    // ---------------------------------------------------------------------
    // Determinism: identical inputs, identical output
    // ---------------------------------------------------------------------
    let first = kdf::derive(Algorithm::Sha512, b"probe", b"determinism", 50, 64);
    let second = kdf::derive(Algorithm::Sha512, b"probe", b"determinism", 50, 64);
    match (first, second) {
        (Ok(a), Ok(b)) if *a == *b => log_entry(
            &mut report,
            ui,
            timing,
            "Determinism",
            Status::Pass,
            "two sha512 derivations agree".to_string(),
        ),
        _ => log_entry(
            &mut report,
            ui,
            timing,
            "Determinism",
            Status::Fail,
            "repeated derivation diverged".to_string(),
        ),
    }

    // ---------------------------------------------------------------------
    // Output length across the full roster and both dklen candidates
    // ---------------------------------------------------------------------
    let mut bad_lengths = Vec::new();
    for alg in Algorithm::ALL {
        for dklen in [alg.digest_len(), FALLBACK_DKLEN] {
            match kdf::derive(alg, b"probe", b"length", 2, dklen) {
                Ok(dk) if dk.len() == dklen => {}
                _ => bad_lengths.push(format!("{alg}/{dklen}")),
            }
        }
    }
    if bad_lengths.is_empty() {
        log_entry(
            &mut report,
            ui,
            timing,
            "Output lengths",
            Status::Pass,
            "every PRF honors both dklen candidates".to_string(),
        );
    } else {
        log_entry(
            &mut report,
            ui,
            timing,
            "Output lengths",
            Status::Fail,
            format!("wrong length for: {}", bad_lengths.join(", ")),
        );
    }

    // ---------------------------------------------------------------------
    // Planted target: the sweep must find exactly the planted tuple
    // ---------------------------------------------------------------------
    match planted_sweep() {
        Ok(()) => log_entry(
            &mut report,
            ui,
            timing,
            "Planted-target sweep",
            Status::Pass,
            "sha1/1000/20 recovered exactly once".to_string(),
        ),
        Err(err) => log_entry(
            &mut report,
            ui,
            timing,
            "Planted-target sweep",
            Status::Fail,
            err.to_string(),
        ),
    }

    summarize(&report, ui, timing)
}

fn planted_sweep() -> Result<()> {
    let planted = Candidate {
        algorithm: Algorithm::Sha1,
        iterations: 1000,
        dklen: 20,
    };
    let dk = kdf::derive(
        planted.algorithm,
        b"selftest",
        &[0u8; 16],
        planted.iterations,
        planted.dklen,
    )?;
    let input = SweepInput {
        password: Zeroizing::new(b"selftest".to_vec()),
        salt: vec![0u8; 16],
        target_b64: encode_b64(&dk),
        space: ParamSpace::new(
            Algorithm::ALL.to_vec(),
            DEFAULT_LADDER.to_vec(),
            FALLBACK_DKLEN,
        )?,
    };
    let report = run_sweep(&input, |_| {})?;
    if report.matches == vec![planted] {
        Ok(())
    } else {
        Err(anyhow!(
            "expected exactly one match at {planted}, saw {} match(es)",
            report.matches.len()
        ))
    }
}

fn log_entry(
    report: &mut Vec<CheckEntry>,
    ui: &UX,
    timing: &Timing,
    name: &'static str,
    status: Status,
    detail: String,
) {
    match status {
        Status::Pass => ui.success(&format!("{} {name}: {detail}", status.label())),
        Status::Fail => ui.error(&format!("{} {name}: {detail}", status.label())),
    }
    timing.pace(match status {
        Status::Pass => Pace::Info,
        Status::Fail => Pace::Error,
    });
    report.push(CheckEntry {
        name,
        status,
        detail,
    });
}

fn summarize(report: &[CheckEntry], ui: &UX, timing: &Timing) -> Result<()> {
    let passes = report.iter().filter(|e| e.status == Status::Pass).count();
    let fails: Vec<_> = report
        .iter()
        .filter(|e| e.status == Status::Fail)
        .map(|e| format!("{}: {}", e.name, e.detail))
        .collect();

    ui.data_panel(
        "Self-Test Summary",
        &[
            ("Pass", passes.to_string()),
            ("Fail", fails.len().to_string()),
        ],
    );
    timing.pace(Pace::Info);

    audit_log(
        "SELFTEST",
        &format!("pass={} fail={}", passes, fails.len()),
    );

    if fails.is_empty() {
        ui.success("Evaluator verified. Sweep results can be trusted.");
        Ok(())
    } else {
        ui.warn(&format!("Failures: {}", fails.join(" | ")));
        Err(anyhow!("self-test uncovered {} failing check(s)", fails.len()))
    }
}
