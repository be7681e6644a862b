// ============================================================================
// src/ui.rs – console output layer (status lines, panels, pacing)
// ============================================================================

use console::Style;
use std::thread;
use std::time::Duration;

pub const BANNER_BODY_WIDTH: usize = 58;

/// How long to let a message land before the next one. Pacing only ever
/// happens at phase boundaries, never per sweep attempt.
#[derive(Debug, Clone, Copy)]
pub enum Pace {
    Info,
    Prompt,
    Error,
}

#[derive(Debug, Clone, Copy)]
pub struct Timing {
    fast: bool,
}

impl Timing {
    pub fn new(fast: bool) -> Self {
        Self { fast }
    }

    pub fn pace(&self, pace: Pace) {
        if self.fast {
            return;
        }
        let ms = match pace {
            Pace::Info => 120,
            Pace::Prompt => 350,
            Pace::Error => 600,
        };
        thread::sleep(Duration::from_millis(ms));
    }
}

/// Unified console voice for the tool. `quiet` drops the banner and
/// flourish; `silent` (JSON mode) drops everything.
pub struct UX {
    pub quiet: bool,
    silent: bool,
}

impl UX {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            silent: false,
        }
    }

    /// A UX that writes nothing; used when stdout carries a JSON report.
    pub fn silenced() -> Self {
        Self {
            quiet: true,
            silent: true,
        }
    }

    fn frame_style() -> Style {
        Style::new().color256(39).bold()
    }

    fn title_style() -> Style {
        Style::new().color256(45).bold()
    }

    pub fn banner(&self) {
        if self.quiet || self.silent {
            return;
        }
        let frame = Self::frame_style();
        let span = "═".repeat(BANNER_BODY_WIDTH + 2);
        let title = format!("{:^width$}", "HASHPROBE", width = BANNER_BODY_WIDTH + 2);
        let sub = format!(
            "{:^width$}",
            "PBKDF2 parameter recovery",
            width = BANNER_BODY_WIDTH + 2
        );
        println!("{}", frame.apply_to(format!("╔{span}╗")));
        println!("{}", Self::title_style().apply_to(format!("║{title}║")));
        println!("{}", frame.apply_to(format!("║{sub}║")));
        println!("{}", frame.apply_to(format!("╚{span}╝")));
        println!();
    }

    pub fn phase(&self, msg: &str) {
        if self.silent {
            return;
        }
        println!("{}", Self::title_style().apply_to(format!("▌ {msg}")));
    }

    pub fn info(&self, msg: &str) {
        if self.silent {
            return;
        }
        println!("▸ {msg}");
    }

    pub fn note(&self, msg: &str) {
        if self.silent {
            return;
        }
        println!("{}", Style::new().dim().apply_to(format!("  {msg}")));
    }

    pub fn warn(&self, msg: &str) {
        if self.silent {
            return;
        }
        println!("{}", Style::new().color256(214).apply_to(format!("! {msg}")));
    }

    pub fn error(&self, msg: &str) {
        if self.silent {
            return;
        }
        println!("{}", Style::new().color256(196).bold().apply_to(format!("✗ {msg}")));
    }

    pub fn success(&self, msg: &str) {
        if self.silent {
            return;
        }
        println!("{}", Style::new().color256(41).bold().apply_to(format!("✓ {msg}")));
    }

    /// Aligned key/value block for headers and summaries.
    pub fn data_panel(&self, title: &str, rows: &[(&str, String)]) {
        if self.silent {
            return;
        }
        let key_width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        println!("{}", Self::title_style().apply_to(format!("┌ {title}")));
        for (key, value) in rows {
            println!(
                "{} {:<key_width$}  {}",
                Self::frame_style().apply_to("│"),
                key,
                value
            );
        }
        println!("{}", Self::frame_style().apply_to("└"));
    }

    pub fn gap(&self) {
        if self.silent {
            return;
        }
        println!();
    }
}
