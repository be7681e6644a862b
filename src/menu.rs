// ============================================================================
// src/menu.rs – Interactive console menu (discoverability & flow control)
// ============================================================================

use console::Style;
use std::io::{self, Write};

use crate::ui::{Pace, Timing, BANNER_BODY_WIDTH, UX};

#[derive(Debug, Clone)]
pub enum MenuChoice {
    Probe,
    SelfTest,
    Quit,
}

/// Display the interactive menu (unless quiet mode is enabled).
/// Returns a `MenuChoice` or None if the menu cannot run.
pub fn show_main_menu(ui: &UX, timing: &Timing) -> Option<MenuChoice> {
    if ui.quiet {
        return None;
    }

    ui.banner();

    let entries = [
        (
            MenuChoice::Probe,
            "RUN PROBE — sweep parameters against the target",
            "Loading target material and walking the ladder.",
        ),
        (
            MenuChoice::SelfTest,
            "SELF-TEST — verify evaluator against known vectors",
            "Replaying published PBKDF2 vectors through the evaluator.",
        ),
        (
            MenuChoice::Quit,
            "QUIT — leave the console",
            "Nothing written, nothing retained.",
        ),
    ];

    let frame_style = Style::new().color256(39).bold();
    let row_style = Style::new().color256(45);
    let span = "═".repeat(BANNER_BODY_WIDTH + 2);
    let header = format!(
        "{:^width$}",
        "SELECT NEXT ACTION",
        width = BANNER_BODY_WIDTH + 2
    );

    println!("{}", frame_style.apply_to(format!("╔{span}╗")));
    println!("{}", frame_style.apply_to(format!("║{header}║")));
    println!("{}", frame_style.apply_to(format!("╠{span}╣")));
    for (idx, (_choice, text, _ack)) in entries.iter().enumerate() {
        let label = format!("{:>2}. {}", idx + 1, text);
        let body = format!("{:<width$}", label, width = BANNER_BODY_WIDTH);
        println!(
            "{} {} {}",
            frame_style.apply_to("║"),
            row_style.apply_to(body),
            frame_style.apply_to("║")
        );
    }
    println!("{}", frame_style.apply_to(format!("╚{span}╝")));
    println!();

    let mut selection: Option<MenuChoice> = None;
    let mut selected_idx: Option<usize> = None;
    while selection.is_none() {
        print!(
            "{}",
            Style::new()
                .color256(45)
                .bold()
                .apply_to("Action [1-3 or Q to quit]: ")
        );
        let _ = io::stdout().flush();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            ui.warn("Input unreadable — try again.");
            continue;
        }
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("q") {
            selection = Some(MenuChoice::Quit);
            break;
        }
        match trimmed.parse::<usize>() {
            Ok(n) if (1..=entries.len()).contains(&n) => {
                selection = Some(entries[n - 1].0.clone());
                selected_idx = Some(n - 1);
            }
            _ => {
                ui.warn("Invalid choice — pick a menu number or 'Q'.");
            }
        }
    }

    if let Some(idx) = selected_idx {
        ui.note(entries[idx].2);
    }
    timing.pace(Pace::Prompt);
    selection
}
