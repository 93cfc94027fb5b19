//! Terminal output for the `airgap` CLI.
//!
//! Text goes to stdout with colored markers. Under `--json` each call
//! prints one `{"type": ..., "payload": ...}` line instead. `--quiet`
//! silences everything except errors and explicit JSON documents.

use std::fmt::Display;
use std::sync::OnceLock;

use owo_colors::OwoColorize;
use parking_lot::RwLock;
use serde_json::{json, Value};

use crate::domain::Mode;

/// Flags shared by every command handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
    /// Number of `-v` flags.
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }
}

static SETTINGS: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn settings() -> OutputConfig {
    *SETTINGS
        .get_or_init(|| RwLock::new(OutputConfig::default()))
        .read()
}

/// Print either `payload` tagged with `kind` or the rendered text line.
fn emit(kind: &str, payload: Value, text: impl FnOnce() -> String) {
    let current = settings();
    if current.json {
        println!("{}", json!({ "type": kind, "payload": payload }));
    } else if !current.quiet {
        println!("{}", text());
    }
}

pub fn configure(config: OutputConfig) {
    let cell = SETTINGS.get_or_init(|| RwLock::new(OutputConfig::default()));
    *cell.write() = config;
}

#[must_use]
pub fn is_json() -> bool {
    settings().json
}

#[must_use]
pub fn is_quiet() -> bool {
    settings().quiet
}

#[must_use]
pub fn verbosity() -> u8 {
    settings().verbose
}

pub fn header(version: &str) {
    emit(
        "header",
        json!({ "app": "airgap", "version": version }),
        || format!("{} {}\n", "airgap".bold(), version.dimmed()),
    );
}

/// Aligned `label value` line.
pub fn field(label: &str, value: impl Display) {
    let value = value.to_string();
    emit(
        "field",
        json!({ "label": label, "value": value }),
        || format!("  {:<12} {}", label.dimmed(), value),
    );
}

/// Like [`field`], with real shown in red and demo in green.
pub fn mode(label: &str, mode: Mode) {
    emit("mode", json!({ "label": label, "mode": mode }), || {
        let rendered = match mode {
            Mode::Real => mode.as_str().red().bold().to_string(),
            Mode::Demo => mode.as_str().green().bold().to_string(),
        };
        format!("  {:<12} {}", label.dimmed(), rendered)
    });
}

pub fn success(message: &str) {
    emit("success", json!({ "message": message }), || {
        format!("  {} {}", "✓".green(), message)
    });
}

pub fn section(title: &str) {
    emit("section", json!({ "title": title }), || {
        format!("\n{}", title.bold())
    });
}

pub fn item(value: impl Display) {
    let value = value.to_string();
    emit("item", json!({ "value": value }), || {
        format!("  {} {}", "•".dimmed(), value)
    });
}

pub fn hint(message: &str) {
    emit("hint", json!({ "message": message }), || {
        format!("  {}: {}", "hint".cyan().dimmed(), message.dimmed())
    });
}

/// `✓ Migrated demo store`
pub fn action_done(verb: &str, target: &str) {
    emit(
        "action",
        json!({ "verb": verb, "target": target, "status": "done" }),
        || format!("  {} {} {}", "✓".green(), verb.bold().green(), target),
    );
}

/// Errors always print, to stderr, regardless of `--quiet`.
pub fn error(message: &str) {
    if settings().json {
        eprintln!("{}", json!({ "type": "error", "payload": { "message": message } }));
    } else {
        eprintln!("  {} {}", "×".red(), message);
    }
}

/// Print a complete JSON document as-is.
pub fn json_output(value: Value) {
    println!("{value}");
}
