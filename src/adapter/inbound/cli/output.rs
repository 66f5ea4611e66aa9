//! Terminal output for CLI handlers.
//!
//! Each helper prints one human line to stdout, or under `--json` one
//! `{"type": .., "payload": ..}` object per line. Logs go to stderr.

use std::fmt::Display;
use std::sync::OnceLock;

use owo_colors::{OwoColorize, Stream, Style};
use parking_lot::RwLock;
use serde_json::{json, Value};

use super::command::ColorChoice;

/// Global flags that shape how handlers print.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputMode {
    pub json: bool,
    /// Drop informational lines; warnings and results still print.
    pub quiet: bool,
    /// Number of `-v` flags.
    pub verbose: u8,
}

impl OutputMode {
    /// Whether a line of the given kind reaches a human reader.
    const fn shows(self, kind: Kind) -> bool {
        match kind {
            Kind::Info => !self.quiet,
            Kind::Notice => true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Info,
    Notice,
}

/// Color role for inline values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Gain,
    Accent,
    Faint,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Self::Gain => Style::new().green(),
            Self::Accent => Style::new().cyan(),
            Self::Faint => Style::new().dimmed(),
        }
    }
}

static MODE: OnceLock<RwLock<OutputMode>> = OnceLock::new();

fn cell() -> &'static RwLock<OutputMode> {
    MODE.get_or_init(|| RwLock::new(OutputMode::default()))
}

/// Install the global mode and color override. Call once, before any output.
pub fn configure(mode: OutputMode, color: &ColorChoice) {
    *cell().write() = mode;
    match color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => owo_colors::unset_override(),
    }
}

#[must_use]
pub fn mode() -> OutputMode {
    *cell().read()
}

fn style(value: impl Display, style: Style) -> String {
    value
        .to_string()
        .if_supports_color(Stream::Stdout, |text| text.style(style))
        .to_string()
}

/// Color `value` for terminal output; JSON mode gets it unstyled.
pub fn paint(value: impl Display, tone: Tone) -> String {
    if mode().json {
        value.to_string()
    } else {
        style(value, tone.style())
    }
}

fn emit(kind: Kind, tag: &str, payload: Value, human: impl FnOnce()) {
    let mode = mode();
    if mode.json {
        println!("{}", json!({ "type": tag, "payload": payload }));
    } else if mode.shows(kind) {
        human();
    }
}

/// Print a whole JSON document for commands with structured results.
pub fn json_output(value: Value) {
    println!("{value}");
}

pub fn header(version: &str) {
    emit(Kind::Info, "header", json!({ "app": "surebet", "version": version }), || {
        println!("{} {}\n", style("surebet", Style::new().bold()), style(version, Tone::Faint.style()));
    });
}

pub fn field(label: &str, value: impl Display) {
    let value = value.to_string();
    emit(Kind::Info, "field", json!({ "label": label, "value": value }), || {
        println!("  {:<14} {value}", style(label, Tone::Faint.style()));
    });
}

pub fn section(title: &str) {
    emit(Kind::Info, "section", json!({ "title": title }), || {
        println!("\n{}", style(title, Style::new().bold()));
    });
}

pub fn note(message: &str) {
    emit(Kind::Info, "note", json!({ "message": message }), || {
        println!("  {}", style(message, Tone::Faint.style()));
    });
}

pub fn hint(message: &str) {
    emit(Kind::Info, "hint", json!({ "message": message }), || {
        println!("  {}: {}", style("hint", Style::new().cyan().dimmed()), style(message, Tone::Faint.style()));
    });
}

pub fn success(message: &str) {
    emit(Kind::Info, "success", json!({ "message": message }), || {
        println!("  {} {message}", style("✓", Tone::Gain.style()));
    });
}

/// Warnings survive `--quiet`.
pub fn warning(message: &str) {
    emit(Kind::Notice, "warning", json!({ "message": message }), || {
        println!("  {} {message}", style("⚠", Style::new().yellow()));
    });
}

/// Preformatted block such as a rendered table, indented line by line.
pub fn lines(content: &str) {
    emit(Kind::Info, "lines", json!({ "content": content }), || {
        for line in content.lines() {
            println!("  {line}");
        }
    });
}

/// Fatal errors go to stderr in both modes.
pub fn error(message: &str) {
    if mode().json {
        eprintln!("{}", json!({ "type": "error", "payload": { "message": message } }));
    } else {
        let mark = "×".if_supports_color(Stream::Stderr, |text| text.red());
        eprintln!("  {mark} {message}");
    }
}
