//! Shared CLI output helpers.
//!
//! Color scheme (respects NO_COLOR):
//! - Green: success, in-sync files
//! - Red: errors, missing files
//! - Yellow: warnings, modified files
//! - Cyan: paths, commands, hints
//! - Bold: headers
//! - Dimmed: secondary info

use std::fmt::Display;

use console::{style, StyledObject};

const RULE_WIDTH: usize = 56;

fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

fn paint<D>(styled: StyledObject<D>) -> StyledObject<D> {
    styled.force_styling(colors_enabled() && console::colors_enabled())
}

/// Print a success message with checkmark.
///
/// Example: `✓ initialized .gitprivate`
pub fn success(msg: &str) {
    println!("{} {}", paint(style("✓").green()), msg);
}

/// Print an error message to stderr.
pub fn error(msg: &str) {
    eprintln!("{} {}", paint(style("✗").red()), msg);
}

/// Print a secondary error line to stderr.
pub fn cause(msg: &str) {
    eprintln!("  {} {}", paint(style("caused by:").dim()), msg);
}

/// Print a warning to stderr.
pub fn warn(msg: &str) {
    eprintln!("{} {}", paint(style("⚠").yellow()), msg);
}

/// Print a hint to stderr.
///
/// Example: `→ run git-private init`
pub fn hint(msg: &str) {
    eprintln!("{} {}", paint(style("→").cyan()), paint(style(msg).cyan()));
}

/// Print a bold header.
pub fn header(title: &str) {
    println!("{}", paint(style(title).bold()));
}

/// Print a label and value.
pub fn kv(label: &str, value: impl Display) {
    println!("  {}  {}", paint(style(label).dim()), value);
}

/// Print a horizontal rule.
pub fn rule() {
    println!("{}", paint(style("─".repeat(RULE_WIDTH)).dim()));
}

pub fn blank() {
    println!();
}

/// Print raw machine-readable data.
pub fn data(text: &str) {
    println!("{}", text);
}

/// Print a dimmed line.
pub fn dimmed(msg: &str) {
    println!("{}", paint(style(msg).dim()));
}

/// Path in cyan, for inline use.
pub fn path(p: &str) -> String {
    paint(style(p).cyan()).to_string()
}

/// Command in green, for inline use.
pub fn cmd(c: &str) -> String {
    paint(style(c).green()).to_string()
}

/// Green text, for inline use.
pub fn green(s: &str) -> String {
    paint(style(s).green()).to_string()
}

/// Yellow text, for inline use.
pub fn yellow(s: &str) -> String {
    paint(style(s).yellow()).to_string()
}

/// Bold red text, for inline use.
pub fn red(s: &str) -> String {
    paint(style(s).red().bold()).to_string()
}

/// Dimmed text, for inline use.
pub fn dim(s: &str) -> String {
    paint(style(s).dim()).to_string()
}

/// `1 file`, `2 files`.
pub fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}
