//! Terminal output formatting utilities.

use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;
use gitpane_core::{BranchLabel, FileRow};
use gitpane_git::StatusFlag;

static QUIET_MODE: AtomicBool = AtomicBool::new(false);

/// Set quiet mode globally. Call once at startup.
pub fn set_quiet(quiet: bool) {
    QUIET_MODE.store(quiet, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET_MODE.load(Ordering::Relaxed)
}

/// Print a success message (suppressed in quiet mode).
pub fn success(msg: &str) {
    if !is_quiet() {
        println!("{} {}", "✓".green(), msg);
    }
}

/// Print an error message (always prints to stderr).
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a warning message (always prints to stderr).
pub fn warn(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print an info message (suppressed in quiet mode).
pub fn info(msg: &str) {
    if !is_quiet() {
        println!("{} {}", "→".blue(), msg);
    }
}

/// Print a detail line without prefix (suppressed in quiet mode).
///
/// Use for indented detail lines that accompany info or warn messages.
pub fn detail(msg: &str) {
    if !is_quiet() {
        println!("{msg}");
    }
}

/// Print essential machine-readable output (always prints).
pub fn essential(msg: &str) {
    println!("{msg}");
}

/// Colored text of the branch indicator.
#[must_use]
pub fn branch_label(label: &BranchLabel) -> String {
    let text = label.to_string();
    match label {
        BranchLabel::Branch(_) => text.cyan().bold().to_string(),
        BranchLabel::NotGitRoot | BranchLabel::NotGitRepo => text.yellow().to_string(),
        BranchLabel::Checking | BranchLabel::Cleared => text.dimmed().to_string(),
    }
}

/// Colored label for one status flag.
#[must_use]
pub fn status_flag(flag: StatusFlag) -> String {
    let text = flag.label();
    match flag {
        StatusFlag::New | StatusFlag::Untracked => text.green().to_string(),
        StatusFlag::Modified | StatusFlag::Renamed | StatusFlag::Copied => {
            text.yellow().to_string()
        }
        StatusFlag::Deleted | StatusFlag::Unmerged => text.red().to_string(),
        StatusFlag::Staged => text.blue().to_string(),
    }
}

/// Checkbox marker.
#[must_use]
pub fn checkbox(checked: bool) -> String {
    if checked {
        "[x]".green().to_string()
    } else {
        "[ ]".dimmed().to_string()
    }
}

/// One line of the file table. `number` is what `check <n>` takes.
#[must_use]
pub fn file_row(number: usize, row: &FileRow) -> String {
    let flags: Vec<String> = row
        .change
        .status_flags
        .iter()
        .map(|flag| status_flag(*flag))
        .collect();
    format!(
        "{} {:>3}  {}  {}",
        checkbox(row.checked),
        number,
        row.change.filename,
        flags.join(" ")
    )
}

/// Print a horizontal line (suppressed in quiet mode).
pub fn hr() {
    if !is_quiet() {
        println!("{}", "─".repeat(50).dimmed());
    }
}
