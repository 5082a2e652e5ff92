//! `gitpane session` - drive the panel from editor events on stdin.
//!
//! Each line is one event or gesture. The router handles them as they
//! arrive; git work runs in the background while more lines are read.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use gitpane_core::{
    EditorEvent, EventRouter, Input, MemoryPreferences, PreferenceStore, UserGesture,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::utils::{self, Workspace};
use crate::output;
use crate::terminal::TerminalSurface;

const HELP: &[(&str, &str)] = &[
    ("open <path>", "switch to another project"),
    ("refresh", "refresh branch and status"),
    ("close-project", "the project is about to close"),
    ("files-changed", "files changed on disk"),
    ("saved", "a document was saved"),
    ("toggle", "show or hide the panel"),
    ("close", "hide the panel"),
    ("check <n>", "check or uncheck file n"),
    ("check-all", "check every file"),
    ("uncheck-all", "uncheck every file"),
    ("commit [message]", "commit the checked files"),
    ("reset", "unstage everything"),
    ("bash", "open a shell in the project root"),
    ("quit", "end the session"),
];

/// One parsed line of session input.
#[derive(Debug, PartialEq, Eq)]
enum Line {
    Input(Input),
    PromptCommit,
    Help,
    Quit,
    Empty,
}

fn parse_line(line: &str) -> Result<Line> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    let input: Input = match word {
        "" => return Ok(Line::Empty),
        "help" => return Ok(Line::Help),
        "quit" | "exit" => return Ok(Line::Quit),
        "open" => {
            if rest.is_empty() {
                bail!("`open` needs a path");
            }
            EditorEvent::ProjectOpen(PathBuf::from(rest)).into()
        }
        "refresh" => EditorEvent::ProjectRefresh.into(),
        "close-project" => EditorEvent::BeforeProjectClose.into(),
        "files-changed" => EditorEvent::ProjectFilesChange.into(),
        "saved" => EditorEvent::DocumentSaved.into(),
        "toggle" => UserGesture::TogglePanel.into(),
        "close" => UserGesture::ClosePanel.into(),
        "check" => {
            let number: usize = rest
                .parse()
                .with_context(|| format!("`check` needs a file number, got '{rest}'"))?;
            if number == 0 {
                bail!("File numbers start at 1");
            }
            UserGesture::ToggleRow(number - 1).into()
        }
        "check-all" => UserGesture::SelectAll(true).into(),
        "uncheck-all" => UserGesture::SelectAll(false).into(),
        "commit" if rest.is_empty() => return Ok(Line::PromptCommit),
        "commit" => UserGesture::Commit(rest.to_string()).into(),
        "reset" => UserGesture::Reset.into(),
        "bash" => UserGesture::OpenBash.into(),
        other => bail!("Unknown command '{other}' (type `help`)"),
    };
    Ok(Line::Input(input))
}

/// Resolve an `open` path the same way `--root` is resolved, so it compares
/// equal to what git reports as the repository root.
fn resolve_open(input: Input) -> Result<Input> {
    match input {
        Input::Editor(EditorEvent::ProjectOpen(path)) => {
            let root = path
                .canonicalize()
                .with_context(|| format!("Cannot access project root {}", path.display()))?;
            Ok(EditorEvent::ProjectOpen(root).into())
        }
        other => Ok(other),
    }
}

/// Ask for a commit message. `None` when cancelled or not interactive.
async fn prompt_message() -> Result<Option<String>> {
    if !console::user_attended() {
        output::warn("`commit` needs a message when not running in a terminal");
        return Ok(None);
    }

    let answer = tokio::task::spawn_blocking(|| {
        inquire::Text::new("Commit message:").prompt_skippable()
    })
    .await
    .context("Prompt task failed")?
    .context("Prompt failed")?;

    Ok(answer.filter(|message| !message.trim().is_empty()))
}

fn print_help() {
    for (usage, what) in HELP {
        output::detail(&format!("  {usage:<18} {what}"));
    }
}

/// Read stdin until EOF or `quit`, forwarding inputs to the router.
async fn read_inputs(events: mpsc::UnboundedSender<Input>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let input = match parse_line(&line) {
            Ok(Line::Input(input)) => match resolve_open(input) {
                Ok(input) => input,
                Err(e) => {
                    output::warn(&format!("{e:#}"));
                    continue;
                }
            },
            Ok(Line::PromptCommit) => match prompt_message().await? {
                Some(message) => UserGesture::Commit(message).into(),
                None => {
                    output::info("Commit cancelled");
                    continue;
                }
            },
            Ok(Line::Help) => {
                print_help();
                continue;
            }
            Ok(Line::Empty) => continue,
            Ok(Line::Quit) => break,
            Err(e) => {
                output::warn(&e.to_string());
                continue;
            }
        };

        if events.send(input).is_err() {
            break;
        }
    }
    Ok(())
}

/// Run the session command.
pub async fn run(workspace: &Workspace, no_persist: bool) -> Result<()> {
    let surface = Arc::new(TerminalSurface::new());
    let prefs: Arc<dyn PreferenceStore> = if no_persist {
        Arc::new(MemoryPreferences::new())
    } else {
        utils::open_preferences(&workspace.config)?
    };
    let refresher = Arc::new(utils::build_refresher(workspace, &surface, prefs));

    let (tx, rx) = mpsc::unbounded_channel();
    let mut router = EventRouter::new(refresher, rx);
    router
        .initialize()
        .await
        .context("Cannot start a session without git")?;

    let ((), read) = tokio::join!(router.run(), read_inputs(tx));
    read
}
