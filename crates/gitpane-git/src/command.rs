//! Command lines and the git command vocabulary.

use std::fmt;
use std::path::{Path, PathBuf};

/// A single external command: program, arguments and an optional
/// working directory that overrides the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
}

impl CommandLine {
    /// Create a command line with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run in `dir` instead of the project root.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

/// Quote a word for display the way a POSIX shell would accept it.
fn quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:@+,".contains(c));
    if plain {
        return word.to_string();
    }

    let mut out = String::with_capacity(word.len() + 2);
    out.push('"');
    for c in word.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Builds the command lines for every operation the git client offers.
#[derive(Debug, Clone)]
pub struct GitCommands {
    git: String,
    bash: String,
    terminal: String,
    terminal_args: Vec<String>,
}

impl Default for GitCommands {
    fn default() -> Self {
        Self {
            git: "git".into(),
            bash: "bash".into(),
            terminal: "x-terminal-emulator".into(),
            terminal_args: Vec::new(),
        }
    }
}

impl GitCommands {
    /// Create a builder using the given git binary.
    pub fn new(git: impl Into<String>) -> Self {
        Self {
            git: git.into(),
            ..Self::default()
        }
    }

    /// Use `bash` for the bash check.
    #[must_use]
    pub fn with_bash(mut self, bash: impl Into<String>) -> Self {
        self.bash = bash.into();
        self
    }

    /// Use `terminal` (with `args`) to open a shell at a path.
    #[must_use]
    pub fn with_terminal(mut self, terminal: impl Into<String>, args: Vec<String>) -> Self {
        self.terminal = terminal.into();
        self.terminal_args = args;
        self
    }

    fn git(&self) -> CommandLine {
        CommandLine::new(&self.git)
    }

    #[must_use]
    pub fn version(&self) -> CommandLine {
        self.git().arg("--version")
    }

    #[must_use]
    pub fn repository_root(&self) -> CommandLine {
        self.git().args(["rev-parse", "--show-toplevel"])
    }

    #[must_use]
    pub fn branch_name(&self) -> CommandLine {
        self.git().args(["rev-parse", "--abbrev-ref", "HEAD"])
    }

    #[must_use]
    pub fn status(&self) -> CommandLine {
        self.git().args(["status", "-u", "--porcelain"])
    }

    /// Stage `file`. With `update_index` only tracked paths are touched,
    /// which is how a deletion gets staged for a path no longer on disk.
    #[must_use]
    pub fn add(&self, file: &str, update_index: bool) -> CommandLine {
        let cmd = self.git().arg("add");
        let cmd = if update_index { cmd.arg("-u") } else { cmd };
        cmd.args(["--", file])
    }

    #[must_use]
    pub fn commit(&self, message: &str) -> CommandLine {
        self.git().args(["commit", "-m", message])
    }

    #[must_use]
    pub fn reset(&self) -> CommandLine {
        self.git().arg("reset")
    }

    #[must_use]
    pub fn bash_version(&self) -> CommandLine {
        CommandLine::new(&self.bash).arg("--version")
    }

    #[must_use]
    pub fn bash_open(&self, path: &Path) -> CommandLine {
        CommandLine::new(&self.terminal)
            .args(self.terminal_args.iter().cloned())
            .current_dir(path)
    }
}

/// Extract the version number from `git --version` output.
#[must_use]
pub fn parse_version(output: &str) -> String {
    let trimmed = output.trim();
    trimmed
        .strip_prefix("git version ")
        .unwrap_or(trimmed)
        .to_string()
}
