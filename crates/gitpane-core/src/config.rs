//! Configuration management for gitpane.

use std::fs;
use std::path::{Path, PathBuf};

use gitpane_git::GitCommands;
use serde::Deserialize;

use crate::error::Result;

/// gitpane configuration loaded from `.gitpane.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Git executable settings.
    #[serde(default)]
    pub git: GitConfig,

    /// Shell integration settings.
    #[serde(default)]
    pub bash: BashConfig,

    /// Panel settings.
    #[serde(default)]
    pub panel: PanelConfig,
}

impl Config {
    /// File name looked up in the project root.
    pub const FILE_NAME: &'static str = ".gitpane.toml";

    /// Load config from a TOML file.
    ///
    /// # Errors
    /// Returns error if file can't be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Command builders for the configured executables.
    #[must_use]
    pub fn commands(&self) -> GitCommands {
        GitCommands::new(&self.git.binary)
            .with_bash(&self.bash.binary)
            .with_terminal(&self.bash.terminal, self.bash.terminal_args.clone())
    }
}

/// Git executable settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GitConfig {
    /// Path or name of the git executable.
    #[serde(default = "default_git")]
    pub binary: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            binary: default_git(),
        }
    }
}

fn default_git() -> String {
    "git".into()
}

/// Shell integration settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BashConfig {
    /// Shell checked to decide whether to offer "open bash".
    #[serde(default = "default_bash")]
    pub binary: String,

    /// Program launched in the project root to open a shell.
    #[serde(default = "default_terminal")]
    pub terminal: String,

    /// Extra arguments for the terminal program.
    #[serde(default)]
    pub terminal_args: Vec<String>,
}

impl Default for BashConfig {
    fn default() -> Self {
        Self {
            binary: default_bash(),
            terminal: default_terminal(),
            terminal_args: Vec::new(),
        }
    }
}

fn default_bash() -> String {
    "bash".into()
}

fn default_terminal() -> String {
    "x-terminal-emulator".into()
}

/// Panel settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PanelConfig {
    /// Namespace for persisted preferences of this instance.
    #[serde(default = "default_instance")]
    pub instance: String,

    /// Where preferences are stored. Defaults to the user config dir.
    #[serde(default)]
    pub preferences_file: Option<PathBuf>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            instance: default_instance(),
            preferences_file: None,
        }
    }
}

fn default_instance() -> String {
    "gitpane".into()
}
