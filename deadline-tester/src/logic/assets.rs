use anyhow::{Context, Result};
use deadline_game::{DataLoader, DayScript, RULES_CONFIG_NAME, Rules, RulesConfig};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

const SCRIPT_FILE: &str = "days.json";

/// Script and rule set shared by every simulated run.
#[derive(Debug, Clone)]
pub struct TesterAssets {
    pub script: DayScript,
    pub rules: Rules,
    /// Whether these are the assets compiled into the game crate.
    pub bundled: bool,
}

impl TesterAssets {
    #[must_use]
    pub fn load_default() -> Self {
        Self {
            script: DayScript::bundled().clone(),
            rules: Rules::standard().clone(),
            bundled: true,
        }
    }

    /// Load `days.json` and an optional `rules.json` from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        Self::from_loader(&DirLoader::new(dir))
            .with_context(|| format!("loading game data from {}", dir.display()))
    }

    fn from_loader<L: DataLoader>(loader: &L) -> Result<Self> {
        let script = loader.load_script().context("loading day script")?;
        let cfg: RulesConfig = loader
            .load_config(RULES_CONFIG_NAME)
            .context("loading rules config")?;
        let rules = Rules::new(cfg).context("validating rules config")?;
        Ok(Self {
            script,
            rules,
            bundled: false,
        })
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("reading {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {path}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads game data from JSON files in a directory.
#[derive(Debug, Clone)]
pub struct DirLoader {
    root: PathBuf,
}

impl DirLoader {
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    fn read(&self, file_name: &str) -> Result<Option<(String, String)>, AssetError> {
        let path = self.root.join(file_name);
        let label = path.display().to_string();
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some((label, text))),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(AssetError::Io {
                path: label,
                source,
            }),
        }
    }
}

impl DataLoader for DirLoader {
    type Error = AssetError;

    fn load_script(&self) -> Result<DayScript, Self::Error> {
        let Some((path, text)) = self.read(SCRIPT_FILE)? else {
            return Err(AssetError::Io {
                path: self.root.join(SCRIPT_FILE).display().to_string(),
                source: std::io::Error::from(ErrorKind::NotFound),
            });
        };
        DayScript::from_json(&text).map_err(|source| AssetError::Json { path, source })
    }

    fn load_config<T>(&self, config_name: &str) -> Result<T, Self::Error>
    where
        T: serde::de::DeserializeOwned,
    {
        let file_name = format!("{config_name}.json");
        // A missing config file means every field takes its default.
        let (path, text) = self
            .read(&file_name)?
            .unwrap_or_else(|| (file_name, "{}".to_string()));
        serde_json::from_str(&text).map_err(|source| AssetError::Json { path, source })
    }
}
