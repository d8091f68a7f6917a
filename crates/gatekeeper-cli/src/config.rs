use gatekeeper_core::DEFAULT_MATCH_THRESHOLD;
use gatekeeper_io::GalleryPaths;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Runtime configuration: optional TOML file, then `GATEKEEPER_*`
/// environment variables on top.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Gallery of people who may pass.
    pub allowed_dir: PathBuf,
    /// Gallery of people who may not.
    pub denied_dir: PathBuf,
    /// Archive of strangers (face crops and embedding sidecars).
    pub strangers_dir: PathBuf,
    /// Euclidean distance below which two embeddings are the same face.
    pub match_threshold: f32,
    /// Reload strangers archived by earlier sessions at startup.
    pub resume_strangers: bool,
    /// Bounded depth of the engine request queue.
    pub queue_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            allowed_dir: PathBuf::from("./allowed"),
            denied_dir: PathBuf::from("./denied"),
            strangers_dir: PathBuf::from("./strangers"),
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            resume_strangers: false,
            queue_depth: 4,
        }
    }
}

/// Config file shape; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    allowed_dir: Option<PathBuf>,
    denied_dir: Option<PathBuf>,
    strangers_dir: Option<PathBuf>,
    match_threshold: Option<f32>,
    resume_strangers: Option<bool>,
    queue_depth: Option<usize>,
}

impl Config {
    /// Load configuration from an optional TOML file and the process
    /// environment.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_env(|key| std::env::var(key).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(raw)?;
        let defaults = Self::default();
        Ok(Self {
            allowed_dir: file.allowed_dir.unwrap_or(defaults.allowed_dir),
            denied_dir: file.denied_dir.unwrap_or(defaults.denied_dir),
            strangers_dir: file.strangers_dir.unwrap_or(defaults.strangers_dir),
            match_threshold: file.match_threshold.unwrap_or(defaults.match_threshold),
            resume_strangers: file.resume_strangers.unwrap_or(defaults.resume_strangers),
            queue_depth: file.queue_depth.unwrap_or(defaults.queue_depth),
        })
    }

    /// Override fields from `GATEKEEPER_*` variables. Unparseable values
    /// are ignored.
    fn with_env(self, var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            allowed_dir: var("GATEKEEPER_ALLOWED_DIR")
                .map(PathBuf::from)
                .unwrap_or(self.allowed_dir),
            denied_dir: var("GATEKEEPER_DENIED_DIR")
                .map(PathBuf::from)
                .unwrap_or(self.denied_dir),
            strangers_dir: var("GATEKEEPER_STRANGERS_DIR")
                .map(PathBuf::from)
                .unwrap_or(self.strangers_dir),
            match_threshold: parsed(&var, "GATEKEEPER_MATCH_THRESHOLD")
                .unwrap_or(self.match_threshold),
            resume_strangers: var("GATEKEEPER_RESUME_STRANGERS")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(self.resume_strangers),
            queue_depth: parsed(&var, "GATEKEEPER_QUEUE_DEPTH")
                .filter(|&n: &usize| n > 0)
                .unwrap_or(self.queue_depth),
        }
    }

    pub fn gallery_paths(&self) -> GalleryPaths {
        GalleryPaths {
            allowed: self.allowed_dir.clone(),
            denied: self.denied_dir.clone(),
            strangers: self.strangers_dir.clone(),
        }
    }
}

fn parsed<T: std::str::FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    var(key).and_then(|v| v.trim().parse().ok())
}
