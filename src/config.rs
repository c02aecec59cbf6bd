use std::io;
use std::path::Path;

/// When the post-move settle step (spawn + merge-flag reset) runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlePolicy {
    /// `apply_move` settles before returning.
    #[default]
    Immediate,
    /// The caller settles later with `GameSession::settle`, e.g. once a
    /// renderer has finished animating the move.
    Deferred,
}

#[derive(Clone, Debug, PartialEq, Default, serde::Deserialize)]
pub struct Settle {
    #[serde(default)]
    pub policy: SettlePolicy,
    /// How long a front end waits before settling a deferred move.
    #[serde(default)]
    pub delay_ms: u64,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct SessionConfig {
    #[serde(default = "defaults::rows")]
    pub rows: usize,
    #[serde(default = "defaults::cols")]
    pub cols: usize,
    /// Tiles placed by `GameSession::start`.
    #[serde(default = "defaults::initial_tiles")]
    pub initial_tiles: usize,
    /// Fixed RNG seed; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub settle: Settle,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("toml parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rows: defaults::rows(),
            cols: defaults::cols(),
            initial_tiles: defaults::initial_tiles(),
            seed: None,
            settle: Settle::default(),
        }
    }
}

impl SessionConfig {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check dimensions and the starting tile count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must be at least 1x1, got {}x{}",
                self.rows, self.cols
            )));
        }
        let cells = self.rows * self.cols;
        if self.initial_tiles == 0 || self.initial_tiles > cells {
            return Err(ConfigError::Invalid(format!(
                "initial_tiles must be in 1..={cells}, got {}",
                self.initial_tiles
            )));
        }
        Ok(())
    }
}

mod defaults {
    pub fn rows() -> usize { 4 }
    pub fn cols() -> usize { 4 }
    pub fn initial_tiles() -> usize { 2 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg = SessionConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, SessionConfig::default());
        assert_eq!((cfg.rows, cfg.cols, cfg.initial_tiles), (4, 4, 2));
        assert_eq!(cfg.settle.policy, SettlePolicy::Immediate);
    }

    #[test]
    fn parses_full_file() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(
            tmp,
            r#"
rows = 5
cols = 6
initial_tiles = 3
seed = 42

[settle]
policy = "deferred"
delay_ms = 150
"#
        )
        .unwrap();
        let cfg = SessionConfig::from_toml(tmp.path()).unwrap();
        assert_eq!(cfg.rows, 5);
        assert_eq!(cfg.cols, 6);
        assert_eq!(cfg.initial_tiles, 3);
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.settle, Settle { policy: SettlePolicy::Deferred, delay_ms: 150 });
    }

    #[test]
    fn rejects_zero_dimension() {
        let err = SessionConfig::from_toml_str("rows = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
    }

    #[test]
    fn rejects_too_many_initial_tiles() {
        let err = SessionConfig::from_toml_str("rows = 2\ncols = 2\ninitial_tiles = 5").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
    }

    #[test]
    fn rejects_unknown_policy() {
        let err = SessionConfig::from_toml_str("[settle]\npolicy = \"later\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SessionConfig::from_toml(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
