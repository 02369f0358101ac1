use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Optional user defaults from `<config dir>/parlife/config.toml`.
/// Command-line flags always win over these.
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct Settings {
    pub workers: Option<usize>,
    pub delay: Option<f32>,
    pub universe: Option<PathBuf>,
    pub draw_char: Option<char>,
    pub color_scheme: Option<u8>,
}

impl Settings {
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable settings");
                Self::default()
            }),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read settings");
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("parlife")
            .join("config.toml")
    }
}
