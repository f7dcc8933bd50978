use std::path::{Path, PathBuf};
use std::result::Result as StdResult;

use anyhow::Context as _;
use rust_embed::RustEmbed;
use serde::Deserialize;

use crate::testing::FixtureLayout;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    #[serde(skip)]
    pub source_config_file: Option<PathBuf>,
    pub fixture: FixtureLayout,
    pub subject: SubjectConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubjectConfig {
    pub binary: Option<PathBuf>,
}

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Asset;

impl Config {
    pub const FILENAME: &str = "paracl-e2e.toml";

    pub fn example_toml() -> String {
        let file = Asset::get(Self::FILENAME).expect("example config is embedded");
        String::from_utf8_lossy(file.data.as_ref()).into_owned()
    }

    pub fn from_toml(s: &str) -> StdResult<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Relative `subject.binary` is resolved against the directory of `filepath`.
    pub fn from_toml_file(filepath: PathBuf) -> anyhow::Result<Self> {
        let toml = fsutil::read_to_string(&filepath).context("Cannot read a file")?;
        let mut cfg = Self::from_toml(&toml)
            .with_context(|| format!("Invalid config TOML: {:?}", filepath))?;

        if let (Some(binary), Some(dir)) = (&cfg.subject.binary, filepath.parent()) {
            if binary.is_relative() {
                cfg.subject.binary = Some(fsutil::normalize_path(dir.join(binary)));
            }
        }
        cfg.source_config_file = Some(filepath);
        Ok(cfg)
    }

    /// Looks for the config file in `dir` and its ancestors; defaults when there is none.
    pub fn from_file_in_ancestors_or_default(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        match fsutil::find_file_in_ancestors(&dir, Self::FILENAME) {
            Some(path) => {
                log::info!("Using config {:?}", path);
                Self::from_toml_file(path)
            }
            None => {
                log::debug!(
                    "No '{}' in {:?} or its ancestors, using defaults",
                    Self::FILENAME,
                    dir.as_ref()
                );
                Ok(Self::default())
            }
        }
    }
}
