//! Mapper presets.
//!
//! A [`Settings`] names the annotation key to publish under, the fallback
//! keys to try when a field lacks it, and whether nested records should be
//! flattened. Presets load through the `config` crate from TOML files or
//! strings, with `TAGMAP_` environment variables layered on top.

use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::debug;

use crate::error::Result;
use crate::fill::fill_by_key;
use crate::record::Record;
use crate::scan::{ScanRow, scan_row};
use crate::snapshot::{map, map_flatten, map_with_fallback};
use crate::value::Mapped;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub fallbacks: Vec<String>,
    #[serde(default)]
    pub flatten: bool,
}

impl Settings {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let settings: Settings = Config::builder()
            .add_source(File::from(path.as_ref()).format(FileFormat::Toml))
            .add_source(environment())
            .build()?
            .try_deserialize()?;
        debug!(?settings, path = %path.as_ref().display(), "loaded settings");
        Ok(settings)
    }
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .add_source(environment())
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("TAGMAP")
        .list_separator(",")
        .with_list_parse_key("fallbacks")
        .try_parsing(true)
}

/// Map, fill and scan operations bound to one [`Settings`].
#[derive(Debug, Clone, Default)]
pub struct Mapper {
    settings: Settings,
}

impl Mapper {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
    pub fn map(&self, record: &dyn Record) -> Mapped {
        let tag = self.settings.tag.as_str();
        if self.settings.flatten {
            map_flatten(record, tag)
        } else if self.settings.fallbacks.is_empty() {
            map(record, tag)
        } else {
            let fallbacks: Vec<&str> = self.settings.fallbacks.iter().map(String::as_str).collect();
            map_with_fallback(record, tag, &fallbacks)
        }
    }
    pub fn fill(&self, record: &mut dyn Record, mapped: &Mapped) -> Result<()> {
        fill_by_key(record, mapped, &self.settings.tag)
    }
    pub fn scan<R: ScanRow + ?Sized>(&self, row: &R, record: &mut dyn Record, selectors: &[&str]) -> Result<()> {
        scan_row(row, record, &self.settings.tag, selectors)
    }
}
