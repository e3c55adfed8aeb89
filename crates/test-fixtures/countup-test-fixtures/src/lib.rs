use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(rename = "format-cases")]
    format_cases: HashMap<String, String>,
    configs: HashMap<String, String>,
}

/// One expected `format_value` rendering.
#[derive(Debug, Clone, Deserialize)]
pub struct FormatCase {
    pub value: f64,
    pub decimal_places: u32,
    pub decimal: String,
    pub thousands_separator: String,
    pub expected: String,
}

/// One expected real value <-> tick pairing.
#[derive(Debug, Clone, Deserialize)]
pub struct TickCase {
    pub value: f64,
    pub decimal_places: u32,
    pub tick: i64,
}

/// Directory holding `manifest.json` and every fixture it lists.
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

#[derive(Copy, Clone, Debug)]
enum Section {
    FormatCases,
    Configs,
}

impl Section {
    fn entries(self) -> &'static HashMap<String, String> {
        match self {
            Section::FormatCases => &MANIFEST.format_cases,
            Section::Configs => &MANIFEST.configs,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Section::FormatCases => "format case",
            Section::Configs => "config",
        }
    }

    fn names(self) -> Vec<String> {
        let mut names: Vec<String> = self.entries().keys().cloned().collect();
        names.sort();
        names
    }

    fn path(self, name: &str) -> Result<PathBuf> {
        let rel = self
            .entries()
            .get(name)
            .ok_or_else(|| anyhow!("no {} fixture named '{name}'", self.label()))?;
        Ok(fixtures_dir().join(rel))
    }

    fn text(self, name: &str) -> Result<String> {
        let path = self.path(name)?;
        fs::read_to_string(&path)
            .with_context(|| format!("reading {} fixture {}", self.label(), path.display()))
    }

    fn parse<T: DeserializeOwned>(self, name: &str) -> Result<T> {
        let text = self.text(name)?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing {} fixture '{name}'", self.label()))
    }
}

pub mod format_cases {
    use super::*;

    pub fn keys() -> Vec<String> {
        Section::FormatCases.names()
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        Section::FormatCases.parse(name)
    }

    /// Formatting expectations stored under `name`.
    pub fn formats(name: &str) -> Result<Vec<FormatCase>> {
        load(name)
    }

    /// Tick conversion expectations stored under `name`.
    pub fn ticks(name: &str) -> Result<Vec<TickCase>> {
        load(name)
    }
}

pub mod configs {
    use super::*;

    pub fn keys() -> Vec<String> {
        Section::Configs.names()
    }

    pub fn json(name: &str) -> Result<String> {
        Section::Configs.text(name)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Section::Configs.path(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_entries_exist_on_disk() {
        for section in [Section::FormatCases, Section::Configs] {
            for name in section.names() {
                let path = section.path(&name).unwrap();
                assert!(path.exists(), "missing fixture {}", path.display());
            }
        }
    }

    #[test]
    fn unknown_fixture_is_an_error() {
        assert!(configs::json("does-not-exist").is_err());
        assert!(format_cases::formats("does-not-exist").is_err());
    }

    #[test]
    fn keys_are_sorted() {
        let keys = configs::keys();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]));
        assert!(keys.contains(&"defaults".to_string()));
    }
}
