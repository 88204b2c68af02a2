//! On-disk configuration, loaded from TOML (spec.md §6's configuration
//! surface). `fte_language`/`fte_record` stay config-format-agnostic; this
//! module is the one place that turns a config file into the `LanguageSpec`
//! and `RecordConfig` values those crates expect.

use serde::Deserialize;
use std::{
    collections::HashMap,
    path::PathBuf,
};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub general: General,
    pub runtime: Runtime,
    pub languages: Languages,
}

#[derive(Debug, Deserialize)]
pub struct General {
    /// Directory holding compiled DFA files, one per configured language.
    pub dfa_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct Runtime {
    pub fte: FteRuntime,
}

#[derive(Debug, Deserialize)]
pub struct FteRuntime {
    pub record_layer: RecordLayerConfig,
}

#[derive(Debug, Deserialize)]
pub struct RecordLayerConfig {
    pub max_cell_size: usize,
}

#[derive(Debug, Deserialize)]
pub struct Languages {
    pub regex: HashMap<String, RegexLanguageConfig>,
}

#[derive(Debug, Deserialize)]
pub struct RegexLanguageConfig {
    pub mtu: usize,
    pub fixed_slice: bool,
    pub allow_ae_bits: bool,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
