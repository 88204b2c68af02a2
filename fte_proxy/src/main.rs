use anyhow::{
    Context,
    Result,
};
use clap::Parser;
use log::info;
use std::{
    fs,
    path::PathBuf,
};

use fte_proxy::config::Config;

/// Load a record-layer configuration and report the languages it declares.
///
/// Loading an actual DFA from `general.dfa_dir` is left to a caller-supplied
/// `fte_language::DfaSource` implementation; the on-disk DFA format is
/// implementation-defined, per this crate's scope.
#[derive(Parser, Debug)]
#[command(name = "fte_proxy", about = "Format-transforming record proxy")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let text = fs::read_to_string(&args.config)
        .with_context(|| format!("reading config file {}", args.config.display()))?;
    let config = Config::from_toml_str(&text).context("parsing config file")?;

    info!(
        "dfa_dir = {}, max_cell_size = {}",
        config.general.dfa_dir.display(),
        config.runtime.fte.record_layer.max_cell_size
    );
    for (name, language) in &config.languages.regex {
        info!(
            "language '{name}': mtu = {}, fixed_slice = {}, allow_ae_bits = {}",
            language.mtu, language.fixed_slice, language.allow_ae_bits
        );
    }

    Ok(())
}
