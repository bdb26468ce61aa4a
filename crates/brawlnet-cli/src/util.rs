use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context as _;
use brawlnet_training::session::SessionConfig;

use crate::schema::champion::ChampionModel;

/// Writes the champion model as pretty JSON to `path`, or to stdout when no path is given.
pub fn save_champion_file(model: &ChampionModel, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_json(BufWriter::new(file), model)
                .with_context(|| format!("Failed to write champion model to {}", path.display()))
        }
        None => write_json(io::stdout().lock(), model)
            .context("Failed to write champion model to stdout"),
    }
}

fn write_json<W, T>(mut writer: W, value: &T) -> anyhow::Result<()>
where
    W: Write,
    T: serde::Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn read_json_file<T>(file_kind: &str, path: &Path) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {file_kind} file: {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))
}

pub fn read_champion_file(path: &Path) -> anyhow::Result<ChampionModel> {
    read_json_file("champion model", path)
}

/// Reads a session config, or returns the defaults when no path is given.
pub fn read_config_file(path: Option<&Path>) -> anyhow::Result<SessionConfig> {
    path.map_or_else(
        || Ok(SessionConfig::default()),
        |path| read_json_file("config", path),
    )
}

/// Session seed from the command line, or a random one.
pub fn session_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}
