//! Settings file loader.
//!
//! The settings file is plain text, one value per line, in this order:
//!
//! ```text
//! pad_size          (integer, >= 64)
//! max_shards        (integer, >= 1)
//! shards_file_path
//! keys_file_path
//! root_path         (block file prefix, "<root_path><hex index>")
//! encrypt_path      (ciphertext prefix, "<encrypt_path><hex index>.enc")
//! ```
//!
//! Any parse or bounds failure is fatal at startup.

use std::path::{Path, PathBuf};

use crate::error::{PlsdError, PlsdResult};

/// Smallest permitted pad size: twice the scalar width of the curve backend,
/// so a pad always outweighs the exponent it masks.
pub const MIN_PAD_SIZE: usize = 64;

/// Ledger configuration: encryption parameters plus the paths of the four
/// on-disk components.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Bytes of pad derived per masking shard; also the encryption chunk size
    pub pad_size: usize,
    /// Number of masking shards generated at init (and the per-file chunk cap)
    pub max_shards: usize,
    /// File holding the masking shards
    pub shards_file: PathBuf,
    /// Append-only file holding the encapsulated keys
    pub keys_file: PathBuf,
    /// Path prefix for block files; block `i` lives at `<root_path><hex(i)>`
    pub root_path: String,
    /// Path prefix for ciphertext files: `<encrypt_path><hex(i)>.enc`
    pub encrypt_path: String,
}

impl Settings {
    /// Load and validate settings from `path`.
    pub fn load(path: &Path) -> PlsdResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut lines = content.lines().map(str::trim);

        let pad_size: usize = parse_line(lines.next(), "pad size")?;
        let max_shards: usize = parse_line(lines.next(), "max shards")?;
        let shards_file = PathBuf::from(text_line(lines.next(), "shards file path")?);
        let keys_file = PathBuf::from(text_line(lines.next(), "keys file path")?);
        let root_path = text_line(lines.next(), "root path")?.to_owned();
        let encrypt_path = text_line(lines.next(), "encrypt path")?.to_owned();

        let settings = Self {
            pad_size,
            max_shards,
            shards_file,
            keys_file,
            root_path,
            encrypt_path,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Bounds checks shared by `load` and tests that build `Settings` by hand.
    pub fn validate(&self) -> PlsdResult<()> {
        if self.pad_size < MIN_PAD_SIZE {
            return Err(PlsdError::Settings(format!(
                "pad size {} is below the minimum of {MIN_PAD_SIZE}",
                self.pad_size
            )));
        }
        if self.max_shards < 1 {
            return Err(PlsdError::Settings(
                "max shards must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

fn text_line<'a>(line: Option<&'a str>, what: &str) -> PlsdResult<&'a str> {
    match line {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(PlsdError::Settings(format!("missing {what} line"))),
    }
}

fn parse_line(line: Option<&str>, what: &str) -> PlsdResult<usize> {
    text_line(line, what)?
        .parse()
        .map_err(|e| PlsdError::Settings(format!("bad {what}: {e}")))
}
