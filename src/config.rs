//! Index build configuration.
//!
//! A configuration file is a JSON array of [`IndexConfig`] objects:
//!
//! ```json
//! [
//!   {
//!     "name": "cars",
//!     "nGramSize": 3,
//!     "source": "data/cars.txt",
//!     "output": "index",
//!     "wrap": "$",
//!     "codec": "delta_varint"
//!   }
//! ]
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::compression::Codec;
use crate::error::{Result, SuggestError};
use crate::index::NGramGenerator;
use crate::index::ngram::DEFAULT_WRAP;
use crate::merger::MergerKind;
use crate::storage::file::{FileStorage, FileStorageConfig};
use crate::storage::Storage;

/// Extension of a stored dictionary.
pub const DICTIONARY_EXTENSION: &str = "dict";

fn default_wrap() -> String {
    DEFAULT_WRAP.to_string()
}

/// How one index is built and where it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexConfig {
    /// Base name of every file of the index.
    pub name: String,

    /// N-gram size, in `[2, 4]`.
    #[serde(rename = "nGramSize")]
    pub ngram_size: usize,

    /// Text file with one word per line.
    #[serde(rename = "source")]
    pub source_path: PathBuf,

    /// Directory receiving the index files.
    #[serde(rename = "output")]
    pub output_path: PathBuf,

    /// Padding placed around every word.
    #[serde(default = "default_wrap")]
    pub wrap: String,

    #[serde(default)]
    pub codec: Codec,

    /// Threshold merge strategy used when searching the index.
    #[serde(default)]
    pub merger: MergerKind,
}

impl IndexConfig {
    /// The n-gram generator described by this configuration.
    pub fn generator(&self) -> Result<NGramGenerator> {
        NGramGenerator::with_wrap(self.ngram_size, self.wrap.as_str())
    }

    /// File storage rooted at the output directory.
    pub fn storage(&self, use_mmap: bool) -> Result<Arc<dyn Storage>> {
        let mut config = FileStorageConfig::new(&self.output_path);
        config.use_mmap = use_mmap;
        Ok(Arc::new(FileStorage::new(config)?))
    }

    /// Name of the stored dictionary file.
    pub fn dictionary_file_name(&self) -> String {
        format!("{}.{DICTIONARY_EXTENSION}", self.name)
    }
}

/// Parse a JSON array of index configurations.
pub fn parse_configs(json: &str) -> Result<Vec<IndexConfig>> {
    let configs: Vec<IndexConfig> = serde_json::from_str(json)?;
    for config in &configs {
        config.generator()?;
    }
    Ok(configs)
}

/// Read and parse a configuration file.
pub fn load_configs<P: AsRef<Path>>(path: P) -> Result<Vec<IndexConfig>> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|e| {
        SuggestError::config(format!("Cannot read config file {}: {e}", path.display()))
    })?;
    parse_configs(&json)
}

/// Find the configuration of the index called `name`.
pub fn find_config<'a>(configs: &'a [IndexConfig], name: &str) -> Result<&'a IndexConfig> {
    configs
        .iter()
        .find(|config| config.name == name)
        .ok_or_else(|| SuggestError::config(format!("No index named '{name}' in config")))
}
