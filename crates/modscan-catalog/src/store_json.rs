use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use thiserror::Error;

use crate::entry::{Catalog, PluginMetadata};
use crate::record::ModuleRecord;

pub const CATALOG_FILE_NAME: &str = "ModuleScanner.json";

const CATALOG_INDENT: &[u8] = b"    ";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("catalog has not been loaded")]
    NotLoaded,
    #[error("failed to read module catalog: {0}")]
    Read(#[from] io::Error),
    #[error("failed to parse module catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to encode module catalog: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to write module catalog {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("no user data directory available")]
    NoDataDir,
}

/// How [`CatalogStore::load`] obtained its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file parsed; holds the number of plugins it listed.
    Loaded { plugins: usize },
    /// No readable file; started empty.
    Missing,
    /// The file did not parse as a catalog; its content was discarded.
    Discarded,
}

#[derive(Debug, Clone)]
pub struct SaveReport {
    pub path: PathBuf,
    pub bytes_written: u64,
}

/// The on-disk module catalog, held in memory for the length of one scan.
#[derive(Debug)]
pub struct CatalogStore {
    path: PathBuf,
    catalog: Option<Catalog>,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            catalog: None,
        }
    }

    /// `<user data dir>/modscan/ModuleScanner.json`. Creates the directory.
    pub fn default_path() -> Result<PathBuf, StoreError> {
        let data_dir = dirs::data_dir().ok_or(StoreError::NoDataDir)?;
        catalog_path_in(data_dir.join("modscan"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.catalog.is_some()
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    pub fn into_catalog(self) -> Option<Catalog> {
        self.catalog
    }

    /// Replaces the in-memory document with the file's content.
    ///
    /// Never fails: a missing file or one that does not parse leaves an empty
    /// catalog in memory.
    pub fn load(&mut self) -> LoadOutcome {
        let (catalog, outcome) = match read_catalog(&self.path) {
            Ok(catalog) => {
                let plugins = catalog.len();
                (catalog, LoadOutcome::Loaded { plugins })
            }
            Err(StoreError::Parse(err)) => {
                log::warn!(
                    "discarding unreadable module catalog {} (line {}, column {}): {}",
                    self.path.display(),
                    err.line(),
                    err.column(),
                    err
                );
                (Catalog::new(), LoadOutcome::Discarded)
            }
            Err(err) => {
                log::info!(
                    "starting a new module catalog, could not read {}: {}",
                    self.path.display(),
                    err
                );
                (Catalog::new(), LoadOutcome::Missing)
            }
        };
        self.catalog = Some(catalog);
        outcome
    }

    /// Stores `record` under `plugin`, replacing any previous record for the
    /// same module slug and refreshing the plugin's metadata.
    pub fn upsert(
        &mut self,
        plugin: &PluginMetadata,
        record: ModuleRecord,
    ) -> Result<Option<ModuleRecord>, StoreError> {
        match self.catalog.as_mut() {
            Some(catalog) => Ok(catalog.upsert(plugin, record)),
            None => {
                log::warn!(
                    "ignoring module {}/{}: catalog {} was never loaded",
                    plugin.slug,
                    record.slug,
                    self.path.display()
                );
                Err(StoreError::NotLoaded)
            }
        }
    }

    /// Writes the whole document back to the backing file.
    ///
    /// The content goes to a sibling temporary file first and is renamed over
    /// the catalog, so on any failure the previous file is left as it was.
    pub fn save(&self) -> Result<SaveReport, StoreError> {
        let Some(catalog) = self.catalog.as_ref() else {
            log::warn!(
                "not saving module catalog {}: it was never loaded",
                self.path.display()
            );
            return Err(StoreError::NotLoaded);
        };
        let json = encode_catalog(catalog)?;
        match write_atomically(&self.path, &json) {
            Ok(()) => Ok(SaveReport {
                path: self.path.clone(),
                bytes_written: json.len() as u64,
            }),
            Err(source) => {
                log::warn!(
                    "could not write module catalog {}: {}",
                    self.path.display(),
                    source
                );
                Err(StoreError::Write {
                    path: self.path.clone(),
                    source,
                })
            }
        }
    }
}

fn catalog_path_in(dir: PathBuf) -> Result<PathBuf, StoreError> {
    if let Err(source) = fs::create_dir_all(&dir) {
        return Err(StoreError::Write { path: dir, source });
    }
    Ok(dir.join(CATALOG_FILE_NAME))
}

fn read_catalog(path: &Path) -> Result<Catalog, StoreError> {
    let raw = fs::read(path)?;
    Ok(parse_catalog(&raw)?)
}

/// Invalid UTF-8 is reported like any other syntax error, with its position.
fn parse_catalog(raw: &[u8]) -> Result<Catalog, serde_json::Error> {
    serde_json::from_slice(raw)
}

fn encode_catalog(catalog: &Catalog) -> Result<Vec<u8>, StoreError> {
    let mut json = Vec::new();
    let formatter = PrettyFormatter::with_indent(CATALOG_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut json, formatter);
    catalog
        .serialize(&mut serializer)
        .map_err(StoreError::Encode)?;
    json.push(b'\n');
    Ok(json)
}

fn write_atomically(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp_path = temp_path(path);
    let result = (|| {
        let mut file = File::create(&tmp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp_path, path)
    })();
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn temp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
