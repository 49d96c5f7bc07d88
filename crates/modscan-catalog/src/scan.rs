use std::path::{Path, PathBuf};

use crate::instance::ModuleInstance;
use crate::serialize::{plugin_identity, serialize_module, SerializeOptions};
use crate::store_json::{CatalogStore, LoadOutcome};

#[derive(Debug, Clone)]
pub struct ScanReport {
    pub path: PathBuf,
    pub load: LoadOutcome,
    /// Instances offered by the host.
    pub scanned: usize,
    /// Instances whose record was merged into the catalog.
    pub cataloged: usize,
    /// Instances that were not ready to be cataloged.
    pub skipped: usize,
    pub saved: bool,
}

/// Loads the catalog at `path`, merges a fresh record for every instance and
/// writes the result back.
///
/// Modules absent from `instances` keep whatever record an earlier scan left.
/// Nothing here fails the scan: I/O problems are logged by the store and
/// reported through [`ScanReport`].
pub fn scan_modules<I>(path: &Path, instances: I, options: &SerializeOptions) -> ScanReport
where
    I: IntoIterator,
    I::Item: ModuleInstance,
{
    let mut store = CatalogStore::new(path);
    let load = store.load();

    let mut scanned = 0;
    let mut cataloged = 0;
    for instance in instances {
        scanned += 1;
        let Some(record) = serialize_module(&instance, options) else {
            continue;
        };
        let Some(plugin) = plugin_identity(&instance) else {
            continue;
        };
        if store.upsert(plugin, record).is_ok() {
            cataloged += 1;
        }
    }

    let saved = store.save().is_ok();
    ScanReport {
        path: path.to_path_buf(),
        load,
        scanned,
        cataloged,
        skipped: scanned - cataloged,
        saved,
    }
}
