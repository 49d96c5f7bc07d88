use std::path::{Path, PathBuf};

use tracing::{info, warn};

use modscan_catalog::{
    scan_modules, CatalogStore, ModuleInstance, ScanReport, SerializeOptions, StoreError,
};

use crate::trigger::{GateThresholds, GateTriggerReceiver};

/// Button values are in `0..=1`; the receiver works on a 0-10 V style level.
pub const BUTTON_LEVEL_SCALE: f32 = 10.0;

/// What the host exposes to the scanner: the modules instantiated right now.
pub trait ModuleHost {
    fn modules(&self) -> Vec<&dyn ModuleInstance>;
}

impl<M: ModuleInstance> ModuleHost for [M] {
    fn modules(&self) -> Vec<&dyn ModuleInstance> {
        self.iter()
            .map(|module| module as &dyn ModuleInstance)
            .collect()
    }
}

impl<M: ModuleInstance> ModuleHost for Vec<M> {
    fn modules(&self) -> Vec<&dyn ModuleInstance> {
        self.as_slice().modules()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub serialize: SerializeOptions,
    pub thresholds: GateThresholds,
}

/// The "update module database" device: watches its save button and
/// rewrites the catalog once per press.
#[derive(Debug)]
pub struct ModuleScanner {
    catalog_path: PathBuf,
    receiver: GateTriggerReceiver,
    options: ScanOptions,
}

impl ModuleScanner {
    pub fn new(catalog_path: impl Into<PathBuf>) -> Self {
        Self::with_options(catalog_path, ScanOptions::default())
    }

    pub fn with_options(catalog_path: impl Into<PathBuf>, options: ScanOptions) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            receiver: GateTriggerReceiver::new(options.thresholds),
            options,
        }
    }

    /// Scanner writing to [`CatalogStore::default_path`].
    pub fn with_default_path() -> Result<Self, StoreError> {
        let path = CatalogStore::default_path()?;
        Ok(Self::new(path))
    }

    pub fn catalog_path(&self) -> &Path {
        &self.catalog_path
    }

    pub fn reset(&mut self) {
        self.receiver.reset();
    }

    /// Feeds one sample of the save button. Runs a scan over `host` when the
    /// press registers as a new trigger and returns its report.
    pub fn process<H>(&mut self, button_value: f32, host: &H) -> Option<ScanReport>
    where
        H: ModuleHost + ?Sized,
    {
        if !self.receiver.update_trigger(button_value * BUTTON_LEVEL_SCALE) {
            return None;
        }
        Some(self.scan(host))
    }

    /// Runs one scan immediately, bypassing the button.
    pub fn scan<H>(&self, host: &H) -> ScanReport
    where
        H: ModuleHost + ?Sized,
    {
        info!(path = %self.catalog_path.display(), "beginning module scan");
        let report = scan_modules(&self.catalog_path, host.modules(), &self.options.serialize);
        if report.saved {
            info!(
                scanned = report.scanned,
                cataloged = report.cataloged,
                skipped = report.skipped,
                "module catalog updated"
            );
        } else {
            warn!(
                path = %report.path.display(),
                "module scan finished without saving the catalog"
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use modscan_catalog::{
        Catalog, LoadOutcome, ModelDescriptor, ModuleSnapshot, ParamQuantity, ParamSlot,
        PluginMetadata, CATALOG_FILE_NAME,
    };
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn rack() -> Vec<ModuleSnapshot> {
        let plugin = Arc::new(PluginMetadata::new("acme", "1.0"));
        vec![ModuleSnapshot::new(ModelDescriptor::new("lfo", "LFO", plugin))
            .with_param(ParamSlot::bound(ParamQuantity::new(0, "Rate", 0.0, 10.0, 1.0)))]
    }

    fn load(path: &Path) -> Catalog {
        let mut store = CatalogStore::new(path);
        store.load();
        store.into_catalog().unwrap_or_default()
    }

    #[test]
    fn scans_once_per_button_press() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CATALOG_FILE_NAME);
        let modules = rack();
        let mut scanner = ModuleScanner::new(&path);

        let presses = [0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0];
        let reports: Vec<_> = presses
            .iter()
            .filter_map(|&value| scanner.process(value, &modules))
            .collect();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].load, LoadOutcome::Missing);
        assert_eq!(reports[1].load, LoadOutcome::Loaded { plugins: 1 });
        assert_eq!(load(&path).module_count(), 1);
    }

    #[test]
    fn idle_button_never_touches_the_catalog() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CATALOG_FILE_NAME);
        let mut scanner = ModuleScanner::new(&path);
        for _ in 0..64 {
            assert!(scanner.process(0.0, &rack()).is_none());
        }
        assert!(!path.exists());
    }

    #[test]
    fn reset_rearms_a_held_button() {
        let dir = tempdir().unwrap();
        let mut scanner = ModuleScanner::new(dir.path().join(CATALOG_FILE_NAME));
        let modules = rack();
        assert!(scanner.process(1.0, &modules).is_some());
        assert!(scanner.process(1.0, &modules).is_none());
        scanner.reset();
        assert!(scanner.process(1.0, &modules).is_some());
    }

    #[test]
    fn geometry_can_be_disabled() {
        use modscan_catalog::{Vec2, WidgetBox};

        let dir = tempdir().unwrap();
        let path = dir.path().join(CATALOG_FILE_NAME);
        let plugin = Arc::new(PluginMetadata::new("acme", "1.0"));
        let placement = WidgetBox::new(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0));
        let rate = ParamSlot::bound(ParamQuantity::new(0, "Rate", 0.0, 10.0, 1.0)).at(placement);
        let modules =
            vec![ModuleSnapshot::new(ModelDescriptor::new("lfo", "LFO", plugin)).with_param(rate)];

        let mut options = ScanOptions::default();
        options.serialize.include_geometry = false;
        let scanner = ModuleScanner::with_options(&path, options);
        scanner.scan(&modules);

        let catalog = load(&path);
        assert_eq!(catalog.module("acme", "lfo").unwrap().params[0].placement, None);
    }
}
