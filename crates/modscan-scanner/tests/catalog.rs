use std::fs;
use std::sync::Arc;

use modscan_catalog::{
    ModelDescriptor, ModuleSnapshot, ParamQuantity, ParamSlot, PluginMetadata, PortInfo, PortSlot,
    CATALOG_FILE_NAME,
};
use modscan_scanner::ModuleScanner;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::tempdir;

fn lfo(rate_max: f32) -> ModuleSnapshot {
    let acme = Arc::new(
        PluginMetadata::new("acme", "1.0")
            .with_name("Acme")
            .with_license("MIT")
            .with_author("Ann", "ann@example.com"),
    );
    ModuleSnapshot::new(ModelDescriptor::new("lfo", "LFO", acme))
        .with_param(ParamSlot::bound(ParamQuantity::new(0, "Rate", 0.0, rate_max, 1.0)))
        .with_param(ParamSlot::bound(ParamQuantity::new(1, "Depth", 0.0, 1.0, 0.5)))
        .with_output(PortSlot::new(PortInfo::new(0, "Sine")))
}

fn param(id: u64, name: &str, max: f64, default: f64) -> Value {
    json!({
        "paramId": id,
        "name": name,
        "description": "",
        "unit": "",
        "minValue": 0.0,
        "maxValue": max,
        "defaultValue": default,
        "displayBase": 0.0,
        "displayMultiplier": 1.0,
        "displayOffset": 0.0
    })
}

fn expected(rate_max: f64) -> Value {
    json!({
        "acme": {
            "version": "1.0",
            "license": "MIT",
            "name": "Acme",
            "author": "Ann",
            "authorEmail": "ann@example.com",
            "modules": {
                "lfo": {
                    "slug": "lfo",
                    "name": "LFO",
                    "params": [param(0, "Rate", rate_max, 1.0), param(1, "Depth", 1.0, 0.5)],
                    "inputs": [],
                    "outputs": [{ "portId": 0, "name": "Sine", "description": "" }]
                }
            }
        }
    })
}

#[test]
fn second_press_replaces_the_module_record() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(CATALOG_FILE_NAME);
    fs::write(&path, "").unwrap();
    let mut scanner = ModuleScanner::new(&path);

    let report = scanner.process(1.0, &vec![lfo(10.0)]).unwrap();
    assert!(report.saved);
    let first: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(first, expected(10.0));

    scanner.process(0.0, &vec![lfo(20.0)]);
    let report = scanner.process(1.0, &vec![lfo(20.0)]).unwrap();
    assert_eq!(report.cataloged, 1);
    let second: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(second, expected(20.0));
}
