// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the layered merge pipeline.

mod common;

use common::{init_tracing, snapshot_bytes, HookCounter};
use nvcfg::prelude::*;
use serde_json::json;

const FILE_A: &str = r#"{"x": 1, "y": 2}"#;
const FILE_B: &str = r#"{"x": 9, "z": 3}"#;

fn layered_files() -> MemoryFileStore {
    MemoryFileStore::new()
        .with_file("/a.json", FILE_A)
        .with_file("/b.json", FILE_B)
}

fn service_with(files: MemoryFileStore, region: Option<MemoryRegion>) -> DefaultConfigService {
    let mut builder = DefaultConfigService::builder()
        .with_files(["/a.json", "/b.json"])
        .with_file_store(Box::new(files))
        .use_persistent(region.is_some());
    if let Some(region) = region {
        builder = builder.with_region(Box::new(region));
    }
    builder.build().unwrap()
}

#[test]
fn test_higher_priority_file_wins() {
    init_tracing();
    let mut service = service_with(layered_files(), None);

    let report = service.read();

    let store = service.store();
    assert_eq!(store.get::<i32>("x"), 1);
    assert_eq!(store.get::<i32>("y"), 2);
    assert_eq!(store.get::<i32>("z"), 3);
    assert_eq!(report.files_applied, vec!["/b.json", "/a.json"]);
    assert!(report.files_skipped.is_empty());
}

#[test]
fn test_inline_document_overrides_files() {
    let mut service = service_with(layered_files(), None);

    let report = service.read_with(r#"{"x": 5}"#);

    let store = service.store();
    assert_eq!(store.get::<i32>("x"), 5);
    assert_eq!(store.get::<i32>("y"), 2);
    assert_eq!(store.get::<i32>("z"), 3);
    assert!(report.inline_applied);
    assert!(!report.snapshot_applied);
}

#[test]
fn test_empty_inline_document_contributes_nothing() {
    let mut service = service_with(layered_files(), None);
    let report = service.read_with("");
    assert!(!report.inline_applied);
    assert_eq!(service.store().get::<i32>("x"), 1);
}

#[test]
fn test_saved_snapshot_overrides_files() {
    let region =
        MemoryRegion::with_contents(1024, &snapshot_bytes(&json!({"x": 100, "saved": true})));
    let mut service = service_with(layered_files(), Some(region));

    let report = service.read();

    assert!(report.snapshot_applied);
    assert_eq!(service.store().get::<i32>("x"), 100);
    assert_eq!(service.store().get::<i32>("z"), 3);
}

#[test]
fn test_unsaved_snapshot_is_not_trusted() {
    let region =
        MemoryRegion::with_contents(1024, &snapshot_bytes(&json!({"x": 100, "saved": false})));
    let mut service = service_with(layered_files(), Some(region));

    let report = service.read();

    assert!(!report.snapshot_applied);
    assert_eq!(service.store().get::<i32>("x"), 1);
}

#[test]
fn test_snapshot_without_marker_is_not_trusted() {
    let region = MemoryRegion::with_contents(1024, &snapshot_bytes(&json!({"x": 100})));
    let mut service = service_with(layered_files(), Some(region));

    assert!(!service.read().snapshot_applied);
    assert_eq!(service.store().get::<i32>("x"), 1);
}

#[test]
fn test_garbage_snapshot_is_ignored() {
    let region = MemoryRegion::with_contents(1024, &[0xFF, 0x00, 0x13, 0x37]);
    let mut service = service_with(layered_files(), Some(region));

    assert!(!service.read().snapshot_applied);
    assert_eq!(service.store().get::<i32>("x"), 1);
}

#[test]
fn test_erased_region_is_ignored() {
    let mut service = service_with(layered_files(), Some(MemoryRegion::default()));

    assert!(!service.read().snapshot_applied);
    assert_eq!(service.store().len(), 3);
}

#[test]
fn test_read_with_never_consults_snapshot() {
    let region =
        MemoryRegion::with_contents(1024, &snapshot_bytes(&json!({"x": 100, "saved": true})));
    let mut service = service_with(layered_files(), Some(region));

    let report = service.read_with(r#"{"y": 20}"#);

    assert!(!report.snapshot_applied);
    assert_eq!(service.store().get::<i32>("x"), 1);
    assert_eq!(service.store().get::<i32>("y"), 20);
}

#[test]
fn test_read_str_touches_no_files() {
    let hooks = HookCounter::new();
    let mut service = DefaultConfigService::builder()
        .with_file("/a.json")
        .with_file_store(Box::new(layered_files()))
        .on_mount(hooks.mount_hook())
        .on_unmount(hooks.unmount_hook())
        .build()
        .unwrap();

    let report = service.read_str(r#"{"only": true}"#);

    assert!(report.inline_applied);
    assert!(report.files_applied.is_empty());
    assert_eq!(hooks.mounts(), 0);
    assert_eq!(service.store().keys(), vec![ConfigKey::from("only")]);
}

#[test]
fn test_missing_and_malformed_files_are_skipped() {
    let files = MemoryFileStore::new()
        .with_file("/good.json", r#"{"ok": true}"#)
        .with_file("/bad.json", "{ nope");
    let mut service = DefaultConfigService::builder()
        .with_files(["/missing.json", "/bad.json", "/good.json"])
        .with_file_store(Box::new(files))
        .use_persistent(false)
        .build()
        .unwrap();

    let report = service.read();

    assert_eq!(report.files_applied, vec!["/good.json"]);
    assert_eq!(report.files_skipped, vec!["/bad.json", "/missing.json"]);
    assert!(service.store().get::<bool>("ok"));
}

#[test]
fn test_hooks_balanced_when_files_fail() {
    let hooks = HookCounter::new();
    let files = MemoryFileStore::new().with_file("/bad.json", "][");
    let mut service = DefaultConfigService::builder()
        .with_files(["/missing.json", "/bad.json"])
        .with_file_store(Box::new(files))
        .use_persistent(false)
        .on_mount(hooks.mount_hook())
        .on_unmount(hooks.unmount_hook())
        .build()
        .unwrap();

    let report = service.read();

    assert!(report.files_applied.is_empty());
    assert_eq!(hooks.mounts(), 1);
    assert_eq!(hooks.unmounts(), 1);
}

#[test]
fn test_unmounted_store_skips_every_file() {
    let hooks = HookCounter::new();
    let files = layered_files();
    files.set_mounted(false);
    let mut service = DefaultConfigService::builder()
        .with_files(["/a.json", "/b.json"])
        .with_file_store(Box::new(files))
        .use_persistent(false)
        .on_mount(hooks.mount_hook())
        .on_unmount(hooks.unmount_hook())
        .build()
        .unwrap();

    let report = service.read();

    assert_eq!(report.files_skipped.len(), 2);
    assert!(service.store().is_empty());
    assert_eq!(hooks.unmounts(), 1);
}

#[test]
fn test_no_files_means_no_hooks() {
    let hooks = HookCounter::new();
    let mut service = DefaultConfigService::builder()
        .use_persistent(false)
        .on_mount(hooks.mount_hook())
        .on_unmount(hooks.unmount_hook())
        .build()
        .unwrap();

    assert!(service.read().is_empty());
    assert_eq!(hooks.mounts(), 0);
    assert_eq!(hooks.unmounts(), 0);
}

#[test]
fn test_empty_array_never_creates_key() {
    let files = MemoryFileStore::new().with_file("/a.json", r#"{"list": [], "n": 1}"#);
    let mut service = DefaultConfigService::builder()
        .with_file("/a.json")
        .with_file_store(Box::new(files))
        .use_persistent(false)
        .build()
        .unwrap();

    service.read();

    assert!(!service.store().contains_key("list"));
    assert!(service.store().is::<i32>("n"));
}

#[test]
fn test_nested_objects_become_child_stores() {
    let files = MemoryFileStore::new().with_file(
        "/a.json",
        r#"{"wifi": {"ssid": "lab", "channels": [1, 6, 11]}, "peers": [{"id": 1}, {"id": 2}]}"#,
    );
    let mut service = DefaultConfigService::builder()
        .with_file("/a.json")
        .with_file_store(Box::new(files))
        .use_persistent(false)
        .build()
        .unwrap();

    service.read();

    let wifi = service.store().child("wifi").unwrap();
    assert_eq!(wifi.get_str("ssid"), "lab");
    assert_eq!(wifi.get::<Vec<i32>>("channels"), vec![1, 6, 11]);

    let peers = service.store().children("peers");
    assert_eq!(peers.len(), 2);
    assert_eq!(peers[1].get::<i32>("id"), 2);
}

#[test]
fn test_later_layer_replaces_whole_child() {
    let files = MemoryFileStore::new()
        .with_file("/a.json", r#"{"net": {"dhcp": false}}"#)
        .with_file("/b.json", r#"{"net": {"dhcp": true, "mtu": 1500}}"#);
    let mut service = DefaultConfigService::builder()
        .with_files(["/a.json", "/b.json"])
        .with_file_store(Box::new(files))
        .use_persistent(false)
        .build()
        .unwrap();

    service.read();

    let net = service.store().child("net").unwrap();
    assert!(!net.get::<bool>("dhcp"));
    assert!(!net.contains_key("mtu"));
}

#[test]
fn test_read_merges_onto_existing_values() {
    let mut service = service_with(layered_files(), None);
    service.store_mut().set("local", "kept").set("x", 42);

    service.read();

    assert_eq!(service.store().get_str("local"), "kept");
    assert_eq!(service.store().get::<i32>("x"), 1);
}
