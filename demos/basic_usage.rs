// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for the nvcfg crate.
//!
//! This example demonstrates:
//! - Layering a device file over a defaults file
//! - Reading typed values, nested stores and lists
//! - Saving a binary snapshot into a persistent region image
//! - Restoring that snapshot on the next start
//!
//! Everything lives in a scratch directory under the system temp dir.
//!
//! To run this example:
//! ```bash
//! cargo run --example basic_usage
//! ```

use nvcfg::prelude::*;
use std::fs;

fn build(dir: &std::path::Path) -> Result<DefaultConfigService> {
    DefaultConfigService::builder()
        .with_files(["/device.json", "/defaults.json"])
        .with_file_store(Box::new(DirectoryFileStore::new(dir)))
        .with_region(Box::new(FileRegion::new(dir.join("eeprom.bin"), 1024)))
        .on_mount(|| println!("  [mount] flash powered up"))
        .on_unmount(|| println!("  [unmount] flash powered down"))
        .build()
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== nvcfg: Basic Usage ===\n");

    let dir = std::env::temp_dir().join("nvcfg-basic-usage");
    fs::create_dir_all(&dir)?;
    let _ = fs::remove_file(dir.join("eeprom.bin"));

    fs::write(
        dir.join("defaults.json"),
        r#"{"hostname": "sensor", "interval": 60, "wifi": {"ssid": "factory", "channels": [1, 6, 11]}}"#,
    )?;
    fs::write(dir.join("device.json"), r#"{"hostname": "sensor-17", "location": [52.52, 13.405]}"#)?;

    // Example 1: layered read
    println!("--- Example 1: Layered Files ---");
    let mut service = build(&dir)?;
    let report = service.read();
    println!("Applied {:?}, skipped {:?}", report.files_applied, report.files_skipped);

    let store = service.store();
    println!("hostname = {}", store.get_str("hostname"));
    println!("interval = {}", store.get::<i32>("interval"));
    println!("location = {:?}", store.get::<GeoPoint>("location"));
    if let Some(wifi) = store.child("wifi") {
        println!("wifi.ssid = {}", wifi.get_str("ssid"));
        println!("wifi.channels = {:?}", wifi.get::<Vec<i32>>("channels"));
    }

    // Example 2: wrong-kind reads fall back to zero values
    println!("\n--- Example 2: Type Mismatch ---");
    println!("hostname as i32 = {}", service.store().get::<i32>("hostname"));
    println!("missing as bool = {}", service.store().get::<bool>("missing"));

    // Example 3: change a value and save a snapshot
    println!("\n--- Example 3: Save Snapshot ---");
    service.store_mut().set("interval", 15);
    match service.save() {
        Ok(report) => println!("Saved {}", report),
        Err(e) => println!("Save failed: {}", e),
    }
    println!("{}", service.to_string(DocumentFormat::Pretty)?);

    // Example 4: the snapshot wins over the files on the next start
    println!("\n--- Example 4: Restart ---");
    let mut restarted = build(&dir)?;
    let report = restarted.read();
    println!(
        "snapshot applied = {}, interval = {}",
        report.snapshot_applied,
        restarted.store().get::<i32>("interval")
    );

    // Example 5: a snapshot that does not fit is rejected before writing
    println!("\n--- Example 5: Capacity ---");
    restarted.store_mut().set("notes", "x".repeat(2048));
    match restarted.save() {
        Ok(report) => println!("Unexpectedly saved {}", report),
        Err(e) => println!("Rejected: {}", e),
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
