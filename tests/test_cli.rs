
use fixtures::*;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::process::Command;
use tempfile::tempdir;

#[test]
fn it_respects_directory_output() {
    let d = tempdir().unwrap();
    let f = d.as_ref().join("test.out");

    let sample = regular_sample();

    let mut cmd = Command::new(assert_cmd::cargo_bin!("luares_dump"));
    cmd.args(["-f", &f.to_string_lossy(), sample.to_str().unwrap()]);

    assert!(
        cmd.output().unwrap().stdout.is_empty(),
        "Expected output to be printed to file, but was printed to stdout"
    );

    let mut expected = vec![];

    File::open(&f).unwrap().read_to_end(&mut expected).unwrap();
    assert!(
        !expected.is_empty(),
        "Expected output to be printed to file"
    )
}

#[test]
fn test_it_refuses_to_overwrite_directory() {
    let d = tempdir().unwrap();

    let sample = regular_sample();
    let mut cmd = Command::new(assert_cmd::cargo_bin!("luares_dump"));
    cmd.args(["-f", &d.path().to_string_lossy(), sample.to_str().unwrap()]);

    cmd.assert().failure().code(1);
}

#[test]
fn test_it_overwrites_file_anyways_if_passed_flag() {
    let d = tempdir().unwrap();
    let f = d.as_ref().join("test.out");

    let mut file = File::create(&f).unwrap();
    file.write_all(b"I'm a file!").unwrap();

    let sample = regular_sample();
    let mut cmd = Command::new(assert_cmd::cargo_bin!("luares_dump"));
    cmd.args([
        "-f",
        &f.to_string_lossy(),
        "--no-confirm-overwrite",
        sample.to_str().unwrap(),
    ]);

    cmd.assert().success();

    let mut expected = vec![];

    File::open(&f).unwrap().read_to_end(&mut expected).unwrap();
    assert!(
        !expected.is_empty(),
        "Expected output to be printed to file"
    )
}

#[test]
fn it_emits_a_document_with_all_records() {
    let sample = regular_sample();

    let mut cmd = Command::new(assert_cmd::cargo_bin!("luares_dump"));
    cmd.arg(sample.to_str().unwrap());

    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let document: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(document["version"], Value::from(1));
    assert_eq!(document["item_count"], Value::from(12));
    assert_eq!(document["records"].as_array().unwrap().len(), 12);

    // The default sibling `item_descriptions.lua` is picked up.
    assert_eq!(
        document["records"][3]["description_en"],
        Value::from("A crystallized chunk of fire.")
    );
}

#[test]
fn it_emits_one_line_per_record_in_jsonl() {
    let sample = regular_sample();

    let mut cmd = Command::new(assert_cmd::cargo_bin!("luares_dump"));
    cmd.args(["-o", "jsonl", sample.to_str().unwrap()]);

    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 12, "one line per record, no envelope");

    for line in lines {
        let record: Value = serde_json::from_str(line).unwrap();
        assert!(record.as_object().unwrap().contains_key("id"));
    }
}

#[test]
fn it_prints_a_category_breakdown_with_stats() {
    let sample = regular_sample();

    let mut cmd = Command::new(assert_cmd::cargo_bin!("luares_dump"));
    cmd.args(["--stats", sample.to_str().unwrap()]);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Indexed 12 records"))
        .stderr(predicate::str::contains("Category breakdown:"))
        .stderr(predicate::str::contains("Weapon: 4"))
        .stderr(predicate::str::contains("Furnishing: 1"));
}

#[test]
fn it_reads_an_explicit_descriptions_path() {
    let d = tempdir().unwrap();
    let moved = d.as_ref().join("texts.lua");
    fs::copy(descriptions_sample(), &moved).unwrap();

    let sample = regular_sample();
    let mut cmd = Command::new(assert_cmd::cargo_bin!("luares_dump"));
    cmd.args([
        "-d",
        &moved.to_string_lossy(),
        sample.to_str().unwrap(),
    ]);

    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let document: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        document["records"][3]["description_en"],
        Value::from("A crystallized chunk of fire.")
    );
}

#[test]
fn it_tolerates_a_missing_default_descriptions_file() {
    let d = tempdir().unwrap();
    let lonely_items = d.as_ref().join("items.lua");
    fs::copy(regular_sample(), &lonely_items).unwrap();

    let mut cmd = Command::new(assert_cmd::cargo_bin!("luares_dump"));
    cmd.arg(lonely_items.to_str().unwrap());

    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let document: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(document["item_count"], Value::from(12));
    for record in document["records"].as_array().unwrap() {
        assert!(!record.as_object().unwrap().contains_key("description_en"));
    }
}

#[test]
fn it_fails_on_a_missing_explicit_descriptions_path() {
    let sample = regular_sample();

    let mut cmd = Command::new(assert_cmd::cargo_bin!("luares_dump"));
    cmd.args(["-d", "/nonexistent/texts.lua", sample.to_str().unwrap()]);

    cmd.assert().failure().code(1);
}

#[test]
fn it_fails_on_a_missing_items_path() {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("luares_dump"));
    cmd.arg("/nonexistent/items.lua");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to load items"));
}

#[test]
fn it_recovers_records_from_the_dirty_sample() {
    let sample = dirty_sample();

    let mut cmd = Command::new(assert_cmd::cargo_bin!("luares_dump"));
    cmd.args(["-o", "jsonl", sample.to_str().unwrap()]);

    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 2);
    assert!(stdout.contains("Copper Ingot"));
    assert!(stdout.contains("Second Version"));
}
