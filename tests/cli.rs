// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate assert_cmd;
extern crate image;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn julia() -> Command {
    Command::cargo_bin("julia").unwrap()
}

#[test]
fn renders_a_png() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("julia.png");
    julia()
        .args(&["-0.8", "0.156", "32", "1", "1", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Drawing took"));
    let img = image::open(&out).unwrap().to_rgb();
    assert_eq!(img.dimensions(), (32, 32));
}

#[test]
fn accepts_partition_names() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("julia.ppm");
    julia()
        .args(&["0.285", "0.01", "20", "1", "block-claim", "--output"])
        .arg(&out)
        .assert()
        .success();
    assert!(std::fs::read(&out).unwrap().starts_with(b"P6"));
}

#[test]
fn requires_five_arguments() {
    julia()
        .args(&["-0.8", "0.156", "32"])
        .assert()
        .failure();
}

#[test]
fn rejects_a_out_of_range() {
    julia()
        .args(&["-1.5", "0.156", "32", "1", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not in the range"));
}

#[test]
fn rejects_oversized_grids() {
    julia()
        .args(&["0", "0", "16385", "1", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("size"));
}

#[test]
fn rejects_zero_threads() {
    julia()
        .args(&["0", "0", "16", "0", "1"])
        .assert()
        .failure();
}

#[test]
fn rejects_unknown_models() {
    julia()
        .args(&["0", "0", "16", "1", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown partition model"));
}

#[test]
fn rejects_non_numbers() {
    julia()
        .args(&["zero", "0", "16", "1", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a number"));
}

#[test]
fn reports_unwritable_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nowhere").join("julia.png");
    julia()
        .args(&["0", "0", "4", "1", "1", "-o"])
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Render failure"));
}
