//! End-to-end tests for the bnktool binary

use bnk::{Bank, MAGIC_BKHD};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn bnktool() -> Command {
    Command::new(env!("CARGO_BIN_EXE_bnktool"))
}

fn write_bank(dir: &Path) -> PathBuf {
    let mut bank = Bank::new(vec![MAGIC_BKHD, 12, 134, 5, 0xFFFF_0000]);
    bank.update("100", b"first payload".to_vec());
    bank.update("200", vec![0x55; 40]);
    bank.update("300", b"x".to_vec());
    let path = dir.join("test.bnk");
    std::fs::write(&path, bank.serialize().unwrap()).unwrap();
    path
}

#[test]
fn test_list() {
    let dir = TempDir::new().unwrap();
    let bank = write_bank(dir.path());

    let output = bnktool().arg(&bank).arg("--list").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout, "100.wem\n200.wem\n300.wem\n");
}

#[test]
fn test_list_verbose() {
    let dir = TempDir::new().unwrap();
    let bank = write_bank(dir.path());

    let output = bnktool().arg(&bank).args(["-l", "-v"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Sound bank version 134"));
    assert!(stdout.contains("3 audio items"));
    assert!(stdout.contains("200.wem : 40 bytes"));
}

#[test]
fn test_extract_all_and_named() {
    let dir = TempDir::new().unwrap();
    let bank = write_bank(dir.path());
    let out = dir.path().join("out");

    let status = bnktool()
        .arg(&bank)
        .arg("--output-dir")
        .arg(&out)
        .arg("--extract")
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(std::fs::read(out.join("100.wem")).unwrap(), b"first payload");
    assert_eq!(std::fs::read(out.join("200.wem")).unwrap(), vec![0x55; 40]);
    assert_eq!(std::fs::read(out.join("300.wem")).unwrap(), b"x");

    let named = dir.path().join("named");
    let status = bnktool()
        .arg(&bank)
        .arg("-o")
        .arg(&named)
        .args(["-x", "300.wem"])
        .status()
        .unwrap();
    assert!(status.success());
    assert!(named.join("300.wem").exists());
    assert!(!named.join("100.wem").exists());

    // extraction never rewrites the bank
    assert!(!dir.path().join("test.bnk.000").exists());
}

#[test]
fn test_update_and_empty_with_backup() {
    let dir = TempDir::new().unwrap();
    let bank = write_bank(dir.path());
    let original = std::fs::read(&bank).unwrap();

    let replacement = dir.path().join("200.wem");
    std::fs::write(&replacement, b"new audio").unwrap();
    let list = dir.path().join("list.txt");
    std::fs::write(&list, "100.wem\n").unwrap();

    let status = bnktool()
        .arg(&bank)
        .arg("-u")
        .arg(&replacement)
        .arg("-e")
        .arg(format!("[{}]", list.display()))
        .status()
        .unwrap();
    assert!(status.success());

    let backup = dir.path().join("test.bnk.000");
    assert_eq!(std::fs::read(&backup).unwrap(), original);

    let edited = Bank::open(&bank).unwrap();
    assert_eq!(edited.list(), vec![("100", 0), ("200", 9), ("300", 1)]);
    assert_eq!(edited.extract("200").unwrap(), b"new audio");
    assert_eq!(edited.header_words()[4], 0xFFFF_0000);
}

#[test]
fn test_unknown_item_reported_but_batch_saved() {
    let dir = TempDir::new().unwrap();
    let bank = write_bank(dir.path());

    let output = bnktool()
        .arg(&bank)
        .args(["-e", "999.wem", "300.wem"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("999"));

    let edited = Bank::open(&bank).unwrap();
    assert_eq!(edited.list()[2], ("300", 0));
    assert!(dir.path().join("test.bnk.000").exists());
}

#[test]
fn test_invalid_bank_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.bnk");
    std::fs::write(&path, [0u8; 40]).unwrap();

    let output = bnktool().arg(&path).arg("-l").output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("DIDX"));
}

#[test]
fn test_missing_list_file_keeps_earlier_updates() {
    let dir = TempDir::new().unwrap();
    let bank = write_bank(dir.path());

    let replacement = dir.path().join("100.wem");
    std::fs::write(&replacement, b"updated").unwrap();
    let missing = dir.path().join("missing.txt");

    let output = bnktool()
        .arg(&bank)
        .arg("-u")
        .arg(&replacement)
        .arg("-e")
        .arg(format!("[{}]", missing.display()))
        .arg("300.wem")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("missing.txt"));

    let edited = Bank::open(&bank).unwrap();
    assert_eq!(edited.extract("100").unwrap(), b"updated");
    assert_eq!(edited.list()[2], ("300", 0));
    assert!(dir.path().join("test.bnk.000").exists());
}

#[test]
fn test_non_numeric_name_skipped_and_valid_update_saved() {
    let dir = TempDir::new().unwrap();
    let bank = write_bank(dir.path());

    let bad = dir.path().join("intro.wem");
    std::fs::write(&bad, b"not an id").unwrap();
    let padded = dir.path().join("0200.wem");
    std::fs::write(&padded, b"alias").unwrap();
    let good = dir.path().join("300.wem");
    std::fs::write(&good, b"replaced").unwrap();

    let output = bnktool()
        .arg(&bank)
        .arg("-u")
        .arg(&bad)
        .arg(&padded)
        .arg(&good)
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("intro"));
    assert!(stderr.contains("0200"));

    let edited = Bank::open(&bank).unwrap();
    assert_eq!(edited.list(), vec![("100", 13), ("200", 40), ("300", 8)]);
    assert_eq!(edited.extract("300").unwrap(), b"replaced");
}
