use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn tscodec_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("tscodec"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../tscodec/tests/fixtures")
        .join(name)
}

fn copy_fixture(dir: &Path, name: &str) -> String {
    let path = dir.join(name);
    fs::copy(fixture(name), &path).unwrap();
    path.to_str().unwrap().to_string()
}

fn run_ok(args: &[&str]) -> String {
    let output = tscodec_cmd().args(args).output().unwrap();
    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn lookup(file: &str, source: &str) -> String {
    run_ok(&["lookup", "-i", file, "--source", source])
        .trim_end_matches('\n')
        .to_string()
}

#[test]
fn test_edit_in_place_then_lookup() {
    let temp_dir = TempDir::new().unwrap();
    let file = copy_fixture(temp_dir.path(), "ProofNetwork.ja.ts");

    let stdout = run_ok(&[
        "edit",
        "-i",
        &file,
        "--source",
        "Invalid JDF",
        "--value",
        "無効なJDFです",
    ]);
    assert!(stdout.contains("✅ Updated"));
    assert_eq!(lookup(&file, "Invalid JDF"), "無効なJDFです");

    // Untouched messages keep their layout.
    let written = fs::read_to_string(&file).unwrap();
    assert!(written.contains("        <translation>無効なJDFです</translation>\n"));
    assert!(written.contains("<location filename=\"../abstractrestapi.cpp\" line=\"256\"/>"));
}

#[test]
fn test_edit_unfinished_is_not_served() {
    let temp_dir = TempDir::new().unwrap();
    let file = copy_fixture(temp_dir.path(), "ProofNetwork.ja.ts");
    run_ok(&[
        "edit",
        "-i",
        &file,
        "--source",
        "Invalid JDF",
        "--value",
        "無効なJDF",
        "--unfinished",
    ]);
    assert_eq!(lookup(&file, "Invalid JDF"), "Invalid JDF");

    let stdout = run_ok(&[
        "lookup",
        "-i",
        &file,
        "--source",
        "Invalid JDF",
        "--include-unfinished",
    ]);
    assert_eq!(stdout, "無効なJDF\n");
}

#[test]
fn test_edit_dry_run_and_unknown_message() {
    let temp_dir = TempDir::new().unwrap();
    let file = copy_fixture(temp_dir.path(), "ProofNetwork.ja.ts");
    let before = fs::read_to_string(&file).unwrap();

    let stdout = run_ok(&[
        "edit",
        "-i",
        &file,
        "--source",
        "Invalid JDF",
        "--value",
        "x",
        "--dry-run",
    ]);
    assert!(stdout.contains("Dry run"));
    assert_eq!(fs::read_to_string(&file).unwrap(), before);

    let output = tscodec_cmd()
        .args(["edit", "-i", &file, "--source", "No such text", "--value", "x"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Message not found"));
}

#[test]
fn test_convert_roundtrip_through_csv() {
    let temp_dir = TempDir::new().unwrap();
    let csv = temp_dir.path().join("ProofNetwork.csv");
    let back = temp_dir.path().join("ProofNetwork.ja.ts");
    let translated = fixture("ProofNetwork_translated.ja.ts");

    run_ok(&[
        "convert",
        "-i",
        translated.to_str().unwrap(),
        "-o",
        csv.to_str().unwrap(),
    ]);
    let table = fs::read_to_string(&csv).unwrap();
    assert!(table.starts_with("context,source,comment,extracomment,translation,state,form,locations"));

    run_ok(&[
        "convert",
        "-i",
        csv.to_str().unwrap(),
        "-o",
        back.to_str().unwrap(),
        "--lang",
        "ja_JP",
    ]);
    assert_eq!(
        fs::read_to_string(&back).unwrap(),
        fs::read_to_string(&translated).unwrap()
    );
}

#[test]
fn test_convert_rejects_unknown_format() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("out.txt");
    let output = tscodec_cmd()
        .args([
            "convert",
            "-i",
            fixture("ProofNetwork.ja.ts").to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--output-format",
            "po",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Supported formats"));
}

#[test]
fn test_import_csv_applies_known_rows() {
    let temp_dir = TempDir::new().unwrap();
    let file = copy_fixture(temp_dir.path(), "ProofNetwork.ja.ts");
    let csv = temp_dir.path().join("ja.csv");
    fs::write(
        &csv,
        "context,source,comment,extracomment,translation,state,form,locations\n\
         QObject,Invalid JDF,,,無効なJDFです,,,\n\
         QObject,Not in the file,,,何か,,,\n\
         QObject,JSON error: %1,,,,,,\n",
    )
    .unwrap();

    let output = tscodec_cmd()
        .args([
            "import",
            "-i",
            &file,
            "--csv",
            csv.to_str().unwrap(),
            "--mark-finished",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Applied 1 translation(s), 0 unchanged, 1 empty row(s) skipped"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Not in the file"));

    assert_eq!(lookup(&file, "Invalid JDF"), "無効なJDFです");
}

#[test]
fn test_exported_csv_filled_and_imported_as_finished() {
    let temp_dir = TempDir::new().unwrap();
    let file = copy_fixture(temp_dir.path(), "ProofNetwork.ja.ts");
    let csv = temp_dir.path().join("ja.csv");
    run_ok(&["convert", "-i", &file, "-o", csv.to_str().unwrap()]);

    let mut records =
        tscodec::formats::csv::read_records(fs::File::open(&csv).unwrap()).unwrap();
    let row = records
        .iter_mut()
        .find(|r| r.source == "Invalid JDF")
        .unwrap();
    assert_eq!(row.state, "unfinished");
    row.translation = "無効なJDFです".to_string();
    tscodec::formats::csv::write_records(&records, fs::File::create(&csv).unwrap()).unwrap();

    let stdout = run_ok(&[
        "import",
        "-i",
        &file,
        "--csv",
        csv.to_str().unwrap(),
        "--mark-finished",
    ]);
    assert!(stdout.contains("Applied 1 translation(s)"));
    assert_eq!(lookup(&file, "Invalid JDF"), "無効なJDFです");

    let written = fs::read_to_string(&file).unwrap();
    assert!(written.contains("        <translation>無効なJDFです</translation>\n"));
}

#[test]
fn test_normalize_relative_and_back() {
    let temp_dir = TempDir::new().unwrap();
    let file = copy_fixture(temp_dir.path(), "ProofNetwork.ja.ts");
    let original = fs::read_to_string(&file).unwrap();

    run_ok(&["normalize", "-i", &file]);
    let relative = fs::read_to_string(&file).unwrap();
    assert_ne!(relative, original);
    assert!(relative.contains("line=\"+"));

    run_ok(&["normalize", "-i", &file, "--locations", "absolute"]);
    assert_eq!(fs::read_to_string(&file).unwrap(), original);
}

#[test]
fn test_normalize_without_locations() {
    let temp_dir = TempDir::new().unwrap();
    let file = copy_fixture(temp_dir.path(), "ProofNetwork.ja.ts");
    let out = temp_dir.path().join("bare.ts");
    run_ok(&[
        "normalize",
        "-i",
        &file,
        "-o",
        out.to_str().unwrap(),
        "--locations",
        "none",
        "--sort",
    ]);
    let bare = fs::read_to_string(&out).unwrap();
    assert!(!bare.contains("<location"));
    assert_eq!(bare.matches("<message>").count(), 36);
}
