use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const QUEUES_V1: &str = r#"#include "queuesapi.h"

CancelableFuture<QVector<Queue>> QueuesApi::queues()
{
    return d->get(QStringLiteral("/queues"), [](const QJsonDocument &doc) {
        if (!doc.isArray())
            return WithFailure(QObject::tr("Can't read queues from server response"),
                               NETWORK_MODULE_CODE, NetworkErrorCode::InvalidReply);
        //: Shown when a queue has no id
        return failure(QObject::tr("Can't read id from server response"));
    });
}
"#;

const QUEUES_V2: &str = r#"#include "queuesapi.h"

CancelableFuture<QVector<Queue>> QueuesApi::queues()
{
    return d->get(QStringLiteral("/queues"), [](const QJsonDocument &doc) {
        if (!doc.isArray())
            return WithFailure(QObject::tr("Can't read queues from server response"),
                               NETWORK_MODULE_CODE, NetworkErrorCode::InvalidReply);
        return failure(QObject::tr("%n queue(s) skipped", "", doc.size()));
    });
}
"#;

fn tscodec_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("tscodec"))
}

fn run_ok_in(dir: &Path, args: &[&str]) -> String {
    let output = tscodec_cmd().current_dir(dir).args(args).output().unwrap();
    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("fiery")).unwrap();
    fs::create_dir_all(dir.path().join("translations")).unwrap();
    fs::write(dir.path().join("fiery/queuesapi.cpp"), QUEUES_V1).unwrap();
    dir
}

#[test]
fn test_extract_writes_relative_locations() {
    let dir = project();
    let stdout = run_ok_in(
        dir.path(),
        &[
            "extract",
            "--sources",
            "fiery/*.cpp",
            "-o",
            "translations/ProofNetwork.ja.ts",
            "-l",
            "ja_JP",
        ],
    );
    assert!(stdout.contains("Extracted 2 message(s) from 1 file(s)"));

    let ts = fs::read_to_string(dir.path().join("translations/ProofNetwork.ja.ts")).unwrap();
    assert!(ts.contains("<TS version=\"2.1\" language=\"ja_JP\">"));
    assert!(ts.contains("<location filename=\"../fiery/queuesapi.cpp\" line=\"+7\"/>"));
    assert!(ts.contains("<extracomment>Shown when a queue has no id</extracomment>"));
    assert_eq!(ts.matches("<translation type=\"unfinished\"></translation>").count(), 2);
}

#[test]
fn test_update_marks_vanished_and_adds_numerus() {
    let dir = project();
    let ts = "translations/ProofNetwork.ja.ts";
    run_ok_in(
        dir.path(),
        &["extract", "--sources", "fiery/*.cpp", "-o", ts, "-l", "ja_JP"],
    );
    run_ok_in(
        dir.path(),
        &[
            "edit",
            "-i",
            ts,
            "--source",
            "Can't read id from server response",
            "--value",
            "サーバーの応答からIDを読み取れません",
        ],
    );

    fs::write(dir.path().join("fiery/queuesapi.cpp"), QUEUES_V2).unwrap();
    let stdout = run_ok_in(
        dir.path(),
        &["update", "--sources", "fiery/*.cpp", "--ts", ts, "--json"],
    );
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["kept"], 1);
    assert_eq!(report["added"], 1);
    assert_eq!(report["vanished"], 1);

    let written = fs::read_to_string(dir.path().join(ts)).unwrap();
    assert!(written.contains("<message numerus=\"yes\">"));
    assert!(written.contains(
        "<translation type=\"vanished\">サーバーの応答からIDを読み取れません</translation>"
    ));

    // The vanished translation is no longer served.
    let stdout = run_ok_in(
        dir.path(),
        &["lookup", "-i", ts, "--source", "Can't read id from server response"],
    );
    assert_eq!(stdout, "Can't read id from server response\n");
}

#[test]
fn test_update_no_obsolete_prunes() {
    let dir = project();
    let ts = "translations/ProofNetwork.ja.ts";
    run_ok_in(
        dir.path(),
        &["extract", "--sources", "fiery/*.cpp", "-o", ts, "-l", "ja_JP"],
    );
    fs::write(dir.path().join("fiery/queuesapi.cpp"), QUEUES_V2).unwrap();
    let stdout = run_ok_in(
        dir.path(),
        &[
            "update",
            "--sources",
            "fiery/*.cpp",
            "--ts",
            ts,
            "--no-obsolete",
            "--locations",
            "none",
        ],
    );
    assert!(stdout.contains("pruned: 1"));

    let written = fs::read_to_string(dir.path().join(ts)).unwrap();
    assert!(!written.contains("Can't read id from server response"));
    assert!(!written.contains("<location"));
}

#[test]
fn test_config_file_changes_defaults() {
    let dir = project();
    fs::write(
        dir.path().join("tscodec.toml"),
        "[extract]\ndefault_context = \"QueuesApi\"\n\n[translator]\ninclude_unfinished = true\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("fiery/queuesapi.cpp"),
        "void QueuesApi::refresh() { emit error(tr(\"Queue is paused\")); }\n",
    )
    .unwrap();

    let ts = "translations/ProofNetwork.ja.ts";
    run_ok_in(
        dir.path(),
        &["extract", "--sources", "fiery/*.cpp", "-o", ts, "-l", "ja_JP"],
    );
    let written = fs::read_to_string(dir.path().join(ts)).unwrap();
    assert!(written.contains("<name>QueuesApi</name>"));

    run_ok_in(
        dir.path(),
        &[
            "edit",
            "-i",
            ts,
            "--context",
            "QueuesApi",
            "--source",
            "Queue is paused",
            "--value",
            "キューは一時停止中です",
            "--unfinished",
        ],
    );
    let stdout = run_ok_in(
        dir.path(),
        &[
            "lookup",
            "-i",
            ts,
            "--context",
            "QueuesApi",
            "--source",
            "Queue is paused",
        ],
    );
    assert_eq!(stdout, "キューは一時停止中です\n");
}

#[test]
fn test_missing_explicit_config_fails() {
    let dir = project();
    let output = tscodec_cmd()
        .current_dir(dir.path())
        .args(["--config", "missing.toml", "stats", "-i", "fiery/queuesapi.cpp"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(
        String::from_utf8_lossy(&output.stderr)
            .contains("Error: Config file does not exist: missing.toml")
    );
}
