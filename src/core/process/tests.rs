// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use super::builder::ProcessBuilder;
use crate::error::{ProcessError, TmError};

fn sh(script: &str) -> ProcessBuilder {
    ProcessBuilder::which("sh").unwrap().arg("-c").arg(script)
}

#[test]
fn test_which_missing_executable() {
    let err = ProcessBuilder::which("definitely-not-a-real-program-4242").unwrap_err();
    assert!(matches!(err, ProcessError::ExecutableNotFound { .. }));
    assert_eq!(ProcessBuilder::find("definitely-not-a-real-program-4242"), None);
}

#[test]
fn test_which_is_cached() {
    let first = ProcessBuilder::find("sh").unwrap();
    let second = ProcessBuilder::find("sh").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_command_line_quotes_spaces() {
    let builder = ProcessBuilder::new("/usr/bin/aligner").args(["a.txt", "with space.txt"]);
    assert_eq!(
        builder.command_line(),
        "/usr/bin/aligner a.txt \"with space.txt\""
    );
}

#[tokio::test]
async fn test_captures_stdout_and_stderr() {
    let output = sh("echo out; echo err >&2")
        .run_with_cancellation(CancellationToken::new())
        .await
        .unwrap();
    assert!(output.success());
    assert_eq!(output.stdout(), "out\n");
    assert_eq!(output.stderr(), "err\n");
    assert!(!output.is_interrupted());
}

#[tokio::test]
async fn test_respects_cwd() {
    let temp = tempfile::tempdir().unwrap();
    let output = sh("pwd")
        .cwd(temp.path())
        .run_with_cancellation(CancellationToken::new())
        .await
        .unwrap();
    let reported = std::path::PathBuf::from(output.stdout().trim());
    assert_eq!(
        reported.canonicalize().unwrap(),
        temp.path().canonicalize().unwrap()
    );
}

#[tokio::test]
async fn test_non_zero_exit_is_error() {
    let err = sh("echo broken >&2; exit 3")
        .name("aligner")
        .run_with_cancellation(CancellationToken::new())
        .await
        .unwrap_err();
    match err {
        TmError::Process(boxed) => match *boxed {
            ProcessError::NonZeroExit {
                command,
                code,
                stderr,
            } => {
                assert_eq!(command, "aligner");
                assert_eq!(code, 3);
                assert_eq!(stderr, "broken");
            }
            other => panic!("expected non-zero exit, got {other:?}"),
        },
        other => panic!("expected process error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_cancellation_kills_process() {
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let output = sh("exec sleep 30").run_with_cancellation(token).await.unwrap();

    assert!(output.is_interrupted());
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_already_cancelled_does_not_spawn() {
    let token = CancellationToken::new();
    token.cancel();
    let output = ProcessBuilder::new("definitely-not-a-real-program-4242")
        .run_with_cancellation(token)
        .await
        .unwrap();
    assert!(output.is_interrupted());
}

#[tokio::test]
async fn test_spawn_failure() {
    let err = ProcessBuilder::new("/nonexistent/aligner")
        .run_with_cancellation(CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, TmError::Process(_)), "got {err:?}");
}
