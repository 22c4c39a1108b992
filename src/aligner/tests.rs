// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::{Path, PathBuf};

use futures_util::future::BoxFuture;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{Aligner, CommandAligner, align_and_publish, parse_output_marker};
use crate::config::types::{AlignerConfig, TmConfig};
use crate::error::{ProcessError, TmError, TmResult};
use crate::gateway::fake::FakeHub;
use crate::tm::Provenance;
use crate::tm::service::{OutcomeKind, TmService};

fn shell_aligner(script: &str) -> CommandAligner {
    CommandAligner::new(&AlignerConfig {
        command: "sh".to_string(),
        args: vec!["-c".to_string(), script.to_string(), "aligner".to_string()],
    })
}

/// Pairs the lines of both inputs, like the real aligner does.
struct PasteAligner;

impl Aligner for PasteAligner {
    fn align<'a>(
        &'a self,
        source: &'a Path,
        target: &'a Path,
        work_dir: &'a Path,
        _token: CancellationToken,
    ) -> BoxFuture<'a, TmResult<PathBuf>> {
        Box::pin(async move {
            let bo = tokio::fs::read_to_string(source).await?;
            let en = tokio::fs::read_to_string(target).await?;
            let joined: Vec<String> = bo
                .lines()
                .zip(en.lines())
                .map(|(b, e)| format!("{b}\t{e}"))
                .collect();
            let out = work_dir.join("aligned.txt");
            tokio::fs::write(&out, joined.join("\n")).await?;
            Ok(out)
        })
    }
}

async fn text_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/0731-bo.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("bo1\nbo2\n"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/0731-en.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("en1\nen2\n"))
        .mount(&server)
        .await;
    server
}

fn provenance(server: &MockServer, text_id: &str) -> Provenance {
    Provenance::builder()
        .text_id(text_id)
        .source_file_url(format!("{}/data/0731-bo.txt", server.uri()))
        .target_file_url(format!("{}/data/0731-en.txt", server.uri()))
        .build()
}

#[test]
fn test_parse_output_marker_takes_last_line() {
    let stdout = "loading model\n[OUTPUT] first.txt\nscoring\n[OUTPUT]  out/TM0731.txt \n";
    assert_eq!(
        parse_output_marker(stdout),
        Some(PathBuf::from("out/TM0731.txt"))
    );
}

#[test]
fn test_parse_output_marker_absent_or_empty() {
    assert_eq!(parse_output_marker("done\n"), None);
    assert_eq!(parse_output_marker("[OUTPUT]   \n"), None);
    assert_eq!(parse_output_marker(""), None);
}

#[tokio::test]
async fn test_command_aligner_resolves_relative_output() {
    let work = tempfile::tempdir().unwrap();
    let source = work.path().join("a-bo.txt");
    let target = work.path().join("a-en.txt");
    std::fs::write(&source, "bo1\nbo2\n").unwrap();
    std::fs::write(&target, "en1\nen2\n").unwrap();

    let aligner = shell_aligner("paste \"$1\" \"$2\" > out.txt && echo \"[OUTPUT] out.txt\"");
    let produced = aligner
        .align(&source, &target, work.path(), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(produced, work.path().join("out.txt"));
    assert_eq!(
        std::fs::read_to_string(produced).unwrap(),
        "bo1\ten1\nbo2\ten2\n"
    );
}

#[tokio::test]
async fn test_command_aligner_without_marker_fails() {
    let work = tempfile::tempdir().unwrap();
    let aligner = shell_aligner("echo aligned");

    let err = aligner
        .align(
            Path::new("a.txt"),
            Path::new("b.txt"),
            work.path(),
            CancellationToken::new(),
        )
        .await
        .unwrap_err();

    match err {
        TmError::Process(boxed) => {
            assert!(matches!(*boxed, ProcessError::MissingOutput { .. }));
        }
        other => panic!("expected missing output, got {other:?}"),
    }
}

#[tokio::test]
async fn test_command_aligner_marker_to_missing_file_fails() {
    let work = tempfile::tempdir().unwrap();
    let aligner = shell_aligner("echo \"[OUTPUT] nowhere.txt\"");

    let err = aligner
        .align(
            Path::new("a.txt"),
            Path::new("b.txt"),
            work.path(),
            CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, TmError::Fs(_)), "got {err:?}");
}

#[tokio::test]
async fn test_command_aligner_cancelled() {
    let work = tempfile::tempdir().unwrap();
    let token = CancellationToken::new();
    token.cancel();

    let err = shell_aligner("exec sleep 30")
        .align(Path::new("a.txt"), Path::new("b.txt"), work.path(), token)
        .await
        .unwrap_err();

    assert!(matches!(err, TmError::Cancelled));
}

#[tokio::test]
async fn test_missing_aligner_executable() {
    let work = tempfile::tempdir().unwrap();
    let aligner = CommandAligner::new(&AlignerConfig {
        command: "definitely-not-an-aligner-4242".to_string(),
        args: Vec::new(),
    });

    let err = aligner
        .align(
            Path::new("a.txt"),
            Path::new("b.txt"),
            work.path(),
            CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, TmError::Process(_)), "got {err:?}");
}

#[tokio::test]
async fn test_align_and_publish_creates_tm() {
    let server = text_server().await;
    let work = tempfile::tempdir().unwrap();
    let settings = TmConfig {
        scratch_dir: Some(work.path().join("scratch")),
        ..TmConfig::default()
    };
    let hub = FakeHub::new();
    let service = TmService::new(hub.gateway(&settings), settings);

    let outcome = align_and_publish(
        &service,
        &PasteAligner,
        &provenance(&server, "0731"),
        work.path(),
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(outcome.kind, OutcomeKind::Created);
    assert_eq!(outcome.tm_id.as_str(), "TM0731");
    assert_eq!(
        std::fs::read_to_string(work.path().join("0731-bo.txt")).unwrap(),
        "bo1\nbo2\n"
    );
    assert!(work.path().join("0731-en.txt").is_file());
    assert!(hub.has_repo("TM0731"));
}

#[tokio::test]
async fn test_align_and_publish_missing_text_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let work = tempfile::tempdir().unwrap();
    let settings = TmConfig::default();
    let hub = FakeHub::new();
    let service = TmService::new(hub.gateway(&settings), settings);

    let err = align_and_publish(
        &service,
        &PasteAligner,
        &provenance(&server, "0731"),
        work.path(),
        CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, TmError::Network(_)), "got {err:?}");
    assert!(!err.is_retryable());
    assert!(hub.calls().is_empty());
}

#[tokio::test]
async fn test_align_and_publish_rejects_bad_text_id_first() {
    let server = text_server().await;
    let work = tempfile::tempdir().unwrap();
    let settings = TmConfig::default();
    let hub = FakeHub::new();
    let service = TmService::new(hub.gateway(&settings), settings);

    let err = align_and_publish(
        &service,
        &PasteAligner,
        &provenance(&server, "bad/id"),
        work.path(),
        CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, TmError::Config(_)), "got {err:?}");
    assert!(server.received_requests().await.unwrap().is_empty());
}
