// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{AlignmentPair, UNALIGNED_TARGET, load, normalize_source, parse, parse_str};
use crate::error::{AlignmentError, TmError};

fn pairs(raw: &str) -> Vec<AlignmentPair> {
    parse("test.txt", raw.as_bytes()).unwrap()
}

#[test]
fn test_parse_two_pairs() {
    assert_eq!(
        pairs("bo1\ten1\nbo2\ten2"),
        vec![AlignmentPair::new("bo1", "en1"), AlignmentPair::new("bo2", "en2")]
    );
}

#[test]
fn test_parse_empty_input() {
    assert!(pairs("").is_empty());
    assert!(pairs("\n\n\r\n").is_empty());
}

#[test]
fn test_source_only_line_gets_placeholder() {
    let parsed = pairs("boOnly");
    assert_eq!(parsed, vec![AlignmentPair::new("boOnly", "\n")]);
    assert!(parsed[0].is_unaligned());
    assert_eq!(parsed[0].target, UNALIGNED_TARGET);
}

#[test]
fn test_split_on_first_tab_only() {
    assert_eq!(
        pairs("bo\ten\twith\ttabs"),
        vec![AlignmentPair::new("bo", "en\twith\ttabs")]
    );
}

#[test]
fn test_leading_tab_gives_empty_source() {
    assert_eq!(pairs("\ten only"), vec![AlignmentPair::new("", "en only")]);
}

#[test]
fn test_blank_lines_skipped_and_crlf_stripped() {
    let raw = "bo1\ten1\r\n\r\n\nbo2\ten2\r\n";
    assert_eq!(
        pairs(raw),
        vec![AlignmentPair::new("bo1", "en1"), AlignmentPair::new("bo2", "en2")]
    );
}

#[test]
fn test_pair_count_matches_non_blank_lines() {
    let raw = "a\tA\n\nb\n\tC\n\nd\tD\te\n";
    let non_blank = raw.split('\n').filter(|l| !l.is_empty()).count();
    assert_eq!(pairs(raw).len(), non_blank);
    assert_eq!(parse_str(raw).len(), non_blank);
}

#[test]
fn test_double_shad_normalized_in_source_only() {
    let parsed = pairs("བཀྲ་ཤིས།།\tgreetings།།");
    assert_eq!(parsed[0].source, "བཀྲ་ཤིས། །");
    assert_eq!(parsed[0].target, "greetings།།");
}

#[test]
fn test_normalize_is_idempotent() {
    for input in ["།།", "།།།", "ཀ།།ཁ།།།།ག", "། །", "no shad", ""] {
        let once = normalize_source(input);
        assert_eq!(normalize_source(&once), once, "input {input:?}");
        assert!(!once.contains("།།"));
    }
    assert_eq!(normalize_source("།།།"), "། ། །");
}

#[test]
fn test_invalid_utf8_line_rejected() {
    let mut raw = b"bo1\ten1\n".to_vec();
    raw.extend_from_slice(&[b'b', 0xff, b'\t', b'e']);
    raw.extend_from_slice(b"\nbo3\ten3\n");

    let err = parse("TM0731.txt", &raw).unwrap_err();
    match err {
        TmError::Alignment(boxed) => match *boxed {
            AlignmentError::MalformedLine {
                file, line_number, ..
            } => {
                assert_eq!(file, "TM0731.txt");
                assert_eq!(line_number, 2);
            }
        },
        other => panic!("expected alignment error, got {other:?}"),
    }
}

#[test]
fn test_invalid_utf8_after_crlf_lines_reports_its_line() {
    let mut raw = b"bo1\ten1\r\n\r\nbo3\ten3\r\n".to_vec();
    raw.extend_from_slice(&[b'b', b'o', 0xc3, b'\t', b'e', b'\r', b'\n']);

    let err = parse("TM0731.txt", &raw).unwrap_err();
    match err {
        TmError::Alignment(boxed) => match *boxed {
            AlignmentError::MalformedLine {
                line_number,
                content,
                ..
            } => {
                assert_eq!(line_number, 4);
                assert_eq!(content, "bo\u{fffd}\te");
            }
        },
        other => panic!("expected alignment error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_load_reads_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("TM0001_test.txt");
    std::fs::write(&path, "bo sent\ten sent").unwrap();

    let parsed = load(&path).await.unwrap();
    assert_eq!(parsed, vec![AlignmentPair::new("bo sent", "en sent")]);
}

#[tokio::test]
async fn test_load_missing_file_is_fs_error() {
    let temp = tempfile::tempdir().unwrap();
    let err = load(&temp.path().join("missing.txt")).await.unwrap_err();
    assert!(matches!(err, TmError::Fs(_)), "got {err:?}");
}
