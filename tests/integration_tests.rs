use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tripcheck::batch::BatchVerifier;
use tripcheck::fetch::BasicClient;
use tripcheck::metric::Metric;
use tripcheck::output::append_records;
use tripcheck::report::{FailureKind, Outcome};

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

#[tokio::test]
async fn test_full_pipeline_mixed_batch() {
    // A decompresses to two data rows, B is unreachable
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a.csv.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(gzip(b"header\nrow1\nrow2\n")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b.csv.gz"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let locators = vec![
        format!("{}/a.csv.gz", server.uri()),
        format!("{}/b.csv.gz", server.uri()),
    ];

    let verifier = BatchVerifier::new(BasicClient::new(), Metric::LineCount);
    let report = verifier.process_all(&locators, Some(2)).await.unwrap();

    // Every locator is accounted for, in input order
    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.entries[0].locator, locators[0]);
    assert_eq!(report.entries[1].locator, locators[1]);

    assert_eq!(report.entries[0].outcome, Outcome::Measured { value: 2 });
    assert!(matches!(
        &report.entries[1].outcome,
        Outcome::Failed {
            kind: FailureKind::Fetch,
            message,
        } if !message.is_empty()
    ));

    assert_eq!(report.total, 2);
    assert_eq!(report.matches_expected(), Some(true));
}

#[tokio::test]
async fn test_full_pipeline_byte_length_batch() {
    let server = MockServer::start().await;
    let payloads: [&[u8]; 2] = [b"header\nrow1\n", b"some,other,content\n"];

    for (i, payload) in payloads.iter().enumerate() {
        Mock::given(method("GET"))
            .and(path(format!("/part-{i}.csv.gz")))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(gzip(payload)))
            .mount(&server)
            .await;
    }

    let locators: Vec<_> = (0..payloads.len())
        .map(|i| format!("{}/part-{i}.csv.gz", server.uri()))
        .collect();

    let expected: i64 = payloads.iter().map(|p| p.len() as i64).sum();

    let verifier = BatchVerifier::new(BasicClient::new(), Metric::ByteLength);
    let report = verifier.process_all(&locators, Some(expected)).await.unwrap();

    assert_eq!(report.total, expected);
    assert_eq!(report.matches_expected(), Some(true));
    assert_eq!(report.failed_count(), 0);
}

#[tokio::test]
async fn test_full_pipeline_persists_csv() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok.csv.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(gzip(b"header\nrow1\n")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/bad.csv.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"not gzip at all".to_vec()))
        .mount(&server)
        .await;

    let locators = vec![
        format!("{}/ok.csv.gz", server.uri()),
        format!("{}/bad.csv.gz", server.uri()),
    ];

    let verifier = BatchVerifier::new(BasicClient::new(), Metric::LineCount);
    let report = verifier.process_all(&locators, None).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("results.csv");
    append_records(csv_path.to_str().unwrap(), &report).unwrap();

    let content = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 3); // header + one row per locator
    assert!(lines[1].contains("ok.csv.gz"));
    assert!(lines[2].contains("decompress_error"));
}

#[tokio::test]
async fn test_degenerate_empty_payload_counts_as_success() {
    // An empty decompressed payload yields the -1 sentinel, recorded as a
    // measured value, not a failure
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/empty.csv.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(gzip(b"")))
        .mount(&server)
        .await;

    let verifier = BatchVerifier::new(BasicClient::new(), Metric::LineCount);
    let locators = vec![format!("{}/empty.csv.gz", server.uri())];
    let report = verifier.process_all(&locators, None).await.unwrap();

    assert_eq!(report.entries[0].outcome, Outcome::Measured { value: -1 });
    assert_eq!(report.failed_count(), 0);
    assert_eq!(report.total, -1);
}
