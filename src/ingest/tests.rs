use lopdf::dictionary;

use super::*;
use crate::config::Config;

fn config_with_pdf(path: &str) -> Config {
    let mut config = Config::from_lookup(|_| None).expect("defaults should parse");
    config.pdf_path = path.into();
    config
}

#[tokio::test]
async fn missing_pdf_aborts_before_any_side_effect() {
    // Nonexistent path plus no API key and no database: the path check must
    // fire first, so nothing else is touched.
    let config = config_with_pdf("no/such/document.pdf");

    let result = ingest_pdf(&config).await;

    match result {
        Err(RagError::PdfNotFound(path)) => {
            assert_eq!(path, config.pdf_path);
        }
        other => panic!("Expected PdfNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn unreadable_provider_key_fails_before_network_calls() {
    // An existing file but no configured API key: the provider construction
    // error must surface before any embedding request is attempted.
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let path = dir.path().join("empty.pdf");

    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    doc.objects.insert(
        pages_id,
        lopdf::Object::Dictionary(lopdf::dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<lopdf::Object>::new(),
            "Count" => 0,
        }),
    );
    let catalog_id = doc.add_object(lopdf::dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(&path).expect("PDF should save");

    let config = config_with_pdf(path.to_str().expect("path should be UTF-8"));

    let result = ingest_pdf(&config).await;

    match result {
        Err(RagError::Config(message)) => {
            assert!(message.contains("OPENAI_API_KEY"));
        }
        other => panic!("Expected a configuration error, got {other:?}"),
    }
}

#[test]
fn report_counts_are_copyable() {
    let report = IngestReport {
        pages: 12,
        chunks: 87,
    };
    let copied = report;

    assert_eq!(copied.pages, 12);
    assert_eq!(copied.chunks, 87);
}
