//! Export behavior: destinations, compression, inherited attributes.

use lopdf::{Document, Object};
use pdfcollate::config::CompressionLevel;
use pdfcollate::export::Exporter;
use pdfcollate::import::Importer;
use pdfcollate::{Config, Session};
use rstest::rstest;
use std::sync::Arc;
use tempfile::TempDir;

use crate::common::{StubRenderer, import_all, page_widths, session, write_pdf};

#[tokio::test]
async fn test_extension_is_appended() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", 1, 100);
    let mut session = session();
    import_all(&mut session, vec![a]).await;

    let stats = session.export(&dir.path().join("merged")).await.unwrap();

    assert_eq!(stats.output_path, dir.path().join("merged.pdf"));
    assert!(dir.path().join("merged.pdf").exists());
    assert!(!dir.path().join("merged").exists());
}

#[tokio::test]
async fn test_existing_destination_is_replaced() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", 2, 100);
    let out = write_pdf(dir.path(), "out.pdf", 3, 500);
    let mut session = session();
    import_all(&mut session, vec![a]).await;

    session.export(&out).await.unwrap();
    assert_eq!(page_widths(&out), vec![100, 101]);
}

#[tokio::test]
async fn test_exporting_over_a_source() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", 2, 100);
    let mut session = session();
    import_all(&mut session, vec![a.clone()]).await;
    session.move_entry(1, 0).unwrap();

    session.export(&a).await.unwrap();
    assert_eq!(page_widths(&a), vec![101, 100]);
}

#[tokio::test]
async fn test_inherited_resources_are_carried() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", 2, 100);
    let mut session = session();
    import_all(&mut session, vec![a]).await;
    session.remove(0).unwrap();

    let out = dir.path().join("out.pdf");
    session.export(&out).await.unwrap();

    let doc = Document::load(&out).unwrap();
    let page_id = *doc.get_pages().get(&1).unwrap();
    let page = doc.get_dictionary(page_id).unwrap();
    let font = page
        .get(b"Resources")
        .and_then(Object::as_dict)
        .and_then(|r| r.get(b"Font"))
        .and_then(Object::as_dict)
        .and_then(|f| f.get(b"F1"))
        .and_then(Object::as_reference)
        .unwrap();
    assert!(doc.get_dictionary(font).is_ok());
    assert!(page.has(b"Contents"));
}

#[rstest]
#[case(CompressionLevel::None)]
#[case(CompressionLevel::Standard)]
#[case(CompressionLevel::Maximum)]
#[tokio::test]
async fn test_compression_levels(#[case] compression: CompressionLevel) {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", 3, 100);
    let config = Config {
        compression,
        ..Config::default()
    };
    let mut session = Session::new(
        Importer::new(Arc::new(StubRenderer)),
        Exporter::from_config(&config),
    );
    import_all(&mut session, vec![a]).await;

    let out = dir.path().join("out.pdf");
    let stats = session.export(&out).await.unwrap();

    assert!(stats.file_size > 0);
    assert_eq!(page_widths(&out), vec![100, 101, 102]);
}

#[tokio::test]
async fn test_many_sources_keep_list_order() {
    let dir = TempDir::new().unwrap();
    let paths: Vec<_> = (0..6)
        .map(|i| write_pdf(dir.path(), &format!("s{i}.pdf"), 2, 100 * (i + 1)))
        .collect();
    let config = Config {
        jobs: Some(4),
        ..Config::default()
    };
    let mut session = Session::new(
        Importer::new(Arc::new(StubRenderer)),
        Exporter::from_config(&config),
    );
    import_all(&mut session, paths).await;

    // Reverse the whole list.
    let n = session.list().len();
    for i in 0..n {
        session.move_entry(n - 1, i).unwrap();
    }

    let out = dir.path().join("reversed.pdf");
    session.export(&out).await.unwrap();

    let expected: Vec<i64> = (0..6)
        .rev()
        .flat_map(|i| {
            let base = 100 * (i + 1);
            [base + 1, base]
        })
        .collect();
    assert_eq!(page_widths(&out), expected);
}
