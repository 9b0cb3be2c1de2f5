//! Import batches through the session.

use image::RgbaImage;
use pdfcollate::export::Exporter;
use pdfcollate::import::Importer;
use pdfcollate::render::{MAX_THUMBNAIL_EDGE, Thumbnail, ThumbnailRenderer};
use pdfcollate::session::ImportNotice;
use pdfcollate::{PdfCollateError, Result, Session};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use crate::common::{list_pages, session, write_pdf};

#[tokio::test]
async fn test_bad_file_mid_batch() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", 1, 100);
    let bad = dir.path().join("broken.pdf");
    std::fs::write(&bad, b"%PDF-1.4 truncated").unwrap();
    let c = write_pdf(dir.path(), "c.pdf", 2, 300);

    let mut session = session();
    session.start_import(vec![a, bad.clone(), c]).unwrap();

    let mut failures = Vec::new();
    let mut finished = 0;
    while session.is_importing() {
        let event = session.recv_import_event().await;
        match session.handle_import_event(event) {
            ImportNotice::Failed(err) => failures.push(err),
            ImportNotice::Finished(_) => finished += 1,
            ImportNotice::Progress => {}
        }
    }

    assert_eq!(finished, 1);
    assert_eq!(failures.len(), 1);
    assert!(matches!(&failures[0], PdfCollateError::UnreadableFile { path, .. } if *path == bad));
    assert_eq!(
        list_pages(&session),
        vec![("a.pdf".to_string(), 0), ("c.pdf".to_string(), 0), ("c.pdf".to_string(), 1)]
    );

    let summary = session.last_import().unwrap();
    assert_eq!(summary.files_total, 3);
    assert_eq!(summary.files_imported, 2);
    assert!(!summary.cancelled);
}

#[tokio::test]
async fn test_every_page_has_thumbnail() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", 3, 100);
    let mut session = session();

    session.start_import(vec![a]).unwrap();
    session.wait_for_import().await;

    assert!(session.list().iter().all(|e| e.thumbnail().is_some()));
    assert!(session.list().iter().all(|e| e.source().is_absolute()));
}

#[tokio::test]
async fn test_cancel_keeps_delivered_pages() {
    let dir = TempDir::new().unwrap();
    let paths: Vec<_> = (0..20)
        .map(|i| write_pdf(dir.path(), &format!("f{i:02}.pdf"), 5, 100))
        .collect();
    let mut session = session();
    session.start_import(paths).unwrap();

    // Take the first page, then cancel.
    let event = session.recv_import_event().await;
    session.handle_import_event(event);
    assert!(session.cancel_import());

    let summary = session.wait_for_import().await.unwrap();
    assert_eq!(session.list().len(), summary.pages);
    assert!(summary.pages <= 100);
    assert!(!session.is_importing());
}

#[tokio::test]
async fn test_import_while_editing() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", 2, 100);
    let b = write_pdf(dir.path(), "b.pdf", 2, 200);
    let mut session = session();

    session.start_import(vec![a]).unwrap();
    session.wait_for_import().await;

    session.start_import(vec![b]).unwrap();
    session.remove(0).unwrap();
    session.wait_for_import().await;

    assert_eq!(
        list_pages(&session),
        vec![("a.pdf".to_string(), 1), ("b.pdf".to_string(), 0), ("b.pdf".to_string(), 1)]
    );
}

/// Renderer returning a full-resolution letter page.
struct FullPageRenderer;

impl ThumbnailRenderer for FullPageRenderer {
    fn render(&self, _path: &Path, _page_index: usize) -> Result<Thumbnail> {
        Ok(Thumbnail::new(RgbaImage::new(1236, 1600)))
    }
}

#[tokio::test]
async fn test_stored_thumbnails_are_capped() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", 3, 100);
    let mut session = Session::new(Importer::new(Arc::new(FullPageRenderer)), Exporter::new());

    session.start_import(vec![a]).unwrap();
    session.wait_for_import().await;
    session.remove(0).unwrap();

    let entries = session.list().iter().chain(session.trash().list());
    let mut count = 0;
    for entry in entries {
        let thumbnail = entry.thumbnail().unwrap();
        assert!(thumbnail.width() <= MAX_THUMBNAIL_EDGE);
        assert!(thumbnail.height() <= MAX_THUMBNAIL_EDGE);
        count += 1;
    }
    assert_eq!(count, 3);
}
