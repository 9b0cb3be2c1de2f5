//! End-to-end editing sessions.

use pdfcollate::PdfCollateError;
use tempfile::TempDir;

use crate::common::{import_all, list_pages, page_widths, session, write_pdf};

fn pages(spec: &[(&str, usize)]) -> Vec<(String, usize)> {
    spec.iter().map(|(n, p)| (n.to_string(), *p)).collect()
}

#[tokio::test]
async fn test_import_reorder_export() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "A.pdf", 2, 100);
    let b = write_pdf(dir.path(), "B.pdf", 2, 200);
    let mut session = session();

    import_all(&mut session, vec![a, b]).await;
    assert_eq!(
        list_pages(&session),
        pages(&[("A.pdf", 0), ("A.pdf", 1), ("B.pdf", 0), ("B.pdf", 1)])
    );

    session.move_entry(3, 0).unwrap();
    assert_eq!(
        list_pages(&session),
        pages(&[("B.pdf", 1), ("A.pdf", 0), ("A.pdf", 1), ("B.pdf", 0)])
    );
    assert_eq!(session.list().get(0).unwrap().label(), "1. B.pdf — Page 2");

    let out = dir.path().join("merged.pdf");
    let stats = session.export(&out).await.unwrap();

    assert_eq!(stats.pages, 4);
    assert_eq!(stats.source_files, 2);
    assert_eq!(page_widths(&out), vec![201, 100, 101, 200]);
}

#[tokio::test]
async fn test_remove_then_restore() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "A.pdf", 2, 100);
    let b = write_pdf(dir.path(), "B.pdf", 2, 200);
    let mut session = session();
    import_all(&mut session, vec![a, b]).await;

    let id = session.remove(1).unwrap();
    assert_eq!(session.list().len(), 3);
    assert_eq!(session.trash().len(), 1);

    let out = dir.path().join("without.pdf");
    session.export(&out).await.unwrap();
    assert_eq!(page_widths(&out), vec![100, 200, 201]);

    assert_eq!(session.restore(id), Some(3));
    assert_eq!(session.list().len(), 4);
    assert!(session.trash().is_empty());
    assert_eq!(
        list_pages(&session),
        pages(&[("A.pdf", 0), ("B.pdf", 0), ("B.pdf", 1), ("A.pdf", 1)])
    );
    assert_eq!(session.list().get(3).unwrap().label(), "4. A.pdf — Page 2");
}

#[tokio::test]
async fn test_source_deleted_before_export() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "A.pdf", 2, 100);
    let b = write_pdf(dir.path(), "B.pdf", 1, 200);
    let mut session = session();
    import_all(&mut session, vec![a.clone(), b]).await;

    std::fs::remove_file(&a).unwrap();

    let out = dir.path().join("out.pdf");
    let err = session.export(&out).await.unwrap_err();
    assert!(matches!(err, PdfCollateError::SourceUnavailable { ref path, .. } if path.ends_with("A.pdf")));
    assert!(!out.exists());
}

#[tokio::test]
async fn test_duplicate_import_and_export() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "A.pdf", 1, 100);
    let mut session = session();

    import_all(&mut session, vec![a.clone()]).await;
    import_all(&mut session, vec![a]).await;

    let ids: Vec<_> = session.list().iter().map(|e| e.id()).collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);

    let out = dir.path().join("twice.pdf");
    session.export(&out).await.unwrap();
    assert_eq!(page_widths(&out), vec![100, 100]);
}

#[tokio::test]
async fn test_export_everything_trashed() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "A.pdf", 1, 100);
    let mut session = session();
    import_all(&mut session, vec![a]).await;
    session.remove(0).unwrap();

    let out = dir.path().join("empty.pdf");
    let err = session.export(&out).await.unwrap_err();
    assert!(matches!(err, PdfCollateError::EmptyInput));
    assert!(!out.exists());
}
