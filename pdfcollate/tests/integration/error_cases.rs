//! Integration tests for error handling.

use pdfcollate::PdfCollateError;
use tempfile::TempDir;

use crate::common::{import_all, session, write_pdf};

#[tokio::test]
async fn test_export_empty_session() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.pdf");

    let err = session().export(&out).await.unwrap_err();
    assert!(matches!(err, PdfCollateError::EmptyInput));
    assert!(!out.exists());
}

#[tokio::test]
async fn test_source_truncated_before_export() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", 3, 100);
    let mut session = session();
    import_all(&mut session, vec![a.clone()]).await;

    // Replace the source with a shorter document of the same name.
    write_pdf(dir.path(), "a.pdf", 1, 100);

    let out = dir.path().join("out.pdf");
    let err = session.export(&out).await.unwrap_err();
    assert!(matches!(err, PdfCollateError::SourceUnavailable { .. }));
    assert!(!out.exists());
}

#[tokio::test]
async fn test_source_corrupted_before_export() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", 1, 100);
    let mut session = session();
    import_all(&mut session, vec![a.clone()]).await;

    std::fs::write(&a, b"no longer a pdf").unwrap();

    let err = session.export(&dir.path().join("out.pdf")).await.unwrap_err();
    assert!(matches!(err, PdfCollateError::SourceUnavailable { .. }));
}

#[tokio::test]
async fn test_unwritable_destination() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", 1, 100);
    let mut session = session();
    import_all(&mut session, vec![a]).await;

    let out = dir.path().join("missing-dir").join("out.pdf");
    let err = session.export(&out).await.unwrap_err();
    assert!(matches!(err, PdfCollateError::Write { .. }));
    assert!(!out.exists());
}

#[tokio::test]
async fn test_destination_is_a_directory() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", 1, 100);
    let mut session = session();
    import_all(&mut session, vec![a]).await;

    let out = dir.path().join("sub/");
    let err = session.export(&out).await.unwrap_err();
    assert!(matches!(err, PdfCollateError::InvalidDestination { .. }));
    assert!(!dir.path().join("sub.pdf").exists());
    assert!(!dir.path().join("sub/.pdf").exists());
}

#[tokio::test]
async fn test_failed_write_keeps_previous_output() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", 1, 100);
    let mut session = session();
    import_all(&mut session, vec![a.clone()]).await;

    let out = dir.path().join("out.pdf");
    std::fs::write(&out, b"previous").unwrap();
    std::fs::remove_file(&a).unwrap();

    assert!(session.export(&out).await.is_err());
    assert_eq!(std::fs::read(&out).unwrap(), b"previous");
}

#[test]
fn test_nothing_to_import() {
    let mut session = session();
    let err = session.start_import(Vec::new()).unwrap_err();
    assert!(matches!(err, PdfCollateError::NothingToImport));
    assert!(!session.is_importing());
}

#[test]
fn test_out_of_bounds_edits() {
    let mut session = session();
    assert!(matches!(
        session.remove(0),
        Err(PdfCollateError::Index { index: 0, len: 0 })
    ));
    assert!(session.move_entry(0, 0).is_err());
}
