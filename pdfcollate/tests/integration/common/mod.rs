//! Shared helpers for the integration tests.
//!
//! Fixtures are generated on the fly: every page gets a distinct MediaBox
//! width so the order of pages in an output file can be read back.

use image::RgbaImage;
use lopdf::{Document, Object, Stream, dictionary};
use pdfcollate::export::Exporter;
use pdfcollate::import::Importer;
use pdfcollate::render::{Thumbnail, ThumbnailRenderer};
use pdfcollate::{Result, Session};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Renderer producing a tiny blank preview for every page.
pub struct StubRenderer;

impl ThumbnailRenderer for StubRenderer {
    fn render(&self, _path: &Path, _page_index: usize) -> Result<Thumbnail> {
        Ok(Thumbnail::new(RgbaImage::new(8, 11)))
    }
}

/// Session with the stub renderer and default export settings.
pub fn session() -> Session {
    Session::new(Importer::new(Arc::new(StubRenderer)), Exporter::new())
}

/// Write a PDF with `pages` pages whose MediaBox widths are
/// `first_width`, `first_width + 1`, ...
///
/// Resources live on the page tree root so they have to be inherited.
pub fn write_pdf(dir: &Path, name: &str, pages: usize, first_width: i64) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let kids: Vec<Object> = (0..pages)
        .map(|i| {
            let text = format!("BT /F1 12 Tf 10 50 Td ({name} {}) Tj ET", i + 1);
            let content_id = doc.add_object(Stream::new(dictionary! {}, text.into_bytes()));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), (first_width + i as i64).into(), 100.into()],
                "Contents" => content_id,
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        }
        .into(),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).expect("Failed to write fixture");
    path
}

/// MediaBox widths of the pages of `path`, in page order.
pub fn page_widths(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).expect("Failed to load output");
    doc.get_pages()
        .values()
        .map(|id| {
            let page = doc.get_dictionary(*id).expect("page dictionary");
            let media_box = page
                .get(b"MediaBox")
                .and_then(Object::as_array)
                .expect("MediaBox");
            media_box[2].as_i64().expect("integer width")
        })
        .collect()
}

/// `(file name, page index)` of every entry in the session's list.
pub fn list_pages(session: &Session) -> Vec<(String, usize)> {
    session
        .list()
        .iter()
        .map(|e| (e.file_name(), e.page_index()))
        .collect()
}

/// Import `paths` and wait for the batch to finish.
pub async fn import_all(session: &mut Session, paths: Vec<PathBuf>) {
    session.start_import(paths).expect("import should start");
    session.wait_for_import().await.expect("import should finish");
}
