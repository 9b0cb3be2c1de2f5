//! Building the output document from page references.
//!
//! Every source document is renumbered into its own id range so objects of
//! different sources never collide. Each referenced page is then cloned with
//! its inherited attributes resolved, re-parented under a fresh page tree,
//! and the objects it references are copied over.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use tracing::debug;

use crate::error::{PdfCollateError, Result};
use crate::io::LoadedPdf;
use crate::model::PageEntry;
use crate::utils::{copy_references, is_page_node, unlink_references};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITED_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

const MAX_TREE_DEPTH: usize = 64;

/// The pages to export and the distinct files they come from.
#[derive(Debug, Clone, Default)]
pub struct ExportPlan {
    sources: Vec<Arc<Path>>,
    pages: Vec<(usize, usize)>,
}

impl ExportPlan {
    /// Snapshot the page references of `entries`, in order.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a PageEntry>) -> Self {
        let mut plan = Self::default();
        let mut slots: HashMap<Arc<Path>, usize> = HashMap::new();

        for entry in entries {
            let slot = *slots
                .entry(Arc::clone(entry.source_arc()))
                .or_insert_with(|| {
                    plan.sources.push(Arc::clone(entry.source_arc()));
                    plan.sources.len() - 1
                });
            plan.pages.push((slot, entry.page_index()));
        }

        plan
    }

    /// Distinct source files in order of first appearance.
    pub fn sources(&self) -> &[Arc<Path>] {
        &self.sources
    }

    /// Number of pages in the output.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Whether there is nothing to export.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

struct Source {
    document: Document,
    page_ids: Vec<ObjectId>,
}

/// Build the output document.
///
/// `loaded` must hold one document per entry of [`ExportPlan::sources`], in
/// the same order.
///
/// # Errors
///
/// Returns [`PdfCollateError::SourceUnavailable`] if a referenced page no
/// longer exists in its source.
pub fn assemble(plan: &ExportPlan, loaded: Vec<LoadedPdf>) -> Result<Document> {
    if plan.is_empty() {
        return Err(PdfCollateError::EmptyInput);
    }
    if loaded.len() != plan.sources.len() {
        return Err(PdfCollateError::other(format!(
            "Expected {} source documents, got {}",
            plan.sources.len(),
            loaded.len()
        )));
    }

    let mut output = Document::with_version("1.5");
    let pages_id = output.new_object_id();
    let mut next_id = output.max_id + 1;

    let mut sources = Vec::with_capacity(loaded.len());
    let mut page_nodes: HashSet<ObjectId> = HashSet::new();
    for pdf in loaded {
        let mut document = pdf.document;
        document.renumber_objects_with(next_id);
        next_id = document.max_id + 1;

        page_nodes.extend(
            document
                .objects
                .iter()
                .filter(|(_, obj)| is_page_node(obj))
                .map(|(id, _)| *id),
        );

        let page_ids = document.get_pages().into_values().collect();
        sources.push(Source { document, page_ids });
    }
    output.max_id = next_id - 1;

    let mut kids: Vec<Object> = Vec::with_capacity(plan.pages.len());
    let mut used: HashSet<ObjectId> = HashSet::new();

    for &(slot, page_index) in &plan.pages {
        let source = &sources[slot];
        let path = &plan.sources[slot];

        let page_id = *source.page_ids.get(page_index).ok_or_else(|| {
            PdfCollateError::source_unavailable(
                path.to_path_buf(),
                format!(
                    "page {} no longer exists (document has {} page(s))",
                    page_index + 1,
                    source.page_ids.len()
                ),
            )
        })?;

        let dict = source
            .document
            .get_dictionary(page_id)
            .map_err(|e| PdfCollateError::source_unavailable(path.to_path_buf(), e.to_string()))?;
        let page = Object::Dictionary(flatten_page(&source.document, dict, pages_id));

        copy_references(&mut output, &source.document, &page);

        // A page used more than once gets a fresh object per use.
        let new_id = if used.insert(page_id) {
            page_id
        } else {
            output.new_object_id()
        };
        output.objects.insert(new_id, page);
        kids.push(new_id.into());
    }

    // Pages of the sources that were not exported.
    page_nodes.retain(|id| !output.objects.contains_key(id));
    if !page_nodes.is_empty() {
        for obj in output.objects.values_mut() {
            unlink_references(obj, &page_nodes);
        }
    }

    let count = kids.len() as i64;
    output.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }
        .into(),
    );

    let catalog_id = output.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = output.add_object(dictionary! {
        "Producer" => Object::string_literal(format!("{} {}", crate::NAME, crate::VERSION)),
    });
    output.trailer.set("Root", catalog_id);
    output.trailer.set("Info", info_id);

    let pruned = output.prune_objects();
    debug!(
        pages = count,
        sources = sources.len(),
        pruned = pruned.len(),
        "Assembled output document"
    );

    Ok(output)
}

/// Clone a page dictionary with inherited attributes made explicit and its
/// parent set to `parent`.
fn flatten_page(doc: &Document, page: &Dictionary, parent: ObjectId) -> Dictionary {
    let mut flattened = page.clone();

    for key in INHERITED_KEYS {
        if !flattened.has(key)
            && let Some(value) = inherited(doc, page, key)
        {
            flattened.set(key, value.clone());
        }
    }

    if !flattened.has(b"MediaBox") {
        flattened.set(
            "MediaBox",
            vec![0.into(), 0.into(), 612.into(), 792.into()],
        );
    }

    flattened.set("Parent", parent);
    flattened
}

fn inherited<'a>(doc: &'a Document, page: &Dictionary, key: &[u8]) -> Option<&'a Object> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

    for _ in 0..MAX_TREE_DEPTH {
        let node = doc.get_dictionary(parent?).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    None
}
