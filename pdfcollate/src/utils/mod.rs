//! Utilities for file selection, object copying, and formatting.

use crate::{PdfCollateError, Result};
use lopdf::{Document, Object, ObjectId};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Whether `path` has a `.pdf` extension (case-insensitive).
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn is_glob_pattern(s: &str) -> bool {
    s.contains(['*', '?', '['])
}

/// Resolve user input from the file chooser into file paths.
///
/// Each item is either a path or a glob pattern. Relative items are resolved
/// against `base`. Only `.pdf` names are selected: glob matches are filtered
/// and sorted, and a named file without the extension is skipped with a
/// warning. A named `.pdf` file is kept even if it does not exist, so a bad
/// file is reported at import. The order of the items is preserved.
///
/// Errors:
/// - Propagates `glob` parse errors.
/// - Propagates filesystem errors from glob iterator.
pub fn expand_selection<T>(base: &Path, items: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for item in items {
        let item = item.as_ref().trim();
        if item.is_empty() {
            continue;
        }

        let expanded = expand_home(item);
        if is_glob_pattern(item) {
            let pattern = if expanded.is_absolute() {
                expanded.to_string_lossy().into_owned()
            } else {
                let base = glob::Pattern::escape(&base.to_string_lossy());
                format!("{base}/{}", expanded.to_string_lossy())
            };
            resolved_paths.extend(collect_paths_for_pattern(&pattern)?);
        } else if has_pdf_extension(&expanded) {
            resolved_paths.push(base.join(expanded));
        } else {
            warn!(path = %expanded.display(), "Skipping file without .pdf extension");
        }
    }

    Ok(resolved_paths)
}

fn expand_home(item: &str) -> PathBuf {
    match (item.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(item),
    }
}

/// Expand a single glob pattern into `.pdf` file paths.
fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut resolved_paths = Vec::new();

    let paths = glob::glob(pattern).map_err(|err| PdfCollateError::other(err.to_string()))?;

    for entry in paths {
        let path = entry.map_err(|err| PdfCollateError::other(err.to_string()))?;
        if path.is_file() && has_pdf_extension(&path) {
            resolved_paths.push(path);
        }
    }

    resolved_paths.sort();
    Ok(resolved_paths)
}

/// Split a chooser input line into items.
///
/// Items are separated by whitespace; double quotes group an item that
/// contains spaces.
pub fn split_input_line(line: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    items.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        items.push(current);
    }

    items
}

/// Whether `obj` is a `Page` or `Pages` node of a page tree.
pub(crate) fn is_page_node(obj: &Object) -> bool {
    obj.as_dict()
        .ok()
        .and_then(|dict| dict.get(b"Type").ok())
        .and_then(|t| t.as_name().ok())
        .is_some_and(|name| name == b"Page" || name == b"Pages")
}

/// Copy the objects referenced by `obj` from `source` into `target`.
///
/// Walks the structure recursively and inserts missing referenced objects,
/// keeping their ids. Page tree nodes are never copied: the caller places
/// the pages it exports, and references to any other page are left for
/// [`unlink_references`] to clear.
pub fn copy_references(target: &mut Document, source: &Document, obj: &Object) {
    match obj {
        Object::Reference(ref_id) => {
            if !target.objects.contains_key(ref_id)
                && let Ok(referenced_obj) = source.get_object(*ref_id)
                && !is_page_node(referenced_obj)
            {
                target.objects.insert(*ref_id, referenced_obj.clone());
                copy_references(target, source, referenced_obj);
            }
        }
        Object::Dictionary(dict) => {
            let skip_parent = is_page_node(obj);
            for (key, value) in dict.iter() {
                if skip_parent && key == b"Parent" {
                    continue;
                }
                copy_references(target, source, value);
            }
        }
        Object::Array(arr) => {
            for item in arr {
                copy_references(target, source, item);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter() {
                copy_references(target, source, value);
            }
        }
        _ => {}
    }
}

/// Replace every reference to an id in `ids` with `null`.
///
/// Link destinations and annotation `/P` entries that pointed at pages
/// left out of an export end up as `null` instead of dangling.
pub fn unlink_references(obj: &mut Object, ids: &HashSet<ObjectId>) {
    match obj {
        Object::Reference(id) => {
            if ids.contains(id) {
                *obj = Object::Null;
            }
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter_mut() {
                unlink_references(value, ids);
            }
        }
        Object::Array(arr) => {
            for item in arr.iter_mut() {
                unlink_references(item, ids);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter_mut() {
                unlink_references(value, ids);
            }
        }
        _ => {}
    }
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
