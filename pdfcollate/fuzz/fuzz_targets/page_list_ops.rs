#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfcollate::{PageEntry, PageList, TrashStore};
use std::path::Path;
use std::sync::Arc;

// Each input byte pair is one edit; the list and trash must always agree
// with a plain Vec model, and every label must carry its position.
fuzz_target!(|data: &[u8]| {
    let source: Arc<Path> = Arc::from(Path::new("/fuzz/doc.pdf"));
    let mut list = PageList::new();
    let mut trash = TrashStore::new();
    let mut model: Vec<usize> = Vec::new();
    let mut trashed: Vec<usize> = Vec::new();
    let mut next = 0;

    for pair in data.chunks_exact(2) {
        let (op, arg) = (pair[0] % 4, pair[1] as usize);
        match op {
            0 => {
                list.append(PageEntry::new(Arc::clone(&source), next, None));
                model.push(next);
                next += 1;
            }
            1 => {
                let index = arg % (model.len() + 2);
                match list.remove_at(index) {
                    Ok(entry) => {
                        assert_eq!(entry.page_index(), model.remove(index));
                        trashed.push(entry.page_index());
                        trash.discard(entry);
                    }
                    Err(_) => assert!(index >= model.len()),
                }
            }
            2 if !model.is_empty() => {
                let from = arg % model.len();
                let to = (arg / 7) % model.len();
                list.move_to(from, to).unwrap();
                let value = model.remove(from);
                model.insert(to, value);
            }
            _ => {
                if let Some(entry) = trash.restore_latest() {
                    assert_eq!(Some(entry.page_index()), trashed.pop());
                    model.push(entry.page_index());
                    list.append(entry);
                }
            }
        }

        let pages: Vec<usize> = list.iter().map(PageEntry::page_index).collect();
        assert_eq!(pages, model);
        assert_eq!(trash.len(), trashed.len());
        for (i, entry) in list.iter().enumerate() {
            assert!(entry.label().starts_with(&format!("{}. ", i + 1)));
        }
    }
});
