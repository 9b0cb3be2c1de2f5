//! Performance benchmarks for pdfcollate.
//!
//! Run with: cargo bench
//!
//! These benchmarks measure the page list operations and the export path
//! using criterion for statistical analysis.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use lopdf::{Document, Object, dictionary};
use pdfcollate::export::Exporter;
use pdfcollate::io::PdfReader;
use pdfcollate::{PageEntry, PageList};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Write a fixture with `pages` pages.
fn write_fixture(dir: &Path, name: &str, pages: usize) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let kids: Vec<Object> = (0..pages)
        .map(|i| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), (600 + i as i64).into(), 800.into()],
            })
            .into()
        })
        .collect();
    doc.objects.insert(
        pages_id,
        dictionary! { "Type" => "Pages", "Kids" => kids, "Count" => pages as i64 }.into(),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).unwrap();
    path
}

fn entries_for(paths: &[PathBuf], pages: usize) -> Vec<PageEntry> {
    paths
        .iter()
        .flat_map(|path| {
            let source: Arc<Path> = Arc::from(path.as_path());
            (0..pages).map(move |i| PageEntry::new(Arc::clone(&source), i, None))
        })
        .collect()
}

/// Benchmark: Load a single PDF
fn bench_load_single_pdf(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let dir = TempDir::new().unwrap();
    let path = write_fixture(dir.path(), "single.pdf", 50);
    let reader = PdfReader::new();

    c.bench_function("load_single_pdf", |b| {
        b.to_async(&rt).iter(|| async {
            let result = reader.load(black_box(&path)).await;
            assert!(result.is_ok());
            result.unwrap()
        });
    });
}

/// Benchmark: Move the last entry to the front of lists of growing size
fn bench_move_to_front(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_to_front");
    let source: Arc<Path> = Arc::from(Path::new("/bench/doc.pdf"));

    for size in [10, 100, 1000] {
        let mut list = PageList::new();
        list.extend((0..size).map(|i| PageEntry::new(Arc::clone(&source), i, None)));

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| list.move_to(black_box(size - 1), black_box(0)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark: Export interleaved pages of several sources
fn bench_export(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("export");
    group.sample_size(20);

    for files in [2, 8] {
        let dir = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = (0..files)
            .map(|i| write_fixture(dir.path(), &format!("src{i}.pdf"), 20))
            .collect();
        let mut entries = entries_for(&paths, 20);
        entries.reverse();
        let out = dir.path().join("out.pdf");
        let exporter = Exporter::new();

        group.bench_with_input(BenchmarkId::from_parameter(files), &files, |b, _| {
            b.to_async(&rt).iter(|| async {
                let stats = exporter.export(black_box(&entries), &out).await.unwrap();
                assert_eq!(stats.pages, entries.len());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_load_single_pdf, bench_move_to_front, bench_export);
criterion_main!(benches);
