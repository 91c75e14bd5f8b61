//! Benchmarks for exporting and importing boards.
//!
//! Measures the full export build (columns, rows, encoding, data URI) and the
//! import parser for boards of growing size.

// Criterion macros generate items without docs - this is expected for benchmarks
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;

use boardcsv::io::formats::csv::parse_table;
use boardcsv::io::{DefaultFormatter, ExportService};
use boardcsv::models::{Board, PropertyTemplate, PropertyValue, Record, ViewDefinition, ViewKind};

// ============================================================================
// Fixtures
// ============================================================================

fn board() -> Board {
    Board::new("b1", "Bench")
        .with_property(
            PropertyTemplate::new("status", "Status", "select")
                .with_option("o1", "Open")
                .with_option("o2", "Done"),
        )
        .with_property(
            PropertyTemplate::new("tags", "Tags", "multiSelect")
                .with_option("t1", "Bug")
                .with_option("t2", "UI"),
        )
        .with_property(PropertyTemplate::new("due", "Due", "date"))
        .with_property(PropertyTemplate::new("notes", "Notes", "text"))
        .with_property(PropertyTemplate::new("author", "Author", "createdBy"))
}

fn view() -> ViewDefinition {
    ViewDefinition::new("v1", "b1", "All cards", ViewKind::Table)
        .with_visible(["status", "tags", "due", "notes", "author"])
}

fn records(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            Record::for_board("b1", format!("Card #{i} \"draft\""))
                .with_authors("alice", "bob")
                .with_property("status", if i % 2 == 0 { "o1" } else { "o2" })
                .with_property(
                    "tags",
                    PropertyValue::List(vec!["t1".to_string(), "t2".to_string()]),
                )
                .with_property("due", "1709640000000")
                .with_property("notes", format!("note {i}"))
        })
        .collect()
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");
    let service = ExportService::new(Arc::new(DefaultFormatter::new()));
    let board = board();
    let view = view();

    for size in [100usize, 1_000, 10_000] {
        let records = records(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("build", size), &records, |b, records| {
            b.iter(|| black_box(service.build(&board, Some(&view), records)));
        });
    }

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("import");
    let service = ExportService::new(Arc::new(DefaultFormatter::new()));
    let board = board();
    let view = view();

    for size in [100usize, 1_000, 10_000] {
        let text = service
            .build(&board, Some(&view), &records(size))
            .unwrap()
            .unwrap()
            .contents;
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse_table", size), &text, |b, text| {
            b.iter(|| black_box(parse_table(text)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_export, bench_parse);
criterion_main!(benches);
