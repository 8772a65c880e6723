//! Benchmarks for the pagination engine

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mini_pager::{
    Device, FixedMetricsDevice, JobConfig, PageSetup, Print, PrintIterator, PrintJob, RenderedJob,
    TextPrint,
};
use std::rc::Rc;

fn device() -> Rc<dyn Device> {
    Rc::new(FixedMetricsDevice::monospace(6.0, 12.0, 72))
}

fn document(paragraphs: usize) -> String {
    let mut text = String::new();
    for i in 0..paragraphs {
        text.push_str(&format!(
            "Paragraph {} contains enough text to span multiple lines and test the line breaking algorithm. ",
            i
        ));
        if i % 3 == 0 {
            text.push_str("\n\n");
        }
    }
    text
}

fn bench_wrap_text(c: &mut Criterion) {
    c.bench_function("wrap_text", |b| {
        let device = device();
        let print: Rc<dyn Print> = Rc::new(TextPrint::new(document(50)));

        b.iter(|| {
            let mut iter = print.iterator(&device);
            while iter.has_next() {
                black_box(iter.next(468, 648));
            }
        });
    });
}

fn bench_paginate_small(c: &mut Criterion) {
    c.bench_function("paginate_small_document", |b| {
        let device = device();
        let job = PrintJob::from_config(
            &JobConfig::default(),
            "Hello, World! This is a small document.\n\nIt has a few paragraphs.",
        )
        .unwrap();

        b.iter(|| {
            black_box(job.paginate(&device).unwrap());
        });
    });
}

fn bench_paginate_medium(c: &mut Criterion) {
    c.bench_function("paginate_medium_document", |b| {
        let device = device();
        let config = JobConfig {
            header_text: Some("Benchmark report".into()),
            ..JobConfig::default()
        };
        let job = PrintJob::from_config(&config, &document(500)).unwrap();

        b.iter(|| {
            black_box(job.paginate(&device).unwrap());
        });
    });
}

fn bench_paginate_columns(c: &mut Criterion) {
    c.bench_function("paginate_compressed_columns", |b| {
        let device = device();
        let config = JobConfig {
            columns: Some(3),
            ..JobConfig::default()
        };
        let job = PrintJob::from_config(&config, &document(200)).unwrap();

        b.iter(|| {
            black_box(job.paginate(&device).unwrap());
        });
    });
}

fn bench_render_json(c: &mut Criterion) {
    c.bench_function("render_json", |b| {
        let device = device();
        let config = JobConfig {
            page: PageSetup {
                page_height: 396.0, // half letter
                ..PageSetup::default()
            },
            ..JobConfig::default()
        };
        let job = PrintJob::from_config(&config, &document(100)).unwrap();
        let pages = job.paginate(&device).unwrap();

        b.iter(|| {
            black_box(serde_json::to_string(&RenderedJob::new(job.name(), &pages)).unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_wrap_text,
    bench_paginate_small,
    bench_paginate_medium,
    bench_paginate_columns,
    bench_render_json,
);

criterion_main!(benches);
