use std::fmt::Write as _;

use criterion::{Criterion, criterion_group, criterion_main};
use dataset_insights::pipeline::Pipeline;

fn generate_orders(rows: usize) -> String {
    let mut csv = String::from("Order ID,Order Date,Unit Price,Quantity,Status\n");
    for i in 0..rows {
        let status = match i % 3 {
            0 => "shipped",
            1 => "pending",
            _ => "processing",
        };
        let day = (i % 28) + 1;
        let quantity = if i % 17 == 0 { String::new() } else { (i % 9).to_string() };
        let _ = writeln!(
            csv,
            "{i},2024-01-{day:02},{}.{:02},{quantity},{status}",
            i % 250,
            i % 100
        );
    }
    csv
}

fn bench_pipeline(c: &mut Criterion) {
    let csv = generate_orders(20_000);
    let pipeline = Pipeline::default();
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(20);
    group.bench_function("describe", |b| {
        b.iter(|| {
            pipeline
                .describe("orders.csv", csv.as_bytes())
                .expect("describe")
        })
    });
    group.bench_function("analyze", |b| {
        b.iter(|| {
            pipeline
                .analyze("orders.csv", csv.as_bytes())
                .expect("analyze")
        })
    });
    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
