use std::fmt::Write as _;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use sales_pulse::{
    filter::FilterOptions,
    loader::{LoadCache, LoadOptions},
    pipeline,
};

const TIMES: [&str; 4] = ["Morning", "Afternoon", "Evening", "Night"];
const SERVICES: [&str; 3] = ["Basic", "Premium", "Bundled"];
const CHANNELS: [&str; 3] = ["Search", "Social", "Email"];

fn generate_sales(rows: usize) -> Vec<u8> {
    let mut text = String::from(
        "Date,Time of Day,Service Type,Ad Channel,Customer Type,Ad Spend ($),Conversions,Daily Revenue ($),Store\n",
    );
    for i in 0..rows {
        let day = (i % 28) + 1;
        let customer = if i % 2 == 0 { "New" } else { "Returning" };
        let _ = writeln!(
            text,
            "2024-02-{day:02},{},{},{},{customer},{}.50,{},{}.25,S{}",
            TIMES[i % TIMES.len()],
            SERVICES[i % SERVICES.len()],
            CHANNELS[(i / 3) % CHANNELS.len()],
            20 + i % 80,
            i % 9,
            100 + i % 900,
            i % 12
        );
    }
    text.into_bytes()
}

fn bench_pipeline(c: &mut Criterion) {
    let bytes = generate_sales(50_000);
    let options = LoadOptions::default();
    let table = pipeline::load(&bytes, &options).expect("load sales");
    let outcome = pipeline::validate_and_clean(&table).expect("clean sales");
    let filter_options = FilterOptions::from_dataset(&outcome.dataset).expect("filter options");
    let criteria = filter_options.default_criteria().expect("criteria");

    let mut group = c.benchmark_group("pipeline");
    group.sample_size(20);
    group.bench_function("load_csv", |b| {
        b.iter(|| pipeline::load(&bytes, &options).expect("load"))
    });
    group.bench_function("validate_and_clean", |b| {
        b.iter(|| pipeline::validate_and_clean(&table).expect("clean"))
    });
    group.bench_function("filter_and_aggregate", |b| {
        b.iter(|| pipeline::render(&outcome, Some(&criteria)))
    });
    group.bench_function("cached_load", |b| {
        b.iter_batched(
            || {
                let mut cache = LoadCache::new();
                cache.load(&bytes, &options).expect("warm cache");
                cache
            },
            |mut cache| cache.load(&bytes, &options).expect("cached load"),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
