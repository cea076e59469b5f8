use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use llmcost::{
    CostEnricher, Enricher, EnricherChain, PriceTable, PricingLoader, UsageRecord, attributes,
    pipeline::enrich_stream,
};
use std::hint::black_box;
use std::sync::Arc;

const MODELS: [&str; 6] = [
    "gpt-4o",
    "gpt-4o-2024-08-06",
    "gpt-4o-mini",
    "claude-3-5-sonnet-20241022",
    "claude-3-5-sonnet",
    "unknown-model-xyz",
];

fn cost_enricher() -> CostEnricher {
    let raw = PricingLoader::bundled().unwrap();
    CostEnricher::new(Arc::new(PriceTable::build(&raw).unwrap()))
}

fn create_test_records(count: usize) -> Vec<UsageRecord> {
    (0..count)
        .map(|i| {
            let model = MODELS[i % MODELS.len()];
            let provider = if model.starts_with("claude") {
                "anthropic"
            } else {
                "openai"
            };
            let mut record = UsageRecord::new();
            record.set_attribute(attributes::PROVIDER, provider);
            record.set_attribute(attributes::RESPONSE_MODEL, model);
            record.set_attribute(attributes::INPUT_TOKENS, (i * 100) as i64);
            record.set_attribute(attributes::OUTPUT_TOKENS, (i * 50) as i64);
            record
        })
        .collect()
}

fn benchmark_single_record(c: &mut Criterion) {
    let enricher = cost_enricher();
    let template = create_test_records(1).pop().unwrap();

    c.bench_function("enrich_single_record", |b| {
        b.iter(|| {
            let mut record = template.clone();
            enricher.enrich(black_box(&mut record));
            record
        })
    });
}

fn benchmark_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("enrich_batch");
    let mut chain = EnricherChain::new();
    chain.push(cost_enricher());

    for size in [100, 1000, 10_000] {
        let records = create_test_records(size);

        group.bench_with_input(BenchmarkId::new("sequential", size), &records, |b, records| {
            b.iter(|| {
                let mut records = records.clone();
                for record in &mut records {
                    chain.apply(record);
                }
                records
            })
        });

        group.bench_with_input(BenchmarkId::new("parallel", size), &records, |b, records| {
            b.iter(|| {
                let mut records = records.clone();
                chain.apply_batch(&mut records);
                records
            })
        });
    }

    group.finish();
}

fn benchmark_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("enrich_stream");
    group.sample_size(20);

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut chain = EnricherChain::new();
    chain.push(cost_enricher());

    let input: String = create_test_records(1000)
        .iter()
        .map(|record| serde_json::to_string(record).unwrap() + "\n")
        .collect();

    group.bench_function("jsonl_1000_records", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let mut output = Vec::with_capacity(input.len() * 2);
                enrich_stream(&chain, black_box(input.as_bytes()), &mut output, 256)
                    .await
                    .unwrap();
                output
            })
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_single_record,
    benchmark_batch,
    benchmark_stream
);
criterion_main!(benches);
