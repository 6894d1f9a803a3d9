use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use stockmesh_client::{InMemoryGateway, InventoryGateway};
use stockmesh_inventory::{ItemDraft, ListQuery, validate};
use uuid::Uuid;

fn seeded(n: usize) -> InMemoryGateway {
    let gw = InMemoryGateway::new();
    for i in 0..n {
        let draft = ItemDraft::from_form(&format!("A{i:05}"), &format!("Part {i}"), "10");
        gw.seed(validate(&draft).expect("valid seed item"));
    }
    gw
}

fn bench_list_search(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread().build().expect("runtime");
    let mut group = c.benchmark_group("in_memory_list");

    for n in [100usize, 1_000, 10_000] {
        let gw = seeded(n);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("unfiltered", n), &n, |b, _| {
            let query = ListQuery::new(3, None);
            b.iter_batched(
                || gw.take_calls(),
                |_| rt.block_on(gw.list(Uuid::nil(), black_box(&query))),
                BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("search", n), &n, |b, _| {
            let query = ListQuery::new(1, Some("part 9"));
            b.iter_batched(
                || gw.take_calls(),
                |_| rt.block_on(gw.list(Uuid::nil(), black_box(&query))),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let ok = ItemDraft::from_form("AB1234", "Widget", "42");
    let bad = ItemDraft::from_form("1B1234", "Widget", "42");

    c.bench_function("validate_ok", |b| b.iter(|| validate(black_box(&ok))));
    c.bench_function("validate_bad_code", |b| b.iter(|| validate(black_box(&bad))));
}

criterion_group!(benches, bench_list_search, bench_validate);
criterion_main!(benches);
