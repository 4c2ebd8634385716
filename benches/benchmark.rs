use criterion::{black_box, criterion_group, criterion_main, Criterion};

use blockswap::block::loader as block_loader;
use blockswap::block::registry::{BlockTypeRegistry, Catalog, PopulatorRegistry};
use blockswap::block::{BlockState, BlockType, Namespace, PopulatorType};
use blockswap::populator::hook::{apply_replacements, BlockTransaction, PopulatedChunk};
use blockswap::populator::{ReplacementEntry, ReplacementResolver, ReplacementSet};

/// Synthetic namespace set: `ns_count` namespaces, each with 64 block types
/// and a populator of the same name.
fn synthetic(ns_count: usize) -> (ReplacementResolver, Vec<PopulatorType>, Vec<BlockState>) {
    let mut resolver = ReplacementResolver::default();
    let mut populators = Vec::new();
    let mut states = Vec::new();
    for n in 0..ns_count {
        let namespace = Namespace::new(&format!("mod{n:03}"));
        let ns_states: Vec<BlockState> = (0..64)
            .map(|i| BlockType::new(namespace.clone(), &format!("block{i}"), Vec::new()).default_state())
            .collect();
        let populator = PopulatorType::new(&format!("{}:gen", namespace.id()));
        let mut set = ReplacementSet::default();
        for pair in ns_states.chunks(2) {
            set.insert(ReplacementEntry::new(pair[0].clone(), pair[1].clone()));
        }
        resolver.register(&namespace, &populator, set);
        resolver.insert_global(ReplacementEntry::new(ns_states[1].clone(), ns_states[0].clone()));
        populators.push(populator);
        states.extend(ns_states);
    }
    (resolver, populators, states)
}

fn bench_get_entry(c: &mut Criterion) {
    let (resolver, populators, states) = synthetic(32);
    c.bench_function("get_entry_32_namespaces", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for (i, state) in states.iter().enumerate() {
                let populator = &populators[i % populators.len()];
                if resolver.get_entry(black_box(populator), black_box(state)).is_some() {
                    hits += 1;
                }
            }
            black_box(hits);
        })
    });
}

fn bench_resolve_with_global_fallback(c: &mut Criterion) {
    let (resolver, populators, states) = synthetic(32);
    let unknown = PopulatorType::new("nowhere:gen");
    c.bench_function("resolve_global_fallback", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for (i, state) in states.iter().enumerate() {
                let populator = if i % 2 == 0 { &unknown } else { &populators[i % populators.len()] };
                if resolver.resolve(black_box(populator), black_box(state)).is_some() {
                    hits += 1;
                }
            }
            black_box(hits);
        })
    });
}

/// One chunk column's worth of populator output (16x16x64) run through the
/// bundled catalog with a single ore replacement.
fn bench_apply_replacements_chunk(c: &mut Criterion) {
    let catalog: Catalog = block_loader::load_catalog_from_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/data/catalog"));
    let (Some(stone), Some(gravel), Some(dirt), Some(ore)) = (
        catalog.block_type("stone"),
        catalog.block_type("gravel"),
        catalog.block_type("dirt"),
        catalog.populator_type("ore"),
    ) else {
        return;
    };
    let (stone, gravel, dirt) = (stone.default_state(), gravel.default_state(), dirt.default_state());

    let mut resolver = ReplacementResolver::default();
    let mut set = ReplacementSet::default();
    set.insert(ReplacementEntry::new(gravel.clone(), dirt));
    resolver.register(&Namespace::new("minecraft"), &ore, set);

    let mut chunk = PopulatedChunk::default();
    let transactions = (0..16 * 16 * 64)
        .map(|i| {
            let pos = (i % 16, i / 256, (i / 16) % 16);
            let placed = if i % 3 == 0 { gravel.clone() } else { stone.clone() };
            BlockTransaction::new(pos, stone.clone(), placed)
        })
        .collect();
    chunk.transactions.insert(ore, transactions);

    c.bench_function("apply_replacements_chunk", |b| {
        b.iter(|| {
            let mut chunk = chunk.clone();
            black_box(apply_replacements(&resolver, &mut chunk));
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(200);
    targets =
        bench_get_entry,
        bench_resolve_with_global_fallback,
        bench_apply_replacements_chunk
}
criterion_main!(benches);
