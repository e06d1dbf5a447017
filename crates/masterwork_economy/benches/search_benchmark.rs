//! Benchmark for setup search performance.
//!
//! Run with: cargo bench --package masterwork_economy --bench search_benchmark

// criterion_group! emits an undocumented public entry point
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use masterwork_catalog::{Ability, Artisan, Catalog, CraftableObject, QualityTier, Resource, Supplement, Tool};
use masterwork_economy::{CraftingEngine, EngineConfig, FixedRates, StepRates};

/// Thirty Blacksmithing craftables in three tiers over ten ores, with
/// eight smiths, five tools and four supplements.
fn create_test_catalog() -> Catalog {
    let mut catalog = Catalog::new();

    for i in 0..10u32 {
        catalog.add_resource(Resource::new(format!("Ore_{i}"), f64::from(i + 1))).unwrap();
    }

    // Three tiers: bars from ore, parts from bars, blades from parts
    for i in 0..10u32 {
        catalog
            .add_craftable(
                CraftableObject::new(format!("Bar_{i}"), 2.0, 100 + i * 10, 50)
                    .with_profession("Blacksmithing")
                    .with_input(f64::from(i % 4 + 1), format!("Ore_{i}"))
                    .with_input(1.0, format!("Ore_{}", (i + 1) % 10)),
            )
            .unwrap();
    }
    for i in 0..10u32 {
        catalog
            .add_craftable(
                CraftableObject::new(format!("Part_{i}"), 1.0, 300 + i * 20, 200)
                    .with_profession("Blacksmithing")
                    .with_input(2.0, format!("Bar_{i}"))
                    .with_input(1.0, format!("Bar_{}", (i + 3) % 10)),
            )
            .unwrap();
    }
    for i in 0..10u32 {
        catalog
            .add_craftable(
                CraftableObject::new(format!("Blade_{i}"), 1.0, 800 + i * 40, 600)
                    .with_profession("Blacksmithing")
                    .with_dab_hand(true)
                    .with_input(3.0, format!("Part_{i}"))
                    .with_input(1.0, format!("Part_{}", (i + 7) % 10)),
            )
            .unwrap();
    }

    catalog.add_agent(Artisan::new("Beatrice", "Alchemy", 400.0, 300.0)).unwrap();
    for i in 0..8u32 {
        let ability = if i % 2 == 0 {
            Ability::Recycle(0.1 + f64::from(i) * 0.05)
        } else {
            Ability::DabHand(0.05 + f64::from(i) * 0.02)
        };
        catalog
            .add_agent(
                Artisan::new(format!("Smith_{i}"), "Blacksmithing", 200.0 + f64::from(i) * 50.0, 100.0)
                    .with_ability(ability),
            )
            .unwrap();
    }
    catalog.add_tool(Tool::new("Forgehammer of Gond", "Any", 300.0, 200.0)).unwrap();
    for i in 0..4u32 {
        catalog
            .add_tool(Tool::new(format!("Hammer_{i}"), "Blacksmithing", 100.0 * f64::from(i), 50.0))
            .unwrap();
    }
    catalog.add_supplement(Supplement::new("Wintergreen Tea +1", 50.0, 100.0)).unwrap();
    for i in 0..3u32 {
        catalog
            .add_supplement(Supplement::new(format!("Tonic_{i}"), 20.0 * f64::from(i), 10.0))
            .unwrap();
    }

    catalog
}

/// Cold search from a fresh engine on the default worker pool.
fn benchmark_full_search(c: &mut Criterion) {
    let catalog = create_test_catalog();

    c.bench_function("search_30_craftables_cold", |b| {
        b.iter(|| {
            // Fresh engine so every ranking is searched again
            let engine = CraftingEngine::new(catalog.clone(), EngineConfig::default()).unwrap();
            black_box(engine.find_best("Blade_0", QualityTier::High).unwrap())
        });
    });
}

/// Cold search with a single worker.
fn benchmark_single_worker_search(c: &mut Criterion) {
    let catalog = create_test_catalog();
    let config = EngineConfig {
        search_workers: 1,
        ..EngineConfig::default()
    };

    c.bench_function("search_30_craftables_one_worker", |b| {
        b.iter(|| {
            let engine = CraftingEngine::new(catalog.clone(), config.clone()).unwrap();
            black_box(engine.find_best("Blade_0", QualityTier::High).unwrap())
        });
    });
}

/// Craft against warm rankings.
fn benchmark_cached_craft(c: &mut Criterion) {
    let engine = CraftingEngine::new(create_test_catalog(), EngineConfig::default()).unwrap();
    for i in 0..10u32 {
        engine.find_best(&format!("Blade_{i}"), QualityTier::Normal).unwrap();
    }

    c.bench_function("craft_cached_ranking", |b| {
        let mut i = 0u32;
        b.iter(|| {
            i = (i + 1) % 10;
            black_box(engine.craft(&format!("Blade_{i}"), 25.0, QualityTier::Normal, None).unwrap())
        });
    });
}

/// Fixed-rate estimate, no search.
fn benchmark_fixed_rates(c: &mut Criterion) {
    let engine = CraftingEngine::new(create_test_catalog(), EngineConfig::default()).unwrap();
    let rates = FixedRates::uniform(StepRates::new(0.8, 0.0, 0.3)).with_auxiliary(StepRates::new(0.6, 0.1, 0.2));

    c.bench_function("fixed_rate_estimate", |b| {
        b.iter(|| black_box(engine.craft_by_fixed_rates("Blade_9", 10.0, &rates).unwrap()));
    });
}

criterion_group!(
    benches,
    benchmark_full_search,
    benchmark_single_worker_search,
    benchmark_cached_craft,
    benchmark_fixed_rates
);
criterion_main!(benches);
