//! Pricing and signal benchmarks using Criterion

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use option_hedging_engine::*;
use std::hint::black_box;

fn bench_pricing(c: &mut Criterion) {
    c.bench_function("call_price", |b| {
        b.iter(|| {
            black_box(pricing::call_price(
                black_box(50.0),
                black_box(48.0),
                black_box(0.25),
                black_box(0.1),
            ))
        });
    });

    c.bench_function("delta_put", |b| {
        b.iter(|| {
            black_box(pricing::delta_put(
                black_box(50.0),
                black_box(48.0),
                black_box(0.25),
                black_box(0.1),
            ))
        });
    });
}

fn bench_signals(c: &mut Criterion) {
    let registry = ContractRegistry::default();
    let engine = SignalEngine::default();
    let state = MarketState::new(
        300,
        0.2,
        300.0 / 7200.0,
        &Quote::new("RTM", 49.95, 50.05),
        0.01,
        1e-6,
    );
    let quotes: Vec<Quote> = registry
        .contracts()
        .iter()
        .map(|c| Quote::new(c.ticker.clone(), 1.0, 1.1))
        .collect();

    c.bench_function("signal_all_contracts", |b| {
        b.iter(|| {
            for (contract, quote) in registry.contracts().iter().zip(&quotes) {
                black_box(engine.evaluate(contract, quote, &state).ok());
            }
        });
    });
}

fn bench_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("paper_cycle");

    for positions in [0i64, 250] {
        let config = EngineConfig {
            idle_interval_ms: 0,
            ..Default::default()
        };
        let engine = TradingEngine::new(config).unwrap();
        let exchange = PaperExchange::new(300);
        exchange.set_quote("RTM", 49.95, 50.05);
        for contract in engine.registry().contracts() {
            exchange.set_quote(&contract.ticker, 1.0, 1.1);
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(positions),
            &positions,
            |b, &positions| {
                b.iter(|| {
                    exchange.set_position("RTM50C", positions);
                    black_box(engine.run_cycle(&exchange, 300).ok());
                    exchange.clear_orders();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_pricing, bench_signals, bench_cycle);
criterion_main!(benches);
