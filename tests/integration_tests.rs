//! Integration tests

use option_hedging_engine::*;

fn engine() -> TradingEngine {
    let config = EngineConfig {
        idle_interval_ms: 0,
        ..Default::default()
    };
    TradingEngine::new(config).unwrap()
}

/// Only RTM45C/RTM45P, quoted by hand for the last ticks of the session
fn narrow_engine() -> TradingEngine {
    let config = EngineConfig {
        strikes: vec![45],
        idle_interval_ms: 0,
        ..Default::default()
    };
    TradingEngine::new(config).unwrap()
}

/// Quote every contract inside its no-trade band at `tick`
fn quiet_market(exchange: &PaperExchange, registry: &ContractRegistry, tick: u32, vol: f64) {
    exchange.set_quote("RTM", 49.95, 50.05);
    let t = (600 - tick) as f64 / 7200.0;

    for contract in registry.contracts() {
        let lo = pricing::price(contract.kind, 49.95, contract.strike, vol, t).unwrap();
        let hi = pricing::price(contract.kind, 50.05, contract.strike, vol, t).unwrap();
        exchange.set_quote(&contract.ticker, lo.min(hi), lo.max(hi));
    }
}

#[test]
fn test_top_five_by_edge() {
    let engine = engine();
    let exchange = PaperExchange::new(200);
    quiet_market(&exchange, engine.registry(), 200, 0.2);

    // Overpriced puts with increasing edge, plus cheap calls
    exchange.set_quote("RTM45P", 1.00, 1.10);
    exchange.set_quote("RTM46P", 2.00, 2.10);
    exchange.set_quote("RTM47P", 3.00, 3.10);
    exchange.set_quote("RTM45C", 0.50, 0.60);
    exchange.set_quote("RTM46C", 0.50, 0.60);
    exchange.set_quote("RTM47C", 0.50, 0.60);
    exchange.set_quote("RTM48C", 0.50, 0.60);

    let report = engine.run_cycle(&exchange, 200).unwrap();

    assert_eq!(report.executed.len(), 5);
    for pair in report.executed.windows(2) {
        assert!(pair[0].edge >= pair[1].edge);
    }

    let orders = exchange.orders();
    assert_eq!(orders.len(), 5);
    assert!(orders.iter().all(|o| o.quantity == 100));

    // RTM45C (edge ≈ 4.4) beats the richest put (edge ≈ 3)
    assert_eq!(orders[0], MarketOrder::buy("RTM45C", 100));
    assert!(!orders.iter().any(|o| o.ticker == "RTM45P"));
}

#[test]
fn test_fewer_than_five_signals_all_executed() {
    let engine = engine();
    let exchange = PaperExchange::new(200);
    quiet_market(&exchange, engine.registry(), 200, 0.2);
    exchange.set_quote("RTM45C", 0.50, 0.60);
    exchange.set_quote("RTM54P", 9.00, 9.20);

    let report = engine.run_cycle(&exchange, 200).unwrap();

    assert_eq!(report.executed.len(), 2);
    assert_eq!(
        exchange.orders(),
        vec![MarketOrder::sell("RTM54P", 100), MarketOrder::buy("RTM45C", 100)]
    );
}

#[test]
fn test_full_session_loop() {
    let engine = narrow_engine();
    let exchange = PaperExchange::new(596).with_tick_step(1);
    quiet_market(&exchange, engine.registry(), 596, 0.2);
    exchange.set_quote("RTM45C", 0.50, 0.60);
    exchange.set_quote("RTM45P", 0.00, 0.01);

    let token = CancellationToken::new();
    let state = engine.run(&exchange, &token);

    assert_eq!(state, LoopState::Stopped);

    // Ticks 596..=599 trade, 600 stops
    let metrics = engine.get_metrics();
    assert_eq!(metrics.cycles_completed(), 4);
    assert_eq!(exchange.position("RTM45C"), 400);

    // Each cycle after the first hedges the accumulated call delta
    assert!(exchange.position("RTM") < 0);
}

#[test]
fn test_loop_does_not_start_at_tick_zero() {
    let engine = engine();
    let exchange = PaperExchange::new(0).with_tick_step(1);
    quiet_market(&exchange, engine.registry(), 1, 0.2);

    let state = engine.run(&exchange, &CancellationToken::new());

    assert_eq!(state, LoopState::Stopped);
    assert_eq!(engine.get_metrics().cycles_completed(), 0);
    assert_eq!(exchange.request_count(), 1);
}

#[test]
fn test_cancelled_loop_runs_no_cycle() {
    let engine = engine();
    let exchange = PaperExchange::new(100).with_tick_step(1);
    quiet_market(&exchange, engine.registry(), 100, 0.2);

    let token = CancellationToken::new();
    token.cancel();

    assert_eq!(engine.run(&exchange, &token), LoopState::Stopped);
    assert_eq!(exchange.request_count(), 0);
}

#[test]
fn test_failed_cycles_are_skipped_not_fatal() {
    let engine = narrow_engine();
    let exchange = PaperExchange::new(597).with_tick_step(1);
    quiet_market(&exchange, engine.registry(), 597, 0.2);
    exchange.set_quote("RTM45C", 0.50, 0.60);
    exchange.set_quote("RTM45P", 0.00, 0.01);
    exchange.reject_orders_for("RTM45C");

    let state = engine.run(&exchange, &CancellationToken::new());

    assert_eq!(state, LoopState::Stopped);
    let metrics = engine.get_metrics();
    assert_eq!(metrics.cycles_skipped(), 3);
    assert_eq!(metrics.cycles_completed(), 0);
    assert!(exchange.orders().is_empty());
}

#[test]
fn test_news_volatility_drives_pricing() {
    let engine = engine();
    let exchange = PaperExchange::new(300);
    // Market quoted for 40% vol; engine defaults to 20%
    quiet_market(&exchange, engine.registry(), 300, 0.40);

    let report = engine.run_cycle(&exchange, 300).unwrap();
    assert_eq!(report.volatility, 0.20);
    assert!(!report.executed.is_empty());

    exchange.clear_orders();
    exchange.publish_news("Welcome", "Session started");
    exchange.publish_news("Risk", "Delta limit is 50000");
    exchange.publish_news("Volatility", "Volatility this week is between 35% and 45%");

    let report = engine.run_cycle(&exchange, 300).unwrap();
    assert!((report.volatility - 0.40).abs() < 1e-12);
    assert!(report.executed.is_empty());
}

#[test]
fn test_clear_and_hedge_round_trip() {
    let engine = engine();
    let exchange = PaperExchange::new(100);
    quiet_market(&exchange, engine.registry(), 100, 0.2);
    exchange.set_position("RTM52C", -120);
    exchange.set_position("RTM48P", 250);

    let report = engine.run_cycle(&exchange, 100).unwrap();

    assert_eq!(report.cleared, vec!["RTM48P".to_string(), "RTM52C".to_string()]);
    assert_eq!(
        exchange.orders_for("RTM52C"),
        vec![MarketOrder::buy("RTM52C", 100), MarketOrder::buy("RTM52C", 20)]
    );
    assert_eq!(
        exchange.orders_for("RTM48P"),
        vec![
            MarketOrder::sell("RTM48P", 100),
            MarketOrder::sell("RTM48P", 100),
            MarketOrder::sell("RTM48P", 50)
        ]
    );

    // Both option deltas were short, so the hedge bought the underlying
    assert!(report.net_delta < 0.0);
    let hedge = exchange.orders_for("RTM");
    assert!(!hedge.is_empty());
    assert!(hedge.iter().all(|o| o.side == Side::Buy && o.quantity <= 10_000));
    assert_eq!(exchange.position("RTM"), -(report.net_delta.trunc() as i64));
}

#[test]
fn test_requests_per_quiet_cycle() {
    let engine = engine();
    let exchange = PaperExchange::new(100);
    quiet_market(&exchange, engine.registry(), 100, 0.2);

    engine.run_cycle(&exchange, 100).unwrap();

    // news + underlying quote + 21 positions + 20 contract quotes
    assert_eq!(exchange.request_count(), 1 + 1 + 21 + 20);
}

#[test]
fn test_config_file_round_trip() {
    let config = EngineConfig {
        top_k: 2,
        idle_interval_ms: 0,
        ..Default::default()
    };
    let path = std::env::temp_dir().join(format!("engine-config-{}.json", std::process::id()));
    std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

    let loaded = EngineConfig::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.top_k, 2);
    assert_eq!(loaded.strikes, config.strikes);
}
