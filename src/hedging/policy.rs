use crate::market_data::{MarketOrder, Side};
use crate::network::Exchange;
use smallvec::SmallVec;

/// Orders produced by one flatten request
pub type OrderBatch = SmallVec<[MarketOrder; 4]>;

/// Split `quantity` into full lots plus one residual order
///
/// The side reduces the signed quantity toward zero: positive quantities are
/// sold, negative ones bought. Zero yields no orders.
///
/// ```text
///  250, cap 100   →  SELL 100, SELL 100, SELL 50
/// -120, cap 100   →  BUY 100, BUY 20
/// ```
pub fn decompose(ticker: &str, quantity: i64, lot_cap: u32) -> OrderBatch {
    let mut orders = OrderBatch::new();
    if quantity == 0 || lot_cap == 0 {
        return orders;
    }

    let side = Side::reducing(quantity);
    let size = quantity.unsigned_abs();
    let cap = lot_cap as u64;

    for _ in 0..size / cap {
        orders.push(MarketOrder::new(ticker, lot_cap, side));
    }

    let residual = size % cap;
    if residual > 0 {
        orders.push(MarketOrder::new(ticker, residual as u32, side));
    }

    orders
}

/// Hedge and clear policy
///
/// Turns a net delta or a contract position into lot-capped market orders
/// that drive it to zero, assuming exact fills.
#[derive(Debug, Clone)]
pub struct HedgePolicy {
    underlying: String,
    option_lot_cap: u32,
    underlying_lot_cap: u32,
}

impl HedgePolicy {
    pub fn new(underlying: impl Into<String>, option_lot_cap: u32, underlying_lot_cap: u32) -> Self {
        Self {
            underlying: underlying.into(),
            option_lot_cap,
            underlying_lot_cap,
        }
    }

    /// Orders that flatten an option position
    pub fn clear_orders(&self, ticker: &str, position: i64) -> OrderBatch {
        decompose(ticker, position, self.option_lot_cap)
    }

    /// Underlying orders that offset a net delta
    ///
    /// The delta is truncated toward zero first, so |Δ| < 1 needs no hedge.
    pub fn hedge_orders(&self, net_delta: f64) -> OrderBatch {
        // NaN truncates to 0, out-of-range values saturate
        let units = net_delta.trunc() as i64;
        decompose(&self.underlying, units, self.underlying_lot_cap)
    }

    /// Submit the clear orders for `ticker`; returns the orders sent
    ///
    /// Stops at the first failed submission.
    pub fn clear_position<E: Exchange + ?Sized>(
        &self,
        exchange: &E,
        ticker: &str,
        position: i64,
    ) -> crate::Result<OrderBatch> {
        let orders = self.clear_orders(ticker, position);
        submit_all(exchange, &orders)?;
        if !orders.is_empty() {
            log::debug!("cleared {} ({} orders)", ticker, orders.len());
        }
        Ok(orders)
    }

    /// Submit the hedge orders for `net_delta`; returns the orders sent
    pub fn delta_hedge<E: Exchange + ?Sized>(
        &self,
        exchange: &E,
        net_delta: f64,
    ) -> crate::Result<OrderBatch> {
        let orders = self.hedge_orders(net_delta);
        submit_all(exchange, &orders)?;
        if !orders.is_empty() {
            log::debug!("hedged delta {:.1} with {} orders", net_delta, orders.len());
        }
        Ok(orders)
    }

    pub fn underlying(&self) -> &str {
        &self.underlying
    }
}

impl Default for HedgePolicy {
    fn default() -> Self {
        Self::new("RTM", 100, 10_000)
    }
}

/// Total quantity in a batch
pub fn batch_volume(orders: &[MarketOrder]) -> u64 {
    orders.iter().map(|o| o.quantity as u64).sum()
}

fn submit_all<E: Exchange + ?Sized>(exchange: &E, orders: &[MarketOrder]) -> crate::Result<()> {
    for order in orders {
        exchange.submit_market_order(order)?;
        log::debug!("submitted {}", order);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::PaperExchange;

    fn summary(orders: &[MarketOrder]) -> Vec<(u32, Side)> {
        orders.iter().map(|o| (o.quantity, o.side)).collect()
    }

    #[test]
    fn test_clear_long_position() {
        let policy = HedgePolicy::default();
        let orders = policy.clear_orders("RTM50C", 250);

        assert_eq!(
            summary(&orders),
            vec![(100, Side::Sell), (100, Side::Sell), (50, Side::Sell)]
        );
        assert!(orders.iter().all(|o| o.ticker == "RTM50C"));
    }

    #[test]
    fn test_clear_short_position() {
        let policy = HedgePolicy::default();
        let orders = policy.clear_orders("RTM50P", -120);

        assert_eq!(summary(&orders), vec![(100, Side::Buy), (20, Side::Buy)]);
    }

    #[test]
    fn test_clear_exact_lots_has_no_residual() {
        let policy = HedgePolicy::default();
        assert_eq!(
            summary(&policy.clear_orders("RTM50C", 200)),
            vec![(100, Side::Sell), (100, Side::Sell)]
        );
        assert!(policy.clear_orders("RTM50C", 0).is_empty());
    }

    #[test]
    fn test_hedge_long_delta() {
        let policy = HedgePolicy::default();
        let orders = policy.hedge_orders(25_000.0);

        assert_eq!(
            summary(&orders),
            vec![
                (10_000, Side::Sell),
                (10_000, Side::Sell),
                (5_000, Side::Sell)
            ]
        );
        assert!(orders.iter().all(|o| o.ticker == "RTM"));
    }

    #[test]
    fn test_hedge_short_delta() {
        let policy = HedgePolicy::default();
        assert_eq!(
            summary(&policy.hedge_orders(-3_000.0)),
            vec![(3_000, Side::Buy)]
        );
    }

    #[test]
    fn test_hedge_truncates_toward_zero() {
        let policy = HedgePolicy::default();

        assert_eq!(summary(&policy.hedge_orders(1_234.9)), vec![(1_234, Side::Sell)]);
        assert_eq!(summary(&policy.hedge_orders(-99.7)), vec![(99, Side::Buy)]);
        assert!(policy.hedge_orders(0.9).is_empty());
        assert!(policy.hedge_orders(-0.9).is_empty());
        assert!(policy.hedge_orders(f64::NAN).is_empty());
    }

    #[test]
    fn test_orders_respect_lot_cap() {
        for quantity in [-30_001i64, -10_000, -1, 1, 9_999, 10_001, 123_456] {
            let orders = decompose("RTM", quantity, 10_000);
            assert!(orders.iter().all(|o| o.quantity > 0 && o.quantity <= 10_000));
            let filled: i64 = orders.iter().map(|o| o.signed_quantity()).sum();
            assert_eq!(quantity + filled, 0);
        }
    }

    #[test]
    fn test_delta_hedge_flattens_underlying() {
        let exchange = PaperExchange::new(1);
        let policy = HedgePolicy::default();

        let sent = policy.delta_hedge(&exchange, 25_000.0).unwrap();

        assert_eq!(sent.len(), 3);
        assert_eq!(exchange.position("RTM"), -25_000);
        assert_eq!(batch_volume(&sent), 25_000);
    }

    #[test]
    fn test_clear_position_stops_on_rejection() {
        let exchange = PaperExchange::new(1);
        exchange.reject_orders_for("RTM45C");
        let policy = HedgePolicy::default();

        let result = policy.clear_position(&exchange, "RTM45C", 150);

        assert!(matches!(result, Err(crate::Error::Transport(_))));
        assert_eq!(exchange.request_count(), 1);
    }
}
