//! # Pricing and Bonus Strategies
//!
//! The two pluggable calculations the aggregator delegates to.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Strategy Seams                                   │
//! │                                                                         │
//! │  RevenueStrategy                    BonusStrategy                       │
//! │  ───────────────                    ─────────────                       │
//! │  (LineItem, Product) → f64          (rank, total, SellerStats) → f64    │
//! │                                                                         │
//! │  SimpleRevenue (reference)          ProfitBonus (reference)             │
//! │    price × qty × (1 − disc/100)       rank 0        → 15% of profit     │
//! │                                       rank 1..=2    → 10% of profit     │
//! │                                       last place    →  0                │
//! │                                       everyone else →  5% of profit     │
//! │                                                                         │
//! │  Closures with the same shape implement both traits.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use tally_core::strategy::{BonusStrategy, ProfitBonus};
//! use tally_core::{Seller, SellerStats};
//!
//! let mut stats = SellerStats::new(&Seller::new("1", "Ann", "Lee"));
//! stats.profit = 1000.0;
//!
//! let policy = ProfitBonus::default();
//! assert!((policy.bonus(0, 5, &stats) - 150.0).abs() < 1e-9);
//! assert_eq!(policy.bonus(4, 5, &stats), 0.0);
//! ```

use crate::money::Rate;
use crate::types::{LineItem, Product, SellerStats};

// =============================================================================
// Revenue
// =============================================================================

/// Computes net revenue for one line item.
///
/// Implementations must be pure: same inputs, same output.
pub trait RevenueStrategy: Send + Sync {
    fn revenue(&self, item: &LineItem, product: &Product) -> f64;
}

impl<F> RevenueStrategy for F
where
    F: Fn(&LineItem, &Product) -> f64 + Send + Sync,
{
    fn revenue(&self, item: &LineItem, product: &Product) -> f64 {
        self(item, product)
    }
}

/// `sale_price × quantity × (1 − discount / 100)`, using the line item's own
/// price and discount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimpleRevenue;

impl RevenueStrategy for SimpleRevenue {
    fn revenue(&self, item: &LineItem, _product: &Product) -> f64 {
        let discount = 1.0 - item.discount / 100.0;
        item.sale_price * item.quantity as f64 * discount
    }
}

// =============================================================================
// Bonus
// =============================================================================

/// Computes a seller's bonus from its rank.
///
/// `rank` is the 0-based position in the profit-descending order and
/// `total` the number of sellers in the report.
pub trait BonusStrategy: Send + Sync {
    fn bonus(&self, rank: usize, total: usize, seller: &SellerStats) -> f64;
}

impl<F> BonusStrategy for F
where
    F: Fn(usize, usize, &SellerStats) -> f64 + Send + Sync,
{
    fn bonus(&self, rank: usize, total: usize, seller: &SellerStats) -> f64 {
        self(rank, total, seller)
    }
}

/// Tiered bonus as a share of profit.
///
/// Tiers are tested in order and the first match wins: leader, runner-up,
/// last place, base. A lone seller is therefore the leader, and with two or
/// three sellers the last one is still a runner-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfitBonus {
    /// Rate for rank 0.
    pub leader: Rate,
    /// Rate for ranks `1..=runner_up_ranks`.
    pub runner_up: Rate,
    /// How many ranks after the leader get the runner-up rate.
    pub runner_up_ranks: usize,
    /// Rate for the last rank.
    pub last_place: Rate,
    /// Rate for every other rank.
    pub base: Rate,
}

impl Default for ProfitBonus {
    fn default() -> Self {
        ProfitBonus {
            leader: Rate::from_bps(1500),
            runner_up: Rate::from_bps(1000),
            runner_up_ranks: 2,
            last_place: Rate::zero(),
            base: Rate::from_bps(500),
        }
    }
}

impl ProfitBonus {
    /// The rate that applies at `rank` out of `total` sellers.
    pub fn rate_for(&self, rank: usize, total: usize) -> Rate {
        if rank == 0 {
            self.leader
        } else if rank <= self.runner_up_ranks {
            self.runner_up
        } else if rank + 1 == total {
            self.last_place
        } else {
            self.base
        }
    }
}

impl BonusStrategy for ProfitBonus {
    fn bonus(&self, rank: usize, total: usize, seller: &SellerStats) -> f64 {
        self.rate_for(rank, total).apply(seller.profit)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Seller;

    fn stats_with_profit(profit: f64) -> SellerStats {
        let mut stats = SellerStats::new(&Seller::new("s", "Test", "Seller"));
        stats.profit = profit;
        stats
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_simple_revenue() {
        let product = Product::new("A1", 10.0, 99.0);

        let item = LineItem::new("A1", 2, 30.0, 0.0);
        assert!(approx(SimpleRevenue.revenue(&item, &product), 60.0));

        let item = LineItem::new("A1", 3, 30.0, 7.0);
        assert!(approx(SimpleRevenue.revenue(&item, &product), 83.7));

        let item = LineItem::new("A1", 1, 30.0, 100.0);
        assert!(approx(SimpleRevenue.revenue(&item, &product), 0.0));
    }

    #[test]
    fn test_closure_revenue() {
        let catalogue_price =
            |item: &LineItem, product: &Product| product.sale_price * item.quantity as f64;
        let product = Product::new("A1", 10.0, 25.0);
        let item = LineItem::new("A1", 2, 30.0, 50.0);
        assert!(approx(catalogue_price.revenue(&item, &product), 50.0));
    }

    #[test]
    fn test_profit_bonus_tiers() {
        let policy = ProfitBonus::default();
        let seller = stats_with_profit(1000.0);

        assert!(approx(policy.bonus(0, 6, &seller), 150.0));
        assert!(approx(policy.bonus(1, 6, &seller), 100.0));
        assert!(approx(policy.bonus(2, 6, &seller), 100.0));
        assert!(approx(policy.bonus(3, 6, &seller), 50.0));
        assert!(approx(policy.bonus(4, 6, &seller), 50.0));
        assert!(approx(policy.bonus(5, 6, &seller), 0.0));
    }

    #[test]
    fn test_single_seller_gets_leader_rate() {
        let policy = ProfitBonus::default();
        assert_eq!(policy.rate_for(0, 1), Rate::from_bps(1500));
        assert!(approx(policy.bonus(0, 1, &stats_with_profit(40.0)), 6.0));
    }

    #[test]
    fn test_runner_up_checked_before_last_place() {
        let policy = ProfitBonus::default();
        assert_eq!(policy.rate_for(1, 2), Rate::from_bps(1000));
        assert_eq!(policy.rate_for(2, 3), Rate::from_bps(1000));
        assert_eq!(policy.rate_for(3, 4), Rate::zero());
    }

    #[test]
    fn test_negative_profit_bonus() {
        let policy = ProfitBonus::default();
        assert!(approx(policy.bonus(0, 4, &stats_with_profit(-200.0)), -30.0));
    }

    #[test]
    fn test_custom_tiers() {
        let policy = ProfitBonus {
            leader: Rate::from_bps(2000),
            runner_up: Rate::from_bps(1000),
            runner_up_ranks: 0,
            last_place: Rate::from_bps(100),
            base: Rate::from_bps(300),
        };
        assert_eq!(policy.rate_for(0, 3), Rate::from_bps(2000));
        assert_eq!(policy.rate_for(1, 3), Rate::from_bps(300));
        assert_eq!(policy.rate_for(2, 3), Rate::from_bps(100));
    }

    #[test]
    fn test_closure_bonus() {
        let flat = |_rank: usize, _total: usize, _seller: &SellerStats| 25.0;
        assert_eq!(flat.bonus(3, 10, &stats_with_profit(0.0)), 25.0);
    }
}
