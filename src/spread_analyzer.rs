//! Finds the deepest trading row whose round trip profit stays within a
//! ceiling.
//!
//! Rows are scanned in marketplace rank order and the scan stops at the first
//! row over the ceiling. That relies on the assumption that later rows are
//! never more favorable to the trader than earlier ones. Upstream ranking does
//! not guarantee it, a row deeper than the first crossing is simply never
//! looked at.
//!
//! Everything here is pure integer arithmetic, no I/O.



use std::fmt;

use crate::price_series::{
    PriceRow,
    PriceSeries,
};



/// Greatest common divisor, iterative Euclid.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }

    a
}



/// Exchange ratio as listed, `numerator` of one currency for `denominator` of
/// the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratio {
    pub numerator: u64,
    pub denominator: u64,
}



impl Ratio {
    pub fn new(numerator: u64, denominator: u64) -> Self {
        Self { numerator, denominator }
    }



    /// Same ratio divided by the greatest common divisor of both sides.
    pub fn reduced(&self) -> Self {
        let divisor = gcd(self.numerator, self.denominator);
        if divisor == 0 {
            return *self
        }

        Self::new(self.numerator / divisor, self.denominator / divisor)
    }
}



/// Raw ratio followed by its reduced form, i.e. `30/150 (1/5)`.
impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reduced = self.reduced();

        write!(f, "{}/{} ({}/{})", self.numerator, self.denominator,
            reduced.numerator, reduced.denominator
        )
    }
}



/// Outcome of the scan for one pair.
///
/// `row_index` - 1-based row within analyzed series, 0 when unresolved.
/// `below_ceiling_found` - false when no row satisfied the ceiling and the
/// first row is reported instead, or when there was nothing to analyze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadResult {
    pub sell_ratio: Option<Ratio>,
    pub buy_ratio: Option<Ratio>,
    pub profit_percent: i64,
    pub row_index: usize,
    pub below_ceiling_found: bool,
}



impl SpreadResult {
    fn unresolved() -> Self {
        Self {
            sell_ratio: None,
            buy_ratio: None,
            profit_percent: 0,
            row_index: 0,
            below_ceiling_found: false,
        }
    }



    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.sell_ratio.is_some() && self.buy_ratio.is_some()
    }
}



/// Round trip profit in whole percent of selling on `sell` row and buying
/// back on `buy` row, rounded half up.
///
/// `(buy.buy / buy.sell) / (sell.sell / sell.buy) - 1` is evaluated exactly as
/// `P / Q - 1` with `P = buy.buy * sell.buy` and `Q = buy.sell * sell.sell`.
pub fn row_profit(sell: &PriceRow, buy: &PriceRow) -> i64 {
    let p = i128::from(buy.buy) * i128::from(sell.buy);
    let q = i128::from(buy.sell) * i128::from(sell.sell);

    // floor(100 * (P - Q) / Q + 1/2)
    let profit = (200 * (p - q) + q).div_euclid(2 * q);

    // Bounded by 100 * u32::MAX^2, saturate anything beyond i64.
    i64::try_from(profit).unwrap_or(i64::MAX)
}



/// Pick the deepest row of both legs with profit not above `profit_ceiling`.
///
/// Rows `0..=n-2` are scanned, where `n` is the length of the shorter series.
/// Single row series scan that row. When no row qualifies, row 0 is
/// reported with `below_ceiling_found` unset.
pub fn analyze(want_to_base: &PriceSeries, base_to_want: &PriceSeries,
    profit_ceiling: i64
)
    -> SpreadResult
{
    let sells = want_to_base.rows();
    let buys = base_to_want.rows();

    let n = sells.len().min(buys.len());
    if n == 0 {
        return SpreadResult::unresolved()
    }

    let scan_end = (n - 1).max(1);
    let mut best: Option<(usize, i64)> = None;

    for (i, (sell, buy)) in sells.iter().zip(buys).take(scan_end).enumerate() {
        let profit = row_profit(sell, buy);
        if profit > profit_ceiling {
            break
        }

        best = Some((i, profit));
    }

    let (row, profit, found) = match best {
        Some((row, profit)) => (row, profit, true),
        None => (0, row_profit(&sells[0], &buys[0]), false),
    };

    let sell = &sells[row];
    let buy = &buys[row];

    SpreadResult {
        sell_ratio: Some(Ratio::new(sell.buy.into(), sell.sell.into())),
        buy_ratio: Some(Ratio::new(buy.buy.into(), buy.sell.into())),
        profit_percent: profit,
        row_index: row + 1,
        below_ceiling_found: found,
    }
}
