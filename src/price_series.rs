

use serde::{
    Deserialize,
    Serialize,
};



/// One ranked listing row, `sell` units traded for `buy` units.
///
/// Both values are strictly positive; rows with a zero component are never
/// constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRow {
    pub sell: u32,
    pub buy: u32,
}



impl PriceRow {
    pub fn new(sell: u32, buy: u32) -> Option<Self> {
        if sell == 0 || buy == 0 {
            return None
        }

        Some(Self { sell, buy })
    }
}



/// Ordered listing rows of one leg, best offers first.
///
/// Order is the marketplace ranking and must never be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSeries {
    rows: Vec<PriceRow>,
}



impl PriceSeries {
    pub fn new(rows: Vec<PriceRow>) -> Self {
        Self { rows }
    }



    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }



    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }



    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }



    /// Rows `[start, start + max)` clamped to what is available.
    pub fn window(&self, start: usize, max: usize) -> Self {
        let start = start.min(self.rows.len());
        let end = start.saturating_add(max).min(self.rows.len());

        Self::new(self.rows[start..end].to_vec())
    }
}



impl FromIterator<PriceRow> for PriceSeries {
    fn from_iter<I: IntoIterator<Item = PriceRow>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}



/// Both legs of one currency pair.
///
/// `want_to_base` - listings to sell the priced currency for the reference
/// unit.
/// `base_to_want` - listings to buy the priced currency back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotePair {
    pub want_to_base: PriceSeries,
    pub base_to_want: PriceSeries,
}



impl QuotePair {
    pub fn window(&self, start: usize, max: usize) -> Self {
        Self {
            want_to_base: self.want_to_base.window(start, max),
            base_to_want: self.base_to_want.window(start, max),
        }
    }
}
