//! Turns free text listing notes into comparable price rows.
//!
//! Notes look like `150/30 (stock: 5)` or simply `45`. A note is matched only
//! at its start, anything after the numbers is ignored. Rows that can not be
//! parsed are dropped, they never surface as errors.



use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::price_series::{
    PriceRow,
    PriceSeries,
};



/// Marker of buyout-only listings, those are not negotiable ratios.
pub const BUYOUT_MARKER: &str = "b/o";



lazy_static! {
    /// Format: `N` or `N/M` at the start of the note.
    static ref PRICE_NOTE_REGEX: Regex =
        Regex::new(r"^([0-9]+)/?([0-9]+)?")
            .expect("Invalid regex pattern");
}



#[derive(Debug, Clone)]
pub struct ListingNormalizer {
    reference_unit: String,
}



impl ListingNormalizer {
    /// `reference_unit` - symbol that single number notes are quoted against.
    pub fn new(reference_unit: &str) -> Self {
        Self {
            reference_unit: reference_unit.to_string(),
        }
    }



    /// Normalize notes of one leg into a price series, keeping feed order.
    pub fn normalize<I, S>(&self, notes: I, want: &str, base: &str) -> PriceSeries
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut total = 0;
        let series: PriceSeries = notes.into_iter()
            .inspect(|_| total += 1)
            .filter_map(|note| self.row_from_note(note.as_ref(), want))
            .collect();

        if series.len() < total {
            debug!("{} -> {}: dropped {} of {} listing notes", want, base,
                total - series.len(), total
            );
        }

        series
    }



    fn row_from_note(&self, note: &str, want: &str) -> Option<PriceRow> {
        if note.contains(BUYOUT_MARKER) {
            return None
        }

        let caps = PRICE_NOTE_REGEX.captures(note.trim())?;
        let first: u32 = caps.get(1)?.as_str().parse().ok()?;

        match caps.get(2) {
            Some(second) => PriceRow::new(first, second.as_str().parse().ok()?),

            // Single number is a unit price: N of one side per one reference
            // unit.
            None if want == self.reference_unit => PriceRow::new(1, first),
            None => PriceRow::new(first, 1),
        }
    }
}
