//! Currencies that can be priced, and the reference unit they are priced
//! against.



/// Currency known to the marketplace.
///
/// `name` - what the operator types on the command line and what the cache is
/// keyed by.
/// `trade_id` - identifier the trade API expects in exchange queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    pub name: &'static str,
    pub trade_id: &'static str,
}



/// Every other currency is quoted against this one.
pub const REFERENCE: Currency = Currency { name: "chaos", trade_id: "chaos" };



const SUPPORTED: &[Currency] = &[
    Currency { name: "chromatic", trade_id: "chrom" },
    Currency { name: "cartographer", trade_id: "chisel" },
    Currency { name: "fusing", trade_id: "fusing" },
    Currency { name: "chance", trade_id: "chance" },
    Currency { name: "alchemy", trade_id: "alch" },
    Currency { name: "gemcutters", trade_id: "gcp" },
    Currency { name: "regret", trade_id: "regret" },
    Currency { name: "vaal", trade_id: "vaal" },
    Currency { name: "divine", trade_id: "divine" },
    Currency { name: "exalted", trade_id: "exalted" },
];



/// Look up a supported currency by operator facing name.
pub fn lookup(name: &str) -> Option<Currency> {
    let name = name.trim();

    SUPPORTED.iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .copied()
}



#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("chromatic").map(|c| c.trade_id), Some("chrom"));
        assert_eq!(lookup(" Divine ").map(|c| c.name), Some("divine"));
        assert_eq!(lookup("mirror"), None);
        // Reference unit is never priced against itself.
        assert_eq!(lookup("chaos"), None);
    }
}
