use serde::{Deserialize, Serialize};

/// Supported market sectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    Technology,
    Energy,
    Finance,
    Healthcare,
    Manufacturing,
    #[serde(rename = "Consumer Goods")]
    ConsumerGoods,
    #[serde(other)]
    Unknown,
}

impl Sector {
    pub const SUPPORTED: [Sector; 6] = [
        Sector::Technology,
        Sector::Energy,
        Sector::Finance,
        Sector::Healthcare,
        Sector::Manufacturing,
        Sector::ConsumerGoods,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Sector::Technology => "Technology",
            Sector::Energy => "Energy",
            Sector::Finance => "Finance",
            Sector::Healthcare => "Healthcare",
            Sector::Manufacturing => "Manufacturing",
            Sector::ConsumerGoods => "Consumer Goods",
            Sector::Unknown => "Unknown",
        }
    }

    pub fn from_name(raw: &str) -> Sector {
        match raw.trim() {
            "Technology" => Sector::Technology,
            "Energy" => Sector::Energy,
            "Finance" => Sector::Finance,
            "Healthcare" => Sector::Healthcare,
            "Manufacturing" => Sector::Manufacturing,
            "Consumer Goods" => Sector::ConsumerGoods,
            _ => Sector::Unknown,
        }
    }
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One market observation for a symbol, produced per collection cycle.
/// Ephemeral: consumed by the scoring engine and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketPoint {
    pub symbol: String,
    pub sector: Sector,
    /// Last traded price, >= 0.
    pub price: f64,
    /// Fractional daily return, e.g. 0.02 for +2%.
    pub change: f64,
    pub volume: u64,
    /// Observation time, RFC 3339.
    pub timestamp: String,
}

/// Snapshot of a market index (S&P 500, VIX, ...), kept separate from
/// sector symbols so index rows never dilute per-sector aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexQuote {
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub volume: u64,
    pub timestamp: String,
}
