use serde::{Deserialize, Serialize};

/// Supported world regions for news collection and risk scoring.
///
/// Anything outside the supported set deserializes to `Unknown`, which every
/// scoring operation treats as "no regional adjustments apply".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "North America")]
    NorthAmerica,
    #[serde(rename = "Europe")]
    Europe,
    #[serde(rename = "Asia-Pacific")]
    AsiaPacific,
    #[serde(rename = "Middle East")]
    MiddleEast,
    #[serde(rename = "Africa")]
    Africa,
    #[serde(rename = "Latin America")]
    LatinAmerica,
    #[serde(other)]
    Unknown,
}

impl Region {
    /// The six regions with defined baselines, in display order.
    pub const SUPPORTED: [Region; 6] = [
        Region::NorthAmerica,
        Region::Europe,
        Region::AsiaPacific,
        Region::MiddleEast,
        Region::Africa,
        Region::LatinAmerica,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Region::NorthAmerica => "North America",
            Region::Europe => "Europe",
            Region::AsiaPacific => "Asia-Pacific",
            Region::MiddleEast => "Middle East",
            Region::Africa => "Africa",
            Region::LatinAmerica => "Latin America",
            Region::Unknown => "Unknown",
        }
    }

    /// Map a free-form region string to the supported set.
    pub fn from_name(raw: &str) -> Region {
        match raw.trim() {
            "North America" => Region::NorthAmerica,
            "Europe" => Region::Europe,
            "Asia-Pacific" => Region::AsiaPacific,
            "Middle East" => Region::MiddleEast,
            "Africa" => Region::Africa,
            "Latin America" => Region::LatinAmerica,
            _ => Region::Unknown,
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A collected geopolitical news article. Immutable once collected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub source: String,
    pub url: String,
    /// Publication time, RFC 3339.
    pub published_at: String,
    pub region: Region,
}
