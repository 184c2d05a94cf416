use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::market::Sector;

/// Aggregate sentiment over a batch of news articles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentSummary {
    /// Mean polarity over the batch, in [-1, 1].
    pub average_sentiment: f64,
    /// Population standard deviation of per-article polarity.
    pub std_dev: f64,
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
    pub total_articles: usize,
}

impl SentimentSummary {
    /// The all-zero summary used for an empty batch.
    pub fn empty() -> Self {
        Self {
            average_sentiment: 0.0,
            std_dev: 0.0,
            positive_count: 0,
            negative_count: 0,
            neutral_count: 0,
            total_articles: 0,
        }
    }
}

/// Predicted direction of a sector impact. A zero impact score is `Neutral`
/// rather than being folded into either signed direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactDirection {
    Positive,
    Negative,
    Neutral,
}

impl ImpactDirection {
    pub fn from_score(score: f64) -> ImpactDirection {
        if score > 0.0 {
            ImpactDirection::Positive
        } else if score < 0.0 {
            ImpactDirection::Negative
        } else {
            ImpactDirection::Neutral
        }
    }
}

/// Predicted market impact for one sector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorImpact {
    pub impact_score: f64,
    pub volatility_prediction: f64,
    pub direction: ImpactDirection,
    pub confidence: f64,
}

/// Market impact prediction across the requested sectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactResult {
    pub overall_sentiment: f64,
    #[serde(rename = "perSector")]
    pub sector_impacts: HashMap<Sector, SectorImpact>,
    /// Prediction time, RFC 3339.
    pub analyzed_at: String,
}

/// A generated analysis narrative, as stored/returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: String,
    pub narrative: String,
    /// Model that produced the text, or "fallback" for the deterministic path.
    pub model_name: String,
    pub generated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_score() {
        assert_eq!(ImpactDirection::from_score(0.2), ImpactDirection::Positive);
        assert_eq!(ImpactDirection::from_score(-0.2), ImpactDirection::Negative);
        assert_eq!(ImpactDirection::from_score(0.0), ImpactDirection::Neutral);
    }

    #[test]
    fn test_sector_impact_wire_field_names() {
        let impact = SectorImpact {
            impact_score: 0.4,
            volatility_prediction: 0.2,
            direction: ImpactDirection::Positive,
            confidence: 0.5,
        };
        let json = serde_json::to_string(&impact).unwrap();
        assert!(json.contains("\"impactScore\""));
        assert!(json.contains("\"volatilityPrediction\""));
        assert!(json.contains("\"positive\""));
    }
}
