use std::collections::HashMap;

use crate::models::analysis::{ImpactDirection, ImpactResult, SectorImpact};
use crate::models::market::Sector;
use crate::models::news::NewsItem;
use crate::services::sentiment::SentimentScorer;

/// Sensitivity applied to sectors without a configured constant.
const DEFAULT_SENSITIVITY: f64 = 0.7;
/// Volatility proxy: half the magnitude of the impact score.
const VOLATILITY_RATIO: f64 = 0.5;
/// Confidence ramps with article count and caps below certainty.
const CONFIDENCE_CAP: f64 = 0.9;
const CONFIDENCE_ARTICLES: f64 = 20.0;

/// Estimates directional market impact per sector from aggregate news
/// sentiment and fixed sector sensitivity constants.
pub struct ImpactPredictor {
    scorer: SentimentScorer,
    sensitivities: HashMap<Sector, f64>,
}

impl ImpactPredictor {
    pub fn new() -> Self {
        let sensitivities = HashMap::from([
            (Sector::Technology, 0.8),
            (Sector::Energy, 1.0),
            (Sector::Finance, 0.9),
            (Sector::Healthcare, 0.5),
            (Sector::Manufacturing, 0.7),
            (Sector::ConsumerGoods, 0.6),
        ]);
        Self {
            scorer: SentimentScorer::new(),
            sensitivities,
        }
    }

    pub fn sensitivity(&self, sector: Sector) -> f64 {
        self.sensitivities
            .get(&sector)
            .copied()
            .unwrap_or(DEFAULT_SENSITIVITY)
    }

    /// Predict market impact of the given news batch for each requested
    /// sector. An empty batch yields zero sentiment, zero impacts with
    /// `Neutral` direction, and zero confidence.
    pub fn predict_impact(&self, news: &[NewsItem], sectors: &[Sector]) -> ImpactResult {
        let summary = self.scorer.summarize(news);
        let overall_sentiment = summary.average_sentiment;
        let confidence = (news.len() as f64 / CONFIDENCE_ARTICLES).min(CONFIDENCE_CAP);

        let mut sector_impacts = HashMap::with_capacity(sectors.len());
        for sector in sectors {
            let impact_score = overall_sentiment * self.sensitivity(*sector);
            sector_impacts.insert(
                *sector,
                SectorImpact {
                    impact_score,
                    volatility_prediction: impact_score.abs() * VOLATILITY_RATIO,
                    direction: ImpactDirection::from_score(impact_score),
                    confidence,
                },
            );
        }

        ImpactResult {
            overall_sentiment,
            sector_impacts,
            analyzed_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl Default for ImpactPredictor {
    fn default() -> Self {
        Self::new()
    }
}
