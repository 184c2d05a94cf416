use std::collections::HashMap;

use anyhow::Result;

use crate::models::analysis::{ImpactResult, SectorImpact, SentimentSummary};
use crate::models::market::{MarketPoint, Sector};
use crate::models::news::{NewsItem, Region};
use crate::models::risk::{RegionRiskResult, RiskAssessment, RiskLevel};
use crate::services::impact::ImpactPredictor;
use crate::services::risk_model::RiskModel;
use crate::services::sentiment::SentimentScorer;

/// Conversion from average news sentiment to a risk score:
/// risk = 0.5 - sentiment * SCALE, so strongly negative coverage pushes a
/// region toward high risk. Kept as a named coefficient; treat as tunable.
const SENTIMENT_RISK_SCALE: f64 = 0.3;

/// Sentiment beyond which recommendations tilt growth/defensive.
const RECOMMENDATION_SENTIMENT_BAND: f64 = 0.2;
/// Sector impact magnitude that triggers an over/underweight suggestion.
const SECTOR_WEIGHT_TRIGGER: f64 = 0.3;

/// News-driven confidence ramps to 1.0 at this many articles.
const RISK_CONFIDENCE_ARTICLES: f64 = 10.0;

/// Keywords scanned out of news text as qualitative risk factors.
const RISK_KEYWORDS: &[&str] = &[
    "conflict", "tension", "sanctions", "embargo", "war", "crisis", "instability", "protest",
    "unrest", "violence",
];

/// Orchestrates sentiment scoring, risk scoring, and impact prediction into
/// recommendation and report outputs for the presentation layer.
pub struct GeopoliticalAnalyzer {
    scorer: SentimentScorer,
    risk_model: RiskModel,
    predictor: ImpactPredictor,
}

impl GeopoliticalAnalyzer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            scorer: SentimentScorer::new(),
            risk_model: RiskModel::new()?,
            predictor: ImpactPredictor::new(),
        })
    }

    pub fn risk_model(&self) -> &RiskModel {
        &self.risk_model
    }

    pub fn sentiment(&self, text: &str) -> f64 {
        self.scorer.score(text)
    }

    pub fn analyze_news_sentiment(&self, news: &[NewsItem]) -> SentimentSummary {
        self.scorer.summarize(news)
    }

    pub fn predict_market_impact(&self, news: &[NewsItem], sectors: &[Sector]) -> ImpactResult {
        self.predictor.predict_impact(news, sectors)
    }

    /// Investment recommendation lines for an impact result: a base set
    /// keyed off overall sentiment, plus over/underweight lines for sectors
    /// with a pronounced impact score.
    pub fn investment_recommendations(&self, impact: &ImpactResult) -> Vec<String> {
        let mut recommendations: Vec<String> =
            if impact.overall_sentiment > RECOMMENDATION_SENTIMENT_BAND {
                vec![
                    "Consider increasing exposure to growth-oriented sectors",
                    "Monitor for positive geopolitical developments",
                    "Look for opportunities in emerging markets",
                ]
            } else if impact.overall_sentiment < -RECOMMENDATION_SENTIMENT_BAND {
                vec![
                    "Consider defensive positioning in stable sectors",
                    "Increase allocation to safe-haven assets",
                    "Monitor geopolitical developments closely",
                ]
            } else {
                vec![
                    "Maintain balanced portfolio allocation",
                    "Stay informed about geopolitical developments",
                    "Consider dollar-cost averaging strategies",
                ]
            }
            .into_iter()
            .map(String::from)
            .collect();

        let mut sectors: Vec<(&Sector, &SectorImpact)> = impact.sector_impacts.iter().collect();
        sectors.sort_by_key(|(sector, _)| sector.name());

        for (sector, sector_impact) in sectors {
            if sector_impact.impact_score > SECTOR_WEIGHT_TRIGGER {
                recommendations.push(format!("Consider overweighting {} sector", sector));
            } else if sector_impact.impact_score < -SECTOR_WEIGHT_TRIGGER {
                recommendations.push(format!("Consider underweighting {} sector", sector));
            }
        }

        recommendations
    }

    /// News-driven geopolitical risk for one region. Regions with no
    /// matching articles return the fixed neutral default, tagged
    /// `InsufficientData` so the caller can see the evidentiary basis.
    pub fn assess_geopolitical_risk(&self, region: Region, news: &[NewsItem]) -> RiskAssessment {
        let region_news: Vec<&NewsItem> =
            news.iter().filter(|item| item.region == region).collect();

        if region_news.is_empty() {
            return RiskAssessment::InsufficientData(RegionRiskResult {
                region,
                risk_score: 0.5,
                risk_level: RiskLevel::Medium,
                confidence: 0.3,
                key_factors: vec!["Limited data available".to_string()],
                sentiment: None,
            });
        }

        let owned: Vec<NewsItem> = region_news.iter().map(|item| (*item).clone()).collect();
        let summary = self.scorer.summarize(&owned);
        let avg_sentiment = summary.average_sentiment;

        // negative coverage raises risk above the 0.5 midpoint
        let risk_score = (0.5 - avg_sentiment * SENTIMENT_RISK_SCALE).clamp(0.0, 1.0);

        RiskAssessment::Scored(RegionRiskResult {
            region,
            risk_score,
            risk_level: RiskLevel::from_score(risk_score),
            confidence: (owned.len() as f64 / RISK_CONFIDENCE_ARTICLES).min(1.0),
            key_factors: identify_risk_keywords(&owned),
            sentiment: Some(avg_sentiment),
        })
    }

    /// Deterministic analysis text used when the narrative model is
    /// unavailable. Pure function of its inputs: same news and market data
    /// always produce byte-identical output.
    pub fn fallback_analysis(&self, news: &[NewsItem], market: &[MarketPoint]) -> String {
        let summary = self.scorer.summarize(news);

        let mut out = String::from("=== GEOPOLITICAL MARKET ANALYSIS ===\n\n");
        out.push_str(&format!(
            "Overall Market Sentiment: {:.2}\n",
            summary.average_sentiment
        ));
        out.push_str(&format!("Positive News Articles: {}\n", summary.positive_count));
        out.push_str(&format!("Negative News Articles: {}\n\n", summary.negative_count));

        if !market.is_empty() {
            out.push_str("=== SECTOR PERFORMANCE ===\n");
            for (sector, avg_change) in sector_performance(market) {
                out.push_str(&format!("{}: {:.2}%\n", sector, avg_change * 100.0));
            }
        }

        out.push_str("\n=== KEY INSIGHTS ===\n");
        out.push_str("- Monitor geopolitical developments in key regions\n");
        out.push_str("- Consider sector-specific impacts of political events\n");
        out.push_str("- Diversify investments to mitigate geopolitical risks\n");
        out.push_str("- Stay informed about trade relations and policy changes\n");

        out
    }

    /// Aggregate text report over collected news, market data, and region
    /// risk results.
    pub fn report_summary(
        &self,
        news: &[NewsItem],
        market: &[MarketPoint],
        risks: &[RegionRiskResult],
    ) -> String {
        let mut out = String::from("=== GEOPOLITICAL MARKET ANALYSIS SUMMARY ===\n\n");

        if !news.is_empty() {
            let summary = self.scorer.summarize(news);
            out.push_str("News Analysis:\n");
            out.push_str(&format!("- Total articles analyzed: {}\n", news.len()));
            out.push_str(&format!(
                "- Average sentiment: {:.2}\n",
                summary.average_sentiment
            ));

            let mut regions: Vec<(Region, usize)> = Vec::new();
            for item in news {
                match regions.iter_mut().find(|(r, _)| *r == item.region) {
                    Some((_, count)) => *count += 1,
                    None => regions.push((item.region, 1)),
                }
            }
            let coverage: Vec<String> = regions
                .iter()
                .map(|(region, count)| format!("{} ({})", region, count))
                .collect();
            out.push_str(&format!("- Regional coverage: {}\n\n", coverage.join(", ")));
        }

        if !market.is_empty() {
            out.push_str("Market Analysis:\n");
            out.push_str(&format!("- Total market symbols: {}\n", market.len()));
            out.push_str("- Sector performance:\n");
            for (sector, avg_change) in sector_performance(market) {
                out.push_str(&format!("  - {}: {:.2}%\n", sector, avg_change * 100.0));
            }
            out.push('\n');
        }

        if !risks.is_empty() {
            let high: Vec<&RegionRiskResult> = risks
                .iter()
                .filter(|r| r.risk_level == RiskLevel::High)
                .collect();
            let medium = risks
                .iter()
                .filter(|r| r.risk_level == RiskLevel::Medium)
                .count();
            let low = risks
                .iter()
                .filter(|r| r.risk_level == RiskLevel::Low)
                .count();

            out.push_str("Risk Assessment:\n");
            out.push_str(&format!("- High risk regions: {}\n", high.len()));
            out.push_str(&format!("- Medium risk regions: {}\n", medium));
            out.push_str(&format!("- Low risk regions: {}\n", low));
            if !high.is_empty() {
                let names: Vec<&str> = high.iter().map(|r| r.region.name()).collect();
                out.push_str(&format!("- High risk areas: {}\n", names.join(", ")));
            }
        }

        out.push_str(&format!(
            "\nReport generated: {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));

        out
    }
}

/// Mean fractional change per sector, sorted by sector name for stable
/// output.
fn sector_performance(market: &[MarketPoint]) -> Vec<(Sector, f64)> {
    let mut by_sector: HashMap<Sector, Vec<f64>> = HashMap::new();
    for point in market {
        by_sector.entry(point.sector).or_default().push(point.change);
    }

    let mut rows: Vec<(Sector, f64)> = by_sector
        .into_iter()
        .map(|(sector, changes)| {
            let mean = changes.iter().sum::<f64>() / changes.len() as f64;
            (sector, mean)
        })
        .collect();
    rows.sort_by_key(|(sector, _)| sector.name());
    rows
}

/// Risk keywords found in the batch, deduplicated in first-seen order.
fn identify_risk_keywords(news: &[NewsItem]) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for item in news {
        let text = format!("{} {}", item.title, item.content).to_lowercase();
        for keyword in RISK_KEYWORDS {
            if text.contains(keyword) && !found.iter().any(|f| f == keyword) {
                found.push(keyword.to_string());
            }
        }
    }
    found
}
