use std::collections::HashMap;

use anyhow::{bail, Result};

use crate::models::market::Sector;
use crate::models::news::Region;
use crate::models::risk::{
    FactorVector, PortfolioPosition, PortfolioRisk, RiskFactor, RiskLevel, SectorRiskResult,
};

/// Scale applied to sector sensitivity adjustments, keeping them strictly
/// secondary to the regional baseline: a sector score can never drift more
/// than 0.2 x sensitivity away from its region score.
const SECTOR_ADJUSTMENT_SCALE: f64 = 0.2;

/// Sensitivity above which a factor counts as sector-critical.
const KEY_FACTOR_SENSITIVITY: f64 = 0.7;
/// Factor risk above which a sector-critical factor is currently exposed.
const KEY_FACTOR_EXPOSURE: f64 = 0.6;

const SECTOR_RISK_CONFIDENCE: f64 = 0.8;

/// Immutable scoring configuration: factor weights, regional baselines and
/// override patches, sector sensitivities, and the static descriptor tables
/// behind report text. Loaded once at construction and never mutated, so a
/// model can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct RiskTables {
    /// Per-factor weights, summing to 1.0.
    pub factor_weights: Vec<(RiskFactor, f64)>,
    /// Static starting risk per region, before current-condition adjustments.
    pub regional_baselines: HashMap<Region, f64>,
    /// Region-specific patches applied over the neutral factor vector.
    pub factor_overrides: HashMap<Region, Vec<(RiskFactor, f64)>>,
    /// Per-sector factor sensitivity multipliers.
    pub sector_sensitivities: HashMap<Sector, Vec<(RiskFactor, f64)>>,
    /// Qualitative risk descriptors per sector, used when no factor
    /// currently qualifies as a key factor.
    pub sector_descriptors: HashMap<Sector, Vec<&'static str>>,
    /// Qualitative key risk indicators per region, for report text.
    pub region_indicators: HashMap<Region, Vec<&'static str>>,
}

impl Default for RiskTables {
    fn default() -> Self {
        use RiskFactor::*;

        let factor_weights = vec![
            (PoliticalStability, 0.25),
            (EconomicConditions, 0.20),
            (DiplomaticRelations, 0.20),
            (RegionalConflicts, 0.15),
            (TradeRelations, 0.10),
            (RegulatoryEnvironment, 0.10),
        ];

        let regional_baselines = HashMap::from([
            (Region::NorthAmerica, 0.3),
            (Region::Europe, 0.4),
            (Region::AsiaPacific, 0.5),
            (Region::MiddleEast, 0.7),
            (Region::Africa, 0.6),
            (Region::LatinAmerica, 0.5),
        ]);

        let factor_overrides = HashMap::from([
            (
                Region::MiddleEast,
                vec![
                    (RegionalConflicts, 0.8),
                    (PoliticalStability, 0.6),
                    (DiplomaticRelations, 0.7),
                ],
            ),
            (
                Region::Europe,
                vec![
                    (PoliticalStability, 0.7),
                    (EconomicConditions, 0.6),
                    (RegulatoryEnvironment, 0.8),
                ],
            ),
            (
                Region::AsiaPacific,
                vec![
                    (TradeRelations, 0.6),
                    (DiplomaticRelations, 0.7),
                    (EconomicConditions, 0.6),
                ],
            ),
            (
                Region::NorthAmerica,
                vec![
                    (PoliticalStability, 0.8),
                    (EconomicConditions, 0.7),
                    (RegulatoryEnvironment, 0.8),
                ],
            ),
        ]);

        let sector_sensitivities = HashMap::from([
            (
                Sector::Technology,
                vec![
                    (PoliticalStability, 0.8),
                    (TradeRelations, 0.9),
                    (RegulatoryEnvironment, 0.7),
                ],
            ),
            (
                Sector::Energy,
                vec![
                    (PoliticalStability, 1.0),
                    (DiplomaticRelations, 0.9),
                    (RegionalConflicts, 0.8),
                ],
            ),
            (
                Sector::Finance,
                vec![
                    (PoliticalStability, 0.9),
                    (EconomicConditions, 0.8),
                    (RegulatoryEnvironment, 0.9),
                ],
            ),
            (
                Sector::Healthcare,
                vec![
                    (PoliticalStability, 0.6),
                    (RegulatoryEnvironment, 0.8),
                    (EconomicConditions, 0.7),
                ],
            ),
            (
                Sector::Manufacturing,
                vec![
                    (TradeRelations, 0.8),
                    (EconomicConditions, 0.7),
                    (PoliticalStability, 0.6),
                ],
            ),
            (
                Sector::ConsumerGoods,
                vec![
                    (EconomicConditions, 0.8),
                    (TradeRelations, 0.7),
                    (PoliticalStability, 0.5),
                ],
            ),
        ]);

        let sector_descriptors = HashMap::from([
            (
                Sector::Energy,
                vec!["Oil price volatility", "Supply chain disruptions"],
            ),
            (
                Sector::Technology,
                vec!["Regulatory changes", "Trade restrictions"],
            ),
            (
                Sector::Finance,
                vec!["Interest rate changes", "Currency volatility"],
            ),
        ]);

        let region_indicators = HashMap::from([
            (
                Region::MiddleEast,
                vec![
                    "Ongoing regional conflicts",
                    "Oil price volatility",
                    "Diplomatic tensions",
                    "Political instability",
                ],
            ),
            (
                Region::Europe,
                vec![
                    "Brexit implications",
                    "EU policy changes",
                    "Economic sanctions",
                    "Migration challenges",
                ],
            ),
            (
                Region::AsiaPacific,
                vec![
                    "US-China trade relations",
                    "Territorial disputes",
                    "Supply chain disruptions",
                    "Currency fluctuations",
                ],
            ),
            (
                Region::NorthAmerica,
                vec![
                    "Policy uncertainty",
                    "Trade agreements",
                    "Regulatory changes",
                    "Economic recovery",
                ],
            ),
        ]);

        Self {
            factor_weights,
            regional_baselines,
            factor_overrides,
            sector_sensitivities,
            sector_descriptors,
            region_indicators,
        }
    }
}

impl RiskTables {
    /// A malformed table is a programming error; this is the only fatal
    /// condition in the scoring engine.
    fn validate(&self) -> Result<()> {
        let weight_sum: f64 = self.factor_weights.iter().map(|(_, w)| w).sum();
        if (weight_sum - 1.0).abs() > 1e-6 {
            bail!("risk factor weights must sum to 1.0, got {}", weight_sum);
        }
        for (region, baseline) in &self.regional_baselines {
            if !(0.0..=1.0).contains(baseline) {
                bail!("baseline for {} out of [0,1]: {}", region, baseline);
            }
        }
        for overrides in self.factor_overrides.values() {
            for (factor, value) in overrides {
                if !(0.0..=1.0).contains(value) {
                    bail!("factor override {} out of [0,1]: {}", factor.as_str(), value);
                }
            }
        }
        for sensitivities in self.sector_sensitivities.values() {
            for (factor, value) in sensitivities {
                if !(0.0..=1.0).contains(value) {
                    bail!("sensitivity {} out of [0,1]: {}", factor.as_str(), value);
                }
            }
        }
        Ok(())
    }
}

/// Region and sector risk scoring over the static tables.
///
/// Every operation is a pure function of the tables and its arguments:
/// safe to call concurrently, idempotent for unchanged tables.
pub struct RiskModel {
    tables: RiskTables,
}

impl RiskModel {
    pub fn new() -> Result<Self> {
        Self::with_tables(RiskTables::default())
    }

    pub fn with_tables(tables: RiskTables) -> Result<Self> {
        tables.validate()?;
        Ok(Self { tables })
    }

    pub fn tables(&self) -> &RiskTables {
        &self.tables
    }

    /// Current factor vector for a region: the neutral vector patched with
    /// the region's override table. Unknown regions stay fully neutral.
    pub fn current_factors(&self, region: Region) -> FactorVector {
        let mut factors = FactorVector::neutral();
        if let Some(overrides) = self.tables.factor_overrides.get(&region) {
            for (factor, value) in overrides {
                factors.set(*factor, *value);
            }
        }
        factors
    }

    /// Overall risk score for a region in [0,1].
    ///
    /// The baseline anchors absolute regional risk; the weighted sum of
    /// factor deviations from the neutral midpoint nudges the score without
    /// re-calibrating the baseline. A fully neutral factor vector reproduces
    /// the raw baseline exactly.
    pub fn assess_region_risk(&self, region: Region) -> f64 {
        let baseline = self
            .tables
            .regional_baselines
            .get(&region)
            .copied()
            .unwrap_or(0.5);
        let factors = self.current_factors(region);

        let mut score = baseline;
        for (factor, weight) in &self.tables.factor_weights {
            score += (factors.get(*factor) - 0.5) * weight;
        }
        score.clamp(0.0, 1.0)
    }

    /// Sector risk within a region: region risk plus scaled sensitivity
    /// adjustments, clamped to [0,1].
    pub fn assess_sector_risk(&self, sector: Sector, region: Region) -> SectorRiskResult {
        let region_risk = self.assess_region_risk(region);
        let factors = self.current_factors(region);

        let mut score = region_risk;
        if let Some(sensitivities) = self.tables.sector_sensitivities.get(&sector) {
            for (factor, sensitivity) in sensitivities {
                score += (factors.get(*factor) - 0.5) * sensitivity * SECTOR_ADJUSTMENT_SCALE;
            }
        }
        let score = score.clamp(0.0, 1.0);

        SectorRiskResult {
            sector,
            region,
            risk_score: score,
            risk_level: RiskLevel::from_score(score),
            confidence: SECTOR_RISK_CONFIDENCE,
            key_factors: self.sector_key_factors(sector, &factors),
        }
    }

    pub fn risk_level(&self, score: f64) -> RiskLevel {
        RiskLevel::from_score(score)
    }

    /// Factors the sector is both highly sensitive to and currently exposed
    /// to. Falls back to the sector's static descriptors when none qualify,
    /// or to a generic line for sectors without a sensitivity profile.
    fn sector_key_factors(&self, sector: Sector, factors: &FactorVector) -> Vec<String> {
        let mut key_factors: Vec<String> = Vec::new();

        if let Some(sensitivities) = self.tables.sector_sensitivities.get(&sector) {
            for (factor, sensitivity) in sensitivities {
                if *sensitivity > KEY_FACTOR_SENSITIVITY
                    && factors.get(*factor) > KEY_FACTOR_EXPOSURE
                {
                    key_factors.push(format!("High {} risk", factor.label().to_lowercase()));
                }
            }
        }

        if key_factors.is_empty() {
            if let Some(descriptors) = self.tables.sector_descriptors.get(&sector) {
                return descriptors.iter().map(|d| d.to_string()).collect();
            }
            return vec!["Moderate risk factors".to_string()];
        }
        key_factors
    }

    /// Human-readable risk breakdown for a region: overall score, factor
    /// table, static indicators, and band-selected recommendations.
    pub fn detailed_analysis(&self, region: Region) -> String {
        let score = self.assess_region_risk(region);
        let level = RiskLevel::from_score(score);
        let factors = self.current_factors(region);

        let mut out = format!(
            "=== DETAILED RISK ANALYSIS: {} ===\n\n",
            region.name().to_uppercase()
        );
        out.push_str(&format!("Overall Risk Score: {:.2} ({})\n\n", score, level));

        out.push_str("Risk Factor Breakdown:\n");
        for (factor, _) in &self.tables.factor_weights {
            let value = factors.get(*factor);
            out.push_str(&format!(
                "- {}: {:.2} ({})\n",
                factor.label(),
                value,
                RiskLevel::from_score(value)
            ));
        }

        out.push_str("\nKey Risk Indicators:\n");
        match self.tables.region_indicators.get(&region) {
            Some(indicators) => {
                for indicator in indicators {
                    out.push_str(&format!("- {}\n", indicator));
                }
            }
            None => out.push_str("- No region-specific indicators on file\n"),
        }

        out.push_str("\nRecommendations:\n");
        for rec in self.risk_recommendations(region, score) {
            out.push_str(&format!("- {}\n", rec));
        }

        out
    }

    /// Mitigation recommendations by risk band, plus a region addendum.
    fn risk_recommendations(&self, region: Region, score: f64) -> Vec<String> {
        let mut recs: Vec<String> = match RiskLevel::from_score(score) {
            RiskLevel::High => vec![
                "Consider reducing exposure to high-risk regions",
                "Implement strict risk management protocols",
                "Monitor geopolitical developments closely",
                "Diversify investments across multiple regions",
            ],
            RiskLevel::Medium => vec![
                "Maintain balanced portfolio allocation",
                "Stay informed about regional developments",
                "Consider hedging strategies",
                "Monitor key risk indicators",
            ],
            RiskLevel::Low => vec![
                "Consider increasing exposure to stable regions",
                "Look for growth opportunities",
                "Monitor for emerging risks",
                "Maintain standard risk management",
            ],
        }
        .into_iter()
        .map(String::from)
        .collect();

        match region {
            Region::MiddleEast => {
                recs.push("Monitor oil price movements and supply disruptions".to_string())
            }
            Region::Europe => {
                recs.push("Track EU policy developments and regulatory changes".to_string())
            }
            Region::AsiaPacific => {
                recs.push("Monitor US-China relations and trade policies".to_string())
            }
            _ => {}
        }
        recs
    }

    /// Aggregate geopolitical risk over a portfolio. An empty portfolio and
    /// a zero total allocation both resolve to neutral defaults instead of
    /// erroring.
    pub fn portfolio_risk(&self, positions: &[PortfolioPosition]) -> PortfolioRisk {
        if positions.is_empty() {
            return PortfolioRisk::neutral();
        }

        let mut total_risk = 0.0;
        let mut weighted_risk = 0.0;
        let mut total_allocation = 0.0;
        let mut high_risk_positions = 0;

        for position in positions {
            let sector_risk = self.assess_sector_risk(position.sector, position.region);
            total_risk += sector_risk.risk_score;
            weighted_risk += sector_risk.risk_score * position.allocation;
            total_allocation += position.allocation;
            if sector_risk.risk_score > 0.7 {
                high_risk_positions += 1;
            }
        }

        let average_risk = total_risk / positions.len() as f64;
        let weighted_risk = if total_allocation > 0.0 {
            weighted_risk / total_allocation
        } else {
            0.5
        };

        PortfolioRisk {
            average_risk,
            weighted_risk,
            risk_level: RiskLevel::from_score(weighted_risk),
            total_positions: positions.len(),
            high_risk_positions,
        }
    }
}
