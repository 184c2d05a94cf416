use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::market::Sector;
use super::news::Region;

/// The six fixed dimensions of regional risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    PoliticalStability,
    EconomicConditions,
    DiplomaticRelations,
    RegionalConflicts,
    TradeRelations,
    RegulatoryEnvironment,
}

impl RiskFactor {
    pub const ALL: [RiskFactor; 6] = [
        RiskFactor::PoliticalStability,
        RiskFactor::EconomicConditions,
        RiskFactor::DiplomaticRelations,
        RiskFactor::RegionalConflicts,
        RiskFactor::TradeRelations,
        RiskFactor::RegulatoryEnvironment,
    ];

    /// Wire name, matches the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskFactor::PoliticalStability => "political_stability",
            RiskFactor::EconomicConditions => "economic_conditions",
            RiskFactor::DiplomaticRelations => "diplomatic_relations",
            RiskFactor::RegionalConflicts => "regional_conflicts",
            RiskFactor::TradeRelations => "trade_relations",
            RiskFactor::RegulatoryEnvironment => "regulatory_environment",
        }
    }

    /// Human-readable label for report text.
    pub fn label(&self) -> &'static str {
        match self {
            RiskFactor::PoliticalStability => "Political Stability",
            RiskFactor::EconomicConditions => "Economic Conditions",
            RiskFactor::DiplomaticRelations => "Diplomatic Relations",
            RiskFactor::RegionalConflicts => "Regional Conflicts",
            RiskFactor::TradeRelations => "Trade Relations",
            RiskFactor::RegulatoryEnvironment => "Regulatory Environment",
        }
    }
}

/// Per-factor risk values in [0,1]. The neutral midpoint 0.5 means
/// "no signal either way" for every factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorVector {
    values: [f64; 6],
}

impl FactorVector {
    pub fn neutral() -> Self {
        Self { values: [0.5; 6] }
    }

    pub fn get(&self, factor: RiskFactor) -> f64 {
        self.values[factor as usize]
    }

    pub fn set(&mut self, factor: RiskFactor, value: f64) {
        self.values[factor as usize] = value.clamp(0.0, 1.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (RiskFactor, f64)> + '_ {
        RiskFactor::ALL.iter().map(|f| (*f, self.values[*f as usize]))
    }
}

impl Serialize for FactorVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(RiskFactor::ALL.len()))?;
        for (factor, value) in self.iter() {
            map.serialize_entry(factor.as_str(), &value)?;
        }
        map.end()
    }
}

/// Risk classification bands. Thresholds are fixed: a score above 0.7 is
/// High, above 0.4 is Medium, everything else Low. 0.4 and 0.7 exactly
/// are both Medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> RiskLevel {
        if score > 0.7 {
            RiskLevel::High
        } else if score > 0.4 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scored geopolitical risk for one region.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionRiskResult {
    pub region: Region,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub confidence: f64,
    pub key_factors: Vec<String>,
    /// Average news sentiment behind the score, when news-driven.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<f64>,
}

/// A region risk assessment with the evidentiary basis visible in the type:
/// `InsufficientData` carries the fixed neutral defaults instead of hiding
/// the fallback inside a catch-all.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RiskAssessment {
    Scored(RegionRiskResult),
    InsufficientData(RegionRiskResult),
}

impl RiskAssessment {
    pub fn result(&self) -> &RegionRiskResult {
        match self {
            RiskAssessment::Scored(r) => r,
            RiskAssessment::InsufficientData(r) => r,
        }
    }

    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, RiskAssessment::InsufficientData(_))
    }
}

/// Scored risk for a sector within a region.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorRiskResult {
    pub sector: Sector,
    pub region: Region,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub confidence: f64,
    pub key_factors: Vec<String>,
}

/// One portfolio holding, for aggregate risk scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioPosition {
    pub symbol: String,
    pub sector: Sector,
    pub region: Region,
    /// Fractional allocation of the portfolio, e.g. 0.25.
    pub allocation: f64,
}

/// Aggregate geopolitical risk over a portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRisk {
    pub average_risk: f64,
    pub weighted_risk: f64,
    pub risk_level: RiskLevel,
    pub total_positions: usize,
    pub high_risk_positions: usize,
}

impl PortfolioRisk {
    /// Default record for an empty portfolio.
    pub fn neutral() -> Self {
        Self {
            average_risk: 0.5,
            weighted_risk: 0.5,
            risk_level: RiskLevel::Medium,
            total_positions: 0,
            high_risk_positions: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_band_boundaries() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.4), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.41), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.7), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.71), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(1.0), RiskLevel::High);
    }

    #[test]
    fn test_factor_vector_neutral_and_set() {
        let mut v = FactorVector::neutral();
        for (_, value) in v.iter() {
            assert_eq!(value, 0.5);
        }
        v.set(RiskFactor::RegionalConflicts, 0.8);
        assert_eq!(v.get(RiskFactor::RegionalConflicts), 0.8);
        // out-of-range writes are clamped
        v.set(RiskFactor::TradeRelations, 1.5);
        assert_eq!(v.get(RiskFactor::TradeRelations), 1.0);
    }

    #[test]
    fn test_factor_vector_serializes_as_named_map() {
        let v = FactorVector::neutral();
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["political_stability"], 0.5);
        assert_eq!(json["regulatory_environment"], 0.5);
    }

    #[test]
    fn test_assessment_status_tag_on_wire() {
        let result = RegionRiskResult {
            region: Region::Africa,
            risk_score: 0.5,
            risk_level: RiskLevel::Medium,
            confidence: 0.3,
            key_factors: vec!["Limited data available".to_string()],
            sentiment: None,
        };
        let json = serde_json::to_string(&RiskAssessment::InsufficientData(result)).unwrap();
        assert!(json.contains("\"status\":\"insufficientData\""));
        assert!(json.contains("\"riskScore\""));
        assert!(!json.contains("sentiment"));
    }
}
