use crate::models::analysis::SentimentSummary;
use crate::models::news::NewsItem;

/// Multi-word expressions scored before tokenization. Matched spans are
/// masked out so their component words are not counted twice.
const PHRASES: &[(&str, f64)] = &[
    ("trade war", -0.7),
    ("trade deal", 0.5),
    ("peace talks", 0.4),
    ("ceasefire", 0.5),
    ("cease-fire", 0.5),
    ("state of emergency", -0.7),
    ("all-time high", 0.5),
    ("supply chain", -0.2),
];

/// Single-word polarity lexicon: general polarity terms plus the
/// geopolitics/markets vocabulary the general lists miss.
const LEXICON: &[(&str, f64)] = &[
    // positive
    ("agreement", 0.5),
    ("alliance", 0.3),
    ("breakthrough", 0.6),
    ("calm", 0.4),
    ("commitment", 0.3),
    ("cooperation", 0.5),
    ("expansion", 0.4),
    ("gain", 0.4),
    ("gains", 0.4),
    ("good", 0.4),
    ("growth", 0.5),
    ("improve", 0.4),
    ("improvement", 0.4),
    ("improving", 0.5),
    ("opportunity", 0.3),
    ("opportunities", 0.3),
    ("optimism", 0.6),
    ("peace", 0.6),
    ("positive", 0.6),
    ("progress", 0.4),
    ("promising", 0.6),
    ("rally", 0.4),
    ("recovery", 0.5),
    ("resolve", 0.4),
    ("resolved", 0.5),
    ("resolving", 0.4),
    ("stability", 0.5),
    ("stable", 0.4),
    ("strong", 0.4),
    ("support", 0.3),
    ("surge", 0.3),
    // negative
    ("attack", -0.7),
    ("ban", -0.4),
    ("blockade", -0.6),
    ("challenges", -0.3),
    ("collapse", -0.7),
    ("conflict", -0.7),
    ("conflicts", -0.7),
    ("crash", -0.7),
    ("crisis", -0.7),
    ("decline", -0.4),
    ("disruption", -0.5),
    ("disruptions", -0.5),
    ("dispute", -0.4),
    ("disputes", -0.4),
    ("downturn", -0.5),
    ("embargo", -0.6),
    ("escalation", -0.6),
    ("fear", -0.5),
    ("hostilities", -0.7),
    ("instability", -0.6),
    ("invasion", -0.8),
    ("protest", -0.4),
    ("protests", -0.4),
    ("recession", -0.6),
    ("retaliation", -0.6),
    ("sanctions", -0.5),
    ("slump", -0.5),
    ("tariff", -0.3),
    ("tariffs", -0.3),
    ("tension", -0.5),
    ("tensions", -0.5),
    ("threat", -0.5),
    ("turmoil", -0.6),
    ("uncertainty", -0.4),
    ("unrest", -0.6),
    ("violence", -0.7),
    ("volatile", -0.4),
    ("volatility", -0.3),
    ("war", -0.8),
    ("weak", -0.3),
];

/// A preceding negator flips the sign of the following lexicon word,
/// so "no conflict" reads positive.
const NEGATORS: &[&str] = &["no", "not", "never", "without"];

/// Deterministic lexicon-based polarity scorer. Pure and side-effect free;
/// identical input always yields the identical score.
#[derive(Debug, Clone, Default)]
pub struct SentimentScorer;

impl SentimentScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score free text to a polarity in [-1, 1]. Empty text or text with no
    /// lexicon hits scores 0.0 (neutral); this never errors.
    pub fn score(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }

        let mut text = text.to_lowercase();
        let mut observations: Vec<f64> = Vec::new();

        for (phrase, weight) in PHRASES {
            let hits = text.matches(phrase).count();
            if hits > 0 {
                observations.extend(std::iter::repeat(*weight).take(hits));
                text = text.replace(phrase, " ");
            }
        }

        let tokens: Vec<&str> = text
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|t| !t.is_empty())
            .collect();

        for (i, token) in tokens.iter().enumerate() {
            if let Some((_, weight)) = LEXICON.iter().find(|(w, _)| w == token) {
                let negated = i > 0 && NEGATORS.contains(&tokens[i - 1]);
                observations.push(if negated { -weight } else { *weight });
            }
        }

        if observations.is_empty() {
            return 0.0;
        }

        let mean = observations.iter().sum::<f64>() / observations.len() as f64;
        mean.clamp(-1.0, 1.0)
    }

    /// Aggregate sentiment over a batch of articles, scoring
    /// `title + " " + content` for each. An empty batch yields the zeroed
    /// summary, not an error.
    pub fn summarize(&self, items: &[NewsItem]) -> SentimentSummary {
        if items.is_empty() {
            return SentimentSummary::empty();
        }

        let scores: Vec<f64> = items
            .iter()
            .map(|item| self.score(&format!("{} {}", item.title, item.content)))
            .collect();

        let n = scores.len() as f64;
        let mean = scores.iter().sum::<f64>() / n;
        let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;

        SentimentSummary {
            average_sentiment: mean,
            std_dev: variance.sqrt(),
            positive_count: scores.iter().filter(|s| **s > 0.0).count(),
            negative_count: scores.iter().filter(|s| **s < 0.0).count(),
            neutral_count: scores.iter().filter(|s| **s == 0.0).count(),
            total_articles: scores.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::news::Region;

    fn item(title: &str, content: &str) -> NewsItem {
        NewsItem {
            id: "t".to_string(),
            title: title.to_string(),
            content: content.to_string(),
            summary: String::new(),
            source: "test".to_string(),
            url: String::new(),
            published_at: "2024-01-01T00:00:00Z".to_string(),
            region: Region::Europe,
        }
    }

    #[test]
    fn test_positive_text_scores_positive() {
        let scorer = SentimentScorer::new();
        let score =
            scorer.score("Positive geopolitical developments show promising signs for market stability");
        assert!(score > 0.0, "expected positive, got {}", score);
        assert!(score <= 1.0);
    }

    #[test]
    fn test_negative_text_scores_negative() {
        let scorer = SentimentScorer::new();
        let score = scorer.score("War escalation deepens regional conflict and market turmoil");
        assert!(score < 0.0, "expected negative, got {}", score);
        assert!(score >= -1.0);
    }

    #[test]
    fn test_no_lexicon_hits_is_neutral() {
        let scorer = SentimentScorer::new();
        assert_eq!(scorer.score("The committee met on Tuesday afternoon"), 0.0);
    }

    #[test]
    fn test_empty_text_is_neutral() {
        let scorer = SentimentScorer::new();
        assert_eq!(scorer.score(""), 0.0);
        assert_eq!(scorer.score("   "), 0.0);
    }

    #[test]
    fn test_deterministic_for_identical_input() {
        let scorer = SentimentScorer::new();
        let text = "Sanctions and tensions rise as peace talks stall";
        assert_eq!(scorer.score(text), scorer.score(text));
    }

    #[test]
    fn test_negation_flips_polarity() {
        let scorer = SentimentScorer::new();
        let plain = scorer.score("conflict");
        let negated = scorer.score("no conflict");
        assert!(plain < 0.0);
        assert!(negated > 0.0);
        assert_eq!(negated, -plain);
    }

    #[test]
    fn test_phrase_not_double_counted() {
        let scorer = SentimentScorer::new();
        // "trade war" must score as one phrase, not phrase + "war" token
        assert_eq!(scorer.score("trade war"), -0.7);
    }

    #[test]
    fn test_summarize_empty_batch() {
        let scorer = SentimentScorer::new();
        assert_eq!(scorer.summarize(&[]), SentimentSummary::empty());
    }

    #[test]
    fn test_summarize_counts_and_bounds() {
        let scorer = SentimentScorer::new();
        let items = vec![
            item("Peace agreement brings stability", "Optimism and growth ahead"),
            item("War and crisis deepen", "Violence and unrest spread"),
            item("Committee met on Tuesday", "Routine agenda items only"),
        ];
        let summary = scorer.summarize(&items);
        assert_eq!(summary.total_articles, 3);
        assert_eq!(summary.positive_count, 1);
        assert_eq!(summary.negative_count, 1);
        assert_eq!(summary.neutral_count, 1);
        assert!(summary.average_sentiment >= -1.0 && summary.average_sentiment <= 1.0);
        assert!(summary.std_dev >= 0.0);
    }
}
