use anyhow::{anyhow, Result};
use futures::StreamExt;

use crate::models::ai::*;
use crate::models::analysis::AnalysisRecord;
use crate::models::market::MarketPoint;
use crate::models::news::NewsItem;
use crate::models::settings::NarrativeConfig;
use crate::services::analyzer::GeopoliticalAnalyzer;
use crate::utils::http::build_ai_client;
use crate::utils::retry::retry_with_backoff;

const MAX_RETRIES: u32 = 2;
const CONTEXT_NEWS_ITEMS: usize = 5;
const CONTEXT_MARKET_POINTS: usize = 10;

const SYSTEM_PROMPT: &str = "You are a geopolitical market analyst expert. \
Analyze the provided news and market data to provide insights on:\n\
1. Key geopolitical developments and their market implications\n\
2. Potential risks and opportunities for investors\n\
3. Sector-specific impacts\n\
4. Regional stability assessment\n\
5. Investment recommendations\n\
\n\
Provide a comprehensive analysis in a clear, professional format.";

/// Narrative generation over an OpenAI-compatible chat endpoint.
///
/// This is an optional enrichment layer: any failure here is caught by
/// `generate_or_fallback`, which substitutes the analyzer's deterministic
/// text so callers always get a narrative.
pub struct NarrativeService;

impl NarrativeService {
    /// Generate an analysis narrative for the given news and market data.
    pub async fn generate(
        config: &NarrativeConfig,
        news: &[NewsItem],
        market: &[MarketPoint],
    ) -> Result<AnalysisRecord> {
        if !config.enabled {
            return Err(anyhow!("narrative generation disabled"));
        }
        if config.api_key.trim().is_empty() {
            return Err(anyhow!("narrative API key not configured"));
        }

        let client = build_ai_client(config.timeout_secs)?;
        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        let context = build_analysis_context(news, market);

        let narrative = retry_with_backoff(MAX_RETRIES, || {
            request_completion(&client, &url, config, &context)
        })
        .await?;

        Ok(AnalysisRecord {
            id: uuid::Uuid::new_v4().to_string(),
            narrative,
            model_name: config.model_name.clone(),
            generated_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Streaming variant: emits `NarrativeStreamEvent`s on `sender` as
    /// content arrives and returns the accumulated text plus token usage.
    pub async fn generate_stream(
        config: &NarrativeConfig,
        news: &[NewsItem],
        market: &[MarketPoint],
        sender: tokio::sync::mpsc::Sender<NarrativeStreamEvent>,
    ) -> Result<(String, Option<TokenUsage>)> {
        if !config.enabled {
            return Err(anyhow!("narrative generation disabled"));
        }
        if config.api_key.trim().is_empty() {
            return Err(anyhow!("narrative API key not configured"));
        }

        let client = build_ai_client(config.timeout_secs)?;
        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        let context = build_analysis_context(news, market);

        let req = ChatCompletionRequest {
            model: config.model_name.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(&format!(
                    "Please analyze the following geopolitical and market data:\n\n{}",
                    context
                )),
            ],
            max_tokens: Some(config.max_tokens),
            temperature: Some(config.temperature),
            stream: Some(true),
        };

        let resp = client
            .post(&url)
            .header("Authorization", format!("Bearer {}", config.api_key))
            .header("Content-Type", "application/json")
            .json(&req)
            .send()
            .await?;

        if !resp.status().is_success() {
            let body = resp.text().await?;
            return Err(anyhow!("narrative API error: {}", body));
        }

        let mut full_content = String::new();
        let mut total_usage: Option<TokenUsage> = None;
        let mut stream = resp.bytes_stream();
        let mut buffer = String::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            while let Some(line_end) = buffer.find('\n') {
                let line = buffer[..line_end].trim().to_string();
                buffer = buffer[line_end + 1..].to_string();

                if line.is_empty() || line == "data: [DONE]" {
                    if line == "data: [DONE]" {
                        let _ = sender
                            .send(NarrativeStreamEvent {
                                event_type: "done".to_string(),
                                content: None,
                                done: true,
                                usage: total_usage.clone(),
                            })
                            .await;
                    }
                    continue;
                }

                let Some(data) = line.strip_prefix("data: ") else {
                    continue;
                };
                if let Ok(chunk_resp) = serde_json::from_str::<ChatCompletionResponse>(data) {
                    if let Some(choice) = chunk_resp.choices.first() {
                        if let Some(delta) = &choice.delta {
                            if let Some(content) = &delta.content {
                                full_content.push_str(content);
                                let _ = sender
                                    .send(NarrativeStreamEvent {
                                        event_type: "content".to_string(),
                                        content: Some(content.clone()),
                                        done: false,
                                        usage: None,
                                    })
                                    .await;
                            }
                        }
                    }
                    if let Some(usage) = chunk_resp.usage {
                        total_usage = Some(usage);
                    }
                }
            }
        }

        Ok((clean_model_artifacts(&full_content), total_usage))
    }

    /// Never-failing entry point: on any generation error, logs and returns
    /// the deterministic fallback narrative instead.
    pub async fn generate_or_fallback(
        config: &NarrativeConfig,
        news: &[NewsItem],
        market: &[MarketPoint],
        analyzer: &GeopoliticalAnalyzer,
    ) -> AnalysisRecord {
        match Self::generate(config, news, market).await {
            Ok(record) => record,
            Err(e) => {
                log::warn!("narrative generation failed ({}), using fallback analysis", e);
                AnalysisRecord {
                    id: uuid::Uuid::new_v4().to_string(),
                    narrative: analyzer.fallback_analysis(news, market),
                    model_name: "fallback".to_string(),
                    generated_at: chrono::Utc::now().to_rfc3339(),
                }
            }
        }
    }
}

async fn request_completion(
    client: &reqwest::Client,
    url: &str,
    config: &NarrativeConfig,
    context: &str,
) -> Result<String> {
    let req = ChatCompletionRequest {
        model: config.model_name.clone(),
        messages: vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(&format!(
                "Please analyze the following geopolitical and market data:\n\n{}",
                context
            )),
        ],
        max_tokens: Some(config.max_tokens),
        temperature: Some(config.temperature),
        stream: Some(false),
    };

    let resp = client
        .post(url)
        .header("Authorization", format!("Bearer {}", config.api_key))
        .header("Content-Type", "application/json")
        .json(&req)
        .send()
        .await?;

    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(anyhow!("narrative API error ({}): {}", status, body));
    }

    let response: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
        anyhow!(
            "narrative response parse error: {} body: {}",
            e,
            &body[..200.min(body.len())]
        )
    })?;

    let content = response
        .choices
        .first()
        .and_then(|c| c.message.as_ref())
        .and_then(|m| m.content.clone())
        .unwrap_or_default();

    if content.trim().is_empty() {
        return Err(anyhow!("narrative API returned empty content"));
    }
    Ok(clean_model_artifacts(&content))
}

/// Analysis context handed to the model: the leading news articles and
/// market observations in a compact text form.
fn build_analysis_context(news: &[NewsItem], market: &[MarketPoint]) -> String {
    let mut context = String::from("=== GEOPOLITICAL NEWS ===\n");
    for item in news.iter().take(CONTEXT_NEWS_ITEMS) {
        context.push_str(&format!("Title: {}\n", item.title));
        context.push_str(&format!("Summary: {}\n", item.summary));
        context.push_str(&format!("Region: {}\n", item.region));
        context.push_str(&format!("Source: {}\n\n", item.source));
    }

    context.push_str("=== MARKET DATA ===\n");
    for point in market.iter().take(CONTEXT_MARKET_POINTS) {
        context.push_str(&format!("Symbol: {}\n", point.symbol));
        context.push_str(&format!("Sector: {}\n", point.sector));
        context.push_str(&format!("Price: {:.2}\n", point.price));
        context.push_str(&format!("Change: {:.4}\n\n", point.change));
    }

    context
}

/// Strip model-internal control markup (e.g. "<|...|>" blocks) that some
/// providers leak into completions.
fn clean_model_artifacts(content: &str) -> String {
    match regex::Regex::new(r"<[|\u{ff5c}][^>]*>[\s\S]*") {
        Ok(re) => re.replace(content, "").trim_end().to_string(),
        Err(_) => content.trim_end().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::market::Sector;
    use crate::models::news::Region;

    #[test]
    fn test_context_limits_and_sections() {
        let news: Vec<NewsItem> = (0..8)
            .map(|i| NewsItem {
                id: format!("n{}", i),
                title: format!("Title {}", i),
                content: String::new(),
                summary: format!("Summary {}", i),
                source: "Reuters".to_string(),
                url: String::new(),
                published_at: "2024-01-01T00:00:00Z".to_string(),
                region: Region::Europe,
            })
            .collect();
        let market = vec![MarketPoint {
            symbol: "XOM".to_string(),
            sector: Sector::Energy,
            price: 80.0,
            change: 0.05,
            volume: 500_000,
            timestamp: "2024-01-01T00:00:00Z".to_string(),
        }];

        let context = build_analysis_context(&news, &market);
        assert!(context.contains("=== GEOPOLITICAL NEWS ==="));
        assert!(context.contains("=== MARKET DATA ==="));
        assert!(context.contains("Title 4"));
        // only the leading five articles are included
        assert!(!context.contains("Title 5"));
        assert!(context.contains("Symbol: XOM"));
    }

    #[test]
    fn test_clean_model_artifacts() {
        let raw = "Solid analysis here.\n<|control_42|> internal trailing junk";
        assert_eq!(clean_model_artifacts(raw), "Solid analysis here.");
        assert_eq!(clean_model_artifacts("plain text"), "plain text");
    }
}
