use std::collections::HashMap;

use anyhow::{anyhow, Result};
use serde_json::Value;

use crate::models::market::{IndexQuote, MarketPoint, Sector};
use crate::utils::http::build_market_client;

/// Fetches per-sector market quotes and index snapshots. Fail-open like the
/// news collector: individual symbol failures are skipped, and a total
/// failure degrades to the built-in sample dataset.
pub struct MarketCollector {
    client: reqwest::Client,
    sector_symbols: HashMap<Sector, Vec<&'static str>>,
    indices: Vec<(&'static str, &'static str)>,
}

impl MarketCollector {
    pub fn new() -> Result<Self> {
        let sector_symbols = HashMap::from([
            (Sector::Technology, vec!["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA"]),
            (Sector::Energy, vec!["XOM", "CVX", "COP", "EOG", "SLB"]),
            (Sector::Finance, vec!["JPM", "BAC", "WFC", "GS", "MS"]),
            (Sector::Healthcare, vec!["JNJ", "PFE", "UNH", "ABBV", "TMO"]),
            (Sector::Manufacturing, vec!["GE", "CAT", "DE", "BA", "MMM"]),
            (Sector::ConsumerGoods, vec!["PG", "KO", "WMT", "HD", "MCD"]),
        ]);

        let indices = vec![
            ("S&P 500", "^GSPC"),
            ("NASDAQ", "^IXIC"),
            ("DOW", "^DJI"),
            ("VIX", "^VIX"),
        ];

        Ok(Self {
            client: build_market_client()?,
            sector_symbols,
            indices,
        })
    }

    /// Latest quotes for every symbol of the requested sectors. Never
    /// errors outward; with no reachable quotes it returns sample data.
    pub async fn fetch(&self, sectors: &[Sector]) -> Vec<MarketPoint> {
        let mut targets: Vec<(Sector, &str)> = Vec::new();
        for sector in sectors {
            if let Some(symbols) = self.sector_symbols.get(sector) {
                targets.extend(symbols.iter().map(|s| (*sector, *s)));
            }
        }

        let quotes = futures::future::join_all(
            targets.iter().map(|(_, symbol)| self.fetch_quote(symbol)),
        )
        .await;

        let mut points = Vec::new();
        for ((sector, symbol), quote) in targets.iter().zip(quotes) {
            match quote {
                Ok((price, change, volume, timestamp)) => points.push(MarketPoint {
                    symbol: symbol.to_string(),
                    sector: *sector,
                    price,
                    change,
                    volume,
                    timestamp,
                }),
                Err(e) => log::warn!("quote fetch failed for {}: {}", symbol, e),
            }
        }

        if points.is_empty() && !sectors.is_empty() {
            log::warn!("no market quotes reachable, falling back to sample dataset");
            return Self::sample_market_data(sectors);
        }
        points
    }

    /// Major index snapshots. Unreachable indices are skipped.
    pub async fn fetch_indices(&self) -> Vec<IndexQuote> {
        let quotes = futures::future::join_all(
            self.indices.iter().map(|(_, symbol)| self.fetch_quote(symbol)),
        )
        .await;

        let mut snapshots = Vec::new();
        for ((name, symbol), quote) in self.indices.iter().zip(quotes) {
            match quote {
                Ok((price, change, volume, timestamp)) => snapshots.push(IndexQuote {
                    name: name.to_string(),
                    symbol: symbol.to_string(),
                    price,
                    change,
                    volume,
                    timestamp,
                }),
                Err(e) => log::warn!("index fetch failed for {}: {}", name, e),
            }
        }
        snapshots
    }

    /// One quote via the Yahoo Finance chart endpoint:
    /// (price, fractional change, volume, RFC 3339 timestamp).
    async fn fetch_quote(&self, symbol: &str) -> Result<(f64, f64, u64, String)> {
        let url = format!(
            "https://query1.finance.yahoo.com/v8/finance/chart/{}?range=2d&interval=1d",
            urlencoding::encode(symbol)
        );

        let resp = self.client.get(&url).send().await?;
        let json: Value = resp.json().await?;

        let meta = &json["chart"]["result"][0]["meta"];
        let price = meta["regularMarketPrice"]
            .as_f64()
            .ok_or_else(|| anyhow!("no price in chart response for {}", symbol))?;
        let prev_close = meta["previousClose"]
            .as_f64()
            .or_else(|| meta["chartPreviousClose"].as_f64())
            .unwrap_or(0.0);
        let change = if prev_close > 0.0 {
            (price - prev_close) / prev_close
        } else {
            0.0
        };
        let volume = meta["regularMarketVolume"].as_u64().unwrap_or(0);

        let timestamp = meta["regularMarketTime"]
            .as_i64()
            .and_then(|t| chrono::DateTime::from_timestamp(t, 0))
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());

        Ok((price, change, volume, timestamp))
    }

    /// Built-in demonstration dataset: two symbols per requested sector.
    pub fn sample_market_data(sectors: &[Sector]) -> Vec<MarketPoint> {
        let now = chrono::Utc::now().to_rfc3339();
        let samples: [(Sector, &str, f64, f64, u64); 12] = [
            (Sector::Technology, "AAPL", 150.0, 0.02, 1_000_000),
            (Sector::Technology, "MSFT", 300.0, -0.01, 800_000),
            (Sector::Energy, "XOM", 80.0, 0.05, 500_000),
            (Sector::Energy, "CVX", 120.0, 0.03, 400_000),
            (Sector::Finance, "JPM", 140.0, -0.02, 600_000),
            (Sector::Finance, "BAC", 30.0, 0.01, 700_000),
            (Sector::Healthcare, "JNJ", 160.0, 0.005, 450_000),
            (Sector::Healthcare, "PFE", 35.0, -0.015, 900_000),
            (Sector::Manufacturing, "CAT", 250.0, 0.01, 300_000),
            (Sector::Manufacturing, "BA", 190.0, -0.03, 650_000),
            (Sector::ConsumerGoods, "PG", 155.0, 0.002, 350_000),
            (Sector::ConsumerGoods, "KO", 60.0, 0.008, 550_000),
        ];

        samples
            .iter()
            .filter(|(sector, ..)| sectors.contains(sector))
            .map(|(sector, symbol, price, change, volume)| MarketPoint {
                symbol: symbol.to_string(),
                sector: *sector,
                price: *price,
                change: *change,
                volume: *volume,
                timestamp: now.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_data_filters_by_sector() {
        let points = MarketCollector::sample_market_data(&[Sector::Energy]);
        assert_eq!(points.len(), 2);
        assert!(points.iter().all(|p| p.sector == Sector::Energy));
        assert!(points.iter().all(|p| p.price >= 0.0));
    }

    #[test]
    fn test_sample_data_covers_all_supported_sectors() {
        let points = MarketCollector::sample_market_data(&Sector::SUPPORTED);
        assert_eq!(points.len(), 12);
    }
}
