// 文件名: sentiment.rs

use reqwest::Client;
use anyhow::{Result, Context, anyhow, bail};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, error};

use super::structs::SentimentReading;
use crate::config::dashboard_profile::SentimentSource;

async fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T> {
    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(anyhow!("Status: {}", resp.status()));
    }
    let body = resp.json::<T>().await.context("Malformed Fear & Greed response")?;
    Ok(body)
}

/// alternative.me 返回的 value 可能是 "54" 也可能是 54
fn parse_index_value(raw: &Value) -> Result<u8> {
    let n = match raw {
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .with_context(|| format!("value is not numeric: {:?}", s))?,
        Value::Number(n) => n.as_f64().context("value is not a finite number")?,
        Value::Null => bail!("value missing"),
        other => bail!("value has unexpected type: {}", other),
    };
    if !(0.0..=100.0).contains(&n) || n.fract() != 0.0 {
        bail!("value out of range 0..=100: {}", n);
    }
    Ok(n as u8)
}

/// 松散解析：data[0].value / data[0].value_classification
fn parse_direct(json: &Value) -> Result<SentimentReading> {
    let entry = json["data"]
        .as_array()
        .and_then(|data| data.first())
        .context("No data in Fear & Greed response")?;

    let value = parse_index_value(&entry["value"])?;
    let classification = entry["value_classification"]
        .as_str()
        .context("No value_classification")?;

    Ok(SentimentReading::ok(value, classification))
}

// ----------------------------------------------------------------------------
// 带类型的客户端 (get_current_value / get_current_classification)
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FngResponse {
    data: Vec<FngEntry>,
}

#[derive(Debug, Deserialize)]
struct FngEntry {
    value: Value,
    value_classification: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FearGreedSnapshot {
    value: u8,
    classification: String,
}

impl FearGreedSnapshot {
    pub fn get_current_value(&self) -> u8 {
        self.value
    }

    pub fn get_current_classification(&self) -> &str {
        &self.classification
    }
}

pub struct FearGreedIndex {
    client: Client,
    endpoint: String,
}

impl FearGreedIndex {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self { client, endpoint: endpoint.into() }
    }

    /// 一次请求拿到最新一条读数
    pub async fn fetch_snapshot(&self) -> Result<FearGreedSnapshot> {
        let resp: FngResponse = get_json(&self.client, &self.endpoint).await?;
        let latest = resp
            .data
            .into_iter()
            .next()
            .context("No data in Fear & Greed response")?;

        Ok(FearGreedSnapshot {
            value: parse_index_value(&latest.value)?,
            classification: latest.value_classification,
        })
    }
}

// ----------------------------------------------------------------------------
// 对外的 Fetcher：永远返回读数，失败时降级
// ----------------------------------------------------------------------------

pub struct SentimentFetcher {
    client: Client,
    endpoint: String,
    source: SentimentSource,
}

impl SentimentFetcher {
    pub fn new(client: Client, endpoint: impl Into<String>, source: SentimentSource) -> Self {
        Self { client, endpoint: endpoint.into(), source }
    }

    /// 单次请求，不重试。任何错误都变成 {0, "N/A", fetched_ok: false}
    pub async fn fetch(&self) -> SentimentReading {
        match self.try_fetch().await {
            Ok(reading) => {
                info!(
                    "📈 Fear & Greed Index: {} ({}) via {:?}",
                    reading.value, reading.classification, self.source
                );
                reading
            }
            Err(e) => {
                error!("❌ Could not fetch Fear & Greed Index: {:#}", e);
                SentimentReading::unavailable(format!("{:#}", e))
            }
        }
    }

    async fn try_fetch(&self) -> Result<SentimentReading> {
        match self.source {
            SentimentSource::Direct => {
                let json: Value = get_json(&self.client, &self.endpoint).await?;
                parse_direct(&json)
            }
            SentimentSource::IndexClient => {
                let index = FearGreedIndex::new(self.client.clone(), self.endpoint.clone());
                let snapshot = index.fetch_snapshot().await?;
                Ok(SentimentReading::ok(
                    snapshot.get_current_value(),
                    snapshot.get_current_classification(),
                ))
            }
        }
    }
}
