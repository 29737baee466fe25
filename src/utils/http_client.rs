use reqwest::Client;
use std::time::Duration;
use anyhow::{Result, Context};
use tracing::info;

use crate::config::dashboard_profile::HttpConfig;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// 情绪接口和新闻源共用一个 Client，两次请求都带显式超时
    pub fn create(cfg: &HttpConfig) -> Result<Client> {
        let builder = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_sec))
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_sec))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(30)));

        info!(
            "🌐 [Http Client] timeout {}s, connect timeout {}s",
            cfg.timeout_sec, cfg.connect_timeout_sec
        );

        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(client)
    }
}
