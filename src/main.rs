mod config;
mod utils;
mod modules;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::dashboard_profile::DashboardProfile;
use crate::utils::http_client::HttpClientFactory;
use crate::modules::perception::{extract_digest, NewsDigest, NewsSentinel, SentimentFetcher};
use crate::modules::presentation::DashboardPage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    info!("Starting Fear & Greed News Dashboard...");

    // 1. 基础设施初始化
    let profile = DashboardProfile::load().context("Failed to load dashboard config")?;
    let client = HttpClientFactory::create(&profile.http)?;

    // 2. 情绪指数 (失败不阻断页面)
    let sentiment = SentimentFetcher::new(
        client.clone(),
        profile.sentiment.endpoint.clone(),
        profile.sentiment.source,
    );
    let reading = sentiment.fetch().await;

    // 3. 新闻源 -> 关键字过滤；拉取或解析失败降级为空列表 + 警告
    let sentinel = NewsSentinel::new(
        client.clone(),
        profile.news.feed_url.clone(),
        profile.news.user_agent.clone(),
    );
    let (digest, feed_error) = match sentinel.fetch_entries().await {
        Ok(entries) => (extract_digest(&entries, &profile.news.keyword), None),
        Err(e) => {
            warn!("⚠️ News feed unavailable: {}", e);
            (NewsDigest::default(), Some(e.to_string()))
        }
    };

    info!("{}", reading);
    info!("\n{}", digest);

    // 4. 渲染页面
    let page = DashboardPage {
        page: &profile.page,
        reading: &reading,
        news: &digest,
        keyword: &profile.news.keyword,
        feed_error: feed_error.as_deref(),
    };
    page.write_to(&profile.output.path)?;

    info!("✅ Done.");
    Ok(())
}
