use serde::Deserialize;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use anyhow::{Result, Context, bail};
use url::Url;

const CONFIG_FILE: &str = "dashboard_config";
const ENV_PREFIX: &str = "DASHBOARD";

/// 情绪数据来源：直接读 JSON，或走带类型的 FearGreedIndex 客户端。
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SentimentSource {
    Direct,
    IndexClient,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PageLayout {
    Centered,
    Wide,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SentimentConfig {
    pub endpoint: String,
    pub source: SentimentSource,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NewsConfig {
    pub feed_url: String,
    pub keyword: String,
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub timeout_sec: u64,
    pub connect_timeout_sec: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PageConfig {
    pub title: String,
    pub heading: String,
    pub layout: PageLayout,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardProfile {
    pub sentiment: SentimentConfig,
    pub news: NewsConfig,
    pub http: HttpConfig,
    pub page: PageConfig,
    pub output: OutputConfig,
}

impl DashboardProfile {
    /// 默认值 -> dashboard_config.toml (可选) -> DASHBOARD__* 环境变量
    pub fn load() -> Result<Self> {
        Self::load_layered(File::with_name(CONFIG_FILE).required(false), Self::environment())
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX).separator("__")
    }

    fn load_layered<F>(file: F, env: Environment) -> Result<Self>
    where
        F: config::Source + Send + Sync + 'static,
    {
        let builder = Self::defaults()?.add_source(file).add_source(env);
        Self::finish(builder)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        let builder = Config::builder()
            .set_default("sentiment.endpoint", "https://api.alternative.me/fng/")?
            .set_default("sentiment.source", "direct")?
            .set_default("news.feed_url", "https://www.coindesk.com/arc/outboundfeeds/rss/")?
            .set_default("news.keyword", "bitcoin")?
            .set_default("news.user_agent", "Mozilla/5.0")?
            .set_default("http.timeout_sec", 15)?
            .set_default("http.connect_timeout_sec", 10)?
            .set_default("page.title", "Bitcoin News + Sentiment")?
            .set_default("page.heading", "📰 Bitcoin News via RSS (CoinDesk)")?
            .set_default("page.layout", "centered")?
            .set_default("output.path", "dashboard.html")?;
        Ok(builder)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let settings = builder.build().context("Failed to build dashboard config")?;
        let profile: DashboardProfile = settings
            .try_deserialize()
            .context("Invalid dashboard config")?;
        profile.validate()?;
        Ok(profile)
    }

    fn validate(&self) -> Result<()> {
        Url::parse(&self.sentiment.endpoint)
            .with_context(|| format!("sentiment.endpoint is not a URL: {}", self.sentiment.endpoint))?;
        Url::parse(&self.news.feed_url)
            .with_context(|| format!("news.feed_url is not a URL: {}", self.news.feed_url))?;
        if self.http.timeout_sec == 0 || self.http.connect_timeout_sec == 0 {
            bail!("http timeouts must be greater than zero");
        }
        if self.output.path.trim().is_empty() {
            bail!("output.path must not be empty");
        }
        Ok(())
    }
}
