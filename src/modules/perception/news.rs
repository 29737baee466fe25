// 文件名: news.rs

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use reqwest::header::USER_AGENT;
use thiserror::Error;
use tracing::{info, warn};

use super::structs::{FeedEntry, FeedLink, MediaRef};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("feed returned HTTP {0}")]
    Status(u16),
    #[error("feed is neither RSS nor Atom: {0}")]
    Parse(String),
}

pub struct NewsSentinel {
    client: Client,
    feed_url: String,
    user_agent: String,
}

impl NewsSentinel {
    pub fn new(client: Client, feed_url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            feed_url: feed_url.into(),
            user_agent: user_agent.into(),
        }
    }

    /// 单次 GET，不重试；返回解析后的全部条目 (截断在过滤阶段做)
    pub async fn fetch_entries(&self) -> Result<Vec<FeedEntry>, FeedError> {
        let resp = self
            .client
            .get(&self.feed_url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(FeedError::Status(resp.status().as_u16()));
        }

        let body = resp.bytes().await?;
        let entries = parse_feed(&body)?;
        info!("📰 Feed {} parsed: {} entries", self.feed_url, entries.len());
        Ok(entries)
    }
}

/// 先按 RSS 解析，失败再试 Atom
pub fn parse_feed(body: &[u8]) -> Result<Vec<FeedEntry>, FeedError> {
    let rss_err = match rss::Channel::read_from(body) {
        Ok(channel) => {
            let prefix = media_prefix(channel.namespaces());
            return Ok(channel.items().iter().map(|i| from_rss_item(i, &prefix)).collect());
        }
        Err(e) => e,
    };

    match atom_syndication::Feed::read_from(body) {
        Ok(feed) => {
            let prefix = media_prefix(feed.namespaces());
            Ok(feed.entries().iter().map(|e| from_atom_entry(e, &prefix)).collect())
        }
        Err(atom_err) => {
            warn!("Feed parse failed (rss: {}, atom: {})", rss_err, atom_err);
            Err(FeedError::Parse(rss_err.to_string()))
        }
    }
}

const MEDIA_RSS_NS: &str = "http://search.yahoo.com/mrss/";
const DEFAULT_MEDIA_PREFIX: &str = "media";

fn parse_feed_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|d| d.with_timezone(&Utc).naive_utc())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok())
}

fn non_empty(s: &str) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s.to_string()) }
}

/// Media RSS 可能绑在任意前缀上 (xmlns:m=...)，按命名空间 URI 反查
fn media_prefix(namespaces: &BTreeMap<String, String>) -> String {
    namespaces
        .iter()
        .find(|(_, uri)| uri.trim_end_matches('/') == MEDIA_RSS_NS.trim_end_matches('/'))
        .map(|(prefix, _)| prefix.clone())
        .unwrap_or_else(|| DEFAULT_MEDIA_PREFIX.to_string())
}

fn media_refs<'a>(attrs: impl Iterator<Item = &'a BTreeMap<String, String>>) -> Vec<MediaRef> {
    attrs.map(|a| MediaRef { url: a.get("url").cloned() }).collect()
}

fn from_rss_item(item: &rss::Item, media_prefix: &str) -> FeedEntry {
    let media = item.extensions().get(media_prefix);
    let media_of = |name: &str| {
        media_refs(
            media
                .and_then(|m| m.get(name))
                .into_iter()
                .flatten()
                .map(|ext| ext.attrs()),
        )
    };

    let mut links = Vec::new();
    if let Some(link) = item.link() {
        links.push(FeedLink {
            rel: Some("alternate".to_string()),
            media_type: Some("text/html".to_string()),
            href: Some(link.to_string()),
        });
    }
    if let Some(enclosure) = item.enclosure() {
        links.push(FeedLink {
            rel: Some("enclosure".to_string()),
            media_type: non_empty(enclosure.mime_type()),
            href: non_empty(enclosure.url()),
        });
    }

    FeedEntry {
        title: item.title().and_then(non_empty),
        summary: item.description().or(item.content()).map(str::to_string),
        link: item.link().and_then(non_empty),
        published: item.pub_date().and_then(parse_feed_date),
        media_thumbnail: media_of("thumbnail"),
        media_content: media_of("content"),
        links,
    }
}

fn from_atom_entry(entry: &atom_syndication::Entry, media_prefix: &str) -> FeedEntry {
    let media = entry.extensions().get(media_prefix);
    let media_of = |name: &str| {
        media_refs(
            media
                .and_then(|m| m.get(name))
                .into_iter()
                .flatten()
                .map(|ext| ext.attrs()),
        )
    };

    let link = entry
        .links()
        .iter()
        .find(|l| l.rel() == "alternate")
        .or_else(|| entry.links().first())
        .and_then(|l| non_empty(l.href()));

    let links = entry
        .links()
        .iter()
        .map(|l| FeedLink {
            rel: Some(l.rel().to_string()),
            media_type: l.mime_type().map(str::to_string),
            href: non_empty(l.href()),
        })
        .collect();

    let summary = entry
        .summary()
        .map(|s| s.as_str().to_string())
        .or_else(|| entry.content().and_then(|c| c.value()).map(str::to_string));

    FeedEntry {
        title: non_empty(entry.title().as_str()),
        summary,
        link,
        published: entry.published().map(|d| d.with_timezone(&Utc).naive_utc()),
        media_thumbnail: media_of("thumbnail"),
        media_content: media_of("content"),
        links,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::stub_server::{closed_port_url, serve_once, test_client};
    use chrono::NaiveDate;

    const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>CoinDesk</title>
    <link>https://www.coindesk.com</link>
    <description>Crypto news</description>
    <item>
      <title>Bitcoin Hits New High</title>
      <link>https://www.coindesk.com/markets/btc-high</link>
      <description>BTC rallied overnight.</description>
      <pubDate>Tue, 05 Mar 2024 14:30:00 +0000</pubDate>
      <media:thumbnail url="https://img.coindesk.com/thumb.jpg"/>
      <media:content url="https://img.coindesk.com/full.jpg" medium="image"/>
    </item>
    <item>
      <title>Ether ETF Filing</title>
      <link>https://www.coindesk.com/policy/eth-etf</link>
      <description>Regulators weigh in.</description>
      <pubDate>Tue, 05 Mar 2024 16:45:00 +0200</pubDate>
      <enclosure url="https://img.coindesk.com/eth.png" length="1024" type="image/png"/>
    </item>
    <item>
      <description>No title on this one</description>
    </item>
  </channel>
</rss>"#;

    const SAMPLE_ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Example Atom</title>
  <id>urn:example</id>
  <updated>2024-03-05T14:30:00Z</updated>
  <entry>
    <title>Bitcoin miners expand</title>
    <id>urn:example:1</id>
    <updated>2024-03-05T14:30:00Z</updated>
    <published>2024-03-05T09:15:00-05:00</published>
    <link rel="alternate" href="https://example.com/miners"/>
    <link rel="enclosure" type="image/jpeg" href="https://example.com/miners.jpg"/>
    <summary>Hashrate climbs.</summary>
  </entry>
</feed>"#;

    #[test]
    fn parses_rss_items_with_media_and_enclosure() {
        let entries = parse_feed(SAMPLE_RSS.as_bytes()).unwrap();
        assert_eq!(entries.len(), 3);

        let btc = &entries[0];
        assert_eq!(btc.title.as_deref(), Some("Bitcoin Hits New High"));
        assert_eq!(btc.summary.as_deref(), Some("BTC rallied overnight."));
        assert_eq!(btc.link.as_deref(), Some("https://www.coindesk.com/markets/btc-high"));
        assert_eq!(
            btc.published,
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(14, 30, 0)
        );
        assert_eq!(btc.media_thumbnail[0].url.as_deref(), Some("https://img.coindesk.com/thumb.jpg"));
        assert_eq!(btc.media_content[0].url.as_deref(), Some("https://img.coindesk.com/full.jpg"));

        let eth = &entries[1];
        // +0200 -> UTC
        assert_eq!(
            eth.published,
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(14, 45, 0)
        );
        assert!(eth.media_thumbnail.is_empty());
        let enclosure = eth.links.iter().find(|l| l.is_image_enclosure()).unwrap();
        assert_eq!(enclosure.href.as_deref(), Some("https://img.coindesk.com/eth.png"));

        assert_eq!(entries[2].title, None);
        assert_eq!(entries[2].link, None);
    }

    #[test]
    fn falls_back_to_atom() {
        let entries = parse_feed(SAMPLE_ATOM.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.title.as_deref(), Some("Bitcoin miners expand"));
        assert_eq!(e.link.as_deref(), Some("https://example.com/miners"));
        assert_eq!(e.summary.as_deref(), Some("Hashrate climbs."));
        assert_eq!(
            e.published,
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(14, 15, 0)
        );
        assert!(e.links.iter().any(|l| l.is_image_enclosure()));
    }

    #[test]
    fn media_images_follow_namespace_not_prefix() {
        let rss = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:m="http://search.yahoo.com/mrss/">
  <channel>
    <title>Alt prefix</title>
    <link>https://example.com</link>
    <description>d</description>
    <item>
      <title>Bitcoin &amp; friends</title>
      <link>https://example.com/btc</link>
      <m:thumbnail url="https://img/t.png"/>
      <m:content url="https://img/c.png"/>
    </item>
  </channel>
</rss>"#;
        let entries = parse_feed(rss.as_bytes()).unwrap();
        assert_eq!(entries[0].title.as_deref(), Some("Bitcoin & friends"));
        assert_eq!(entries[0].media_thumbnail[0].url.as_deref(), Some("https://img/t.png"));
        assert_eq!(entries[0].media_content[0].url.as_deref(), Some("https://img/c.png"));

        let atom = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:mrss="http://search.yahoo.com/mrss/">
  <title>Alt prefix</title>
  <id>urn:alt</id>
  <updated>2024-03-05T14:30:00Z</updated>
  <entry>
    <title>Bitcoin pic</title>
    <id>urn:alt:1</id>
    <updated>2024-03-05T14:30:00Z</updated>
    <link rel="alternate" href="https://example.com/pic"/>
    <mrss:thumbnail url="https://img/a.png"/>
  </entry>
</feed>"#;
        let entries = parse_feed(atom.as_bytes()).unwrap();
        assert_eq!(entries[0].media_thumbnail[0].url.as_deref(), Some("https://img/a.png"));
    }

    #[test]
    fn media_prefix_defaults_to_media() {
        let mut ns = BTreeMap::new();
        assert_eq!(media_prefix(&ns), "media");
        ns.insert("m".to_string(), "http://search.yahoo.com/mrss".to_string());
        assert_eq!(media_prefix(&ns), "m");
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(parse_feed(b"{\"not\":\"xml\"}"), Err(FeedError::Parse(_))));
    }

    #[test]
    fn feed_dates_accept_common_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(14, 30, 0);
        assert_eq!(parse_feed_date("Tue, 05 Mar 2024 14:30:00 GMT"), expected);
        assert_eq!(parse_feed_date("2024-03-05T14:30:00Z"), expected);
        assert_eq!(parse_feed_date("2024-03-05 14:30:00"), expected);
        assert_eq!(parse_feed_date("yesterday"), None);
    }

    #[tokio::test]
    async fn fetch_sends_browser_user_agent() {
        let (url, request) = serve_once("200 OK", "application/rss+xml", SAMPLE_RSS).await;
        let sentinel = NewsSentinel::new(test_client(), url, "Mozilla/5.0");
        let entries = sentinel.fetch_entries().await.unwrap();
        assert_eq!(entries.len(), 3);

        let head = request.await.unwrap().to_lowercase();
        assert!(head.contains("user-agent: mozilla/5.0"));
    }

    #[tokio::test]
    async fn fetch_reports_status_and_network_errors() {
        let (url, _req) = serve_once("404 Not Found", "text/plain", "gone").await;
        let err = NewsSentinel::new(test_client(), url, "Mozilla/5.0")
            .fetch_entries()
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::Status(404)));

        let url = closed_port_url().await;
        let err = NewsSentinel::new(test_client(), url, "Mozilla/5.0")
            .fetch_entries()
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::Request(_)));
    }
}
