use chrono::NaiveDateTime;
use tracing::{info, warn};

use super::structs::{DisplayItem, FeedEntry, NewsDigest};

/// 无论 feed 多长，只看前 100 条
pub const MAX_ENTRIES: usize = 100;
pub const UNKNOWN_DATE: &str = "Unknown";
const DATE_FORMAT: &str = "%b %d, %Y %H:%M";

/// 标题或摘要包含关键字 (大小写不敏感)。两者都没有的条目永远不匹配。
pub fn matches_keyword(entry: &FeedEntry, keyword: &str) -> bool {
    if entry.title.is_none() && entry.summary.is_none() {
        return false;
    }
    let needle = keyword.to_lowercase();
    [&entry.title, &entry.summary]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

pub fn format_display_date(published: Option<&NaiveDateTime>) -> String {
    match published {
        Some(ts) => ts.format(DATE_FORMAT).to_string(),
        None => UNKNOWN_DATE.to_string(),
    }
}

/// thumbnail > content > links 里第一个 image enclosure；
/// 取到第一个值就停，不是 http 开头的一律丢弃
pub fn resolve_image(entry: &FeedEntry) -> Option<String> {
    let candidate = entry
        .media_thumbnail
        .first()
        .and_then(|m| m.url.as_deref())
        .or_else(|| entry.media_content.first().and_then(|m| m.url.as_deref()))
        .or_else(|| {
            entry
                .links
                .iter()
                .find(|l| l.is_image_enclosure())
                .and_then(|l| l.href.as_deref())
        })?;

    if candidate.starts_with("http") {
        Some(candidate.to_string())
    } else {
        None
    }
}

fn to_display_item(entry: &FeedEntry) -> Option<DisplayItem> {
    let title = entry.title.as_ref()?;
    let link = entry.link.as_ref()?;
    Some(DisplayItem {
        title: title.clone(),
        link: link.clone(),
        display_date: format_display_date(entry.published.as_ref()),
        image_url: resolve_image(entry),
    })
}

/// 过滤 + 抽取，顺序与输入一致，缺 title/link 的条目跳过并计数
pub fn extract_digest(entries: &[FeedEntry], keyword: &str) -> NewsDigest {
    let window = &entries[..entries.len().min(MAX_ENTRIES)];
    let mut digest = NewsDigest {
        considered: window.len(),
        ..NewsDigest::default()
    };

    for (idx, entry) in window.iter().enumerate() {
        if !matches_keyword(entry, keyword) {
            continue;
        }
        digest.matched += 1;
        match to_display_item(entry) {
            Some(item) => digest.items.push(item),
            None => {
                warn!(
                    "⚠️ Skipping feed entry #{}: missing {}",
                    idx,
                    if entry.title.is_none() { "title" } else { "link" }
                );
                digest.skipped_malformed += 1;
            }
        }
    }

    info!(
        "🔍 Keyword '{}': {} of {} entries matched, {} shown, {} skipped",
        keyword,
        digest.matched,
        digest.considered,
        digest.items.len(),
        digest.skipped_malformed
    );
    digest
}

/// extract_digest 的纯列表视图，丢掉计数
#[allow(dead_code)]
pub fn filter_and_extract(entries: &[FeedEntry], keyword: &str) -> Vec<DisplayItem> {
    extract_digest(entries, keyword).items
}
