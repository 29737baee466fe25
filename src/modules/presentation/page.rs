use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Result, Context};
use tracing::info;

use crate::config::dashboard_profile::{PageConfig, PageLayout};
use crate::modules::perception::structs::{DisplayItem, NewsDigest, SentimentReading};
use super::gauge::render_gauge;

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// 一次运行 = 一次页面加载
pub struct DashboardPage<'a> {
    pub page: &'a PageConfig,
    pub reading: &'a SentimentReading,
    pub news: &'a NewsDigest,
    pub keyword: &'a str,
    pub feed_error: Option<&'a str>,
}

impl<'a> DashboardPage<'a> {
    pub fn render(&self) -> String {
        let max_width = match self.page.layout {
            PageLayout::Centered => "46rem",
            PageLayout::Wide => "96rem",
        };

        let mut html = String::new();
        let _ = write!(
            html,
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body {{ font-family: system-ui, sans-serif; margin: 0 auto; padding: 1.5rem; max-width: {max_width}; }}
.metric-label {{ font-size: .9rem; color: #555; }}
.metric-value {{ font-size: 2.2rem; font-weight: 600; }}
.metric-delta {{ font-size: .9rem; }}
.banner {{ padding: .75rem 1rem; border-radius: .4rem; margin: 1rem 0; }}
.banner.error {{ background: #fde2e2; color: #8a1c1c; }}
.banner.warning {{ background: #fff4d6; color: #7a5a00; }}
.news-item img {{ width: 100%; border-radius: .4rem; }}
.caption {{ color: #777; font-size: .85rem; }}
</style>
</head>
<body>
<h1>{heading}</h1>
"#,
            title = escape_html(&self.page.title),
            heading = escape_html(&self.page.heading),
            max_width = max_width,
        );

        self.render_sentiment(&mut html);
        html.push_str("<hr>\n");
        html.push_str(&render_gauge(
            self.reading.value,
            &self.reading.classification,
            self.reading.color_band(),
        ));
        html.push('\n');
        self.render_news(&mut html);
        html.push_str("</body>\n</html>\n");
        html
    }

    fn render_sentiment(&self, html: &mut String) {
        if !self.reading.fetched_ok {
            let reason = self.reading.error.as_deref().unwrap_or("unknown error");
            let _ = writeln!(
                html,
                r#"<div class="banner error">Could not fetch Fear &amp; Greed Index: {}</div>"#,
                escape_html(reason)
            );
        }
        let _ = writeln!(
            html,
            r#"<div class="metric">
<div class="metric-label">📈 Crypto Fear &amp; Greed Index</div>
<div class="metric-value">{}</div>
<div class="metric-delta">{}</div>
</div>"#,
            self.reading.value,
            escape_html(&self.reading.classification)
        );
    }

    fn render_news(&self, html: &mut String) {
        if self.news.items.is_empty() {
            let _ = write!(
                html,
                r#"<div class="banner warning">No {} news found."#,
                escape_html(&capitalize(self.keyword))
            );
            if let Some(err) = self.feed_error {
                let _ = write!(html, " ({})", escape_html(err));
            }
            html.push_str("</div>\n");
            return;
        }

        for item in &self.news.items {
            render_item(html, item);
        }
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.render())
            .with_context(|| format!("Failed to write dashboard to {}", path.display()))?;
        info!("🖥️ Dashboard written to {}", path.display());
        Ok(())
    }
}

fn render_item(html: &mut String, item: &DisplayItem) {
    html.push_str(r#"<article class="news-item">"#);
    html.push('\n');
    if let Some(img) = &item.image_url {
        let _ = writeln!(html, r#"<img src="{}" alt="">"#, escape_html(img));
    }
    let _ = writeln!(
        html,
        r#"<h3><a href="{}">{}</a></h3>
<div class="caption">🕒 {}</div>
</article>
<hr>"#,
        escape_html(&item.link),
        escape_html(&item.title),
        escape_html(&item.display_date)
    );
}
