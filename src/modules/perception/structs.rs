use chrono::NaiveDateTime;
use serde::{Serialize, Deserialize};

pub const UNAVAILABLE_LABEL: &str = "N/A";

// ----------------------------------------------------------------------------
// 情绪指数
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentReading {
    pub value: u8,
    pub classification: String,
    pub fetched_ok: bool,
    /// 失败原因，只在 fetched_ok == false 时存在，用于错误横幅
    pub error: Option<String>,
}

impl SentimentReading {
    pub fn ok(value: u8, classification: impl Into<String>) -> Self {
        Self {
            value,
            classification: classification.into(),
            fetched_ok: true,
            error: None,
        }
    }

    /// 拉取失败时的中性默认值
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            value: 0,
            classification: UNAVAILABLE_LABEL.to_string(),
            fetched_ok: false,
            error: Some(reason.into()),
        }
    }

    pub fn color_band(&self) -> ColorBand {
        ColorBand::from_value(self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorBand {
    Red,
    Orange,
    Yellow,
    Green,
}

impl ColorBand {
    const THRESHOLDS: [(u8, ColorBand); 3] = [
        (25, ColorBand::Red),
        (50, ColorBand::Orange),
        (75, ColorBand::Yellow),
    ];

    pub fn from_value(value: u8) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(limit, _)| value < *limit)
            .map(|(_, band)| *band)
            .unwrap_or(ColorBand::Green)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorBand::Red => "red",
            ColorBand::Orange => "orange",
            ColorBand::Yellow => "yellow",
            ColorBand::Green => "green",
        }
    }
}

// ----------------------------------------------------------------------------
// 新闻源条目 (解析器输出，所有字段都可能缺失)
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedLink {
    pub rel: Option<String>,
    pub media_type: Option<String>,
    pub href: Option<String>,
}

impl FeedLink {
    pub fn is_image_enclosure(&self) -> bool {
        self.rel.as_deref() == Some("enclosure")
            && self.media_type.as_deref().unwrap_or("").starts_with("image")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub link: Option<String>,
    /// UTC
    pub published: Option<NaiveDateTime>,
    pub media_thumbnail: Vec<MediaRef>,
    pub media_content: Vec<MediaRef>,
    pub links: Vec<FeedLink>,
}

// ----------------------------------------------------------------------------
// 页面展示条目
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayItem {
    pub title: String,
    pub link: String,
    pub display_date: String,
    pub image_url: Option<String>,
}

/// 一次过滤的结果，带上被跳过的异常条目数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsDigest {
    pub items: Vec<DisplayItem>,
    pub considered: usize,
    pub matched: usize,
    pub skipped_malformed: usize,
}
