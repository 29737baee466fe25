use std::fmt;
use super::structs::{DisplayItem, NewsDigest, SentimentReading};

impl fmt::Display for SentimentReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Fear & Greed: {} | {} | band: {}",
            self.value,
            self.classification,
            self.color_band().as_str()
        )?;
        if !self.fetched_ok {
            write!(f, " (UNAVAILABLE)")?;
        }
        Ok(())
    }
}

impl fmt::Display for DisplayItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}\n    {}", self.display_date, self.title, self.link)?;
        if let Some(img) = &self.image_url {
            write!(f, "\n    img: {}", img)?;
        }
        Ok(())
    }
}

impl fmt::Display for NewsDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "--- NEWS ({} shown / {} matched / {} considered, {} skipped) ---",
            self.items.len(),
            self.matched,
            self.considered,
            self.skipped_malformed
        )?;
        for (i, item) in self.items.iter().enumerate() {
            writeln!(f, "{}. {}", i + 1, item)?;
        }
        write!(f, "-----------------------")
    }
}
