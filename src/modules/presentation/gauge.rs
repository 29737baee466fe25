use std::f64::consts::PI;

use crate::modules::perception::structs::ColorBand;
use super::page::escape_html;

const CX: f64 = 100.0;
const CY: f64 = 100.0;
const R: f64 = 80.0;

/// 0..=100 映射到半圆上的点 (0 在左，100 在右)
fn arc_point(value: u8) -> (f64, f64) {
    let angle = PI * (1.0 - f64::from(value.min(100)) / 100.0);
    (CX + R * angle.cos(), CY - R * angle.sin())
}

/// 半圆仪表盘，轴范围 0-100，指示条颜色取 ColorBand
pub fn render_gauge(value: u8, label: &str, band: ColorBand) -> String {
    let (x, y) = arc_point(value);
    format!(
        r##"<svg class="gauge" viewBox="0 0 200 130" width="320" role="img" aria-label="{title}: {value}">
  <text x="100" y="14" text-anchor="middle" class="gauge-title">{title}</text>
  <path d="M {x0:.2} {cy:.2} A {r} {r} 0 0 1 {x1:.2} {cy:.2}" stroke="#e5e7eb" stroke-width="18" fill="none"/>
  <path d="M {x0:.2} {cy:.2} A {r} {r} 0 0 1 {x:.2} {y:.2}" stroke="{color}" stroke-width="18" fill="none"/>
  <text x="100" y="96" text-anchor="middle" class="gauge-value">{value}</text>
  <text x="100" y="122" text-anchor="middle" class="gauge-label">{label}</text>
  <text x="{x0:.0}" y="122" text-anchor="middle" class="gauge-tick">0</text>
  <text x="{x1:.0}" y="122" text-anchor="middle" class="gauge-tick">100</text>
</svg>"##,
        title = "Fear &amp; Greed Index",
        value = value,
        label = escape_html(label),
        color = band.as_str(),
        r = R,
        cy = CY,
        x0 = CX - R,
        x1 = CX + R,
        x = x,
        y = y,
    )
}
