//! Record composer: metric derivation, layout math and text overlay.

use image::{imageops, Rgba, RgbaImage};
use thiserror::Error;

use crate::{
    assets::{self, BADGE_FALLBACK, BANNER_FALLBACK, TEMPLATE_FALLBACK},
    config::RenderConfig,
    font::{self, FontHandle},
    format,
};

/// Width reserved for the numbers column to the right of the template.
const NUMBERS_WIDTH: u32 = 450;
/// Background strip between the badge and the template.
const SPACING_HEIGHT: u32 = 30;

const PNL_FONT_PX: f32 = 32.0;
const VALUE_FONT_PX: f32 = 28.0;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("close price cannot equal open price (quantity is undefined)")]
    ZeroPriceRange,
    #[error("image: {0}")]
    Image(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// The seven display fields of a closed position, plus the currency symbol.
#[derive(Clone, Debug)]
pub struct TradeMetrics {
    pub pnl: f64,
    pub quantity: f64,
    pub open_price: f64,
    pub close_price: f64,
    pub close_value: f64,
    pub open_time: String,
    pub close_time: String,
    pub symbol: String,
}

impl TradeMetrics {
    /// Derive the full metric set from PnL and the two average prices:
    /// `quantity = |pnl / (close - open)|`, `close_value = quantity * close`.
    pub fn derive(
        pnl: f64,
        open_price: f64,
        close_price: f64,
        open_time: String,
        close_time: String,
    ) -> Result<Self, ComposeError> {
        let price_diff = close_price - open_price;
        if price_diff == 0.0 {
            return Err(ComposeError::ZeroPriceRange);
        }
        let quantity = (pnl / price_diff).abs();
        let close_value = quantity * close_price;
        Ok(Self {
            pnl,
            quantity,
            open_price,
            close_price,
            close_value,
            open_time,
            close_time,
            symbol: "USDT".to_string(),
        })
    }
}

/// The seven record lines in draw order: text, font pixel size, color.
fn metric_lines(cfg: &RenderConfig, m: &TradeMetrics) -> Vec<(String, f32, Rgba<u8>)> {
    let pnl_color = if m.pnl >= 0.0 {
        cfg.profit_color
    } else {
        cfg.loss_color
    };
    let pnl_sign = if m.pnl >= 0.0 { "+" } else { "" };
    vec![
        (
            format!("{pnl_sign}{} {}", format::format_number(m.pnl), m.symbol),
            PNL_FONT_PX,
            pnl_color,
        ),
        (
            format!("{} {}", format::format_number(m.quantity), cfg.ticker),
            VALUE_FONT_PX,
            cfg.text_color,
        ),
        (
            format::format_number(m.open_price),
            VALUE_FONT_PX,
            cfg.text_color,
        ),
        (
            format::format_number(m.close_price),
            VALUE_FONT_PX,
            cfg.text_color,
        ),
        (
            format!("{} {}", format::format_number(m.close_value), m.symbol),
            VALUE_FONT_PX,
            cfg.text_color,
        ),
        (m.open_time.clone(), VALUE_FONT_PX, cfg.text_color),
        (m.close_time.clone(), VALUE_FONT_PX, cfg.text_color),
    ]
}

/// Composite the record: banner on top, badge below it, spacer, template,
/// then the right-aligned metric column, all wrapped in uniform padding.
///
/// Asset and font failures degrade inside the loaders, so composition itself
/// cannot fail; output dimensions are fully determined by the resolved asset
/// sizes plus the fixed layout constants.
pub fn compose_record(cfg: &RenderConfig, metrics: &TradeMetrics) -> RgbaImage {
    let template =
        assets::load_or_placeholder(&cfg.template_path, TEMPLATE_FALLBACK, cfg.bg_color)
            .into_image();
    let badge =
        assets::load_or_placeholder(&cfg.badge_path, BADGE_FALLBACK, cfg.bg_color).into_image();
    let banner =
        assets::load_or_placeholder(&cfg.banner_path, BANNER_FALLBACK, cfg.bg_color).into_image();

    let combined_width = (template.width() + NUMBERS_WIDTH).max(banner.width());
    let combined_height = template.height() + badge.height() + banner.height() + SPACING_HEIGHT;

    let mut canvas = RgbaImage::from_pixel(combined_width, combined_height, cfg.bg_color);

    // Banner centered at the very top.
    let banner_x = (combined_width - banner.width()) / 2;
    imageops::replace(&mut canvas, &banner, banner_x as i64, 0);

    // Badge left-aligned below the banner; the strip to its right stays
    // background-colored.
    let badge_y = banner.height();
    imageops::replace(&mut canvas, &badge, 0, badge_y as i64);
    if badge.width() < combined_width {
        fill_rect(
            &mut canvas,
            badge.width(),
            badge_y,
            combined_width,
            badge_y + badge.height(),
            cfg.bg_color,
        );
    }

    // Template below the badge and the spacer strip.
    let template_y = banner.height() + badge.height() + SPACING_HEIGHT;
    imageops::replace(&mut canvas, &template, 0, template_y as i64);

    let large = font::resolve(PNL_FONT_PX);
    let medium = font::resolve(VALUE_FONT_PX);

    // Baselines track the template: small top offset, then evenly spaced
    // rows matching the row-title layout.
    let start_y = template_y as f32 + template.height() as f32 * 0.01;
    let line_spacing = template.height() as f32 * 0.151;
    let numbers_end_x = (combined_width - cfg.right_margin) as f32;

    for (i, (text, px, color)) in metric_lines(cfg, metrics).into_iter().enumerate() {
        let handle: &FontHandle = if px == PNL_FONT_PX { &large } else { &medium };
        let x = numbers_end_x - handle.text_width(&text);
        let y = start_y + i as f32 * line_spacing;
        handle.draw(&mut canvas, x as i32, y as i32, color, &text);
    }

    // Uniform padding around the finished record.
    let final_width = combined_width + cfg.padding * 2;
    let final_height = combined_height + cfg.padding * 2;
    let mut padded = RgbaImage::from_pixel(final_width, final_height, cfg.bg_color);
    imageops::replace(&mut padded, &canvas, cfg.padding as i64, cfg.padding as i64);
    padded
}

fn fill_rect(img: &mut RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgba<u8>) {
    for y in y0..y1.min(img.height()) {
        for x in x0..x1.min(img.width()) {
            img.put_pixel(x, y, color);
        }
    }
}
