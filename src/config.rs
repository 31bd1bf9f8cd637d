//! Render configuration: palette, asset selection and layout constants.
//!
//! Built once per invocation from the two enumerated inputs (direction and
//! token) and never mutated afterwards.

use std::path::PathBuf;

use clap::ValueEnum;
use image::Rgba;

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
        }
    }
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Btc,
    Eth,
    Hype,
}

impl Token {
    pub fn as_str(self) -> &'static str {
        match self {
            Token::Btc => "btc",
            Token::Eth => "eth",
            Token::Hype => "hype",
        }
    }

    pub fn ticker(self) -> &'static str {
        match self {
            Token::Btc => "BTC",
            Token::Eth => "ETH",
            Token::Hype => "HYPE",
        }
    }
}

// Palette sampled from the reference record screenshots.
pub const BG_COLOR: Rgba<u8> = Rgba([11, 11, 11, 255]); // #0b0b0b
pub const TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const PROFIT_COLOR: Rgba<u8> = Rgba([27, 154, 185, 255]); // #1b9ab9
pub const LOSS_COLOR: Rgba<u8> = Rgba([214, 68, 88, 255]); // #d64458

#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub bg_color: Rgba<u8>,
    pub text_color: Rgba<u8>,
    pub profit_color: Rgba<u8>,
    pub loss_color: Rgba<u8>,
    pub template_path: PathBuf,
    pub badge_path: PathBuf,
    pub banner_path: PathBuf,
    pub ticker: &'static str,
    /// Margin from the right edge of the numbers column, px.
    pub right_margin: u32,
    /// Uniform background padding around the finished record, px.
    pub padding: u32,
}

impl RenderConfig {
    pub fn new(direction: Direction, token: Token) -> Self {
        let assets = asset_dir();
        let badge = match direction {
            Direction::Long => "long_cross_margin_element.png",
            Direction::Short => "short_cross_margin_element.png",
        };
        let banner = match token {
            Token::Btc => "btc_banner.png",
            Token::Eth => "eth_banner.png",
            Token::Hype => "hype_banner.png",
        };
        Self {
            bg_color: BG_COLOR,
            text_color: TEXT_COLOR,
            profit_color: PROFIT_COLOR,
            loss_color: LOSS_COLOR,
            template_path: assets.join("row_title_element.png"),
            badge_path: assets.join(badge),
            banner_path: assets.join(banner),
            ticker: token.ticker(),
            right_margin: 20,
            padding: 40,
        }
    }
}

fn asset_dir() -> PathBuf {
    std::env::var("ASSET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("asset"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_follows_direction() {
        let long = RenderConfig::new(Direction::Long, Token::Btc);
        let short = RenderConfig::new(Direction::Short, Token::Btc);
        assert!(long.badge_path.ends_with("long_cross_margin_element.png"));
        assert!(short.badge_path.ends_with("short_cross_margin_element.png"));
    }

    #[test]
    fn banner_follows_token() {
        let cfg = RenderConfig::new(Direction::Long, Token::Hype);
        assert!(cfg.banner_path.ends_with("hype_banner.png"));
        assert_eq!(cfg.ticker, "HYPE");
    }
}
