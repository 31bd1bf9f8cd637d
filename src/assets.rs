//! Image asset resolution with placeholder fallback.
//!
//! A missing or unreadable asset never fails the render: it is logged and
//! replaced with a solid background-colored rectangle of the asset's nominal
//! size, and layout math downstream reads dimensions from whichever image
//! was actually resolved.

use std::path::Path;

use image::{Rgba, RgbaImage};
use tracing::warn;

/// Nominal placeholder sizes (width, height) per asset kind.
pub const TEMPLATE_FALLBACK: (u32, u32) = (600, 400);
pub const BADGE_FALLBACK: (u32, u32) = (200, 50);
pub const BANNER_FALLBACK: (u32, u32) = (400, 60);

pub enum ResolvedAsset {
    Loaded(RgbaImage),
    Placeholder(RgbaImage),
}

impl ResolvedAsset {
    pub fn into_image(self) -> RgbaImage {
        match self {
            ResolvedAsset::Loaded(img) | ResolvedAsset::Placeholder(img) => img,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ResolvedAsset::Placeholder(_))
    }
}

pub fn load_or_placeholder(path: &Path, fallback: (u32, u32), fill: Rgba<u8>) -> ResolvedAsset {
    match image::open(path) {
        Ok(img) => ResolvedAsset::Loaded(img.to_rgba8()),
        Err(err) => {
            warn!(
                "asset not found at {}, using {}x{} placeholder: {err}",
                path.display(),
                fallback.0,
                fallback.1
            );
            ResolvedAsset::Placeholder(RgbaImage::from_pixel(fallback.0, fallback.1, fill))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BG_COLOR;

    #[test]
    fn missing_file_yields_placeholder_of_nominal_size() {
        let resolved = load_or_placeholder(
            Path::new("asset/does_not_exist.png"),
            TEMPLATE_FALLBACK,
            BG_COLOR,
        );
        assert!(resolved.is_placeholder());
        let img = resolved.into_image();
        assert_eq!((img.width(), img.height()), TEMPLATE_FALLBACK);
        assert_eq!(*img.get_pixel(0, 0), BG_COLOR);
    }
}
