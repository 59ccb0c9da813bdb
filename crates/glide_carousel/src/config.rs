//! Carousel configuration
//!
//! Configuration can be built in code (`CarouselConfig::default()` plus
//! struct update syntax) or loaded from TOML:
//!
//! ```toml
//! navigation = "wrap"
//! end_reached_threshold = 1.0
//!
//! [dots]
//! active_width = 20.0
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{CarouselError, Result};
use crate::pagination::DotStyle;

/// What `show_next` / `show_prev` do at the ends of the sequence
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationMode {
    /// Stay on the first/last item
    #[default]
    Clamp,
    /// Continue from the other end
    Wrap,
}

/// Carousel configuration
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    /// Fixed page width in pixels; `None` pages by viewport width
    pub item_width: Option<f32>,
    /// Boundary behavior of the imperative navigation
    pub navigation: NavigationMode,
    /// Whether navigation commands ask the renderer to animate
    pub animated: bool,
    /// How close to the end, in viewport widths, end-reached fires
    pub end_reached_threshold: f32,
    /// Whether the renderer snaps to page boundaries
    pub paging_enabled: bool,
    /// Whether the renderer shows its own scroll bar
    pub shows_scroll_indicator: bool,
    /// Minimum interval between scroll events, in milliseconds
    pub scroll_event_throttle_ms: u32,
    /// Pagination dot appearance
    pub dots: DotStyle,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            item_width: None,
            navigation: NavigationMode::Clamp,
            animated: true,
            end_reached_threshold: 0.5,
            paging_enabled: true,
            shows_scroll_indicator: false,
            scroll_event_throttle_ms: 16,
            dots: DotStyle::default(),
        }
    }
}

impl CarouselConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if let Some(width) = self.item_width {
            if !width.is_finite() || width <= 0.0 {
                return Err(CarouselError::InvalidItemWidth(width));
            }
        }
        if !self.end_reached_threshold.is_finite() || self.end_reached_threshold < 0.0 {
            return Err(CarouselError::InvalidThreshold(self.end_reached_threshold));
        }
        self.dots.validate()
    }

    /// Fixed item width, if it is usable
    pub(crate) fn fixed_item_width(&self) -> Option<f32> {
        self.item_width.filter(|w| w.is_finite() && *w > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CarouselConfig::default();
        assert_eq!(config.item_width, None);
        assert_eq!(config.navigation, NavigationMode::Clamp);
        assert!(config.animated);
        assert!(config.paging_enabled);
        assert!(!config.shows_scroll_indicator);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = CarouselConfig::from_toml_str("").unwrap();
        assert_eq!(config, CarouselConfig::default());
    }

    #[test]
    fn test_parse_partial_config() {
        let config = CarouselConfig::from_toml_str(
            r#"
            item_width = 320.0
            navigation = "wrap"
            animated = false

            [dots]
            active_width = 20.0
            "#,
        )
        .unwrap();

        assert_eq!(config.item_width, Some(320.0));
        assert_eq!(config.navigation, NavigationMode::Wrap);
        assert!(!config.animated);
        assert_eq!(config.dots.active_width, 20.0);
        assert_eq!(config.dots.inactive_width, DotStyle::default().inactive_width);
        assert_eq!(config.end_reached_threshold, 0.5);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = CarouselConfig::from_toml_str("loop = true").unwrap_err();
        assert!(matches!(err, CarouselError::Parse(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = CarouselConfig::from_toml_str("item_width = 0.0").unwrap_err();
        assert!(matches!(err, CarouselError::InvalidItemWidth(w) if w == 0.0));

        let err = CarouselConfig::from_toml_str("end_reached_threshold = -1.0").unwrap_err();
        assert!(matches!(err, CarouselError::InvalidThreshold(_)));

        let err = CarouselConfig::from_toml_str("[dots]\ninactive_opacity = 2.0").unwrap_err();
        assert!(matches!(err, CarouselError::InvalidDotStyle(_)));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("glide_carousel_{}.toml", std::process::id()));
        fs::write(&path, "navigation = \"wrap\"\n").unwrap();

        let config = CarouselConfig::load(&path).unwrap();
        assert_eq!(config.navigation, NavigationMode::Wrap);

        fs::remove_file(&path).unwrap();
        assert!(matches!(
            CarouselConfig::load(&path),
            Err(CarouselError::Io(_))
        ));
    }
}
