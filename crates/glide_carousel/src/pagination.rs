//! Pagination indicator
//!
//! One dot per item. Each dot's emphasis is a continuous function of the
//! live scroll offset: 1.0 when its page is exactly under the viewport,
//! falling linearly to 0.0 one page away. Dots therefore grow and fade
//! during a swipe instead of snapping when the index changes.
//!
//! The indicator only reads the offset. A tap produces a
//! [`NavigationIntent`]; moving the list is the navigation controller's job.

use glide_core::{Effect, SharedReactiveGraph, State};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{CarouselError, Result};
use crate::position::PositionTracker;

/// Dot frames rarely exceed this many items
pub type DotFrame = SmallVec<[DotView; 8]>;

/// Dot appearance at rest and when fully emphasized
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DotStyle {
    pub active_width: f32,
    pub inactive_width: f32,
    pub height: f32,
    /// Gap between neighboring dots
    pub spacing: f32,
    pub active_opacity: f32,
    pub inactive_opacity: f32,
}

impl Default for DotStyle {
    fn default() -> Self {
        Self {
            active_width: 16.0,
            inactive_width: 8.0,
            height: 8.0,
            spacing: 8.0,
            active_opacity: 1.0,
            inactive_opacity: 0.3,
        }
    }
}

impl DotStyle {
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("active_width", self.active_width),
            ("inactive_width", self.inactive_width),
            ("height", self.height),
        ];
        for (name, value) in sizes {
            if !value.is_finite() || value <= 0.0 {
                return Err(CarouselError::InvalidDotStyle(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !self.spacing.is_finite() || self.spacing < 0.0 {
            return Err(CarouselError::InvalidDotStyle(format!(
                "spacing must be non-negative, got {}",
                self.spacing
            )));
        }
        for (name, value) in [
            ("active_opacity", self.active_opacity),
            ("inactive_opacity", self.inactive_opacity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CarouselError::InvalidDotStyle(format!(
                    "{name} must be within 0..=1, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Appearance of dot `index` at the given emphasis
    pub fn dot(&self, index: usize, emphasis: f32) -> DotView {
        DotView {
            index,
            emphasis,
            width: lerp(self.inactive_width, self.active_width, emphasis),
            height: self.height,
            opacity: lerp(self.inactive_opacity, self.active_opacity, emphasis),
        }
    }
}

/// Render state of a single dot
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotView {
    pub index: usize,
    /// 0.0 (far from this page) to 1.0 (exactly on it)
    pub emphasis: f32,
    pub width: f32,
    pub height: f32,
    pub opacity: f32,
}

/// A request to show the item at `index`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavigationIntent {
    pub index: usize,
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Fractional page under the viewport; 0.0 until the width is known
pub fn page_position(offset: f32, item_width: f32) -> f32 {
    if item_width.is_finite() && item_width > 0.0 && offset.is_finite() {
        offset / item_width
    } else {
        0.0
    }
}

/// Emphasis of dot `dot` when the viewport sits at page `position`
pub fn emphasis(position: f32, dot: usize) -> f32 {
    (1.0 - (position - dot as f32).abs()).clamp(0.0, 1.0)
}

fn dot_frame(offset: f32, item_width: f32, item_count: usize, style: &DotStyle) -> DotFrame {
    let position = page_position(offset, item_width);
    (0..item_count)
        .map(|index| style.dot(index, emphasis(position, index)))
        .collect()
}

/// Dots under the carousel, driven by the live scroll offset
#[derive(Clone, Debug)]
pub struct PaginationIndicator {
    scroll_x: State<f32>,
    item_width: State<f32>,
    item_count: State<usize>,
    style: DotStyle,
}

impl PaginationIndicator {
    /// Create an indicator reading `position`'s live values
    pub fn new(position: &PositionTracker, style: DotStyle) -> Self {
        Self {
            scroll_x: position.live_offset().clone(),
            item_width: position.item_width_state().clone(),
            item_count: position.item_count_state().clone(),
            style,
        }
    }

    /// The live scroll offset this indicator animates with
    pub fn scroll_x(&self) -> &State<f32> {
        &self.scroll_x
    }

    /// One dot per item
    pub fn dot_count(&self) -> usize {
        self.item_count.get()
    }

    pub fn style(&self) -> &DotStyle {
        &self.style
    }

    /// Fractional page under the viewport
    pub fn position(&self) -> f32 {
        page_position(self.scroll_x.get(), self.item_width.get())
    }

    /// Visual intensity of `dot`, in `0.0..=1.0`
    pub fn emphasis_for(&self, dot: usize) -> f32 {
        emphasis(self.position(), dot)
    }

    /// Size and opacity of `dot` at the current offset
    pub fn dot_appearance(&self, dot: usize) -> DotView {
        self.style.dot(dot, self.emphasis_for(dot))
    }

    /// Every dot at the current offset
    pub fn dots(&self) -> DotFrame {
        dot_frame(
            self.scroll_x.get(),
            self.item_width.get(),
            self.item_count.get(),
            &self.style,
        )
    }

    /// Translate a tap on `dot` into a navigation request
    pub fn on_dot_pressed(&self, dot: usize) -> NavigationIntent {
        tracing::trace!(dot, "pagination dot pressed");
        NavigationIntent { index: dot }
    }

    /// Receive a fresh dot frame now and on every offset, width or count change
    ///
    /// Runs inside the reactive graph: `on_frame` must not read carousel
    /// state itself, everything it needs is in the frame.
    pub fn subscribe<F>(&self, mut on_frame: F) -> Effect
    where
        F: FnMut(DotFrame) + Send + 'static,
    {
        let (x, w, n) = (
            self.scroll_x.signal(),
            self.item_width.signal(),
            self.item_count.signal(),
        );
        let style = self.style;
        glide_core::create_effect(self.reactive(), move |g| {
            let frame = dot_frame(
                g.get(x).unwrap_or(0.0),
                g.get(w).unwrap_or(0.0),
                g.get(n).unwrap_or(0),
                &style,
            );
            on_frame(frame);
        })
    }

    /// Stop a subscription created with [`PaginationIndicator::subscribe`]
    pub fn unsubscribe(&self, effect: Effect) {
        glide_core::dispose_effect(self.reactive(), effect);
    }

    fn reactive(&self) -> &SharedReactiveGraph {
        self.scroll_x.reactive()
    }
}
