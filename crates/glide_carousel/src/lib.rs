//! Glide Carousel
//!
//! A horizontally paging list: one item per viewport width, a row of
//! pagination dots that follows the scroll position frame by frame, an
//! end-of-list signal for lazy loading, and a two-method imperative handle
//! for the parent.
//!
//! The list renderer itself (windowing, recycling, scroll physics) is
//! supplied by the host and talks to the carousel through [`list`].
//!
//! # Parts
//!
//! - [`PositionTracker`]: scroll offset in, current page index out
//! - [`PaginationIndicator`]: dot emphasis from the live offset, taps as intents
//! - [`EndReachedDetector`]: forwards end-approached signals to `is_end_reached`
//! - [`NavigationController`]: next / previous / go-to as scroll commands
//! - [`Carousel`]: composes the above and exposes a [`CarouselHandle`]
//!
//! # Example
//!
//! ```rust
//! use glide_carousel::prelude::*;
//!
//! let carousel = Carousel::new(vec!["a", "b", "c"], |item: &&str, index| format!("{index}{item}"));
//!
//! carousel.handle_event(ListEvent::Scroll(ScrollEvent::horizontal(
//!     200.0,
//!     Size::new(100.0, 400.0),
//!     Size::new(300.0, 400.0),
//! )));
//!
//! assert_eq!(carousel.current_index(), Some(2));
//! assert_eq!(carousel.indicator().scroll_x().get(), 200.0);
//! ```

pub mod config;
pub mod end_reached;
pub mod error;
pub mod list;
pub mod navigation;
pub mod pagination;
pub mod position;
pub mod shell;

pub use config::{CarouselConfig, NavigationMode};
pub use end_reached::{EndReachedCallback, EndReachedDetector};
pub use error::{CarouselError, Result};
pub use list::{
    ContentOffset, EndApproachGate, ListEvent, ListRef, ScrollEvent, ScrollToIndex, Size,
};
pub use navigation::{step_target, CarouselHandle, Direction, NavigationController};
pub use pagination::{DotFrame, DotStyle, DotView, NavigationIntent, PaginationIndicator};
pub use position::{page_index, PositionTracker};
pub use shell::{
    Carousel, CarouselBuilder, CarouselView, ListProps, RenderItem, CONTENT_CONTAINER_ID,
};

/// Everything needed to build and drive a carousel
pub mod prelude {
    pub use crate::config::{CarouselConfig, NavigationMode};
    pub use crate::list::{ContentOffset, ListEvent, ListRef, ScrollEvent, ScrollToIndex, Size};
    pub use crate::navigation::CarouselHandle;
    pub use crate::pagination::{DotStyle, DotView};
    pub use crate::shell::{Carousel, CarouselView, CONTENT_CONTAINER_ID};
}
