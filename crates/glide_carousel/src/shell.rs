//! Carousel composition
//!
//! [`Carousel`] owns one instance's position state and wires the parts
//! together:
//!
//! ```text
//! scroll event ──► PositionTracker ──► PaginationIndicator (live offset)
//! end reached  ──► EndReachedDetector ──► is_end_reached(true)
//! dot tap / CarouselHandle ──► NavigationController ──► ListRef ──► renderer
//! ```
//!
//! Commands loop back as scroll events once the renderer performs them.

use glide_core::{shared_graph, SharedReactiveGraph};

use crate::config::CarouselConfig;
use crate::end_reached::{EndReachedCallback, EndReachedDetector};
use crate::list::{ListEvent, ListRef, ScrollEvent, Size};
use crate::navigation::{CarouselHandle, NavigationController};
use crate::pagination::{DotFrame, PaginationIndicator};
use crate::position::PositionTracker;

/// Identifier of the scrollable content container, for tests and tooling
pub const CONTENT_CONTAINER_ID: &str = "content-container";

/// Renders one item; receives the item and its index
pub type RenderItem<T, V> = Box<dyn Fn(&T, usize) -> V>;

/// Properties the carousel hands to its list renderer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ListProps {
    pub horizontal: bool,
    pub paging_enabled: bool,
    pub shows_scroll_indicator: bool,
    /// In viewport widths
    pub end_reached_threshold: f32,
    pub scroll_event_throttle_ms: u32,
    /// Fixed page width; `None` pages by viewport width
    pub item_width: Option<f32>,
    pub content_container_id: &'static str,
}

/// Everything a host needs to draw the carousel this frame
#[derive(Debug)]
pub struct CarouselView<V> {
    pub content_container_id: &'static str,
    /// Rendered items, in data order
    pub items: Vec<V>,
    pub list: ListProps,
    /// One dot per item
    pub dots: DotFrame,
}

/// Builder for [`Carousel`]
pub struct CarouselBuilder<T, V> {
    data: Vec<T>,
    render_item: RenderItem<T, V>,
    is_end_reached: Option<EndReachedCallback>,
    config: CarouselConfig,
}

impl<T, V> CarouselBuilder<T, V> {
    /// Callback for end-of-list signals; always receives `true`
    pub fn is_end_reached<F>(mut self, callback: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.is_end_reached = Some(std::sync::Arc::new(callback));
        self
    }

    pub fn config(mut self, config: CarouselConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Carousel<T, V> {
        Carousel::from_builder(self)
    }
}

/// A horizontally paging list with pagination dots
///
/// # Example
///
/// ```rust
/// use glide_carousel::prelude::*;
///
/// let carousel = Carousel::builder(vec!["one", "two", "three"], |item: &&str, _| {
///     item.to_string()
/// })
/// .is_end_reached(|reached| assert!(reached))
/// .build();
///
/// carousel.handle_event(ListEvent::Layout { viewport: Size::new(100.0, 200.0) });
/// carousel.handle().show_next_item();
///
/// assert_eq!(carousel.list_ref().take_pending_scroll().map(|c| c.index), Some(1));
/// ```
pub struct Carousel<T, V> {
    data: Vec<T>,
    render_item: RenderItem<T, V>,
    config: CarouselConfig,
    reactive: SharedReactiveGraph,
    position: PositionTracker,
    indicator: PaginationIndicator,
    end_reached: EndReachedDetector,
    navigation: NavigationController,
    list_ref: ListRef,
}

impl<T, V> std::fmt::Debug for Carousel<T, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Carousel")
            .field("items", &self.data.len())
            .field("current_index", &self.current_index())
            .field("list_ref", &self.list_ref)
            .finish()
    }
}

impl<T, V> Carousel<T, V> {
    /// Start building a carousel over `data`
    pub fn builder<F>(data: Vec<T>, render_item: F) -> CarouselBuilder<T, V>
    where
        F: Fn(&T, usize) -> V + 'static,
    {
        CarouselBuilder {
            data,
            render_item: Box::new(render_item),
            is_end_reached: None,
            config: CarouselConfig::default(),
        }
    }

    /// A carousel with default configuration and no end-reached callback
    pub fn new<F>(data: Vec<T>, render_item: F) -> Self
    where
        F: Fn(&T, usize) -> V + 'static,
    {
        Self::builder(data, render_item).build()
    }

    fn from_builder(builder: CarouselBuilder<T, V>) -> Self {
        let CarouselBuilder {
            data,
            render_item,
            is_end_reached,
            config,
        } = builder;

        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                tracing::warn!(%err, "carousel config failed validation, using defaults");
                CarouselConfig::default()
            }
        };

        let reactive = shared_graph();
        let position = PositionTracker::new(&reactive, data.len());
        if let Some(width) = config.fixed_item_width() {
            position.set_item_width(width);
        }

        let indicator = PaginationIndicator::new(&position, config.dots);
        let end_reached = EndReachedDetector::new(is_end_reached);
        let list_ref = ListRef::new();
        let navigation = NavigationController::new(
            position.clone(),
            list_ref.clone(),
            config.navigation,
            config.animated,
        );

        tracing::debug!(
            items = data.len(),
            navigation = ?config.navigation,
            "carousel created"
        );

        Self {
            data,
            render_item,
            config,
            reactive,
            position,
            indicator,
            end_reached,
            navigation,
            list_ref,
        }
    }

    // =========================================================================
    // Renderer events
    // =========================================================================

    /// Route one renderer event
    pub fn handle_event(&self, event: ListEvent) {
        match event {
            ListEvent::Layout { viewport } => self.on_layout(viewport),
            ListEvent::Scroll(scroll) => self.on_scroll(&scroll),
            ListEvent::EndReached => self.end_reached.on_end_approached(),
        }
    }

    fn on_layout(&self, viewport: Size) {
        self.list_ref.set_viewport(viewport);
        self.list_ref.mark_ready();
        if self.config.fixed_item_width().is_none() {
            self.position.set_item_width(viewport.width);
        }
    }

    fn on_scroll(&self, event: &ScrollEvent) {
        // A list that scrolls has been laid out.
        self.list_ref.mark_ready();
        self.list_ref.update_state(event);

        let measured_width = match self.config.fixed_item_width() {
            Some(_) => None,
            None => Some(event.layout_measurement.width),
        };
        self.position
            .on_scroll_with_width(event.content_offset.x, measured_width);
    }

    // =========================================================================
    // User input
    // =========================================================================

    /// A pagination dot was tapped; returns the index scrolled to
    pub fn press_dot(&self, dot: usize) -> Option<usize> {
        let intent = self.indicator.on_dot_pressed(dot);
        self.navigation.navigate(intent)
    }

    /// The imperative handle for the parent component
    pub fn handle(&self) -> CarouselHandle {
        CarouselHandle::new(self.navigation.clone())
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Render every item and the current dot state
    pub fn render(&self) -> CarouselView<V> {
        let items = self
            .data
            .iter()
            .enumerate()
            .map(|(index, item)| (self.render_item)(item, index))
            .collect();

        CarouselView {
            content_container_id: CONTENT_CONTAINER_ID,
            items,
            list: self.list_props(),
            dots: self.indicator.dots(),
        }
    }

    /// Properties for the list renderer
    pub fn list_props(&self) -> ListProps {
        ListProps {
            horizontal: true,
            paging_enabled: self.config.paging_enabled,
            shows_scroll_indicator: self.config.shows_scroll_indicator,
            end_reached_threshold: self.config.end_reached_threshold.max(0.0),
            scroll_event_throttle_ms: self.config.scroll_event_throttle_ms,
            item_width: self.config.fixed_item_width(),
            content_container_id: CONTENT_CONTAINER_ID,
        }
    }

    // =========================================================================
    // Data
    // =========================================================================

    /// Replace the data sequence; the current index is re-derived
    pub fn set_data(&mut self, data: Vec<T>) {
        tracing::debug!(from = self.data.len(), to = data.len(), "carousel data replaced");
        self.data = data;
        self.position.set_item_count(self.data.len());
        self.list_ref.retarget_pending(self.data.len());
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // =========================================================================
    // State access
    // =========================================================================

    /// Current page; `None` while there are no items
    pub fn current_index(&self) -> Option<usize> {
        self.position.current_index()
    }

    /// Current offset, exactly as last reported by the renderer
    pub fn current_offset(&self) -> f32 {
        self.position.current_offset()
    }

    pub fn position(&self) -> &PositionTracker {
        &self.position
    }

    pub fn indicator(&self) -> &PaginationIndicator {
        &self.indicator
    }

    pub fn end_reached(&self) -> &EndReachedDetector {
        &self.end_reached
    }

    pub fn navigation(&self) -> &NavigationController {
        &self.navigation
    }

    /// Command channel the renderer polls
    pub fn list_ref(&self) -> &ListRef {
        &self.list_ref
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// The reactive graph holding this instance's state
    pub fn reactive(&self) -> &SharedReactiveGraph {
        &self.reactive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NavigationMode;
    use crate::list::ScrollToIndex;
    use std::sync::{Arc, Mutex};

    const WIDTH: f32 = 100.0;

    #[derive(Debug, Clone)]
    struct Item {
        text: &'static str,
        value: &'static str,
    }

    fn carousel_items() -> Vec<Item> {
        vec![
            Item {
                text: "text-one",
                value: "value-one",
            },
            Item {
                text: "text-two",
                value: "value-two",
            },
            Item {
                text: "text-three",
                value: "value-three",
            },
        ]
    }

    fn render_item(item: &Item, index: usize) -> String {
        format!("{index}:{}/{}", item.text, item.value)
    }

    fn scroll_to(x: f32, count: usize) -> ListEvent {
        ListEvent::Scroll(ScrollEvent::horizontal(
            x,
            Size::new(WIDTH, 500.0),
            Size::new(WIDTH * count as f32, 500.0),
        ))
    }

    /// Play the renderer: perform the pending command and report the scroll
    fn settle(carousel: &Carousel<Item, String>) {
        if let Some(ScrollToIndex { index, .. }) = carousel.list_ref().take_pending_scroll() {
            carousel.handle_event(scroll_to(index as f32 * WIDTH, carousel.len()));
        }
    }

    fn laid_out(carousel: Carousel<Item, String>) -> Carousel<Item, String> {
        carousel.handle_event(ListEvent::Layout {
            viewport: Size::new(WIDTH, 500.0),
        });
        carousel
    }

    #[test]
    fn test_renders_content_container() {
        let carousel = Carousel::new(carousel_items(), render_item);
        let view = carousel.render();

        assert_eq!(view.content_container_id, "content-container");
        assert_eq!(view.list.content_container_id, CONTENT_CONTAINER_ID);
        assert_eq!(
            view.items,
            vec![
                "0:text-one/value-one",
                "1:text-two/value-two",
                "2:text-three/value-three"
            ]
        );
        assert_eq!(view.dots.len(), 3);
        assert!(view.list.horizontal && view.list.paging_enabled);
    }

    #[test]
    fn test_end_reached_calls_back_with_true() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let calls_clone = calls.clone();
        let carousel = Carousel::builder(carousel_items(), render_item)
            .is_end_reached(move |reached| calls_clone.lock().unwrap().push(reached))
            .build();

        carousel.handle_event(ListEvent::EndReached);

        assert_eq!(*calls.lock().unwrap(), vec![true]);
    }

    #[test]
    fn test_end_reached_without_callback_is_dropped() {
        let carousel = Carousel::new(carousel_items(), render_item);
        carousel.handle_event(ListEvent::EndReached);
        assert_eq!(carousel.end_reached().signal_count(), 1);
        assert!(!carousel.end_reached().has_callback());
    }

    #[test]
    fn test_scroll_event_drives_indicator_offset() {
        let carousel = Carousel::new(carousel_items(), render_item);

        carousel.handle_event(ListEvent::Scroll(ScrollEvent::horizontal(
            200.0,
            Size::new(100.0, 500.0),
            Size::new(100.0, 500.0),
        )));

        assert_eq!(carousel.indicator().scroll_x().get(), 200.0);
        assert_eq!(carousel.current_offset(), 200.0);
        assert_eq!(carousel.current_index(), Some(2));
    }

    #[test]
    fn test_show_next_item_from_start_targets_second_item() {
        let carousel = Carousel::new(carousel_items(), render_item);

        carousel.handle().show_next_item();
        carousel.handle_event(ListEvent::Layout {
            viewport: Size::new(WIDTH, 500.0),
        });

        assert_eq!(carousel.list_ref().take_pending_scroll().map(|c| c.index), Some(1));
    }

    #[test]
    fn test_empty_data_is_inert() {
        let carousel = laid_out(Carousel::new(Vec::new(), render_item));

        let view = carousel.render();
        assert!(view.items.is_empty());
        assert!(view.dots.is_empty());
        assert_eq!(carousel.current_index(), None);

        carousel.handle().show_next_item();
        carousel.handle().show_prev_item();
        assert_eq!(carousel.press_dot(0), None);
        carousel.handle_event(scroll_to(50.0, 0));
        assert_eq!(carousel.list_ref().commands_issued(), 0);
    }

    #[test]
    fn test_next_then_prev_round_trips() {
        let carousel = laid_out(Carousel::new(carousel_items(), render_item));
        let handle = carousel.handle();

        carousel.handle_event(scroll_to(WIDTH, 3));
        assert_eq!(carousel.current_index(), Some(1));

        handle.show_next_item();
        settle(&carousel);
        assert_eq!(carousel.current_index(), Some(2));

        handle.show_prev_item();
        settle(&carousel);
        assert_eq!(carousel.current_index(), Some(1));
    }

    #[test]
    fn test_next_then_prev_round_trips_without_settling() {
        let carousel = laid_out(Carousel::new(carousel_items(), render_item));
        let handle = carousel.handle();
        carousel.handle_event(scroll_to(WIDTH, 3));

        handle.show_next_item();
        handle.show_prev_item();

        assert_eq!(
            carousel.list_ref().take_pending_scroll().map(|c| c.index),
            Some(1)
        );
    }

    #[test]
    fn test_set_data_retargets_queued_command() {
        let mut carousel = Carousel::new(carousel_items(), render_item);
        assert_eq!(carousel.press_dot(2), Some(2));

        carousel.set_data(carousel_items().into_iter().take(2).collect());
        assert_eq!(carousel.list_ref().pending_scroll().map(|c| c.index), Some(1));

        carousel.set_data(Vec::new());
        let carousel = laid_out(carousel);
        assert_eq!(carousel.list_ref().take_pending_scroll(), None);
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let mut config = CarouselConfig {
            navigation: NavigationMode::Wrap,
            ..CarouselConfig::default()
        };
        config.dots.inactive_opacity = 2.0;

        let carousel = Carousel::builder(carousel_items(), render_item)
            .config(config)
            .build();

        assert_eq!(carousel.config(), &CarouselConfig::default());
        assert!(carousel.render().dots.iter().all(|dot| dot.opacity <= 1.0));
    }

    #[test]
    fn test_show_next_at_last_item_is_idempotent() {
        let carousel = laid_out(Carousel::new(carousel_items(), render_item));
        carousel.handle_event(scroll_to(2.0 * WIDTH, 3));

        carousel.handle().show_next_item();
        assert_eq!(
            carousel.list_ref().pending_scroll().map(|c| c.index),
            Some(2)
        );
        settle(&carousel);
        assert_eq!(carousel.current_index(), Some(2));
    }

    #[test]
    fn test_wrap_mode_from_config() {
        let config = CarouselConfig {
            navigation: NavigationMode::Wrap,
            ..CarouselConfig::default()
        };
        let carousel = laid_out(
            Carousel::builder(carousel_items(), render_item)
                .config(config)
                .build(),
        );

        carousel.handle().show_prev_item();
        settle(&carousel);
        assert_eq!(carousel.current_index(), Some(2));

        carousel.handle().show_next_item();
        settle(&carousel);
        assert_eq!(carousel.current_index(), Some(0));
    }

    #[test]
    fn test_dot_press_navigates() {
        let carousel = laid_out(Carousel::new(carousel_items(), render_item));

        assert_eq!(carousel.press_dot(2), Some(2));
        settle(&carousel);
        assert_eq!(carousel.current_index(), Some(2));
        assert_eq!(carousel.indicator().emphasis_for(2), 1.0);

        // Never presented, but still clamped
        assert_eq!(carousel.press_dot(9), Some(2));
    }

    #[test]
    fn test_index_follows_every_scroll_offset() {
        let carousel = laid_out(Carousel::new(carousel_items(), render_item));

        for step in -10..=40 {
            let x = step as f32 * 10.0;
            carousel.handle_event(scroll_to(x, 3));
            let expected = ((x / WIDTH).round() as i64).clamp(0, 2) as usize;
            assert_eq!(carousel.current_index(), Some(expected), "offset {x}");
            assert_eq!(carousel.indicator().scroll_x().get(), x);
        }
    }

    #[test]
    fn test_fixed_item_width_ignores_viewport() {
        let config = CarouselConfig {
            item_width: Some(50.0),
            ..CarouselConfig::default()
        };
        let carousel = laid_out(
            Carousel::builder(carousel_items(), render_item)
                .config(config)
                .build(),
        );

        carousel.handle_event(scroll_to(50.0, 3));
        assert_eq!(carousel.position().item_width(), 50.0);
        assert_eq!(carousel.current_index(), Some(1));
        assert_eq!(carousel.list_props().item_width, Some(50.0));
    }

    #[test]
    fn test_set_data_keeps_index_in_bounds() {
        let mut carousel = laid_out(Carousel::new(carousel_items(), render_item));
        carousel.handle_event(scroll_to(2.0 * WIDTH, 3));
        assert_eq!(carousel.current_index(), Some(2));

        carousel.set_data(carousel_items().into_iter().take(2).collect());
        assert_eq!(carousel.current_index(), Some(1));
        assert_eq!(carousel.render().dots.len(), 2);

        carousel.set_data(Vec::new());
        assert_eq!(carousel.current_index(), None);
        assert!(carousel.is_empty());
    }

    #[test]
    fn test_scroll_marks_list_ready() {
        let carousel = Carousel::new(carousel_items(), render_item);
        assert!(!carousel.list_ref().is_ready());

        carousel.handle_event(scroll_to(0.0, 3));
        assert!(carousel.list_ref().is_ready());
    }
}
