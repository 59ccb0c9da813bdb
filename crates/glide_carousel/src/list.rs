//! List renderer boundary
//!
//! The carousel does not window, recycle or measure cells itself. A host
//! list renderer does that and talks to the carousel through:
//!
//! - [`ListEvent`]s it delivers (layout, scroll ticks, end approached)
//! - a [`ListRef`] it polls for the single command the carousel issues,
//!   [`ScrollToIndex`]
//!
//! ```rust
//! use glide_carousel::list::{ListRef, ScrollToIndex};
//!
//! let list_ref = ListRef::new();
//! list_ref.scroll_to_index(1, true);
//!
//! // Nothing is handed out before the first layout pass.
//! assert_eq!(list_ref.take_pending_scroll(), None);
//!
//! list_ref.mark_ready();
//! assert_eq!(
//!     list_ref.take_pending_scroll(),
//!     Some(ScrollToIndex { index: 1, animated: true })
//! );
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Scroll position reported by the renderer, in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContentOffset {
    pub x: f32,
    pub y: f32,
}

impl ContentOffset {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Width and height in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// One scroll tick from the renderer
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollEvent {
    /// Distance scrolled from the start of the content
    pub content_offset: ContentOffset,
    /// Size of all content, laid out end to end
    pub content_size: Size,
    /// Size of the visible viewport
    pub layout_measurement: Size,
}

impl ScrollEvent {
    /// A horizontal scroll tick at offset `x`
    pub fn horizontal(x: f32, viewport: Size, content: Size) -> Self {
        Self {
            content_offset: ContentOffset::new(x, 0.0),
            content_size: content,
            layout_measurement: viewport,
        }
    }

    /// Largest offset the renderer can scroll to
    pub fn max_offset_x(&self) -> f32 {
        (self.content_size.width - self.layout_measurement.width).max(0.0)
    }

    /// Pixels of content left past the trailing edge of the viewport
    ///
    /// Negative while overscrolling past the end.
    pub fn distance_from_end(&self) -> f32 {
        self.content_size.width - self.layout_measurement.width - self.content_offset.x
    }
}

/// Events a list renderer delivers to the carousel
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ListEvent {
    /// A layout pass finished; the list can now accept scroll commands
    Layout { viewport: Size },
    /// The scroll position changed
    Scroll(ScrollEvent),
    /// The trailing edge was approached (already debounced by the renderer)
    EndReached,
}

/// Command to bring the item at `index` to the start of the viewport
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollToIndex {
    pub index: usize,
    pub animated: bool,
}

#[derive(Debug, Default)]
struct ListRefInner {
    /// Set once the renderer finished its first layout
    ready: bool,
    offset: ContentOffset,
    content_size: Option<Size>,
    viewport_size: Option<Size>,
    /// Latest command not yet consumed by the renderer
    pending_scroll: Option<ScrollToIndex>,
    commands_issued: u64,
}

/// Shared command channel between the carousel and its list renderer
///
/// The carousel writes [`ScrollToIndex`] commands; the renderer takes them
/// each frame with [`ListRef::take_pending_scroll`]. Only the latest command
/// is kept, so a second command issued before the renderer picks up the
/// first one redirects the scroll.
#[derive(Clone, Default)]
pub struct ListRef {
    inner: Arc<Mutex<ListRefInner>>,
}

impl std::fmt::Debug for ListRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("ListRef")
            .field("ready", &inner.ready)
            .field("pending_scroll", &inner.pending_scroll)
            .finish()
    }
}

impl ListRef {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ListRefInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Renderer side
    // =========================================================================

    /// Mark the list as laid out; queued commands become available
    pub fn mark_ready(&self) {
        let mut inner = self.lock();
        if !inner.ready {
            tracing::debug!(
                queued = ?inner.pending_scroll,
                "list ready for scroll commands"
            );
        }
        inner.ready = true;
    }

    /// Record the viewport size from a layout pass
    pub fn set_viewport(&self, viewport: Size) {
        self.lock().viewport_size = Some(viewport);
    }

    /// Mirror the renderer's latest scroll state
    pub fn update_state(&self, event: &ScrollEvent) {
        let mut inner = self.lock();
        inner.offset = event.content_offset;
        inner.content_size = Some(event.content_size);
        inner.viewport_size = Some(event.layout_measurement);
    }

    /// Take the pending scroll command
    ///
    /// Returns `None` until [`ListRef::mark_ready`] was called; commands
    /// issued earlier stay queued until then.
    pub fn take_pending_scroll(&self) -> Option<ScrollToIndex> {
        let mut inner = self.lock();
        if !inner.ready {
            return None;
        }
        inner.pending_scroll.take()
    }

    // =========================================================================
    // Carousel side
    // =========================================================================

    /// Request a scroll to `index`, replacing any command not yet taken
    pub fn scroll_to_index(&self, index: usize, animated: bool) {
        let mut inner = self.lock();
        if !inner.ready {
            tracing::debug!(index, "list not laid out yet, queueing scroll command");
        }
        inner.pending_scroll = Some(ScrollToIndex { index, animated });
        inner.commands_issued += 1;
    }

    /// Fit a command not yet taken into a sequence of `item_count` items
    ///
    /// The index is clamped to the new last item; with no items the command
    /// is dropped.
    pub fn retarget_pending(&self, item_count: usize) {
        let mut inner = self.lock();
        let Some(command) = inner.pending_scroll else {
            return;
        };
        match item_count.checked_sub(1) {
            Some(last) if command.index > last => {
                tracing::debug!(from = command.index, to = last, "retargeting pending scroll");
                inner.pending_scroll = Some(ScrollToIndex {
                    index: last,
                    ..command
                });
            }
            Some(_) => {}
            None => {
                tracing::debug!(index = command.index, "no items left, dropping pending scroll");
                inner.pending_scroll = None;
            }
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Whether the renderer finished its first layout
    pub fn is_ready(&self) -> bool {
        self.lock().ready
    }

    /// The pending command, without consuming it
    pub fn pending_scroll(&self) -> Option<ScrollToIndex> {
        self.lock().pending_scroll
    }

    /// Total number of commands issued through this ref
    pub fn commands_issued(&self) -> u64 {
        self.lock().commands_issued
    }

    /// Last reported scroll offset
    pub fn offset(&self) -> ContentOffset {
        self.lock().offset
    }

    /// Last reported horizontal scroll offset
    pub fn scroll_x(&self) -> f32 {
        self.offset().x
    }

    pub fn content_size(&self) -> Option<Size> {
        self.lock().content_size
    }

    pub fn viewport_size(&self) -> Option<Size> {
        self.lock().viewport_size
    }

    /// Largest horizontal offset, once both sizes are known
    pub fn max_scroll_x(&self) -> Option<f32> {
        let inner = self.lock();
        let content = inner.content_size?;
        let viewport = inner.viewport_size?;
        Some((content.width - viewport.width).max(0.0))
    }

    /// Check if scrolled to the trailing edge
    pub fn is_at_end(&self) -> bool {
        match self.max_scroll_x() {
            Some(max_x) => self.scroll_x() >= max_x - 1.0,
            None => false,
        }
    }
}

/// Fires once per approach to the trailing edge
///
/// For hosts whose renderer has no end-reached signal of its own: feed it
/// every scroll tick and forward [`ListEvent::EndReached`] when it returns
/// `true`. It re-arms once the viewport moves back out of the threshold.
#[derive(Clone, Copy, Debug)]
pub struct EndApproachGate {
    /// Trigger distance, in viewport widths
    threshold: f32,
    armed: bool,
}

impl EndApproachGate {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.max(0.0),
            armed: true,
        }
    }

    /// Returns `true` when this tick crosses into the end zone
    pub fn observe(&mut self, event: &ScrollEvent) -> bool {
        let viewport = event.layout_measurement.width;
        if viewport <= 0.0 || event.content_size.width <= 0.0 {
            return false;
        }

        let near_end = event.distance_from_end() <= self.threshold * viewport;
        if near_end && self.armed {
            self.armed = false;
            return true;
        }
        if !near_end {
            self.armed = true;
        }
        false
    }

    /// Re-arm, e.g. after the data sequence grew
    pub fn reset(&mut self) {
        self.armed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(x: f32) -> ScrollEvent {
        ScrollEvent::horizontal(x, Size::new(100.0, 500.0), Size::new(300.0, 500.0))
    }

    #[test]
    fn test_list_ref_new() {
        let list_ref = ListRef::new();
        assert!(!list_ref.is_ready());
        assert_eq!(list_ref.pending_scroll(), None);
        assert_eq!(list_ref.commands_issued(), 0);
    }

    #[test]
    fn test_retarget_pending_after_shrink() {
        let list_ref = ListRef::new();
        list_ref.scroll_to_index(4, true);

        list_ref.retarget_pending(5);
        assert_eq!(list_ref.pending_scroll().map(|c| c.index), Some(4));

        list_ref.retarget_pending(2);
        assert_eq!(
            list_ref.pending_scroll(),
            Some(ScrollToIndex {
                index: 1,
                animated: true
            })
        );

        list_ref.retarget_pending(0);
        list_ref.mark_ready();
        assert_eq!(list_ref.take_pending_scroll(), None);
    }

    #[test]
    fn test_scroll_command_queued_until_ready() {
        let list_ref = ListRef::new();
        list_ref.scroll_to_index(2, false);

        assert_eq!(list_ref.take_pending_scroll(), None);
        assert_eq!(
            list_ref.pending_scroll(),
            Some(ScrollToIndex {
                index: 2,
                animated: false
            })
        );

        list_ref.mark_ready();
        assert_eq!(
            list_ref.take_pending_scroll(),
            Some(ScrollToIndex {
                index: 2,
                animated: false
            })
        );
        assert_eq!(list_ref.take_pending_scroll(), None);
    }

    #[test]
    fn test_last_command_wins() {
        let list_ref = ListRef::new();
        list_ref.mark_ready();
        list_ref.scroll_to_index(1, true);
        list_ref.scroll_to_index(0, true);

        let pending = list_ref.take_pending_scroll();
        assert!(matches!(pending, Some(ScrollToIndex { index: 0, .. })));
        assert_eq!(list_ref.commands_issued(), 2);
    }

    #[test]
    fn test_scroll_state_query() {
        let list_ref = ListRef::new();
        list_ref.update_state(&tick(150.0));

        assert_eq!(list_ref.scroll_x(), 150.0);
        assert_eq!(list_ref.content_size(), Some(Size::new(300.0, 500.0)));
        assert_eq!(list_ref.viewport_size(), Some(Size::new(100.0, 500.0)));
        assert_eq!(list_ref.max_scroll_x(), Some(200.0));
        assert!(!list_ref.is_at_end());

        list_ref.update_state(&tick(200.0));
        assert!(list_ref.is_at_end());
    }

    #[test]
    fn test_distance_from_end() {
        assert_eq!(tick(0.0).distance_from_end(), 200.0);
        assert_eq!(tick(200.0).distance_from_end(), 0.0);
        assert_eq!(tick(0.0).max_offset_x(), 200.0);
    }

    #[test]
    fn test_end_gate_fires_once_per_approach() {
        let mut gate = EndApproachGate::new(0.5);

        assert!(!gate.observe(&tick(0.0)));
        assert!(!gate.observe(&tick(100.0)));
        // 50px left, threshold is half a 100px viewport
        assert!(gate.observe(&tick(150.0)));
        assert!(!gate.observe(&tick(180.0)));
        assert!(!gate.observe(&tick(200.0)));

        // Leave the end zone and come back
        assert!(!gate.observe(&tick(50.0)));
        assert!(gate.observe(&tick(200.0)));
    }

    #[test]
    fn test_end_gate_ignores_unmeasured_list() {
        let mut gate = EndApproachGate::new(0.5);
        let event = ScrollEvent::horizontal(0.0, Size::default(), Size::default());
        assert!(!gate.observe(&event));
    }
}
