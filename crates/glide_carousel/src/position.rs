//! Position tracking
//!
//! The scroll offset is the only writable position state. The current page
//! index is derived from it (together with item width and count) and is
//! recomputed whenever one of those inputs changes, so the two can never
//! disagree.

use glide_core::{batch, Memo, SharedReactiveGraph, State};

/// Page under the viewport at `offset`
///
/// `round(offset / item_width)` clamped into `0..item_count`. `None` for an
/// empty sequence. Before the item width is known every offset maps to the
/// first page.
pub fn page_index(offset: f32, item_width: f32, item_count: usize) -> Option<usize> {
    let last = item_count.checked_sub(1)?;
    if !item_width.is_finite() || item_width <= 0.0 || !offset.is_finite() {
        return Some(0);
    }

    let page = (offset / item_width).round();
    if page <= 0.0 {
        Some(0)
    } else if page >= last as f32 {
        Some(last)
    } else {
        Some(page as usize)
    }
}

fn usable_width(width: f32) -> Option<f32> {
    (width.is_finite() && width > 0.0).then_some(width)
}

/// Tracks the horizontal scroll offset and the page it corresponds to
#[derive(Clone, Debug)]
pub struct PositionTracker {
    reactive: SharedReactiveGraph,
    scroll_x: State<f32>,
    item_width: State<f32>,
    item_count: State<usize>,
    current_index: Memo<Option<usize>>,
}

impl PositionTracker {
    pub fn new(reactive: &SharedReactiveGraph, item_count: usize) -> Self {
        let scroll_x = State::new(reactive, 0.0f32);
        let item_width = State::new(reactive, 0.0f32);
        let item_count = State::new(reactive, item_count);

        let (x, w, n) = (scroll_x.signal(), item_width.signal(), item_count.signal());
        let current_index = Memo::new(reactive, move |g| {
            page_index(
                g.get(x).unwrap_or(0.0),
                g.get(w).unwrap_or(0.0),
                g.get(n).unwrap_or(0),
            )
        });

        Self {
            reactive: reactive.clone(),
            scroll_x,
            item_width,
            item_count,
            current_index,
        }
    }

    /// Store a new scroll offset
    ///
    /// Non-finite offsets are dropped; everything else is stored as is and
    /// only clamped when deriving the index.
    pub fn on_scroll(&self, offset: f32) {
        self.on_scroll_with_width(offset, None);
    }

    /// Store a new scroll offset and, if given, the page width measured with it
    ///
    /// Both writes reach subscribers as a single update.
    pub fn on_scroll_with_width(&self, offset: f32, item_width: Option<f32>) {
        if !offset.is_finite() {
            tracing::warn!(offset, "ignoring non-finite scroll offset");
            return;
        }

        let (x, w) = (self.scroll_x.signal(), self.item_width.signal());
        let width = item_width.and_then(usable_width);
        batch(&self.reactive, |g| {
            if let Some(width) = width {
                if g.get_untracked(w) != Some(width) {
                    g.set(w, width);
                }
            }
            g.set(x, offset);
        });
    }

    /// Set the page width, ignoring zero, negative and non-finite values
    pub fn set_item_width(&self, width: f32) {
        match usable_width(width) {
            Some(width) if self.item_width.get() != width => self.item_width.set(width),
            Some(_) => {}
            None => tracing::debug!(width, "ignoring unusable item width"),
        }
    }

    pub fn set_item_count(&self, count: usize) {
        self.item_count.set(count);
    }

    /// Latest offset, exactly as reported by the renderer
    pub fn current_offset(&self) -> f32 {
        self.scroll_x.get()
    }

    /// The offset as a live value, for consumers that animate with it
    pub fn live_offset(&self) -> &State<f32> {
        &self.scroll_x
    }

    /// Page derived from the latest offset; `None` while there are no items
    pub fn current_index(&self) -> Option<usize> {
        self.current_index.try_get().flatten()
    }

    /// Page width in pixels; zero until measured
    pub fn item_width(&self) -> f32 {
        self.item_width.get()
    }

    pub fn item_count(&self) -> usize {
        self.item_count.get()
    }

    pub(crate) fn item_width_state(&self) -> &State<f32> {
        &self.item_width
    }

    pub(crate) fn item_count_state(&self) -> &State<usize> {
        &self.item_count
    }
}
