//! Imperative navigation
//!
//! [`NavigationController`] turns "next", "previous" and "go to" requests
//! into [`ScrollToIndex`](crate::list::ScrollToIndex) commands on the
//! [`ListRef`]. It never writes the offset: the renderer performs the
//! scroll and reports the new offset back as ordinary scroll events, from
//! which the current index is derived again.
//!
//! Commands are fire-and-forget. They return as soon as the command is
//! queued, long before an animated scroll finishes, and a later command
//! replaces an earlier one the renderer has not picked up yet.

use crate::config::NavigationMode;
use crate::list::ListRef;
use crate::pagination::NavigationIntent;
use crate::position::PositionTracker;

/// Direction of a single navigation step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// Index one step away from `current` in a sequence of `count` items
///
/// `None` for an empty sequence. In [`NavigationMode::Clamp`] the first and
/// last index map onto themselves at the matching boundary.
pub fn step_target(
    current: usize,
    count: usize,
    direction: Direction,
    mode: NavigationMode,
) -> Option<usize> {
    let last = count.checked_sub(1)?;
    let current = current.min(last);

    let target = match (direction, mode) {
        (Direction::Next, NavigationMode::Clamp) => (current + 1).min(last),
        (Direction::Next, NavigationMode::Wrap) if current == last => 0,
        (Direction::Next, NavigationMode::Wrap) => current + 1,
        (Direction::Prev, NavigationMode::Clamp) => current.saturating_sub(1),
        (Direction::Prev, NavigationMode::Wrap) if current == 0 => last,
        (Direction::Prev, NavigationMode::Wrap) => current - 1,
    };
    Some(target)
}

/// Issues scroll commands for navigation requests
#[derive(Clone, Debug)]
pub struct NavigationController {
    position: PositionTracker,
    list: ListRef,
    mode: NavigationMode,
    animated: bool,
}

impl NavigationController {
    pub fn new(
        position: PositionTracker,
        list: ListRef,
        mode: NavigationMode,
        animated: bool,
    ) -> Self {
        Self {
            position,
            list,
            mode,
            animated,
        }
    }

    /// Scroll one item forward; returns the target index, if any was issued
    pub fn show_next(&self) -> Option<usize> {
        self.step(Direction::Next)
    }

    /// Scroll one item back; returns the target index, if any was issued
    pub fn show_prev(&self) -> Option<usize> {
        self.step(Direction::Prev)
    }

    /// Scroll to `index`, clamped into the valid range
    pub fn go_to(&self, index: usize) -> Option<usize> {
        let Some(last) = self.position.item_count().checked_sub(1) else {
            tracing::trace!(index, "no items, ignoring navigation");
            return None;
        };

        let target = index.min(last);
        if target != index {
            tracing::debug!(index, target, "navigation target out of range, clamping");
        }
        self.issue(target)
    }

    /// Handle a request produced by the pagination indicator
    pub fn navigate(&self, intent: NavigationIntent) -> Option<usize> {
        self.go_to(intent.index)
    }

    pub fn mode(&self) -> NavigationMode {
        self.mode
    }

    /// Step from the command still waiting for the renderer, if any,
    /// otherwise from the index derived from the last reported offset
    fn step(&self, direction: Direction) -> Option<usize> {
        let Some(derived) = self.position.current_index() else {
            tracing::trace!(?direction, "no items, ignoring navigation");
            return None;
        };
        let current = self
            .list
            .pending_scroll()
            .map_or(derived, |pending| pending.index);
        let target = step_target(current, self.position.item_count(), direction, self.mode)?;
        self.issue(target)
    }

    fn issue(&self, target: usize) -> Option<usize> {
        tracing::debug!(target, animated = self.animated, "scroll to index");
        self.list.scroll_to_index(target, self.animated);
        Some(target)
    }
}

/// Handle a parent holds to drive the carousel
///
/// Exposes exactly the two imperative operations. Both are safe to call at
/// any time: before the list's first layout the command is queued, with no
/// items they do nothing.
#[derive(Clone, Debug)]
pub struct CarouselHandle {
    controller: NavigationController,
}

impl CarouselHandle {
    pub(crate) fn new(controller: NavigationController) -> Self {
        Self { controller }
    }

    /// Advance one item
    pub fn show_next_item(&self) {
        self.controller.show_next();
    }

    /// Go back one item
    pub fn show_prev_item(&self) {
        self.controller.show_prev();
    }
}
