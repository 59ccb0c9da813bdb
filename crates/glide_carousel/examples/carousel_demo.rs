//! Carousel Demo - headless list renderer
//!
//! Drives a carousel the way a native list would:
//! - swipes produce a stream of scroll ticks; the dots follow each tick
//! - an EndApproachGate turns scroll ticks into end-reached signals
//! - the parent pages through with the CarouselHandle
//!
//! Run with: RUST_LOG=debug cargo run -p glide_carousel --example carousel_demo

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use glide_carousel::prelude::*;
use glide_carousel::EndApproachGate;

const VIEWPORT: Size = Size {
    width: 360.0,
    height: 640.0,
};

const DEMO_CONFIG: &str = r#"
end_reached_threshold = 0.5
scroll_event_throttle_ms = 16

[dots]
active_width = 18.0
inactive_opacity = 0.4
"#;

struct Slide {
    title: &'static str,
    body: &'static str,
}

/// Stand-in for a native list: performs scroll commands as short swipes
struct HeadlessList {
    offset: f32,
    item_count: usize,
    gate: EndApproachGate,
}

impl HeadlessList {
    fn new(item_count: usize, threshold: f32) -> Self {
        Self {
            offset: 0.0,
            item_count,
            gate: EndApproachGate::new(threshold),
        }
    }

    fn content(&self) -> Size {
        Size::new(VIEWPORT.width * self.item_count as f32, VIEWPORT.height)
    }

    fn tick<V>(&mut self, carousel: &Carousel<Slide, V>, x: f32) {
        let max_x = (self.content().width - VIEWPORT.width).max(0.0);
        self.offset = x.clamp(0.0, max_x);

        let event = ScrollEvent::horizontal(self.offset, VIEWPORT, self.content());
        carousel.handle_event(ListEvent::Scroll(event));
        if self.gate.observe(&event) {
            carousel.handle_event(ListEvent::EndReached);
        }
    }

    fn swipe<V>(&mut self, carousel: &Carousel<Slide, V>, to: f32, frames: u32) {
        let from = self.offset;
        for frame in 1..=frames {
            let t = frame as f32 / frames as f32;
            self.tick(carousel, from + (to - from) * t);
        }
    }

    /// One renderer frame: pick up the pending command, if any
    fn frame<V>(&mut self, carousel: &Carousel<Slide, V>) {
        if let Some(command) = carousel.list_ref().take_pending_scroll() {
            let frames = if command.animated { 6 } else { 1 };
            self.swipe(carousel, command.index as f32 * VIEWPORT.width, frames);
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let slides = vec![
        Slide {
            title: "Welcome",
            body: "One slide per viewport width",
        },
        Slide {
            title: "Dots",
            body: "Dot emphasis follows the scroll offset",
        },
        Slide {
            title: "Paging",
            body: "The parent pages with show_next_item / show_prev_item",
        },
        Slide {
            title: "The End",
            body: "Reaching this slide fires is_end_reached(true)",
        },
    ];

    let config = CarouselConfig::from_toml_str(DEMO_CONFIG)?;
    let end_signals = Arc::new(AtomicUsize::new(0));
    let end_signals_clone = end_signals.clone();

    let carousel = Carousel::builder(slides, |slide: &Slide, index| {
        format!("[{}] {}: {}", index + 1, slide.title, slide.body)
    })
    .config(config.clone())
    .is_end_reached(move |reached| {
        if reached {
            end_signals_clone.fetch_add(1, Ordering::Relaxed);
            tracing::info!("end reached, a real app would load more slides here");
        }
    })
    .build();

    let dots = carousel.indicator().subscribe(|frame| {
        let widths: Vec<String> = frame.iter().map(|d| format!("{:.1}", d.width)).collect();
        tracing::debug!(widths = %widths.join(" "), "dots");
    });

    let mut list = HeadlessList::new(carousel.len(), config.end_reached_threshold);
    let handle = carousel.handle();

    // Called before the first layout: queued, not lost.
    handle.show_next_item();

    carousel.handle_event(ListEvent::Layout { viewport: VIEWPORT });
    for item in carousel.render().items {
        tracing::info!("{item}");
    }

    list.frame(&carousel);
    tracing::info!(index = ?carousel.current_index(), "after queued show_next_item");

    // A user swipe that stops between slides 2 and 3
    list.swipe(&carousel, VIEWPORT.width * 1.6, 8);
    tracing::info!(
        index = ?carousel.current_index(),
        offset = carousel.current_offset(),
        "after swipe"
    );

    for _ in 0..4 {
        handle.show_next_item();
        list.frame(&carousel);
        tracing::info!(index = ?carousel.current_index(), "show_next_item");
    }

    carousel.press_dot(0);
    list.frame(&carousel);
    tracing::info!(index = ?carousel.current_index(), "tapped first dot");

    handle.show_prev_item();
    list.frame(&carousel);
    tracing::info!(index = ?carousel.current_index(), "show_prev_item at the first slide");

    carousel.indicator().unsubscribe(dots);
    tracing::info!(
        end_signals = end_signals.load(Ordering::Relaxed),
        commands = carousel.list_ref().commands_issued(),
        "done"
    );

    Ok(())
}
