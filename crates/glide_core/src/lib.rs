//! Glide Core Runtime
//!
//! Reactive primitives shared by the Glide widgets:
//!
//! - **Signals**: mutable cells that notify their subscribers on write
//! - **Derived values**: lazily recomputed from the signals they read
//! - **Effects**: callbacks re-run whenever a signal they read changes
//! - **State / Memo**: thread-safe handles over a shared graph
//!
//! # Example
//!
//! ```rust
//! use glide_core::reactive::ReactiveGraph;
//!
//! let mut graph = ReactiveGraph::new();
//!
//! let offset = graph.create_signal(0.0f32);
//! let page = graph.create_derived(move |g| (g.get(offset).unwrap_or(0.0) / 100.0).round());
//!
//! graph.set(offset, 240.0);
//! assert_eq!(graph.get_derived(page), Some(2.0));
//! ```

pub mod reactive;

pub use reactive::{
    batch, create_effect, dispose_effect, shared_graph, Derived, DerivedId, Effect, EffectId,
    Memo, ReactiveGraph, ReactiveStats, SharedReactiveGraph, Signal, SignalId, State,
};
