//! Fine-grained reactive signal system
//!
//! A push-pull hybrid:
//! - Signals push invalidation notifications to their subscribers
//! - Derived values pull (lazily recompute) their value when read
//! - Effects are queued on invalidation and flushed after each write,
//!   or once at the end of a batch
//!
//! Dependencies are tracked automatically: whatever signals a derived value
//! or an effect reads during its last run are the ones it is subscribed to.
//!
//! # State
//!
//! [`State<T>`] wraps a signal together with a [`SharedReactiveGraph`] so
//! widgets can hand out a cheap, cloneable live value:
//!
//! ```rust
//! use glide_core::reactive::{shared_graph, State};
//!
//! let graph = shared_graph();
//! let scroll_x = State::new(&graph, 0.0f32);
//!
//! scroll_x.set(200.0);
//! assert_eq!(scroll_x.get(), 200.0);
//! ```

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::any::Any;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

new_key_type! {
    /// Unique identifier for a signal
    pub struct SignalId;
    /// Unique identifier for a derived/computed value
    pub struct DerivedId;
    /// Unique identifier for an effect
    pub struct EffectId;
}

/// Subscriber types that can react to signal changes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SubscriberId {
    Derived(DerivedId),
    Effect(EffectId),
}

/// A reactive signal handle (cheap to copy)
#[derive(Debug)]
pub struct Signal<T> {
    id: SignalId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Signal<T> {}

impl<T> Signal<T> {
    /// Get the signal's internal ID
    pub fn id(&self) -> SignalId {
        self.id
    }
}

/// A derived/computed value handle
#[derive(Debug)]
pub struct Derived<T> {
    id: DerivedId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Derived<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Derived<T> {}

/// An effect handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effect {
    id: EffectId,
}

type ComputeFn = Box<dyn Fn(&ReactiveGraph) -> Box<dyn Any + Send> + Send>;
type EffectFn = Box<dyn FnMut(&ReactiveGraph) + Send>;

struct SignalNode {
    value: Box<dyn Any + Send>,
    /// Bumped on every write
    version: u64,
    subscribers: SmallVec<[SubscriberId; 4]>,
}

struct DerivedNode {
    value: Option<Box<dyn Any + Send>>,
    /// `None` only while the compute function is running
    compute: Option<ComputeFn>,
    dependencies: SmallVec<[SignalId; 4]>,
    dirty: bool,
}

struct EffectNode {
    /// `None` only while the effect is running
    run: Option<EffectFn>,
    dependencies: SmallVec<[SignalId; 4]>,
    dirty: bool,
}

/// The reactive graph that owns all signals, derived values, and effects
pub struct ReactiveGraph {
    signals: SlotMap<SignalId, SignalNode>,
    derived: SlotMap<DerivedId, DerivedNode>,
    effects: SlotMap<EffectId, EffectNode>,
    /// Effects waiting to run, in invalidation order
    pending_effects: VecDeque<EffectId>,
    /// > 0 while inside a batch
    batch_depth: u32,
    /// Signals read by the derived value or effect currently running
    tracking: RefCell<Option<Vec<SignalId>>>,
    global_version: u64,
}

impl ReactiveGraph {
    /// Create a new reactive graph
    pub fn new() -> Self {
        Self {
            signals: SlotMap::with_key(),
            derived: SlotMap::with_key(),
            effects: SlotMap::with_key(),
            pending_effects: VecDeque::new(),
            batch_depth: 0,
            tracking: RefCell::new(None),
            global_version: 0,
        }
    }

    // =========================================================================
    // SIGNALS
    // =========================================================================

    /// Create a new signal with an initial value
    pub fn create_signal<T: Send + 'static>(&mut self, initial: T) -> Signal<T> {
        let id = self.signals.insert(SignalNode {
            value: Box::new(initial),
            version: 0,
            subscribers: SmallVec::new(),
        });
        Signal {
            id,
            _marker: PhantomData,
        }
    }

    /// Get the current value of a signal
    ///
    /// When called from inside a derived value or an effect, the signal is
    /// recorded as one of its dependencies.
    pub fn get<T: Clone + 'static>(&self, signal: Signal<T>) -> Option<T> {
        if let Some(deps) = self.tracking.borrow_mut().as_mut() {
            if !deps.contains(&signal.id) {
                deps.push(signal.id);
            }
        }

        self.get_untracked(signal)
    }

    /// Get the current value without recording a dependency
    pub fn get_untracked<T: Clone + 'static>(&self, signal: Signal<T>) -> Option<T> {
        self.signals
            .get(signal.id)
            .and_then(|node| node.value.downcast_ref::<T>().cloned())
    }

    /// Set the value of a signal, invalidating everything that read it
    pub fn set<T: Send + 'static>(&mut self, signal: Signal<T>, value: T) {
        let Some(node) = self.signals.get_mut(signal.id) else {
            return;
        };
        node.value = Box::new(value);
        node.version += 1;
        self.global_version += 1;

        let subscribers = node.subscribers.clone();
        for sub in subscribers {
            self.mark_dirty(sub);
        }

        if self.batch_depth == 0 {
            self.flush_effects();
        }
    }

    /// Update a signal using a function of its current value
    pub fn update<T: Clone + Send + 'static, F: FnOnce(T) -> T>(
        &mut self,
        signal: Signal<T>,
        f: F,
    ) {
        if let Some(current) = self.get_untracked(signal) {
            self.set(signal, f(current));
        }
    }

    /// Get the version of a signal (for change detection)
    pub fn signal_version(&self, id: SignalId) -> Option<u64> {
        self.signals.get(id).map(|n| n.version)
    }

    // =========================================================================
    // DERIVED VALUES
    // =========================================================================

    /// Create a derived (computed) value
    ///
    /// The value is computed on first read and cached until one of the
    /// signals it read changes.
    pub fn create_derived<T, F>(&mut self, compute: F) -> Derived<T>
    where
        T: Clone + Send + 'static,
        F: Fn(&ReactiveGraph) -> T + Send + 'static,
    {
        let compute: ComputeFn = Box::new(move |graph: &ReactiveGraph| -> Box<dyn Any + Send> {
            Box::new(compute(graph))
        });

        let id = self.derived.insert(DerivedNode {
            value: None,
            compute: Some(compute),
            dependencies: SmallVec::new(),
            dirty: true,
        });

        Derived {
            id,
            _marker: PhantomData,
        }
    }

    /// Get the value of a derived, recomputing it if a dependency changed
    pub fn get_derived<T: Clone + 'static>(&mut self, derived: Derived<T>) -> Option<T> {
        let node = self.derived.get_mut(derived.id)?;

        if !node.dirty {
            if let Some(cached) = node.value.as_ref() {
                return cached.downcast_ref::<T>().cloned();
            }
        }

        let compute = node.compute.take()?;
        let outer = self.tracking.replace(Some(Vec::new()));
        let value = compute(&*self);
        let deps = self.tracking.replace(outer).unwrap_or_default();

        let node = self.derived.get_mut(derived.id)?;
        node.compute = Some(compute);
        node.dirty = false;
        let result = value.downcast_ref::<T>().cloned();
        node.value = Some(value);
        let old = std::mem::replace(&mut node.dependencies, deps.iter().copied().collect());

        self.resubscribe(SubscriberId::Derived(derived.id), &old, &deps);
        result
    }

    // =========================================================================
    // EFFECTS
    // =========================================================================

    /// Create an effect that runs now and again whenever its dependencies change
    pub fn create_effect<F>(&mut self, run: F) -> Effect
    where
        F: FnMut(&ReactiveGraph) + Send + 'static,
    {
        let id = self.effects.insert(EffectNode {
            run: Some(Box::new(run)),
            dependencies: SmallVec::new(),
            dirty: true,
        });

        self.pending_effects.push_back(id);

        if self.batch_depth == 0 {
            self.flush_effects();
        }

        Effect { id }
    }

    /// Dispose of an effect, removing it from the graph
    pub fn dispose_effect(&mut self, effect: Effect) {
        if let Some(node) = self.effects.remove(effect.id) {
            self.resubscribe(SubscriberId::Effect(effect.id), &node.dependencies, &[]);
        }
    }

    // =========================================================================
    // BATCHING
    // =========================================================================

    /// Start a batch - effects won't run until the batch ends
    pub fn batch_start(&mut self) {
        self.batch_depth += 1;
    }

    /// End a batch and flush pending effects
    pub fn batch_end(&mut self) {
        if self.batch_depth > 0 {
            self.batch_depth -= 1;
            if self.batch_depth == 0 {
                self.flush_effects();
            }
        }
    }

    /// Run a function in a batch context
    pub fn batch<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.batch_start();
        let result = f(self);
        self.batch_end();
        result
    }

    // =========================================================================
    // INTERNAL
    // =========================================================================

    fn mark_dirty(&mut self, sub: SubscriberId) {
        match sub {
            SubscriberId::Derived(id) => {
                if let Some(node) = self.derived.get_mut(id) {
                    node.dirty = true;
                }
            }
            SubscriberId::Effect(id) => {
                if let Some(node) = self.effects.get_mut(id) {
                    if !node.dirty {
                        node.dirty = true;
                        self.pending_effects.push_back(id);
                    }
                }
            }
        }
    }

    /// Move `sub` from the subscriber lists of `old` onto those of `new`
    fn resubscribe(&mut self, sub: SubscriberId, old: &[SignalId], new: &[SignalId]) {
        for dep_id in old {
            if let Some(sig) = self.signals.get_mut(*dep_id) {
                sig.subscribers.retain(|s| *s != sub);
            }
        }
        for dep_id in new {
            if let Some(sig) = self.signals.get_mut(*dep_id) {
                if !sig.subscribers.contains(&sub) {
                    sig.subscribers.push(sub);
                }
            }
        }
    }

    fn flush_effects(&mut self) {
        if self.pending_effects.is_empty() {
            return;
        }
        tracing::trace!(pending = self.pending_effects.len(), "flushing effects");

        while let Some(effect_id) = self.pending_effects.pop_front() {
            self.run_effect(effect_id);
        }
    }

    fn run_effect(&mut self, effect_id: EffectId) {
        let Some(node) = self.effects.get_mut(effect_id) else {
            return;
        };
        if !node.dirty {
            return;
        }
        node.dirty = false;
        let Some(mut run) = node.run.take() else {
            return;
        };

        let outer = self.tracking.replace(Some(Vec::new()));
        run(&*self);
        let deps = self.tracking.replace(outer).unwrap_or_default();

        let Some(node) = self.effects.get_mut(effect_id) else {
            return;
        };
        node.run = Some(run);
        let old = std::mem::replace(&mut node.dependencies, deps.iter().copied().collect());
        self.resubscribe(SubscriberId::Effect(effect_id), &old, &deps);
    }

    /// Get statistics about the reactive graph
    pub fn stats(&self) -> ReactiveStats {
        ReactiveStats {
            signal_count: self.signals.len(),
            derived_count: self.derived.len(),
            effect_count: self.effects.len(),
            pending_effects: self.pending_effects.len(),
            global_version: self.global_version,
        }
    }
}

impl Default for ReactiveGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ReactiveGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactiveGraph")
            .field("stats", &self.stats())
            .finish()
    }
}

/// Statistics about the reactive graph
#[derive(Debug, Clone)]
pub struct ReactiveStats {
    pub signal_count: usize,
    pub derived_count: usize,
    pub effect_count: usize,
    pub pending_effects: usize,
    pub global_version: u64,
}

// =============================================================================
// STATE - shared handles for widget state
// =============================================================================

/// Shared reactive graph for thread-safe access
pub type SharedReactiveGraph = Arc<Mutex<ReactiveGraph>>;

/// Create an empty shared graph
pub fn shared_graph() -> SharedReactiveGraph {
    Arc::new(Mutex::new(ReactiveGraph::new()))
}

fn lock(reactive: &SharedReactiveGraph) -> MutexGuard<'_, ReactiveGraph> {
    // A panicking subscriber must not take the whole widget down with it.
    reactive.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Apply several writes to a shared graph with a single effect flush
pub fn batch<R>(reactive: &SharedReactiveGraph, f: impl FnOnce(&mut ReactiveGraph) -> R) -> R {
    lock(reactive).batch(f)
}

/// Register an effect on a shared graph
///
/// Runs `run` now and again whenever a signal it read changes. Same
/// re-entrancy rule as [`State::subscribe`].
pub fn create_effect<F>(reactive: &SharedReactiveGraph, run: F) -> Effect
where
    F: FnMut(&ReactiveGraph) + Send + 'static,
{
    lock(reactive).create_effect(run)
}

/// Remove an effect registered with [`create_effect`]
pub fn dispose_effect(reactive: &SharedReactiveGraph, effect: Effect) {
    lock(reactive).dispose_effect(effect);
}

/// A live value bound to a shared graph
///
/// Cloning is cheap: all clones observe and mutate the same signal.
///
/// Subscribers registered with [`State::subscribe`] run while the graph is
/// locked. They receive the new value and must not read or write any
/// `State` of the same graph.
pub struct State<T> {
    signal: Signal<T>,
    reactive: SharedReactiveGraph,
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            signal: self.signal,
            reactive: Arc::clone(&self.reactive),
        }
    }
}

impl<T> std::fmt::Debug for State<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("signal", &self.signal.id)
            .finish()
    }
}

impl<T: Clone + Send + 'static> State<T> {
    /// Create a new signal in `reactive` and wrap it
    pub fn new(reactive: &SharedReactiveGraph, initial: T) -> Self {
        let signal = lock(reactive).create_signal(initial);
        Self::from_signal(signal, Arc::clone(reactive))
    }

    /// Wrap an existing signal
    pub fn from_signal(signal: Signal<T>, reactive: SharedReactiveGraph) -> Self {
        Self { signal, reactive }
    }

    /// Get the current value
    pub fn get(&self) -> T
    where
        T: Default,
    {
        self.try_get().unwrap_or_default()
    }

    /// Get the current value, returning None if the signal is gone
    pub fn try_get(&self) -> Option<T> {
        lock(&self.reactive).get_untracked(self.signal)
    }

    /// Set a new value and notify subscribers
    pub fn set(&self, value: T) {
        lock(&self.reactive).set(self.signal, value);
    }

    /// Update the value using a function
    pub fn update(&self, f: impl FnOnce(T) -> T) {
        lock(&self.reactive).update(self.signal, f);
    }

    /// Call `f` with the current value now and after every write
    pub fn subscribe<F>(&self, mut f: F) -> Effect
    where
        F: FnMut(T) + Send + 'static,
    {
        let signal = self.signal;
        lock(&self.reactive).create_effect(move |g| {
            if let Some(value) = g.get(signal) {
                f(value);
            }
        })
    }

    /// Remove a subscriber registered with [`State::subscribe`]
    pub fn unsubscribe(&self, effect: Effect) {
        lock(&self.reactive).dispose_effect(effect);
    }

    /// Number of writes since creation
    pub fn version(&self) -> u64 {
        lock(&self.reactive)
            .signal_version(self.signal.id)
            .unwrap_or_default()
    }

    /// Get the underlying signal
    pub fn signal(&self) -> Signal<T> {
        self.signal
    }

    /// Get the signal ID (for dependency tracking)
    pub fn signal_id(&self) -> SignalId {
        self.signal.id
    }

    /// The graph this state lives in
    pub fn reactive(&self) -> &SharedReactiveGraph {
        &self.reactive
    }
}

/// A read-only derived value bound to a shared graph
pub struct Memo<T> {
    derived: Derived<T>,
    reactive: SharedReactiveGraph,
}

impl<T> Clone for Memo<T> {
    fn clone(&self) -> Self {
        Self {
            derived: self.derived,
            reactive: Arc::clone(&self.reactive),
        }
    }
}

impl<T> std::fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memo")
            .field("derived", &self.derived.id)
            .finish()
    }
}

impl<T: Clone + Send + 'static> Memo<T> {
    /// Create a derived value in `reactive`
    pub fn new<F>(reactive: &SharedReactiveGraph, compute: F) -> Self
    where
        F: Fn(&ReactiveGraph) -> T + Send + 'static,
    {
        let derived = lock(reactive).create_derived(compute);
        Self {
            derived,
            reactive: Arc::clone(reactive),
        }
    }

    /// Get the value, recomputing it if a dependency changed
    pub fn try_get(&self) -> Option<T> {
        lock(&self.reactive).get_derived(self.derived)
    }

    /// Get the value, falling back to `T::default()`
    pub fn get(&self) -> T
    where
        T: Default,
    {
        self.try_get().unwrap_or_default()
    }
}
