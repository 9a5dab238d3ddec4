//! # Effects
//!
//! Reducers stay pure by *describing* asynchronous work instead of doing it.
//! An `Effect` is that description; the [`Store`](crate::core::store::Store)
//! runs it and feeds whatever it produces back in as actions.
//!
//! ```text
//! reduce(state, action) → Effect ─▶ Store spawns it ─▶ actions ─▶ reduce(...)
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use futures::channel::mpsc;
use futures::future;
use futures::stream::{self, BoxStream, StreamExt};

/// Type-erased, hashable key naming a group of cancellable effects.
///
/// Any `Eq + Hash + Debug` value works as a key; keys of different types never
/// compare equal.
#[derive(Clone)]
pub struct EffectId(Arc<dyn EffectKey>);

impl EffectId {
    pub fn new<K: Any + fmt::Debug + Eq + Hash + Send + Sync>(key: K) -> Self {
        Self(Arc::new(key))
    }
}

trait EffectKey: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn key_eq(&self, other: &dyn EffectKey) -> bool;
    fn key_hash(&self, state: &mut dyn Hasher);
}

impl<K: Any + fmt::Debug + Eq + Hash + Send + Sync> EffectKey for K {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn key_eq(&self, other: &dyn EffectKey) -> bool {
        other.as_any().downcast_ref::<K>() == Some(self)
    }

    fn key_hash(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<K>().hash(&mut state);
        self.hash(&mut state);
    }
}

impl PartialEq for EffectId {
    fn eq(&self, other: &Self) -> bool {
        self.0.key_eq(other.0.as_ref())
    }
}

impl Eq for EffectId {}

impl Hash for EffectId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.key_hash(state);
    }
}

impl fmt::Debug for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EffectId({:?})", self.0)
    }
}

/// Asynchronous work returned by a reducer.
pub enum Effect<A> {
    None,
    /// Every item becomes an action sent back into the store.
    Stream(BoxStream<'static, A>),
    /// Work that can be stopped later with [`Effect::Cancel`] and the same id.
    Cancellable {
        id: EffectId,
        /// Cancel anything already running under `id` before starting.
        cancel_in_flight: bool,
        effect: Box<Effect<A>>,
    },
    Cancel(EffectId),
    Merge(Vec<Effect<A>>),
}

impl<A: Send + 'static> Effect<A> {
    pub fn none() -> Self {
        Effect::None
    }

    /// Feeds a single action back into the store.
    pub fn send(action: A) -> Self {
        Effect::Stream(stream::once(future::ready(action)).boxed())
    }

    pub fn future<F>(future: F) -> Self
    where
        F: Future<Output = A> + Send + 'static,
    {
        Effect::Stream(stream::once(future).boxed())
    }

    pub fn stream(stream: BoxStream<'static, A>) -> Self {
        Effect::Stream(stream)
    }

    /// Runs `work` with a sender it can use to emit any number of actions.
    /// The effect ends when `work` finishes.
    pub fn run<F, Fut>(work: F) -> Self
    where
        F: FnOnce(mpsc::UnboundedSender<A>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (sender, receiver) = mpsc::unbounded();
        let driver = stream::once(work(sender)).filter_map(|()| future::ready(None));
        Effect::Stream(stream::select(receiver, driver).boxed())
    }

    pub fn cancel(id: EffectId) -> Self {
        Effect::Cancel(id)
    }

    /// Tags this effect so it can be cancelled under `id`.
    pub fn cancellable(self, id: EffectId, cancel_in_flight: bool) -> Self {
        match self {
            Effect::None if !cancel_in_flight => Effect::None,
            effect => Effect::Cancellable {
                id,
                cancel_in_flight,
                effect: Box::new(effect),
            },
        }
    }

    pub fn merge(effects: impl IntoIterator<Item = Effect<A>>) -> Self {
        let mut effects: Vec<_> = effects.into_iter().filter(|e| !e.is_none()).collect();
        match effects.len() {
            0 => Effect::None,
            1 => effects.remove(0),
            _ => Effect::Merge(effects),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Effect::None)
    }

    /// Converts the actions this effect produces, e.g. to embed a screen's
    /// actions into its coordinator's action type.
    pub fn map<B, F>(self, f: F) -> Effect<B>
    where
        B: Send + 'static,
        F: Fn(A) -> B + Clone + Send + Sync + 'static,
    {
        match self {
            Effect::None => Effect::None,
            Effect::Stream(stream) => Effect::Stream(stream.map(f).boxed()),
            Effect::Cancellable {
                id,
                cancel_in_flight,
                effect,
            } => Effect::Cancellable {
                id,
                cancel_in_flight,
                effect: Box::new(effect.map(f)),
            },
            Effect::Cancel(id) => Effect::Cancel(id),
            Effect::Merge(effects) => {
                Effect::Merge(effects.into_iter().map(|e| e.map(f.clone())).collect())
            }
        }
    }
}

impl<A> fmt::Debug for Effect<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::None => f.write_str("None"),
            Effect::Stream(_) => f.write_str("Stream(..)"),
            Effect::Cancellable {
                id,
                cancel_in_flight,
                effect,
            } => f
                .debug_struct("Cancellable")
                .field("id", id)
                .field("cancel_in_flight", cancel_in_flight)
                .field("effect", effect)
                .finish(),
            Effect::Cancel(id) => f.debug_tuple("Cancel").field(id).finish(),
            Effect::Merge(effects) => f.debug_tuple("Merge").field(effects).finish(),
        }
    }
}
