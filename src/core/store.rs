//! # Store
//!
//! The runtime that owns application state. Every change goes through
//! `reduce(state, action)`, one action at a time, so the store is the single
//! writer of its route lists.
//!
//! ```text
//!   send(action) ──▶ reducer ──▶ Effect ──▶ tokio task ─┐
//!        ▲                                              │
//!        └──────────── receive() ◀── channel ◀──────────┘
//! ```
//!
//! Effects run as tokio tasks; `send` must be called from inside a runtime.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::StreamExt;
use futures::stream::BoxStream;
use log::{debug, trace};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::core::effect::{Effect, EffectId};

pub trait Reducer: Send + Sync + 'static {
    type State;
    type Action: Clone + Debug + Send + 'static;

    fn reduce(&self, state: &mut Self::State, action: Self::Action) -> Effect<Self::Action>;
}

/// An action on its way back from an effect task.
struct Envelope<A> {
    action: A,
    cancelled: Arc<AtomicBool>,
}

/// Handle to one spawned effect task.
struct EffectTask {
    abort: AbortHandle,
    cancelled: Arc<AtomicBool>,
}

impl EffectTask {
    fn cancel(&self) {
        // Flag first: anything the task already queued is dropped on receipt.
        self.cancelled.store(true, Ordering::SeqCst);
        self.abort.abort();
    }

    fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

pub struct Store<R: Reducer> {
    reducer: R,
    state: R::State,
    sender: mpsc::UnboundedSender<Envelope<R::Action>>,
    receiver: mpsc::UnboundedReceiver<Envelope<R::Action>>,
    cancellable: HashMap<EffectId, Vec<EffectTask>>,
    detached: Vec<EffectTask>,
}

impl<R: Reducer> Store<R> {
    pub fn new(state: R::State, reducer: R) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            reducer,
            state,
            sender,
            receiver,
            cancellable: HashMap::new(),
            detached: Vec::new(),
        }
    }

    pub fn state(&self) -> &R::State {
        &self.state
    }

    /// Reduces `action` immediately and starts whatever effects it returns.
    pub fn send(&mut self, action: R::Action) {
        debug!("Action: {action:?}");
        let effect = self.reducer.reduce(&mut self.state, action);
        self.run_effect(effect);
    }

    /// Waits for the next action produced by an effect, reduces it and
    /// returns it. Actions from cancelled effects are skipped.
    pub async fn receive(&mut self) -> Option<R::Action> {
        loop {
            let envelope = self.receiver.recv().await?;
            if let Some(action) = self.accept(envelope) {
                return Some(action);
            }
        }
    }

    /// Non-blocking [`receive`](Self::receive).
    pub fn try_receive(&mut self) -> Option<R::Action> {
        while let Ok(envelope) = self.receiver.try_recv() {
            if let Some(action) = self.accept(envelope) {
                return Some(action);
            }
        }
        None
    }

    /// Number of effect tasks still running.
    pub fn in_flight(&mut self) -> usize {
        self.prune();
        self.detached.len() + self.cancellable.values().map(Vec::len).sum::<usize>()
    }

    /// Cancels every running effect.
    pub fn cancel_all(&mut self) {
        for task in self.detached.drain(..) {
            task.cancel();
        }
        for (_, tasks) in self.cancellable.drain() {
            tasks.iter().for_each(EffectTask::cancel);
        }
    }

    fn accept(&mut self, envelope: Envelope<R::Action>) -> Option<R::Action> {
        if envelope.cancelled.load(Ordering::SeqCst) {
            trace!("Dropping action from cancelled effect: {:?}", envelope.action);
            return None;
        }
        self.send(envelope.action.clone());
        Some(envelope.action)
    }

    fn run_effect(&mut self, effect: Effect<R::Action>) {
        let spawned = self.start(effect);
        self.prune();
        self.detached.extend(spawned);
    }

    /// Starts an effect and returns the tasks that are not yet owned by a
    /// cancellation id.
    fn start(&mut self, effect: Effect<R::Action>) -> Vec<EffectTask> {
        match effect {
            Effect::None => Vec::new(),
            Effect::Stream(stream) => vec![self.spawn(stream)],
            Effect::Cancellable {
                id,
                cancel_in_flight,
                effect,
            } => {
                if cancel_in_flight {
                    self.cancel(&id);
                }
                let tasks = self.start(*effect);
                if !tasks.is_empty() {
                    self.prune();
                    self.cancellable.entry(id).or_default().extend(tasks);
                }
                Vec::new()
            }
            Effect::Cancel(id) => {
                self.cancel(&id);
                Vec::new()
            }
            Effect::Merge(effects) => effects
                .into_iter()
                .flat_map(|effect| self.start(effect))
                .collect(),
        }
    }

    fn spawn(&self, mut stream: BoxStream<'static, R::Action>) -> EffectTask {
        let sender = self.sender.clone();
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();
        let handle = tokio::spawn(async move {
            while let Some(action) = stream.next().await {
                let envelope = Envelope {
                    action,
                    cancelled: flag.clone(),
                };
                if sender.send(envelope).is_err() {
                    break;
                }
            }
        });
        EffectTask {
            abort: handle.abort_handle(),
            cancelled,
        }
    }

    fn cancel(&mut self, id: &EffectId) {
        if let Some(tasks) = self.cancellable.remove(id) {
            debug!("Cancelling {} effect(s) for {id:?}", tasks.len());
            tasks.iter().for_each(EffectTask::cancel);
        }
    }

    fn prune(&mut self) {
        self.detached.retain(|task| !task.is_finished());
        self.cancellable.retain(|_, tasks| {
            tasks.retain(|task| !task.is_finished());
            !tasks.is_empty()
        });
    }
}

impl<R: Reducer> Drop for Store<R> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Clone, Debug, PartialEq)]
    enum Action {
        Start,
        StartTwice,
        Tick(u32),
        Stop,
    }

    struct Ticker;

    impl Reducer for Ticker {
        type State = Vec<u32>;
        type Action = Action;

        fn reduce(&self, state: &mut Vec<u32>, action: Action) -> Effect<Action> {
            match action {
                Action::Start => Effect::run(|sender| async move {
                    for n in 1..=3 {
                        tokio::time::sleep(Duration::from_secs(1)).await;
                        sender.unbounded_send(Action::Tick(n)).ok();
                    }
                })
                .cancellable(EffectId::new("ticker"), false),
                Action::StartTwice => Effect::merge([
                    Effect::send(Action::Tick(10)).cancellable(EffectId::new("ticker"), true),
                    Effect::send(Action::Tick(20)),
                ]),
                Action::Tick(n) => {
                    state.push(n);
                    Effect::none()
                }
                Action::Stop => Effect::cancel(EffectId::new("ticker")),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_effect_actions_are_reduced() {
        let mut store = Store::new(Vec::new(), Ticker);
        store.send(Action::Start);
        assert_eq!(store.receive().await, Some(Action::Tick(1)));
        assert_eq!(store.receive().await, Some(Action::Tick(2)));
        assert_eq!(store.receive().await, Some(Action::Tick(3)));
        assert_eq!(store.state(), &vec![1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_further_actions() {
        let mut store = Store::new(Vec::new(), Ticker);
        store.send(Action::Start);
        assert_eq!(store.receive().await, Some(Action::Tick(1)));
        store.send(Action::Stop);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(store.try_receive(), None);
        assert_eq!(store.state(), &vec![1]);
        assert_eq!(store.in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_queued_actions_from_cancelled_effect_are_dropped() {
        let mut store = Store::new(Vec::new(), Ticker);
        store.send(Action::Start);
        // Let the first tick land in the channel without reducing it.
        tokio::time::sleep(Duration::from_millis(1500)).await;
        store.send(Action::Stop);
        assert_eq!(store.try_receive(), None);
        assert!(store.state().is_empty());
    }

    #[tokio::test]
    async fn test_merge_runs_every_effect() {
        let mut store = Store::new(Vec::new(), Ticker);
        store.send(Action::StartTwice);
        let mut received = vec![store.receive().await, store.receive().await];
        received.sort_by_key(|a| format!("{a:?}"));
        assert_eq!(received, vec![Some(Action::Tick(10)), Some(Action::Tick(20))]);
    }

    #[tokio::test]
    async fn test_finished_effects_are_released() {
        let mut store = Store::new(Vec::new(), Ticker);
        for _ in 0..1000 {
            store.send(Action::StartTwice);
            store.receive().await;
            store.receive().await;
        }
        assert_eq!(store.state().len(), 2000);
        assert!(store.detached.len() <= 2, "retained {}", store.detached.len());
        assert!(store.cancellable.values().map(Vec::len).sum::<usize>() <= 1);
    }
}
