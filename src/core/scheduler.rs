//! # Step Scheduler
//!
//! Turns a planned step sequence into a paced stream. Renderers need time for
//! one animation to settle before the next structural change, so:
//!
//! ```text
//! step:   0    1    2    3    ...  n-1
//! time:   0    0    δ    2δ   ...  (n-2)δ
//! ```
//!
//! The first two steps go out back to back; a plain push (one leading in-place
//! step plus one append) therefore finishes without visible lag.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};

use crate::core::effect::Effect;

/// Delay between structural changes once the first two steps are out.
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(650);

/// Steps emitted before any delay kicks in.
pub const IMMEDIATE_STEPS: usize = 2;

/// Source of time for pacing. Tests inject their own.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real time via tokio, which also honours tokio's paused test clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Clone)]
pub struct StepScheduler {
    delay: Duration,
    clock: Arc<dyn Clock>,
}

impl StepScheduler {
    pub fn new(delay: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { delay, clock }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self::new(delay, Arc::new(TokioClock))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Emits `steps` in order, pacing everything after the first two.
    ///
    /// An empty input completes immediately. Dropping the stream cancels it;
    /// a step is never emitted after its consumer has gone away.
    pub fn schedule<T: Send + 'static>(&self, steps: Vec<T>) -> BoxStream<'static, T> {
        let clock = self.clock.clone();
        let delay = self.delay;
        stream::unfold(steps.into_iter().enumerate(), move |mut steps| {
            let clock = clock.clone();
            async move {
                let (index, step) = steps.next()?;
                if index >= IMMEDIATE_STEPS {
                    clock.sleep(delay).await;
                }
                Some((step, steps))
            }
        })
        .boxed()
    }

    /// Wraps a schedule as an effect that feeds each step back as an action.
    pub fn effect<T, A, F>(&self, steps: Vec<T>, to_action: F) -> Effect<A>
    where
        T: Send + 'static,
        A: Send + 'static,
        F: Fn(T) -> A + Send + 'static,
    {
        if steps.is_empty() {
            return Effect::none();
        }
        Effect::stream(self.schedule(steps).map(to_action).boxed())
    }
}

impl Default for StepScheduler {
    fn default() -> Self {
        Self::with_delay(DEFAULT_STEP_DELAY)
    }
}

impl fmt::Debug for StepScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepScheduler")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}
