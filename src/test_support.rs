//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::effect::Effect;
use crate::core::identified::{Identifiable, IdentifiedRoutes};
use crate::core::route::Route;
use crate::core::router::{
    ForEachRoute, IdentifiedRouterAction, ReducerExt, RouterActionCase, RouterState,
};
use crate::core::routes::RoutableCollection;
use crate::core::scheduler::{Clock, StepScheduler};
use crate::core::store::{Reducer, Store};

/// A screen with an identity and a number.
#[derive(Clone, Debug, PartialEq)]
pub struct Counter {
    pub id: &'static str,
    pub count: i32,
}

impl Counter {
    pub fn new(id: &'static str, count: i32) -> Self {
        Self { id, count }
    }
}

impl Identifiable for Counter {
    type Id = &'static str;

    fn id(&self) -> &'static str {
        self.id
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CounterAction {
    Increment,
    /// Increments after one second.
    IncrementLater,
}

pub struct CounterReducer;

impl Reducer for CounterReducer {
    type State = Counter;
    type Action = CounterAction;

    fn reduce(&self, state: &mut Counter, action: CounterAction) -> Effect<CounterAction> {
        match action {
            CounterAction::Increment => {
                state.count += 1;
                Effect::none()
            }
            CounterAction::IncrementLater => Effect::future(async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                CounterAction::Increment
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParentState {
    pub routes: IdentifiedRoutes<Counter>,
}

impl ParentState {
    /// Panics on duplicate ids.
    pub fn new(routes: Vec<Route<Counter>>) -> Self {
        Self {
            routes: IdentifiedRoutes::new(routes).expect("test routes have unique ids"),
        }
    }
}

impl RouterState for ParentState {
    type Routes = IdentifiedRoutes<Counter>;

    fn routes(&self) -> &Self::Routes {
        &self.routes
    }

    fn routes_mut(&mut self) -> &mut Self::Routes {
        &mut self.routes
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ParentAction {
    Router(IdentifiedRouterAction<Counter, CounterAction>),
    GoBackToRoot,
    Present(Counter),
    Dismiss,
}

impl RouterActionCase<IdentifiedRoutes<Counter>> for ParentAction {
    type ScreenAction = CounterAction;

    fn embed(action: IdentifiedRouterAction<Counter, CounterAction>) -> Self {
        ParentAction::Router(action)
    }

    fn extract(&self) -> Option<&IdentifiedRouterAction<Counter, CounterAction>> {
        match self {
            ParentAction::Router(action) => Some(action),
            _ => None,
        }
    }
}

/// A coordinator over counters using the default step delay.
#[derive(Default)]
pub struct ParentReducer {
    pub scheduler: StepScheduler,
}

impl Reducer for ParentReducer {
    type State = ParentState;
    type Action = ParentAction;

    fn reduce(&self, state: &mut ParentState, action: ParentAction) -> Effect<ParentAction> {
        match action {
            ParentAction::GoBackToRoot => self
                .scheduler
                .route_with_delays(&state.routes, |routes| routes.pop_to_root()),
            ParentAction::Present(counter) => self
                .scheduler
                .route_with_delays(&state.routes, |routes| routes.present_sheet(counter, false)),
            ParentAction::Dismiss => {
                state.routes.dismiss();
                Effect::none()
            }
            ParentAction::Router(_) => Effect::none(),
        }
    }
}

pub fn parent_store(
    routes: Vec<Route<Counter>>,
) -> Store<ForEachRoute<ParentReducer, CounterReducer>> {
    Store::new(
        ParentState::new(routes),
        ParentReducer::default().for_each_route(CounterReducer),
    )
}

/// A clock that returns at once and remembers every requested sleep.
#[derive(Debug, Default)]
pub struct RecordingClock {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingClock {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn reset(&self) {
        if let Ok(mut sleeps) = self.sleeps.lock() {
            sleeps.clear();
        }
    }
}

#[async_trait]
impl Clock for RecordingClock {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut sleeps) = self.sleeps.lock() {
            sleeps.push(duration);
        }
    }
}
