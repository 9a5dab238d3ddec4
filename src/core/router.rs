//! # Router
//!
//! Glue between a coordinator reducer and the screens in its route list.
//!
//! ```text
//! Coordinator action
//! ├── Router(UpdateRoutes(routes))         ← user swiped back / dismissed, or a planned step
//! ├── Router(RouteAction { id, action })   ← a screen did something
//! └── ...coordinator's own actions
//! ```
//!
//! [`ForEachRoute`] runs in this order for every action:
//!
//! 1. snapshot route keys
//! 2. adopt `UpdateRoutes` verbatim, or forward `RouteAction` to the screen at `id`
//! 3. run the coordinator reducer
//! 4. for every key that disappeared, or whose route changed style or dismiss
//!    hook: fire the old dismiss hook and cancel the old screen's effects

use std::any::type_name;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::core::diagnostics::{DiagnosticSink, LogSink, RouterDiagnostic};
use crate::core::effect::{Effect, EffectId};
use crate::core::identified::{Identifiable, IdentifiedRoutes};
use crate::core::route::{DismissHook, Route, RouteStyle};
use crate::core::routes::{RoutableCollection, Routes};
use crate::core::scheduler::StepScheduler;
use crate::core::steps::plan_transition;
use crate::core::store::Reducer;

#[derive(Clone, Debug, PartialEq)]
pub enum RouterAction<C: RoutableCollection, A> {
    /// Replace the whole route list.
    UpdateRoutes(C),
    /// An action for the screen addressed by `id`.
    RouteAction { id: C::Key, action: A },
}

/// Router actions whose screens are addressed by index.
pub type IndexedRouterAction<S, A> = RouterAction<Routes<S>, A>;

/// Router actions whose screens are addressed by identity.
pub type IdentifiedRouterAction<S, A> = RouterAction<IdentifiedRoutes<S>, A>;

/// A coordinator state that owns a route list.
pub trait RouterState {
    type Routes: RoutableCollection;

    fn routes(&self) -> &Self::Routes;

    fn routes_mut(&mut self) -> &mut Self::Routes;
}

impl<S: PartialEq> RouterState for Routes<S> {
    type Routes = Self;

    fn routes(&self) -> &Self {
        self
    }

    fn routes_mut(&mut self) -> &mut Self {
        self
    }
}

impl<S: Identifiable> RouterState for IdentifiedRoutes<S> {
    type Routes = Self;

    fn routes(&self) -> &Self {
        self
    }

    fn routes_mut(&mut self) -> &mut Self {
        self
    }
}

/// A coordinator action enum with a case carrying a [`RouterAction`].
///
/// ```ignore
/// impl RouterActionCase<Routes<Screen>> for Action {
///     type ScreenAction = ScreenAction;
///
///     fn embed(action: IndexedRouterAction<Screen, ScreenAction>) -> Self {
///         Action::Router(action)
///     }
///
///     fn extract(&self) -> Option<&IndexedRouterAction<Screen, ScreenAction>> {
///         match self {
///             Action::Router(action) => Some(action),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait RouterActionCase<C: RoutableCollection>: Sized {
    type ScreenAction;

    fn embed(action: RouterAction<C, Self::ScreenAction>) -> Self;

    fn extract(&self) -> Option<&RouterAction<C, Self::ScreenAction>>;
}

impl<C: RoutableCollection, A> RouterActionCase<C> for RouterAction<C, A> {
    type ScreenAction = A;

    fn embed(action: RouterAction<C, A>) -> Self {
        action
    }

    fn extract(&self) -> Option<&RouterAction<C, A>> {
        Some(self)
    }
}

/// Names a coordinator for effect cancellation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CoordinatorId(Cow<'static, str>);

impl CoordinatorId {
    /// One id per coordinator type.
    pub fn of<T: ?Sized>() -> Self {
        Self(Cow::Borrowed(type_name::<T>()))
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }
}

/// Effects started by one screen of one coordinator.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CancellationId<K> {
    pub coordinator: CoordinatorId,
    pub route: K,
}

/// The in-flight planned transition of a coordinator's route list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct TransitionId(&'static str);

impl StepScheduler {
    /// Applies `transform` to a copy of `routes` and returns an effect that
    /// walks the real list there one renderer-safe step at a time.
    ///
    /// A transition started while another one for the same coordinator action
    /// type is still running replaces it; planning starts from wherever the
    /// earlier one had got to.
    pub fn route_with_delays<C, A>(&self, routes: &C, transform: impl FnOnce(&mut C)) -> Effect<A>
    where
        C: RoutableCollection + Clone + Send + 'static,
        C::Screen: Clone + PartialEq,
        A: RouterActionCase<C> + Send + 'static,
    {
        let mut target = routes.clone();
        transform(&mut target);
        let steps = plan_transition(routes, &target);
        debug!(
            "Routing {} -> {} routes in {} step(s)",
            routes.len(),
            target.len(),
            steps.len()
        );
        self.effect(steps, |step| A::embed(RouterAction::UpdateRoutes(step)))
            .cancellable(EffectId::new(TransitionId(type_name::<A>())), true)
    }
}

/// Runs a screen reducer for every route of a coordinator.
///
/// Built with [`ReducerExt::for_each_route`].
pub struct ForEachRoute<P, R> {
    parent: P,
    screen: R,
    cancellation: Option<CoordinatorId>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl<P: Reducer, R: Reducer> ForEachRoute<P, R> {
    pub fn new(parent: P, screen: R) -> Self {
        Self {
            parent,
            screen,
            cancellation: Some(CoordinatorId::of::<P>()),
            diagnostics: Arc::new(LogSink),
        }
    }

    /// Cancels a screen's effects when it is dismissed, grouping them under
    /// `coordinator`. On by default, keyed by the coordinator reducer's type.
    pub fn cancel_effects_on_dismiss(mut self, coordinator: CoordinatorId) -> Self {
        self.cancellation = Some(coordinator);
        self
    }

    pub fn without_effect_cancellation(mut self) -> Self {
        self.cancellation = None;
        self
    }

    pub fn with_diagnostics(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.diagnostics = Arc::new(sink);
        self
    }

    fn cancellation_id<K>(&self, route: K) -> Option<EffectId>
    where
        K: Clone + Eq + std::hash::Hash + std::fmt::Debug + Send + Sync + 'static,
    {
        self.cancellation.as_ref().map(|coordinator| {
            EffectId::new(CancellationId {
                coordinator: coordinator.clone(),
                route,
            })
        })
    }
}

pub trait ReducerExt: Reducer + Sized {
    /// Combines this coordinator reducer with `screen`, which handles the
    /// actions of every screen in the coordinator's routes.
    fn for_each_route<R: Reducer>(self, screen: R) -> ForEachRoute<Self, R> {
        ForEachRoute::new(self, screen)
    }
}

impl<T: Reducer> ReducerExt for T {}

impl<P, R, C> ForEachRoute<P, R>
where
    P: Reducer,
    P::State: RouterState<Routes = C>,
    P::Action: RouterActionCase<C, ScreenAction = R::Action>,
    R: Reducer,
    C: RoutableCollection<Screen = R::State> + Clone,
{
    fn reduce_screen(
        &self,
        routes: &mut C,
        id: &C::Key,
        action: R::Action,
        parent_action: &P::Action,
    ) -> Effect<P::Action> {
        let route_count = routes.len();
        let Some(route) = routes.position(id).and_then(|index| routes.route_mut(index)) else {
            self.diagnostics.report(RouterDiagnostic::StaleRouteAction {
                route: format!("{id:?}"),
                route_count,
                action: format!("{parent_action:?}"),
            });
            return Effect::none();
        };

        let key = id.clone();
        let effect = self.screen.reduce(&mut route.screen, action).map(move |action| {
            <P::Action as RouterActionCase<C>>::embed(RouterAction::RouteAction {
                id: key.clone(),
                action,
            })
        });
        match self.cancellation_id(id.clone()) {
            Some(cancel_id) => effect.cancellable(cancel_id, false),
            None => effect,
        }
    }

    /// A key counts as dismissed when it is gone, or when the route now under
    /// it has another style or dismiss hook. Index keys survive a replacement,
    /// so a payload change alone is an in-place update.
    fn handle_dismissals(
        &self,
        before: Vec<(C::Key, RouteStyle, Option<DismissHook>)>,
        routes: &C,
    ) -> Effect<P::Action> {
        let remaining: HashMap<C::Key, &Route<C::Screen>> = routes
            .routes()
            .iter()
            .enumerate()
            .filter_map(|(index, route)| routes.key_at(index).map(|key| (key, route)))
            .collect();
        let mut cancellations = Vec::new();
        for (key, style, hook) in before {
            let kept = remaining
                .get(&key)
                .is_some_and(|route| route.style == style && route.on_dismiss == hook);
            if kept {
                continue;
            }
            debug!("Route {key:?} dismissed");
            if let Some(hook) = hook {
                hook.call();
            }
            if let Some(cancel_id) = self.cancellation_id(key) {
                cancellations.push(Effect::cancel(cancel_id));
            }
        }
        Effect::merge(cancellations)
    }
}

impl<P, R, C> Reducer for ForEachRoute<P, R>
where
    P: Reducer,
    P::State: RouterState<Routes = C>,
    P::Action: RouterActionCase<C, ScreenAction = R::Action>,
    R: Reducer,
    C: RoutableCollection<Screen = R::State> + Clone,
{
    type State = P::State;
    type Action = P::Action;

    fn reduce(&self, state: &mut P::State, action: P::Action) -> Effect<P::Action> {
        let before: Vec<_> = {
            let routes = state.routes();
            routes
                .routes()
                .iter()
                .enumerate()
                .filter_map(|(index, route)| {
                    let hook = route.on_dismiss.clone();
                    routes.key_at(index).map(|key| (key, route.style, hook))
                })
                .collect()
        };

        let screen_effect = match action.extract() {
            Some(RouterAction::UpdateRoutes(routes)) => {
                *state.routes_mut() = routes.clone();
                Effect::none()
            }
            Some(RouterAction::RouteAction {
                id,
                action: screen_action,
            }) => self.reduce_screen(state.routes_mut(), id, screen_action.clone(), &action),
            None => Effect::none(),
        };
        let parent_effect = self.parent.reduce(state, action);
        let dismissal_effect = self.handle_dismissals(before, state.routes());

        Effect::merge([screen_effect, parent_effect, dismissal_effect])
    }
}
