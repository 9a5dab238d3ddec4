//! A coordinator over the demo screens, usable with either route list.
//!
//! ```text
//! Home ──start──▶ NumbersList (sheet) ──select n──▶ NumberDetail(n) (push)
//!                                                     │
//!                               show double ──────────┘──▶ NumberDetail(2n) (sheet)
//! ```

use std::fmt::Debug;
use std::marker::PhantomData;

use crate::core::effect::Effect;
use crate::core::identified::IdentifiedRoutes;
use crate::core::route::Route;
use crate::core::router::{RouterAction, RouterActionCase, RouterState};
use crate::core::routes::{RoutableCollection, Routes};
use crate::core::scheduler::StepScheduler;
use crate::core::store::Reducer;
use crate::demo::screens::{
    HomeAction, NumberDetailAction, NumbersListAction, Screen, ScreenAction,
};

#[derive(Clone, Debug, PartialEq)]
pub struct CoordinatorState<C> {
    pub routes: C,
}

impl<C: RoutableCollection<Screen = Screen>> CoordinatorState<C> {
    pub fn new(routes: C) -> Self {
        Self { routes }
    }

    /// A fresh flow: just the home screen, inside a navigation container.
    pub fn initial() -> Self {
        Self::new(C::from_step(vec![Route::root(Screen::home(), true)]))
    }
}

impl<C: RoutableCollection> RouterState for CoordinatorState<C> {
    type Routes = C;

    fn routes(&self) -> &C {
        &self.routes
    }

    fn routes_mut(&mut self) -> &mut C {
        &mut self.routes
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CoordinatorAction<C: RoutableCollection> {
    Router(RouterAction<C, ScreenAction>),
}

impl<C: RoutableCollection> RouterActionCase<C> for CoordinatorAction<C> {
    type ScreenAction = ScreenAction;

    fn embed(action: RouterAction<C, ScreenAction>) -> Self {
        CoordinatorAction::Router(action)
    }

    fn extract(&self) -> Option<&RouterAction<C, ScreenAction>> {
        match self {
            CoordinatorAction::Router(action) => Some(action),
        }
    }
}

pub struct Coordinator<C> {
    scheduler: StepScheduler,
    routes: PhantomData<fn() -> C>,
}

pub type IndexedCoordinator = Coordinator<Routes<Screen>>;
pub type IdentifiedCoordinator = Coordinator<IdentifiedRoutes<Screen>>;

impl<C> Coordinator<C> {
    pub fn new(scheduler: StepScheduler) -> Self {
        Self {
            scheduler,
            routes: PhantomData,
        }
    }
}

impl<C> Reducer for Coordinator<C>
where
    C: RoutableCollection<Screen = Screen> + Clone + Debug + Send + 'static,
{
    type State = CoordinatorState<C>;
    type Action = CoordinatorAction<C>;

    fn reduce(
        &self,
        state: &mut CoordinatorState<C>,
        action: CoordinatorAction<C>,
    ) -> Effect<CoordinatorAction<C>> {
        let CoordinatorAction::Router(RouterAction::RouteAction { action, .. }) = action else {
            return Effect::none();
        };
        let routes = &mut state.routes;

        match action {
            ScreenAction::Home(HomeAction::StartTapped) => {
                routes.present_sheet(Screen::numbers_list(0..4), true);
            }
            ScreenAction::NumbersList(NumbersListAction::NumberSelected(number)) => {
                routes.push(Screen::number_detail(number));
            }
            ScreenAction::NumberDetail(NumberDetailAction::ShowDouble(number)) => {
                routes.present_sheet(Screen::number_detail(number * 2), true);
            }
            ScreenAction::NumberDetail(NumberDetailAction::GoBackTapped) => routes.go_back(),
            ScreenAction::NumberDetail(NumberDetailAction::GoBackToNumbersList) => {
                return self.scheduler.route_with_delays(routes, |routes| {
                    routes.go_back_to(Screen::is_numbers_list);
                });
            }
            ScreenAction::NumberDetail(NumberDetailAction::GoBackToRootTapped) => {
                return self
                    .scheduler
                    .route_with_delays(routes, |routes| routes.pop_to_root());
            }
            _ => {}
        }
        Effect::none()
    }
}
