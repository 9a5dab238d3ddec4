use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use routestack::Scenario;
use routestack::core::config::ResolvedConfig;
use routestack::core::diagnostics::{CollectingSink, RouterDiagnostic};
use routestack::core::effect::Effect;
use routestack::core::router::{
    ForEachRoute, IndexedRouterAction, ReducerExt, RouterAction, RouterActionCase, RouterState,
};
use routestack::core::scheduler::{DEFAULT_STEP_DELAY, StepScheduler};
use routestack::core::steps::{calculate_identified_steps, calculate_steps};
use routestack::core::store::{Reducer, Store};
use routestack::core::{Identifiable, IdentifiedRoutes, RoutableCollection, Route, Routes};
use tokio::time::Instant;

// ============================================================================
// Helper Types
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
enum Page {
    Home,
    List,
    Detail(u32),
}

impl Identifiable for Page {
    type Id = String;

    fn id(&self) -> String {
        format!("{self:?}")
    }
}

#[derive(Clone, Debug, PartialEq)]
enum PageAction {
    Tick,
    TickLater,
}

/// Counts ticks on detail pages.
struct PageReducer {
    ticks: Arc<AtomicUsize>,
}

impl Reducer for PageReducer {
    type State = Page;
    type Action = PageAction;

    fn reduce(&self, state: &mut Page, action: PageAction) -> Effect<PageAction> {
        match (state, action) {
            (Page::Detail(n), PageAction::Tick) => {
                *n += 1;
                self.ticks.fetch_add(1, Ordering::SeqCst);
                Effect::none()
            }
            (_, PageAction::TickLater) => Effect::future(async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                PageAction::Tick
            }),
            _ => Effect::none(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum AppAction {
    Router(IndexedRouterAction<Page, PageAction>),
    ShowDetails(u32),
    GoBackToRoot,
}

impl RouterActionCase<Routes<Page>> for AppAction {
    type ScreenAction = PageAction;

    fn embed(action: IndexedRouterAction<Page, PageAction>) -> Self {
        AppAction::Router(action)
    }

    fn extract(&self) -> Option<&IndexedRouterAction<Page, PageAction>> {
        match self {
            AppAction::Router(action) => Some(action),
            _ => None,
        }
    }
}

struct AppState {
    routes: Routes<Page>,
}

impl RouterState for AppState {
    type Routes = Routes<Page>;

    fn routes(&self) -> &Routes<Page> {
        &self.routes
    }

    fn routes_mut(&mut self) -> &mut Routes<Page> {
        &mut self.routes
    }
}

struct App {
    scheduler: StepScheduler,
}

impl Reducer for App {
    type State = AppState;
    type Action = AppAction;

    fn reduce(&self, state: &mut AppState, action: AppAction) -> Effect<AppAction> {
        match action {
            AppAction::ShowDetails(count) => {
                self.scheduler.route_with_delays(&state.routes, |routes| {
                    routes.present_sheet(Page::List, true);
                    for n in 0..count {
                        routes.push(Page::Detail(n));
                    }
                })
            }
            AppAction::GoBackToRoot => self
                .scheduler
                .route_with_delays(&state.routes, |routes| routes.pop_to_root()),
            AppAction::Router(_) => Effect::none(),
        }
    }
}

fn app_store(
    routes: Vec<Route<Page>>,
) -> (Store<ForEachRoute<App, PageReducer>>, Arc<AtomicUsize>) {
    let ticks = Arc::new(AtomicUsize::new(0));
    let reducer = App {
        scheduler: StepScheduler::default(),
    }
    .for_each_route(PageReducer {
        ticks: ticks.clone(),
    });
    (Store::new(AppState { routes: routes.into() }, reducer), ticks)
}

fn page_action(id: usize, action: PageAction) -> AppAction {
    AppAction::Router(RouterAction::RouteAction { id, action })
}

// ============================================================================
// Router Tests
// ============================================================================

#[tokio::test]
async fn test_indexed_action_reaches_screen_at_index() {
    let (mut store, ticks) = app_store(vec![
        Route::root(Page::Home, true),
        Route::push(Page::Detail(5)),
    ]);

    store.send(page_action(1, PageAction::Tick));

    assert_eq!(store.state().routes[1].screen, Page::Detail(6));
    assert_eq!(ticks.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_pending_screen_effect_is_cancelled_by_user_dismiss() {
    let (mut store, ticks) = app_store(vec![
        Route::root(Page::Home, true),
        Route::sheet(Page::Detail(0), false),
    ]);

    store.send(page_action(1, PageAction::TickLater));
    let swiped: Routes<Page> = vec![Route::root(Page::Home, true)].into();
    store.send(AppAction::Router(RouterAction::UpdateRoutes(swiped)));

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(store.try_receive(), None);
    assert_eq!(ticks.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_stale_index_is_reported() {
    let sink = CollectingSink::default();
    let reducer = App {
        scheduler: StepScheduler::default(),
    }
    .for_each_route(PageReducer {
        ticks: Arc::new(AtomicUsize::new(0)),
    })
    .with_diagnostics(sink.clone());
    let mut store = Store::new(
        AppState {
            routes: Routes::with_root(Page::Home, true),
        },
        reducer,
    );

    store.send(page_action(3, PageAction::Tick));

    assert!(matches!(
        sink.reports().as_slice(),
        [RouterDiagnostic::StaleRouteAction { route_count: 1, .. }]
    ));
}

#[tokio::test(start_paused = true)]
async fn test_go_back_to_root_with_delays() {
    let initial = vec![
        Route::root(Page::Home, true),
        Route::sheet(Page::List, false),
        Route::sheet(Page::Detail(1), false),
    ];
    let (mut store, _) = app_store(initial.clone());
    let start = Instant::now();

    store.send(AppAction::GoBackToRoot);

    let first_two: Routes<Page> = initial[..2].to_vec().into();
    assert_eq!(
        store.receive().await,
        Some(AppAction::Router(RouterAction::UpdateRoutes(first_two.clone())))
    );
    assert_eq!(store.state().routes, first_two);

    let first_one: Routes<Page> = initial[..1].to_vec().into();
    assert_eq!(
        store.receive().await,
        Some(AppAction::Router(RouterAction::UpdateRoutes(first_one.clone())))
    );
    assert_eq!(store.state().routes, first_one);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_deep_presentation_is_paced() {
    let (mut store, _) = app_store(vec![Route::root(Page::Home, true)]);
    let start = Instant::now();

    store.send(AppAction::ShowDetails(3));

    let mut seen = Vec::new();
    while store.state().routes.len() < 5 {
        store.receive().await;
        seen.push((store.state().routes.len(), start.elapsed()));
    }
    let delta = DEFAULT_STEP_DELAY;
    assert_eq!(
        seen,
        vec![
            (2, Duration::ZERO),
            (3, Duration::ZERO),
            (4, delta),
            (5, delta * 2),
        ]
    );
    assert!(store.state().routes[1].is_presented());
}

// ============================================================================
// Planner Scenarios
// ============================================================================

#[test]
fn test_pure_push_is_one_step() {
    let from = vec![Route::root(Page::Home, true)];
    let to = vec![Route::root(Page::Home, true), Route::push(Page::List)];
    assert_eq!(calculate_steps(&from, &to), vec![to.clone()]);
}

#[test]
fn test_branch_switch_pops_then_pushes() {
    let from = vec![
        Route::root(Page::Home, true),
        Route::push(Page::List),
        Route::push(Page::Detail(1)),
    ];
    let to = vec![Route::root(Page::Home, true), Route::push(Page::Detail(2))];
    assert_eq!(
        calculate_steps(&from, &to),
        vec![
            vec![Route::root(Page::Home, true), Route::push(Page::List)],
            vec![Route::root(Page::Home, true)],
            to.clone(),
        ]
    );
}

#[test]
fn test_identified_planning_keeps_updated_payloads() {
    let from = vec![Route::root(Page::Home, true), Route::sheet(Page::List, true)];
    let to = vec![
        Route::root(Page::Home, true),
        Route::sheet(Page::List, true),
        Route::push(Page::Detail(9)),
    ];
    let steps = calculate_identified_steps(&from, &to);
    assert_eq!(steps, vec![to]);
}

#[test]
fn test_go_back_to_by_identity() {
    #[derive(Clone, Debug, PartialEq)]
    enum Screen {
        Home,
        List,
        Detail { id: u32 },
    }

    impl Identifiable for Screen {
        type Id = String;

        fn id(&self) -> String {
            format!("{self:?}")
        }
    }

    let mut routes = IdentifiedRoutes::new(vec![
        Route::root(Screen::Home, true),
        Route::push(Screen::List),
        Route::push(Screen::Detail { id: 1 }),
        Route::sheet(Screen::Detail { id: 2 }, false),
    ])
    .unwrap();

    assert!(routes.go_back_to(|screen| matches!(screen, Screen::List)));
    assert_eq!(
        routes.into_vec(),
        vec![Route::root(Screen::Home, true), Route::push(Screen::List)]
    );
}

// ============================================================================
// Demo
// ============================================================================

async fn demo_lines(scenario: Scenario) -> Vec<serde_json::Value> {
    let config = ResolvedConfig {
        step_delay: DEFAULT_STEP_DELAY,
        log_level: log::LevelFilter::Off,
        scenario,
    };
    let mut out = Vec::new();
    routestack::demo::run(&config, &mut out).await.unwrap();
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_demo_indexed_ends_at_root() {
    let lines = demo_lines(Scenario::Indexed).await;
    let sizes: Vec<usize> = lines
        .iter()
        .map(|line| line["routes"].as_array().map_or(0, Vec::len))
        .collect();
    assert_eq!(sizes, vec![1, 2, 3, 4, 3, 4, 3, 2, 1]);

    let last = &lines[lines.len() - 1];
    assert_eq!(last["routes"][0]["kind"], "root");
    assert_eq!(last["routes"][0]["screen"]["screen"], "home");
    assert_eq!(last["elapsed_ms"], DEFAULT_STEP_DELAY.as_millis() as u64);
}

#[tokio::test(start_paused = true)]
async fn test_demo_identified_keeps_screen_ids() {
    let lines = demo_lines(Scenario::Identified).await;
    let home_id = &lines[0]["routes"][0]["screen"]["id"];
    assert!(home_id.is_string());
    for line in &lines {
        assert_eq!(&line["routes"][0]["screen"]["id"], home_id);
    }
    assert_eq!(lines.last().and_then(|l| l["routes"].as_array()).map(Vec::len), Some(1));
}
