//! # Demo
//!
//! A scripted walk through the numbers flow, rendered as JSON lines on the
//! given writer. Each line is one route list the coordinator adopted:
//!
//! ```text
//! {"elapsed_ms":0,"event":"start","routes":[{"kind":"root",...}]}
//! ```
//!
//! The script builds a four-deep stack, lets the "user" swipe the top sheet
//! away while it has an effect pending, pokes the dismissed screen (which
//! is reported and dropped), then rebuilds and goes back to the root, which
//! takes several paced steps.

pub mod coordinator;
pub mod screens;

use std::fmt::Debug;
use std::io::{self, Write};
use std::time::Duration;

use log::{info, warn};
use serde::Serialize;
use tokio::time::{Instant, timeout};

use crate::Scenario;
use crate::core::config::ResolvedConfig;
use crate::core::identified::IdentifiedRoutes;
use crate::core::router::{ForEachRoute, ReducerExt, RouterAction};
use crate::core::routes::{RoutableCollection, Routes};
use crate::core::scheduler::StepScheduler;
use crate::core::store::Store;
use coordinator::{Coordinator, CoordinatorAction, CoordinatorState};
use screens::{
    HomeAction, NumberDetailAction, NumbersListAction, Screen, ScreenAction, ScreenReducer,
};

type DemoStore<C> = Store<ForEachRoute<Coordinator<C>, ScreenReducer>>;

#[derive(Serialize)]
struct Snapshot<'a, C> {
    elapsed_ms: u128,
    event: &'a str,
    routes: &'a C,
}

struct Renderer<'w, W> {
    out: &'w mut W,
    started: Instant,
}

impl<W: Write> Renderer<'_, W> {
    fn render<C: Serialize>(&mut self, event: &str, routes: &C) -> io::Result<()> {
        let snapshot = Snapshot {
            elapsed_ms: self.started.elapsed().as_millis(),
            event,
            routes,
        };
        serde_json::to_writer(&mut *self.out, &snapshot)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

/// Runs the scripted scenario, writing one JSON line per adopted route list.
pub async fn run<W: Write>(config: &ResolvedConfig, out: &mut W) -> io::Result<()> {
    info!(
        "Running {:?} scenario with a {}ms step delay",
        config.scenario,
        config.step_delay.as_millis()
    );
    let scheduler = StepScheduler::with_delay(config.step_delay);
    match config.scenario {
        Scenario::Indexed => run_script::<Routes<Screen>, W>(scheduler, out).await,
        Scenario::Identified => run_script::<IdentifiedRoutes<Screen>, W>(scheduler, out).await,
    }
}

async fn run_script<C, W>(scheduler: StepScheduler, out: &mut W) -> io::Result<()>
where
    C: RoutableCollection<Screen = Screen> + Clone + Debug + Send + Serialize + 'static,
    W: Write,
{
    let settle = scheduler.delay() + Duration::from_secs(1);
    let reducer = Coordinator::<C>::new(scheduler).for_each_route(ScreenReducer::default());
    let mut store: DemoStore<C> = Store::new(CoordinatorState::initial(), reducer);
    let mut renderer = Renderer {
        out,
        started: Instant::now(),
    };

    renderer.render("start", &store.state().routes)?;

    send_to_top(&mut store, ScreenAction::Home(HomeAction::StartTapped));
    renderer.render("numbers_list", &store.state().routes)?;

    send_to_top(&mut store, ScreenAction::NumbersList(NumbersListAction::NumberSelected(2)));
    renderer.render("number_detail", &store.state().routes)?;

    send_to_top(&mut store, ScreenAction::NumberDetail(NumberDetailAction::ShowDouble(2)));
    renderer.render("show_double", &store.state().routes)?;

    // The doubled detail starts a delayed increment, then the user swipes it
    // away. Its effect is cancelled with it.
    let dismissed = top_key(&store.state().routes);
    send_to_top(
        &mut store,
        ScreenAction::NumberDetail(NumberDetailAction::IncrementAfterDelayTapped),
    );
    let mut swiped = store.state().routes.clone();
    swiped.dismiss();
    store.send(CoordinatorAction::Router(RouterAction::UpdateRoutes(swiped)));
    renderer.render("swipe_dismiss", &store.state().routes)?;

    if let Some(id) = dismissed {
        store.send(CoordinatorAction::Router(RouterAction::RouteAction {
            id,
            action: ScreenAction::NumberDetail(NumberDetailAction::IncrementTapped),
        }));
    }

    send_to_top(&mut store, ScreenAction::NumberDetail(NumberDetailAction::ShowDouble(2)));
    renderer.render("show_double", &store.state().routes)?;

    send_to_top(&mut store, ScreenAction::NumberDetail(NumberDetailAction::GoBackToRootTapped));
    while store.state().routes.len() > 1 {
        match timeout(settle, store.receive()).await {
            Ok(Some(_)) => renderer.render("step", &store.state().routes)?,
            Ok(None) | Err(_) => {
                warn!("Transition stalled with {} routes", store.state().routes.len());
                break;
            }
        }
    }

    info!("Scenario finished");
    Ok(())
}

fn top_key<C: RoutableCollection>(routes: &C) -> Option<C::Key> {
    routes.len().checked_sub(1).and_then(|index| routes.key_at(index))
}

fn send_to_top<C>(store: &mut DemoStore<C>, action: ScreenAction)
where
    C: RoutableCollection<Screen = Screen> + Clone + Debug + Send + 'static,
{
    if let Some(id) = top_key(&store.state().routes) {
        store.send(CoordinatorAction::Router(RouterAction::RouteAction { id, action }));
    }
}
