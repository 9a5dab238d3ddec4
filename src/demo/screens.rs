//! The three demo screens and the reducer that drives them.

use std::time::Duration;

use log::debug;
use serde::Serialize;
use uuid::Uuid;

use crate::core::effect::Effect;
use crate::core::identified::Identifiable;
use crate::core::store::Reducer;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Home {
    pub id: Uuid,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NumbersList {
    pub id: Uuid,
    pub numbers: Vec<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NumberDetail {
    pub id: Uuid,
    pub number: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    Home(Home),
    NumbersList(NumbersList),
    NumberDetail(NumberDetail),
}

impl Screen {
    pub fn home() -> Self {
        Screen::Home(Home { id: Uuid::new_v4() })
    }

    pub fn numbers_list(numbers: impl IntoIterator<Item = i64>) -> Self {
        Screen::NumbersList(NumbersList {
            id: Uuid::new_v4(),
            numbers: numbers.into_iter().collect(),
        })
    }

    pub fn number_detail(number: i64) -> Self {
        Screen::NumberDetail(NumberDetail {
            id: Uuid::new_v4(),
            number,
        })
    }

    pub fn is_numbers_list(&self) -> bool {
        matches!(self, Screen::NumbersList(_))
    }
}

impl Identifiable for Screen {
    type Id = Uuid;

    fn id(&self) -> Uuid {
        match self {
            Screen::Home(home) => home.id,
            Screen::NumbersList(list) => list.id,
            Screen::NumberDetail(detail) => detail.id,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum HomeAction {
    StartTapped,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NumbersListAction {
    NumberSelected(i64),
}

#[derive(Clone, Debug, PartialEq)]
pub enum NumberDetailAction {
    GoBackTapped,
    GoBackToRootTapped,
    GoBackToNumbersList,
    IncrementAfterDelayTapped,
    IncrementTapped,
    ShowDouble(i64),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ScreenAction {
    Home(HomeAction),
    NumbersList(NumbersListAction),
    NumberDetail(NumberDetailAction),
}

pub const DEFAULT_INCREMENT_DELAY: Duration = Duration::from_secs(3);

/// Screen-local logic. Navigation requests are left to the coordinator.
#[derive(Debug, Clone)]
pub struct ScreenReducer {
    pub increment_delay: Duration,
}

impl Default for ScreenReducer {
    fn default() -> Self {
        Self {
            increment_delay: DEFAULT_INCREMENT_DELAY,
        }
    }
}

impl Reducer for ScreenReducer {
    type State = Screen;
    type Action = ScreenAction;

    fn reduce(&self, state: &mut Screen, action: ScreenAction) -> Effect<ScreenAction> {
        match (state, action) {
            (Screen::NumberDetail(detail), ScreenAction::NumberDetail(action)) => match action {
                NumberDetailAction::IncrementTapped => {
                    detail.number += 1;
                    Effect::none()
                }
                NumberDetailAction::IncrementAfterDelayTapped => {
                    let delay = self.increment_delay;
                    Effect::future(async move {
                        tokio::time::sleep(delay).await;
                        ScreenAction::NumberDetail(NumberDetailAction::IncrementTapped)
                    })
                }
                _ => Effect::none(),
            },
            (Screen::Home(_), ScreenAction::Home(_))
            | (Screen::NumbersList(_), ScreenAction::NumbersList(_)) => Effect::none(),
            (screen, action) => {
                debug!("Ignoring {action:?} sent to {screen:?}");
                Effect::none()
            }
        }
    }
}
