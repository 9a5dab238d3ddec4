//! # Core Routing Logic
//!
//! Route lists, transition planning and the reducer plumbing that keeps a
//! coordinator's screens in sync with its routes. Nothing here renders.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │       Coordinator       │
//!                    │   (parent reducer)      │
//!                    │                         │
//!                    │  routes.push(..)        │
//!                    │  route_with_delays(..)  │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │   Steps    │─────▶│ Scheduler  │─────▶│   Router   │
//!     │  (plan)    │      │  (pace)    │      │ (adopt +   │
//!     │            │      │            │      │  forward)  │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`route`]: `Route` and `RouteStyle`, one entry of a route list
//! - [`routes`]: `RoutableCollection` and the index-keyed `Routes`
//! - [`identified`]: `IdentifiedRoutes`, keyed by screen identity
//! - [`steps`]: the step planner
//! - [`scheduler`]: paces planned steps over time
//! - [`effect`] / [`store`]: reducers, effects and the runtime that runs them
//! - [`router`]: `ForEachRoute` and `RouterAction`
//! - [`diagnostics`]: warnings about stale screen actions
//! - [`config`]: settings for the demo binary

pub mod config;
pub mod diagnostics;
pub mod effect;
pub mod identified;
pub mod route;
pub mod router;
pub mod routes;
pub mod scheduler;
pub mod steps;
pub mod store;

pub use route::{Route, RouteStyle};
pub use routes::{RoutableCollection, Routes};
pub use identified::{Identifiable, IdentifiedRoutes};
