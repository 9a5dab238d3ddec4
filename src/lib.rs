//! Routestack library exports

use clap::ValueEnum;

pub mod core;
pub mod demo;

#[cfg(test)]
pub mod test_support;

/// Which route list the demo coordinator runs on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Screens addressed by position.
    #[default]
    Indexed,
    /// Screens addressed by their identity.
    Identified,
}
