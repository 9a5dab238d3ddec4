//! # Identified Routes
//!
//! A route list keyed by screen identity instead of position. Actions aimed at
//! a screen keep reaching it even if the routes around it change, and effect
//! cancellation follows the screen rather than its slot.

use std::fmt;
use std::hash::Hash;
use std::ops::Deref;

use log::error;
use serde::{Serialize, Serializer};

use crate::core::route::Route;
use crate::core::routes::RoutableCollection;

/// A screen payload with a stable identity.
pub trait Identifiable {
    type Id: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static;

    fn id(&self) -> Self::Id;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutesError {
    /// Two routes carry screens with the same identity.
    DuplicateId(String),
}

impl fmt::Display for RoutesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutesError::DuplicateId(id) => write!(f, "duplicate route identity: {id}"),
        }
    }
}

impl std::error::Error for RoutesError {}

/// A route list whose screens have unique identities.
#[derive(Clone, Debug)]
pub struct IdentifiedRoutes<S: Identifiable> {
    routes: Vec<Route<S>>,
}

impl<S: Identifiable> IdentifiedRoutes<S> {
    /// Builds a list, rejecting duplicate identities.
    pub fn new(routes: Vec<Route<S>>) -> Result<Self, RoutesError> {
        if let Some(id) = first_duplicate(&routes) {
            return Err(RoutesError::DuplicateId(format!("{id:?}")));
        }
        Ok(Self { routes })
    }

    pub fn with_root(screen: S, embed_in_navigation: bool) -> Self {
        Self {
            routes: vec![Route::root(screen, embed_in_navigation)],
        }
    }

    pub fn get(&self, id: &S::Id) -> Option<&Route<S>> {
        self.routes.iter().find(|route| route.screen.id() == *id)
    }

    pub fn get_mut(&mut self, id: &S::Id) -> Option<&mut Route<S>> {
        self.routes.iter_mut().find(|route| route.screen.id() == *id)
    }

    pub fn contains(&self, id: &S::Id) -> bool {
        self.get(id).is_some()
    }

    pub fn into_vec(self) -> Vec<Route<S>> {
        self.routes
    }
}

pub(crate) fn first_duplicate<S: Identifiable>(routes: &[Route<S>]) -> Option<S::Id> {
    let mut seen = std::collections::HashSet::with_capacity(routes.len());
    routes
        .iter()
        .map(|route| route.screen.id())
        .find(|id| !seen.insert(id.clone()))
}

impl<S: Identifiable> TryFrom<Vec<Route<S>>> for IdentifiedRoutes<S> {
    type Error = RoutesError;

    fn try_from(routes: Vec<Route<S>>) -> Result<Self, Self::Error> {
        Self::new(routes)
    }
}

impl<S: Identifiable> Deref for IdentifiedRoutes<S> {
    type Target = [Route<S>];

    fn deref(&self) -> &Self::Target {
        &self.routes
    }
}

impl<S: Identifiable + PartialEq> PartialEq for IdentifiedRoutes<S> {
    fn eq(&self, other: &Self) -> bool {
        self.routes == other.routes
    }
}

impl<S: Identifiable + Eq> Eq for IdentifiedRoutes<S> {}

impl<S: Identifiable + Serialize> Serialize for IdentifiedRoutes<S> {
    fn serialize<Z: Serializer>(&self, serializer: Z) -> Result<Z::Ok, Z::Error> {
        self.routes.serialize(serializer)
    }
}

impl<S: Identifiable> RoutableCollection for IdentifiedRoutes<S> {
    type Screen = S;
    type Key = S::Id;

    fn routes(&self) -> &[Route<S>] {
        &self.routes
    }

    fn route_mut(&mut self, index: usize) -> Option<&mut Route<S>> {
        self.routes.get_mut(index)
    }

    fn append(&mut self, route: Route<S>) {
        let id = route.screen.id();
        if self.contains(&id) {
            error!("Appending a route with duplicate identity {id:?}");
            debug_assert!(false, "duplicate route identity {id:?}");
        }
        self.routes.push(route);
    }

    fn truncate(&mut self, len: usize) {
        self.routes.truncate(len);
    }

    fn key_at(&self, index: usize) -> Option<S::Id> {
        self.routes.get(index).map(|route| route.screen.id())
    }

    fn position(&self, key: &S::Id) -> Option<usize> {
        self.routes.iter().position(|route| route.screen.id() == *key)
    }

    fn from_step(routes: Vec<Route<S>>) -> Self {
        Self { routes }
    }

    fn same_route(a: &Route<S>, b: &Route<S>) -> bool {
        a.style == b.style && a.screen.id() == b.screen.id()
    }

    fn accepts(routes: &[Route<S>]) -> bool {
        first_duplicate(routes).is_none()
    }
}
