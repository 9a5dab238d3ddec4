//! # Route Collections
//!
//! `RoutableCollection` is the shared mutation vocabulary for route lists.
//! Implementors only supply storage primitives (`routes`, `append`, `truncate`
//! and key lookup); every navigation operation is a provided method written
//! purely in terms of those.
//!
//! All operations are total. Asking for something impossible (popping the
//! root, going back to a screen that isn't there) is a no-op, reported through
//! a `bool` where the caller needs to know.

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::{Deref, Index};

use serde::Serialize;

use crate::core::route::Route;

pub trait RoutableCollection {
    type Screen;
    /// How a route is addressed by actions: its index, or its screen identity.
    type Key: Clone + Eq + Hash + Debug + Send + Sync + 'static;

    fn routes(&self) -> &[Route<Self::Screen>];

    fn route_mut(&mut self, index: usize) -> Option<&mut Route<Self::Screen>>;

    fn append(&mut self, route: Route<Self::Screen>);

    fn truncate(&mut self, len: usize);

    fn key_at(&self, index: usize) -> Option<Self::Key>;

    fn position(&self, key: &Self::Key) -> Option<usize>;

    /// Rebuilds a collection from a planner step. Steps are assembled from
    /// prefixes of valid collections, so no re-validation is needed.
    fn from_step(routes: Vec<Route<Self::Screen>>) -> Self;

    /// Whether two routes at the same position are "the same route" for
    /// transition planning. Matching routes may still differ in payload.
    fn same_route(a: &Route<Self::Screen>, b: &Route<Self::Screen>) -> bool;

    /// Whether this collection could hold `routes`. Used by the planner to
    /// keep intermediate steps valid.
    fn accepts(routes: &[Route<Self::Screen>]) -> bool {
        let _ = routes;
        true
    }

    // ------------------------------------------------------------------------
    // Provided operations
    // ------------------------------------------------------------------------

    fn len(&self) -> usize {
        self.routes().len()
    }

    fn is_empty(&self) -> bool {
        self.routes().is_empty()
    }

    fn keys(&self) -> Vec<Self::Key> {
        (0..self.len()).filter_map(|index| self.key_at(index)).collect()
    }

    fn top(&self) -> Option<&Route<Self::Screen>> {
        self.routes().last()
    }

    /// Pushes a screen onto the current navigation stack.
    fn push(&mut self, screen: Self::Screen) {
        self.append(Route::push(screen));
    }

    fn present_sheet(&mut self, screen: Self::Screen, embed_in_navigation: bool) {
        self.append(Route::sheet(screen, embed_in_navigation));
    }

    fn present_cover(&mut self, screen: Self::Screen, embed_in_navigation: bool) {
        self.append(Route::cover(screen, embed_in_navigation));
    }

    /// Removes the last `count` routes, never the root.
    fn pop(&mut self, count: usize) {
        let keep = self.len().saturating_sub(count).max(self.root_floor());
        self.truncate(keep);
    }

    /// Removes the topmost route unless it is the root.
    fn go_back(&mut self) {
        self.pop(1);
    }

    /// Removes the topmost route unless it is the root.
    fn dismiss(&mut self) {
        self.pop(1);
    }

    /// Dismisses every presented route, and anything pushed on top of them.
    fn dismiss_all(&mut self) {
        if let Some(first_presented) = self.routes().iter().position(Route::is_presented) {
            self.truncate(first_presented.max(self.root_floor()));
        }
    }

    fn pop_to_root(&mut self) {
        let floor = self.root_floor();
        self.truncate(floor);
    }

    /// Truncates so that the route at `index` becomes the top. Out-of-range
    /// indices leave the list unchanged.
    fn go_back_to_index(&mut self, index: usize) -> bool {
        if index >= self.len() {
            return false;
        }
        self.truncate(index + 1);
        true
    }

    /// Like [`go_back_to_index`](Self::go_back_to_index), but only within the
    /// current navigation stack.
    fn pop_to_index(&mut self, index: usize) -> bool {
        if index < self.navigation_root_index() {
            return false;
        }
        self.go_back_to_index(index)
    }

    /// Goes back to the most recently shown route matching `condition`,
    /// dismissing presentations on the way if needed.
    fn go_back_to(&mut self, condition: impl Fn(&Self::Screen) -> bool) -> bool {
        match self.routes().iter().rposition(|route| condition(&route.screen)) {
            Some(index) => self.go_back_to_index(index),
            None => false,
        }
    }

    /// Pops to the most recently pushed route matching `condition`. Only the
    /// current navigation stack is searched, so nothing presented is dismissed.
    fn pop_to(&mut self, condition: impl Fn(&Self::Screen) -> bool) -> bool {
        let start = self.navigation_root_index();
        match self.routes()[start..]
            .iter()
            .rposition(|route| condition(&route.screen))
        {
            Some(offset) => self.go_back_to_index(start + offset),
            None => false,
        }
    }

    /// Pops every pushed route above the route hosting the current navigation stack.
    fn pop_to_current_navigation_root(&mut self) {
        if !self.is_empty() {
            let index = self.navigation_root_index();
            self.truncate(index + 1);
        }
    }

    /// Advisory: whether a push would land inside a navigation container.
    fn can_push(&self) -> bool {
        match self.top() {
            Some(route) => !route.is_presented() || route.style.embeds_navigation(),
            None => false,
        }
    }

    /// Index of the root or presented route that hosts the topmost run of pushes.
    fn navigation_root_index(&self) -> usize {
        self.routes()
            .iter()
            .rposition(|route| route.is_root() || route.is_presented())
            .unwrap_or(0)
    }

    #[doc(hidden)]
    fn root_floor(&self) -> usize {
        match self.routes().first() {
            Some(route) if route.is_root() => 1,
            _ => 0,
        }
    }
}

/// A route list whose entries are addressed by index.
///
/// Index addressing is safe as long as the only changes are pushes and pops;
/// use [`IdentifiedRoutes`](crate::core::identified::IdentifiedRoutes) when
/// screens need a stable identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Routes<S>(Vec<Route<S>>);

impl<S> Routes<S> {
    pub fn new(routes: Vec<Route<S>>) -> Self {
        Self(routes)
    }

    /// A list holding only the root screen.
    pub fn with_root(screen: S, embed_in_navigation: bool) -> Self {
        Self(vec![Route::root(screen, embed_in_navigation)])
    }

    pub fn into_vec(self) -> Vec<Route<S>> {
        self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Route<S>> {
        self.0.iter()
    }
}

impl<S> Default for Routes<S> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<S> From<Vec<Route<S>>> for Routes<S> {
    fn from(routes: Vec<Route<S>>) -> Self {
        Self(routes)
    }
}

impl<S> Deref for Routes<S> {
    type Target = [Route<S>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> Index<usize> for Routes<S> {
    type Output = Route<S>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<S> IntoIterator for Routes<S> {
    type Item = Route<S>;
    type IntoIter = std::vec::IntoIter<Route<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, S> IntoIterator for &'a Routes<S> {
    type Item = &'a Route<S>;
    type IntoIter = std::slice::Iter<'a, Route<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<S: PartialEq> RoutableCollection for Routes<S> {
    type Screen = S;
    type Key = usize;

    fn routes(&self) -> &[Route<S>] {
        &self.0
    }

    fn route_mut(&mut self, index: usize) -> Option<&mut Route<S>> {
        self.0.get_mut(index)
    }

    fn append(&mut self, route: Route<S>) {
        self.0.push(route);
    }

    fn truncate(&mut self, len: usize) {
        self.0.truncate(len);
    }

    fn key_at(&self, index: usize) -> Option<usize> {
        (index < self.0.len()).then_some(index)
    }

    fn position(&self, key: &usize) -> Option<usize> {
        (*key < self.0.len()).then_some(*key)
    }

    fn from_step(routes: Vec<Route<S>>) -> Self {
        Self(routes)
    }

    fn same_route(a: &Route<S>, b: &Route<S>) -> bool {
        a == b
    }
}
