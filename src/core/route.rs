//! # Routes
//!
//! A `Route` is one entry in a navigation/presentation stack: a screen payload
//! plus the way it was shown.
//!
//! ```text
//! [ Root(Home) , Push(List) , Push(Detail) , Sheet(Settings) ]
//!   ^ always first                            ^ most recently shown
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::Serialize;

/// How a route was shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteStyle {
    Root { embed_in_navigation: bool },
    Push,
    Sheet { embed_in_navigation: bool },
    /// Full-screen modal presentation.
    Cover { embed_in_navigation: bool },
}

impl RouteStyle {
    pub fn is_presented(&self) -> bool {
        matches!(self, RouteStyle::Sheet { .. } | RouteStyle::Cover { .. })
    }

    pub fn is_root(&self) -> bool {
        matches!(self, RouteStyle::Root { .. })
    }

    /// Whether screens shown in this style get their own navigation container,
    /// i.e. whether pushes on top of it are possible.
    pub fn embeds_navigation(&self) -> bool {
        match self {
            RouteStyle::Root { embed_in_navigation }
            | RouteStyle::Sheet { embed_in_navigation }
            | RouteStyle::Cover { embed_in_navigation } => *embed_in_navigation,
            RouteStyle::Push => false,
        }
    }
}

/// Callback fired when a route leaves the stack.
///
/// Hooks take no part in route equality or hashing; a route's identity is
/// decided by its style and screen alone.
#[derive(Clone)]
pub struct DismissHook(Arc<dyn Fn() + Send + Sync>);

impl DismissHook {
    pub fn new(hook: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(hook))
    }

    pub fn call(&self) {
        (self.0)()
    }
}

/// Hooks are equal when they share the same closure.
impl PartialEq for DismissHook {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for DismissHook {}

impl fmt::Debug for DismissHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DismissHook")
    }
}

/// One entry of a route list.
#[derive(Clone, Debug, Serialize)]
pub struct Route<S> {
    #[serde(flatten)]
    pub style: RouteStyle,
    pub screen: S,
    #[serde(skip)]
    pub on_dismiss: Option<DismissHook>,
}

impl<S> Route<S> {
    pub fn new(style: RouteStyle, screen: S) -> Self {
        Self {
            style,
            screen,
            on_dismiss: None,
        }
    }

    pub fn root(screen: S, embed_in_navigation: bool) -> Self {
        Self::new(RouteStyle::Root { embed_in_navigation }, screen)
    }

    pub fn push(screen: S) -> Self {
        Self::new(RouteStyle::Push, screen)
    }

    pub fn sheet(screen: S, embed_in_navigation: bool) -> Self {
        Self::new(RouteStyle::Sheet { embed_in_navigation }, screen)
    }

    pub fn cover(screen: S, embed_in_navigation: bool) -> Self {
        Self::new(RouteStyle::Cover { embed_in_navigation }, screen)
    }

    /// Attaches a callback to run once this route is removed from the stack.
    pub fn on_dismiss(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_dismiss = Some(DismissHook::new(hook));
        self
    }

    pub fn is_presented(&self) -> bool {
        self.style.is_presented()
    }

    pub fn is_root(&self) -> bool {
        self.style.is_root()
    }

    /// Same style and hook, different screen payload.
    pub fn map_screen<T>(self, f: impl FnOnce(S) -> T) -> Route<T> {
        Route {
            style: self.style,
            screen: f(self.screen),
            on_dismiss: self.on_dismiss,
        }
    }
}

impl<S: PartialEq> PartialEq for Route<S> {
    fn eq(&self, other: &Self) -> bool {
        self.style == other.style && self.screen == other.screen
    }
}

impl<S: Eq> Eq for Route<S> {}

impl<S: Hash> Hash for Route<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.style.hash(state);
        self.screen.hash(state);
    }
}
