//! # Route Steps
//!
//! Plans how to get from one route list to another when the renderer can only
//! animate one structural change per update: one push, one pop, one present
//! or one dismiss.
//!
//! ```text
//! from: [Home, List, Detail]          to: [Home, Settings]
//!
//!   [Home, List]          pop Detail
//!   [Home]                pop List
//!   [Home, Settings]      push Settings
//! ```
//!
//! The plan is three phases, each optional:
//!
//! 1. **In place**: routes below the divergence point take their new payloads
//!    without any structural change.
//! 2. **Down**: remove routes above the divergence point, most recent first.
//! 3. **Up**: append the target's remaining routes in order.
//!
//! The last step always equals the target. Planning never fails.

use log::trace;

use crate::core::identified::{Identifiable, first_duplicate};
use crate::core::route::Route;
use crate::core::routes::RoutableCollection;

/// One full route list snapshot the renderer has to pass through.
pub type Step<S> = Vec<Route<S>>;

/// Plans steps, treating routes as the same when they are equal by value.
pub fn calculate_steps<S>(from: &[Route<S>], to: &[Route<S>]) -> Vec<Step<S>>
where
    S: Clone + PartialEq,
{
    calculate_steps_by(from, to, |a, b| a == b)
}

/// Plans steps, treating routes as the same when style and screen identity
/// match. Screens keeping their identity are updated in place.
pub fn calculate_identified_steps<S>(from: &[Route<S>], to: &[Route<S>]) -> Vec<Step<S>>
where
    S: Identifiable + Clone + PartialEq,
{
    plan_steps(
        from,
        to,
        |a, b| a.style == b.style && a.screen.id() == b.screen.id(),
        has_unique_ids,
    )
}

/// Plans steps between two collections using the collection's own notion of
/// route sameness.
pub fn plan_transition<C>(from: &C, to: &C) -> Vec<C>
where
    C: RoutableCollection,
    C::Screen: Clone + PartialEq,
{
    plan_steps(from.routes(), to.routes(), C::same_route, C::accepts)
        .into_iter()
        .map(C::from_step)
        .collect()
}

/// Plans steps with a custom route matcher.
///
/// `same_route` decides how far the two lists share structure. Matching routes
/// below the divergence point are swapped for their target payload in a single
/// leading step; everything above it is popped and rebuilt one route at a time.
pub fn calculate_steps_by<S, F>(from: &[Route<S>], to: &[Route<S>], same_route: F) -> Vec<Step<S>>
where
    S: Clone + PartialEq,
    F: Fn(&Route<S>, &Route<S>) -> bool,
{
    plan_steps(from, to, same_route, |_| true)
}

/// `accepts` rejects snapshots the target collection could not hold. When the
/// leading in-place step is rejected, the in-place update happens after the
/// pops instead, once the conflicting routes are gone.
fn plan_steps<S, F, V>(
    from: &[Route<S>],
    to: &[Route<S>],
    same_route: F,
    accepts: V,
) -> Vec<Step<S>>
where
    S: Clone + PartialEq,
    F: Fn(&Route<S>, &Route<S>) -> bool,
    V: Fn(&[Route<S>]) -> bool,
{
    if from == to || is_payload_only_change(from, to) {
        return vec![to.to_vec()];
    }

    let divergence = divergence_index(from, to, &same_route);
    let removals = from.len() - divergence;
    let additions = to.len() - divergence;
    let mut steps = Vec::with_capacity(1 + removals + additions);

    let leading: Step<S> = to[..divergence]
        .iter()
        .chain(&from[divergence..])
        .cloned()
        .collect();
    let update_first = accepts(&leading);
    let mut current = if update_first { leading } else { from.to_vec() };
    if current.as_slice() != from {
        steps.push(current.clone());
    }

    while current.len() > divergence {
        current.pop();
        steps.push(current.clone());
    }

    if !update_first && current[..] != to[..divergence] {
        current = to[..divergence].to_vec();
        steps.push(current.clone());
    }

    for route in &to[divergence..] {
        current.push(route.clone());
        steps.push(current.clone());
    }

    trace!(
        "Planned {} steps: divergence={divergence} removals={removals} additions={additions} \
         update_first={update_first}",
        steps.len()
    );
    steps
}

/// Same shape, different payloads: nothing needs to animate.
fn is_payload_only_change<S>(from: &[Route<S>], to: &[Route<S>]) -> bool {
    from.len() == to.len() && from.iter().zip(to).all(|(a, b)| a.style == b.style)
}

fn has_unique_ids<S: Identifiable>(routes: &[Route<S>]) -> bool {
    first_duplicate(routes).is_none()
}

fn divergence_index<S, F>(from: &[Route<S>], to: &[Route<S>], same_route: &F) -> usize
where
    F: Fn(&Route<S>, &Route<S>) -> bool,
{
    // Roots are swapped in place, never popped.
    let mut index = match (from.first(), to.first()) {
        (Some(a), Some(b)) if a.is_root() && b.is_root() => 1,
        _ => 0,
    };
    let shared = from.len().min(to.len());
    while index < shared && same_route(&from[index], &to[index]) {
        index += 1;
    }
    index
}
