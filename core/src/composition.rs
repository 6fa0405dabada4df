//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers in various ways:
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//! - **`scope_reducer`**: Focus a child reducer on a subset of state and a
//!   subset of actions
//!
//! # Examples
//!
//! ## Scoping and combining
//!
//! ```
//! use cartflow_core::{smallvec, effect::{Effect, Effects}, reducer::Reducer};
//! use cartflow_core::composition::{combine_reducers, scope_reducer};
//! use std::convert::Infallible;
//!
//! #[derive(Clone, Default)]
//! struct BadgeState { count: u32 }
//!
//! #[derive(Clone)]
//! enum BadgeAction { Bump }
//!
//! struct BadgeReducer;
//!
//! impl Reducer for BadgeReducer {
//!     type State = BadgeState;
//!     type Action = BadgeAction;
//!     type Environment = ();
//!     type Error = Infallible;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut BadgeState,
//!         _action: BadgeAction,
//!         _env: &(),
//!     ) -> Result<Effects<BadgeAction>, Infallible> {
//!         state.count += 1;
//!         Ok(smallvec![Effect::None])
//!     }
//! }
//!
//! #[derive(Clone, Default)]
//! struct AppState { badge: BadgeState }
//!
//! #[derive(Clone)]
//! enum AppAction { Badge(BadgeAction) }
//!
//! let badge = scope_reducer::<AppState, _, AppAction, (), Infallible, _>(
//!     BadgeReducer,
//!     |app| &mut app.badge,
//!     |action| match action { AppAction::Badge(a) => Some(a) },
//!     AppAction::Badge,
//! );
//! let app = combine_reducers(vec![Box::new(badge)]);
//!
//! let mut state = AppState::default();
//! let _ = app.reduce(&mut state, AppAction::Badge(BadgeAction::Bump), &());
//! assert_eq!(state.badge.count, 1);
//! ```

use crate::effect::{Effect, Effects};
use crate::reducer::Reducer;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence and all effects are concatenated. Later
/// reducers observe the state as left by earlier ones, so a coordinator that
/// only reads state belongs at the end of the list.
///
/// The first rejection stops the chain and is returned as is. Reducers that
/// ran before it must not have touched state for that action; combining
/// reducers over disjoint action sets keeps that true.
#[must_use]
pub fn combine_reducers<S, A, E, Err>(
    reducers: Vec<
        Box<dyn Reducer<State = S, Action = A, Environment = E, Error = Err> + Send + Sync>,
    >,
) -> CombinedReducer<S, A, E, Err>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
    Err: 'static,
{
    CombinedReducer { reducers }
}

/// Boxed reducer stored by [`CombinedReducer`]
type BoxedReducer<S, A, E, Err> =
    Box<dyn Reducer<State = S, Action = A, Environment = E, Error = Err> + Send + Sync>;

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E, Err>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
    Err: 'static,
{
    reducers: Vec<BoxedReducer<S, A, E, Err>>,
}

impl<S, A, E, Err> Reducer for CombinedReducer<S, A, E, Err>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
    Err: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;
    type Error = Err;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Result<Effects<Self::Action>, Self::Error> {
        let mut all_effects = Effects::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env)?;
            all_effects.extend(effects.into_iter().filter(|e| !e.is_none()));
        }

        Ok(all_effects)
    }
}

/// Scopes a child reducer to a subset of a larger state and action type.
///
/// - `state`: lens from the parent state to the child state
/// - `extract`: returns the child action if this parent action is one
/// - `embed`: wraps child actions produced by effects back into the parent type
///
/// Parent actions that `extract` rejects are ignored. Child errors are
/// converted into the parent error type with `Into`.
pub fn scope_reducer<S, SubS, A, E, Err, R>(
    reducer: R,
    state: fn(&mut S) -> &mut SubS,
    extract: fn(A) -> Option<R::Action>,
    embed: fn(R::Action) -> A,
) -> ScopedReducer<S, SubS, A, E, Err, R>
where
    R: Reducer<State = SubS, Environment = ()>,
{
    ScopedReducer {
        reducer,
        state,
        extract,
        embed,
        _phantom: std::marker::PhantomData,
    }
}

/// A scoped reducer that operates on a subset of state.
///
/// Created by [`scope_reducer`]. Child reducers are environment-free; anything
/// that needs injected dependencies runs at the parent level.
pub struct ScopedReducer<S, SubS, A, E, Err, R>
where
    R: Reducer<State = SubS, Environment = ()>,
{
    reducer: R,
    state: fn(&mut S) -> &mut SubS,
    extract: fn(A) -> Option<R::Action>,
    embed: fn(R::Action) -> A,
    _phantom: std::marker::PhantomData<fn() -> (E, Err)>,
}

impl<S, SubS, A, E, Err, R> Reducer for ScopedReducer<S, SubS, A, E, Err, R>
where
    R: Reducer<State = SubS, Environment = ()>,
    R::Action: 'static,
    R::Error: Into<Err>,
    A: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;
    type Error = Err;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> Result<Effects<Self::Action>, Self::Error> {
        let Some(child_action) = (self.extract)(action) else {
            return Ok(Effects::new());
        };

        let effects = self
            .reducer
            .reduce((self.state)(state), child_action, &())
            .map_err(Into::into)?;

        let embed = self.embed;
        Ok(effects
            .into_iter()
            .filter(|e| !e.is_none())
            .map(|e: Effect<R::Action>| e.map(embed))
            .collect())
    }
}
