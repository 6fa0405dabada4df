//! Declarative macros for effect construction
//!
//! These macros cut the boilerplate of boxing futures and actions when a
//! reducer builds its effect list.

/// Create an `Effect::Future` from an async block
///
/// The body is moved into an `async move` block and must evaluate to
/// `Option<Action>`.
///
/// # Example
///
/// ```
/// use cartflow_core::{async_effect, effect::Effect};
///
/// #[derive(Debug)]
/// enum CatalogAction { Loaded(Vec<String>) }
///
/// let names = vec!["Leather Wallet".to_string()];
/// let effect: Effect<CatalogAction> = async_effect! {
///     Some(CatalogAction::Loaded(names))
/// };
/// assert!(matches!(effect, Effect::Future(_)));
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Delay` for scheduling delayed actions
///
/// # Example
///
/// ```
/// use cartflow_core::{delay, effect::Effect};
/// use std::time::Duration;
///
/// #[derive(Debug)]
/// enum BannerAction { Dismiss }
///
/// let effect: Effect<BannerAction> = delay! {
///     duration: Duration::from_secs(3),
///     action: BannerAction::Dismiss
/// };
/// assert!(matches!(effect, Effect::Delay { .. }));
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}
