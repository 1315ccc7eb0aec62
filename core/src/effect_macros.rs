//! Declarative macro for scheduling delayed actions

/// Create an `Effect::Delay` for scheduling delayed actions
///
/// # Example
///
/// ```rust
/// use stellar_burger_core::{delay, Effect};
/// use std::time::Duration;
///
/// #[derive(Debug)]
/// enum FeedAction {
///     PollTick,
/// }
///
/// let effect = delay! {
///     duration: Duration::from_secs(5),
///     action: FeedAction::PollTick
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
