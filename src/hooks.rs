//! Lifecycle hook types and the uniform hook contract.
//!
//! Every asynchronous lifecycle point — filters, `prepare`, `execute`,
//! `exit` — is a [`HookFn`]: a shared closure taking the
//! [`NavigationContext`] and returning a boxed future resolving to a
//! [`HookResult`]. The router awaits each hook before the next one starts
//! and acts uniformly on the result:
//!
//! - [`HookResult::Continue`] — proceed to the next stage.
//! - [`HookResult::Cancel`] — cancel the attempt and restore the previous
//!   committed state.
//! - [`HookResult::Redirect`] — run the target fragment's full lifecycle
//!   instead; the current pass ends silently.
//! - [`HookResult::Failure`] — attach the error to the context and take the
//!   cancel path, then consult the route's error hook.
//!
//! Synchronous hooks simply return a ready future; the [`hook`] helper boxes
//! any `async` closure into a [`HookFn`].

use crate::context::NavigationContext;
use crate::error::NavigationError;
use crate::history::NavigateOptions;
use futures::future::{self, BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;

/// Resolution of a single lifecycle hook.
#[derive(Debug, Clone, PartialEq)]
pub enum HookResult {
    /// Proceed to the next pipeline stage
    Continue,
    /// Cancel the navigation and restore the previous state
    Cancel,
    /// Abandon this pass and navigate to the given fragment instead
    Redirect(String),
    /// A genuine error; takes the cancel path and the error hook
    Failure(NavigationError),
}

impl HookResult {
    /// Build a redirect result from any fragment-like value.
    pub fn redirect(fragment: impl Into<String>) -> Self {
        HookResult::Redirect(fragment.into())
    }

    /// `true` for [`HookResult::Continue`].
    pub fn is_continue(&self) -> bool {
        matches!(self, HookResult::Continue)
    }

    /// Package this result as an already-resolved [`HookFuture`].
    pub fn ready(self) -> HookFuture {
        future::ready(self).boxed()
    }
}

/// Boxed future resolving to a [`HookResult`].
pub type HookFuture = BoxFuture<'static, HookResult>;

/// Shared asynchronous lifecycle hook.
pub type HookFn = Arc<dyn Fn(NavigationContext) -> HookFuture + Send + Sync>;

/// Synchronous guard consulted before the location changes.
///
/// Returning `false` vetoes the navigation outright.
pub type GuardFn = Arc<dyn Fn(&str, &NavigateOptions) -> bool + Send + Sync>;

/// Synchronous callback invoked when a handler is entered or exited.
pub type ActivateFn = Arc<dyn Fn(&NavigationContext) + Send + Sync>;

/// Synchronous error hook consulted after the cancel path ran.
pub type ErrorFn = Arc<dyn Fn(&NavigationContext, &NavigationError) -> ErrorDisposition + Send + Sync>;

/// What a route's error hook decided about a navigation failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDisposition {
    /// The hook dealt with the error; no `error` event is emitted
    Handled,
    /// Let the router emit its `error` event
    Unhandled,
    /// Recover by navigating to the given fragment
    Redirect(String),
}

/// Box an async closure into a [`HookFn`].
///
/// ```
/// use wayfinder::hooks::{hook, HookResult};
///
/// let prepare = hook(|_ctx| async { HookResult::Continue });
/// # let _ = prepare;
/// ```
pub fn hook<F, Fut>(f: F) -> HookFn
where
    F: Fn(NavigationContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HookResult> + Send + 'static,
{
    Arc::new(move |ctx| f(ctx).boxed())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_result_ready() {
        let result = pollster::block_on(HookResult::Continue.ready());
        assert!(result.is_continue());
    }

    #[test]
    fn test_hook_helper_boxes_async_closures() {
        let h = hook(|ctx: NavigationContext| async move {
            if ctx.name == "blocked" {
                HookResult::Cancel
            } else {
                HookResult::Continue
            }
        });

        let ctx = NavigationContext {
            name: "blocked".to_string(),
            ..NavigationContext::default()
        };
        assert_eq!(pollster::block_on(h(ctx)), HookResult::Cancel);
    }

    #[test]
    fn test_redirect_constructor() {
        assert_eq!(
            HookResult::redirect("login"),
            HookResult::Redirect("login".to_string())
        );
    }
}
