//! Client-side navigation engine with pattern routing, async filters, and
//! route hierarchies.
//!
//! `wayfinder` dispatches URL fragments to routes through a cancelable,
//! asynchronous lifecycle:
//!
//! - **Templates** mix literals, `:name` parameters, `*name` splats and
//!   `( ... )` optional groups, compile once to matchers and run both ways —
//!   the same template builds URLs from parameter maps
//!   ([`pattern`]).
//! - **Routes** carry `prepare` / `execute` / `exit` hooks, guards, error
//!   hooks and filters; every hook may cancel, redirect or fail the attempt
//!   ([`route`], [`hooks`]).
//! - **Filters** run strictly sequentially, router-level before route-level
//!   ([`filter`]).
//! - **Hierarchy** queries derive breadcrumbs, menus and sibling lists from
//!   dot-delimited route names ([`hierarchy`]).
//! - **Sections** mount whole sub-routers under a URL subtree ([`section`]).
//!
//! The host environment is reached only through the [`history::HistoryRelay`]
//! trait; the bundled [`history::MemoryHistory`] backs tests and headless
//! hosts.
//!
//! # Example
//!
//! ```
//! use wayfinder::{
//!     HookResult, NavigateOptions, Route, RouteParams, Router, RouterOptions,
//! };
//!
//! let mut router = Router::new(RouterOptions::new());
//! router
//!     .route_named(
//!         "users.show",
//!         "users/:id",
//!         Route::new().on_execute(|_ctx| async { HookResult::Continue }),
//!     )
//!     .unwrap();
//!
//! let result = pollster::block_on(
//!     router.navigate("users/42", NavigateOptions::trigger()),
//! );
//! assert!(result.is_completed());
//! assert_eq!(
//!     router.current().unwrap().parameters.get("id"),
//!     Some(&"42".to_string()),
//! );
//!
//! let mut params = RouteParams::new();
//! params.set("id".to_string(), "7".to_string());
//! assert_eq!(router.url_for("users.show", &params), "users/7");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "cache")]
pub mod cache;
pub mod context;
pub mod error;
pub mod events;
pub mod filter;
pub mod hierarchy;
pub mod history;
pub mod hooks;
mod logging;
pub mod params;
pub mod pattern;
pub mod registry;
pub mod route;
pub mod router;
pub mod section;

#[cfg(feature = "cache")]
pub use cache::{CacheStats, DispatchCache};
pub use context::{NavigationContext, NavigationState};
pub use error::{NavigationError, NavigationResult};
pub use events::Emitter;
pub use filter::{Filter, FilterPhase, FilterRegistry};
pub use hierarchy::RouteNode;
pub use history::{HistoryRelay, MemoryHistory, NavigateOptions};
pub use hooks::{ErrorDisposition, HookResult};
pub use params::RouteParams;
pub use pattern::{build_url, deserialize_params, serialize_params, RoutePattern, UrlParams};
pub use registry::{RouteEntry, RouteRegistry};
pub use route::{Handler, Route, RouteConfig};
pub use router::{RouteSpec, Router, RouterOptions, MAX_REDIRECT_DEPTH};
pub use section::Section;
