//! Routing and negotiation core of the RestStack framework.
//!
//! This crate implements the two decision procedures at the heart of the
//! framework, plus the call-handling pipeline around them:
//!
//! - **Routing** ([`template`], [`route`], [`router`], [`host`]): compiled
//!   path templates with capture variables, scored route selection with
//!   pluggable routing modes, hierarchical routers (a [`Router`](router::Router)
//!   is itself a [`Target`](target::Target)), and virtual-host dispatch via
//!   [`Component`](host::Component).
//! - **Negotiation** ([`negotiation`], [`catalog`]): server-driven selection
//!   of the best representational variant against the client's ranked
//!   preferences.
//! - **Conditional requests** ([`conditions`]): tag/date precondition
//!   evaluation that can short-circuit the pipeline before handler logic
//!   runs.
//! - **Dispatch** ([`resource`], [`pipeline`], [`request`]): the
//!   per-call [`Resource`](resource::Resource) abstraction, the
//!   [`Finder`](resource::Finder) factory target, and the state machine
//!   driving conditions, negotiation, and verb invocation.
//!
//! # Architecture
//!
//! ```text
//! RestRequest
//!   -> Component (virtual host scoring)
//!     -> Router (route scoring, prefix consumption, variable capture)
//!       -> Router ... (nested dispatch)
//!         -> Finder (one Resource instance per call)
//!           -> DispatchPipeline
//!                conditions -> negotiation -> verb handler
//!   <- RestResponse (status + optional representation)
//! ```

pub mod catalog;
pub mod conditions;
pub mod host;
pub mod negotiation;
pub mod pipeline;
pub mod request;
pub mod resource;
pub mod route;
pub mod router;
pub mod target;
pub mod template;

pub use catalog::{SharedCatalog, VariantCatalog};
pub use host::{Component, VirtualHost};
pub use negotiation::select_best;
pub use pipeline::DispatchPipeline;
pub use request::{HostInfo, RestRequest, RestResponse};
pub use resource::{Finder, Resource};
pub use route::Route;
pub use router::{Router, RouterMode};
pub use target::Target;
pub use template::{MatchingMode, PathTemplate, TemplateError, TemplateMatch};
