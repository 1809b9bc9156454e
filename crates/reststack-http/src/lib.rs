//! HTTP layer for the RestStack framework.
//!
//! This crate wires the routing and negotiation core to hyper:
//!
//! - **Header codecs** ([`headers`]): Accept-style preference lists and
//!   If-* preconditions in, ETag/Last-Modified validators out.
//! - **Request assembly** ([`request`]): raw HTTP request parts plus the
//!   collected body become a [`RestRequest`](reststack_core::RestRequest)
//!   with a decoded path.
//! - **Response serialization** ([`response`]): dispatch outcomes become
//!   HTTP responses with content metadata, validators, `Allow`, and stable
//!   machine-readable error codes.
//! - **Body** ([`body`]): the buffered-or-empty [`RestBody`](body::RestBody)
//!   response body.
//! - **Service** ([`service`]): the hyper `Service` impl dispatching to a
//!   root [`Target`](reststack_core::Target), with request ids and health
//!   check interception.
//! - **Server** ([`server`]): the accept loop with graceful shutdown.
//!
//! # Architecture
//!
//! ```text
//! HTTP Request
//!   -> RestHttpService (hyper Service)
//!     -> health check interception
//!     -> body collection
//!     -> header parsing (preferences, conditions, host info)
//!     -> root Target dispatch (Component -> Router -> ... -> Finder)
//!     -> response serialization + common headers
//!   <- HTTP Response
//! ```

pub mod body;
pub mod headers;
pub mod request;
pub mod response;
pub mod server;
pub mod service;

pub use body::RestBody;
pub use request::from_http_parts;
pub use response::into_http_response;
pub use server::serve;
pub use service::{RestHttpConfig, RestHttpService};
