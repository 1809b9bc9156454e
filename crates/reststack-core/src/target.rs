//! The uniform handling capability.

use async_trait::async_trait;

use crate::request::{RestRequest, RestResponse};

/// Anything capable of handling a request.
///
/// Both leaf resource handlers (via [`Finder`](crate::resource::Finder)) and
/// [`Router`](crate::router::Router)s implement this trait, which is what
/// makes hierarchical dispatch possible: a router delegates to a target that
/// may itself be another router. Exactly one target is invoked per terminal
/// dispatch.
#[async_trait]
pub trait Target: Send + Sync {
    /// Handle the request and produce a response.
    ///
    /// The request carries the per-call dispatch state: the remaining path
    /// cursor and the variable bindings captured by enclosing routers.
    async fn handle(&self, request: &mut RestRequest) -> RestResponse;
}
