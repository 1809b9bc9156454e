//! The per-call resource abstraction and its factory target.

use std::sync::Arc;

use async_trait::async_trait;
use http::Method;
use reststack_model::{Language, Representation, RepresentationInfo, RestError, Status, Variant};

use crate::pipeline::DispatchPipeline;
use crate::request::{RestRequest, RestResponse};
use crate::target::Target;

/// A resource handler, instantiated fresh for every call.
///
/// One instance is accessed by exactly one task for the lifetime of one
/// call, so implementations need no internal synchronization; state shared
/// across instances belongs in the factory closure (see
/// [`SharedCatalog`](crate::catalog::SharedCatalog) for variant lists).
///
/// The declarative methods (`exists`, `variants`, `representation_info`,
/// ...) feed the dispatch pipeline's decisions; the verb methods produce
/// the actual response. Verb methods default to a method-not-allowed
/// failure, so a resource only implements the verbs it supports and lists
/// them in [`allowed_methods`](Resource::allowed_methods).
#[async_trait]
pub trait Resource: Send {
    /// Whether the resource currently has any representation.
    fn exists(&self) -> bool {
        true
    }

    /// Whether precondition evaluation applies to this resource.
    fn evaluates_conditions(&self) -> bool {
        true
    }

    /// Whether content negotiation applies to this resource.
    fn negotiates_content(&self) -> bool {
        true
    }

    /// The methods this resource supports.
    fn allowed_methods(&self) -> Vec<Method> {
        vec![Method::GET, Method::HEAD, Method::OPTIONS]
    }

    /// The variants this resource can produce for the given method, in
    /// declaration order. A negotiating resource with an empty list has
    /// nothing to represent and resolves to a not-found outcome; resources
    /// that produce representations without declaring them should opt out
    /// via [`negotiates_content`](Resource::negotiates_content).
    fn variants(&self, method: &Method) -> Vec<Variant> {
        let _ = method;
        Vec::new()
    }

    /// Cheap representation metadata (tag, modification date) for
    /// precondition checks, without materializing a body.
    fn representation_info(&self) -> Option<RepresentationInfo> {
        None
    }

    /// The language preferred when negotiation ties remain.
    fn default_language(&self) -> Option<Language> {
        None
    }

    /// An optional entity describing the available variants, sent with
    /// not-acceptable outcomes. The pipeline falls back to a plain-text
    /// listing when this returns `None`.
    fn describe_variants(&self) -> Option<Representation> {
        None
    }

    /// Handle GET (and HEAD, whose entity the pipeline drops). The selected
    /// variant is bound when negotiation ran.
    async fn get(
        &mut self,
        request: &RestRequest,
        variant: Option<&Variant>,
    ) -> Result<RestResponse, RestError> {
        let _ = (request, variant);
        Err(RestError::method_not_allowed(Method::GET.as_str()))
    }

    /// Handle POST.
    async fn post(&mut self, request: &RestRequest) -> Result<RestResponse, RestError> {
        let _ = request;
        Err(RestError::method_not_allowed(Method::POST.as_str()))
    }

    /// Handle PUT.
    async fn put(&mut self, request: &RestRequest) -> Result<RestResponse, RestError> {
        let _ = request;
        Err(RestError::method_not_allowed(Method::PUT.as_str()))
    }

    /// Handle DELETE.
    async fn delete(&mut self, request: &RestRequest) -> Result<RestResponse, RestError> {
        let _ = request;
        Err(RestError::method_not_allowed(Method::DELETE.as_str()))
    }

    /// Handle OPTIONS. The pipeline attaches the allowed-methods set to
    /// whatever this returns.
    async fn options(&mut self, request: &RestRequest) -> Result<RestResponse, RestError> {
        let _ = request;
        Ok(RestResponse::status(Status::NoContent))
    }
}

/// The factory producing one [`Resource`] instance per call.
type ResourceFactory = dyn Fn(&RestRequest) -> Box<dyn Resource> + Send + Sync;

/// A target that creates a fresh resource instance for each call and runs
/// the dispatch pipeline on it.
///
/// This is the explicit replacement for reflective handler binding: the
/// factory closure is ordinary code registered at startup, and the verb
/// dispatch table is the static `match` inside
/// [`DispatchPipeline::dispatch`].
#[derive(Clone)]
pub struct Finder {
    factory: Arc<ResourceFactory>,
}

impl Finder {
    /// Create a finder from a resource factory.
    #[must_use]
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&RestRequest) -> Box<dyn Resource> + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
        }
    }

    /// Convenience: a finder for resources with a `Default` construction
    /// that ignores the request.
    #[must_use]
    pub fn of<R: Resource + Default + 'static>() -> Self {
        Self::new(|_| Box::new(R::default()))
    }
}

impl std::fmt::Debug for Finder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Finder").finish_non_exhaustive()
    }
}

#[async_trait]
impl Target for Finder {
    async fn handle(&self, request: &mut RestRequest) -> RestResponse {
        let mut resource = (self.factory)(request);
        DispatchPipeline::dispatch(resource.as_mut(), request).await
    }
}
