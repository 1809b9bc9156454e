//! Scored route selection and hierarchical dispatch.
//!
//! A [`Router`] holds an ordered list of [`Route`]s and selects among them
//! per its [`RouterMode`]. Routers implement [`Target`], so a route's target
//! may itself be another router: each level consumes the prefix its template
//! matched and passes the remainder down, accumulating captured variables
//! along the way.
//!
//! # Concurrency
//!
//! The route list is copy-on-write: readers clone an `Arc` snapshot and
//! score against an immutable list, while `attach`/`detach` build a new
//! list under a write lock and swap it in. Concurrent dispatches therefore
//! always observe either the old or the new list, never a partial update.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use rand::RngExt;
use reststack_model::Status;

use crate::request::{RestRequest, RestResponse};
use crate::route::Route;
use crate::target::Target;
use crate::template::{MatchingMode, PathTemplate, TemplateError};

/// The selection strategy applied to scored routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouterMode {
    /// Select the highest-scoring route; ties go to the more specific
    /// template (more literal characters, then fewer variables), then to
    /// attachment order.
    #[default]
    BestMatch,
    /// Select the first route (in attachment order) scoring above the
    /// required threshold.
    FirstMatch,
    /// Select pseudo-randomly among routes above the threshold.
    Random,
    /// Cycle through routes above the threshold.
    RoundRobin,
}

/// A router: an ordered route table plus a selection mode.
pub struct Router {
    routes: RwLock<Arc<Vec<Arc<Route>>>>,
    default_target: RwLock<Option<Arc<dyn Target>>>,
    mode: RouterMode,
    required_score: f32,
    case_insensitive: bool,
    cursor: AtomicUsize,
}

impl Router {
    /// Create a router in [`RouterMode::BestMatch`] with the default
    /// required score of 0.5.
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: RwLock::new(Arc::new(Vec::new())),
            default_target: RwLock::new(None),
            mode: RouterMode::default(),
            required_score: 0.5,
            case_insensitive: false,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Set the routing mode.
    #[must_use]
    pub fn with_mode(mut self, mode: RouterMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the minimum score a route must reach to be selectable.
    #[must_use]
    pub fn with_required_score(mut self, required_score: f32) -> Self {
        self.required_score = required_score.clamp(0.0, 1.0);
        self
    }

    /// Make literal template matching case-insensitive for routes attached
    /// afterwards.
    #[must_use]
    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    /// The routing mode.
    #[must_use]
    pub fn mode(&self) -> RouterMode {
        self.mode
    }

    /// Attach a target under an exact-matching template: the template must
    /// consume the whole remaining path.
    ///
    /// # Errors
    ///
    /// Fails with a [`TemplateError`] on a malformed pattern; this is a
    /// configuration error surfaced at attach time.
    pub fn attach(&self, pattern: &str, target: Arc<dyn Target>) -> Result<(), TemplateError> {
        self.attach_mode(pattern, target, MatchingMode::Exact)
    }

    /// Attach a target under a prefix-matching template, for nested routers:
    /// the matched prefix is consumed and the remainder passed down.
    ///
    /// # Errors
    ///
    /// Fails with a [`TemplateError`] on a malformed pattern.
    pub fn attach_prefix(
        &self,
        pattern: &str,
        target: Arc<dyn Target>,
    ) -> Result<(), TemplateError> {
        self.attach_mode(pattern, target, MatchingMode::Prefix)
    }

    fn attach_mode(
        &self,
        pattern: &str,
        target: Arc<dyn Target>,
        mode: MatchingMode,
    ) -> Result<(), TemplateError> {
        let mut template = PathTemplate::compile(pattern)?;
        if self.case_insensitive {
            template = template.case_insensitive();
        }
        let route = Arc::new(Route::new(template, mode, target));

        let mut guard = self.routes.write();
        let mut next = (**guard).clone();
        next.push(route);
        *guard = Arc::new(next);

        tracing::debug!(pattern, ?mode, "route attached");
        Ok(())
    }

    /// Set the fallback target handling requests no route matches.
    pub fn set_default(&self, target: Arc<dyn Target>) {
        *self.default_target.write() = Some(target);
    }

    /// Detach every route bound to the given target.
    ///
    /// Detaching a target that is not attached is a no-op: no error, no
    /// state change.
    pub fn detach(&self, target: &Arc<dyn Target>) {
        let mut guard = self.routes.write();
        if !guard.iter().any(|r| Arc::ptr_eq(r.target(), target)) {
            return;
        }
        let next: Vec<Arc<Route>> = guard
            .iter()
            .filter(|r| !Arc::ptr_eq(r.target(), target))
            .cloned()
            .collect();
        *guard = Arc::new(next);
        tracing::debug!("target detached");
    }

    /// Number of attached routes.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.read().len()
    }

    /// Select a route for the given remaining path per the routing mode, or
    /// `None` when nothing qualifies.
    #[must_use]
    pub fn select(&self, path: &str) -> Option<Arc<Route>> {
        let routes = self.routes.read().clone();

        match self.mode {
            RouterMode::BestMatch => self.select_best(&routes, path),
            RouterMode::FirstMatch => routes
                .iter()
                .find(|route| self.qualifies(route, path))
                .cloned(),
            RouterMode::Random => {
                let candidates = self.candidates(&routes, path);
                if candidates.is_empty() {
                    None
                } else {
                    let index = rand::rng().random_range(0..candidates.len());
                    Some(candidates[index].clone())
                }
            }
            RouterMode::RoundRobin => {
                let candidates = self.candidates(&routes, path);
                if candidates.is_empty() {
                    None
                } else {
                    let index = self.cursor.fetch_add(1, Ordering::Relaxed) % candidates.len();
                    Some(candidates[index].clone())
                }
            }
        }
    }

    fn qualifies(&self, route: &Route, path: &str) -> bool {
        let score = route.score(path, self.required_score);
        score > 0.0 && score >= self.required_score
    }

    fn candidates(&self, routes: &[Arc<Route>], path: &str) -> Vec<Arc<Route>> {
        routes
            .iter()
            .filter(|route| self.qualifies(route, path))
            .cloned()
            .collect()
    }

    /// Highest score wins; equal scores fall back to template specificity
    /// (more literal characters, then fewer variables), then to attachment
    /// order (the earlier route is kept).
    fn select_best(&self, routes: &[Arc<Route>], path: &str) -> Option<Arc<Route>> {
        let mut best: Option<(&Arc<Route>, f32)> = None;

        for route in routes {
            if !self.qualifies(route, path) {
                continue;
            }
            let score = route.score(path, self.required_score);

            match best {
                None => best = Some((route, score)),
                Some((current, best_score)) => {
                    if score > best_score + f32::EPSILON {
                        best = Some((route, score));
                    } else if (score - best_score).abs() <= f32::EPSILON
                        && Self::more_specific(route, current)
                    {
                        best = Some((route, score));
                    }
                }
            }
        }

        best.map(|(route, _)| route.clone())
    }

    fn more_specific(candidate: &Route, current: &Route) -> bool {
        let candidate_literals = candidate.template().literal_len();
        let current_literals = current.template().literal_len();
        if candidate_literals != current_literals {
            return candidate_literals > current_literals;
        }
        candidate.template().variable_count() < current.template().variable_count()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("mode", &self.mode)
            .field("required_score", &self.required_score)
            .field("routes", &self.route_count())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Target for Router {
    /// Route the request one level down.
    ///
    /// The selected route's captures are merged into the request attributes
    /// with plain inserts, so an inner router's binding overwrites an outer
    /// one of the same name (innermost wins). The matched prefix is consumed
    /// before delegation.
    async fn handle(&self, request: &mut RestRequest) -> RestResponse {
        let path = request.remaining_path().to_owned();

        if let Some(route) = self.select(&path) {
            if let Some(matched) = route.resolve(&path) {
                for (name, value) in matched.variables {
                    request.set_attribute(name, value);
                }
                request.set_remaining_path(matched.remaining);
                tracing::debug!(
                    template = route.template().pattern(),
                    remaining = request.remaining_path(),
                    "route matched"
                );
                return route.target().handle(request).await;
            }
        }

        let default_target = self.default_target.read().clone();
        if let Some(target) = default_target {
            tracing::debug!(%path, "no route matched, delegating to default target");
            return target.handle(request).await;
        }

        tracing::debug!(%path, "no route matched");
        RestResponse::status(Status::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reststack_model::Representation;

    #[derive(Debug)]
    struct TagTarget(&'static str);

    #[async_trait]
    impl Target for TagTarget {
        async fn handle(&self, _request: &mut RestRequest) -> RestResponse {
            RestResponse::ok(Representation::plain_text(self.0))
        }
    }

    #[derive(Debug)]
    struct EchoAttributes;

    #[async_trait]
    impl Target for EchoAttributes {
        async fn handle(&self, request: &mut RestRequest) -> RestResponse {
            let mut pairs: Vec<String> = request
                .attributes()
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            pairs.sort();
            RestResponse::ok(Representation::plain_text(pairs.join(";")))
        }
    }

    fn entity_text(response: &RestResponse) -> String {
        String::from_utf8(response.entity().expect("entity").data().to_vec())
            .expect("utf-8 entity")
    }

    async fn dispatch(router: &Router, path: &str) -> RestResponse {
        let mut request = RestRequest::new(http::Method::GET, path);
        router.handle(&mut request).await
    }

    #[tokio::test]
    async fn test_should_prefer_literal_over_variable_in_best_match() {
        let router = Router::new();
        router
            .attach("/users/{name}", Arc::new(TagTarget("variable")))
            .expect("should attach");
        router
            .attach("/users/active", Arc::new(TagTarget("literal")))
            .expect("should attach");

        let response = dispatch(&router, "/users/active").await;
        assert_eq!(entity_text(&response), "literal");

        let response = dispatch(&router, "/users/alice").await;
        assert_eq!(entity_text(&response), "variable");
    }

    #[tokio::test]
    async fn test_should_pick_first_match_in_attachment_order() {
        let router = Router::new().with_mode(RouterMode::FirstMatch);
        router
            .attach("/users/{name}", Arc::new(TagTarget("first")))
            .expect("should attach");
        router
            .attach("/users/active", Arc::new(TagTarget("second")))
            .expect("should attach");

        let response = dispatch(&router, "/users/active").await;
        assert_eq!(entity_text(&response), "first");
    }

    #[tokio::test]
    async fn test_should_return_not_found_without_default() {
        let router = Router::new();
        router
            .attach("/users", Arc::new(TagTarget("users")))
            .expect("should attach");

        let response = dispatch(&router, "/posts").await;
        assert_eq!(response.resolved_status(), Status::NotFound);
    }

    #[tokio::test]
    async fn test_should_fall_back_to_default_target() {
        let router = Router::new();
        router.set_default(Arc::new(TagTarget("fallback")));

        let response = dispatch(&router, "/anything").await;
        assert_eq!(entity_text(&response), "fallback");
    }

    #[tokio::test]
    async fn test_should_dispatch_through_nested_routers() {
        let inner = Router::new();
        inner
            .attach("/posts/{post}", Arc::new(EchoAttributes))
            .expect("should attach");

        let outer = Router::new();
        outer
            .attach_prefix("/users/{user}", Arc::new(inner))
            .expect("should attach");

        let response = dispatch(&outer, "/users/alice/posts/42").await;
        assert_eq!(entity_text(&response), "post=42;user=alice");
    }

    #[tokio::test]
    async fn test_should_let_inner_capture_overwrite_outer() {
        let inner = Router::new();
        inner
            .attach("/{id}", Arc::new(EchoAttributes))
            .expect("should attach");

        let outer = Router::new();
        outer
            .attach_prefix("/{id}", Arc::new(inner))
            .expect("should attach");

        let response = dispatch(&outer, "/outer/inner").await;
        assert_eq!(entity_text(&response), "id=inner");
    }

    #[tokio::test]
    async fn test_should_treat_detach_of_unknown_target_as_noop() {
        let router = Router::new();
        router
            .attach("/users", Arc::new(TagTarget("users")))
            .expect("should attach");

        let unknown: Arc<dyn Target> = Arc::new(TagTarget("unknown"));
        router.detach(&unknown);
        assert_eq!(router.route_count(), 1);
    }

    #[tokio::test]
    async fn test_should_restore_prior_state_after_attach_then_detach() {
        let router = Router::new();
        router
            .attach("/users", Arc::new(TagTarget("users")))
            .expect("should attach");

        let transient: Arc<dyn Target> = Arc::new(TagTarget("transient"));
        router
            .attach("/transient", Arc::clone(&transient))
            .expect("should attach");
        assert_eq!(router.route_count(), 2);

        router.detach(&transient);
        assert_eq!(router.route_count(), 1);
        let response = dispatch(&router, "/users").await;
        assert_eq!(entity_text(&response), "users");
    }

    #[tokio::test]
    async fn test_should_cycle_candidates_in_round_robin() {
        let router = Router::new().with_mode(RouterMode::RoundRobin);
        router
            .attach("/service", Arc::new(TagTarget("a")))
            .expect("should attach");
        router
            .attach("/service", Arc::new(TagTarget("b")))
            .expect("should attach");

        let first = entity_text(&dispatch(&router, "/service").await);
        let second = entity_text(&dispatch(&router, "/service").await);
        let third = entity_text(&dispatch(&router, "/service").await);
        assert_ne!(first, second);
        assert_eq!(first, third);
    }

    #[tokio::test]
    async fn test_should_pick_some_candidate_in_random_mode() {
        let router = Router::new().with_mode(RouterMode::Random);
        router
            .attach("/service", Arc::new(TagTarget("a")))
            .expect("should attach");
        router
            .attach("/service", Arc::new(TagTarget("b")))
            .expect("should attach");

        let response = dispatch(&router, "/service").await;
        assert!(matches!(entity_text(&response).as_str(), "a" | "b"));
    }
}
