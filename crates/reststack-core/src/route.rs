//! A route: one path template bound to one target.

use std::sync::Arc;

use crate::target::Target;
use crate::template::{MatchingMode, PathTemplate, TemplateMatch};

/// A binding between a compiled [`PathTemplate`] and a handling target.
///
/// Routes are created by [`Router::attach`](crate::router::Router::attach)
/// and removed by [`Router::detach`](crate::router::Router::detach); the
/// router exclusively owns its route list, while the target is shared
/// (`Arc`).
#[derive(Clone)]
pub struct Route {
    template: PathTemplate,
    mode: MatchingMode,
    target: Arc<dyn Target>,
}

impl Route {
    /// Create a route from a compiled template, matching mode, and target.
    #[must_use]
    pub fn new(template: PathTemplate, mode: MatchingMode, target: Arc<dyn Target>) -> Self {
        Self {
            template,
            mode,
            target,
        }
    }

    /// The route's template.
    #[must_use]
    pub fn template(&self) -> &PathTemplate {
        &self.template
    }

    /// The route's matching mode.
    #[must_use]
    pub fn mode(&self) -> MatchingMode {
        self.mode
    }

    /// The route's target.
    #[must_use]
    pub fn target(&self) -> &Arc<dyn Target> {
        &self.target
    }

    /// Match the template against a path, producing captures and remainder.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<TemplateMatch> {
        self.template.match_path(path, self.mode)
    }

    /// Score how well this route matches the given remaining path, in
    /// `[0.0, 1.0]`.
    ///
    /// A non-match scores 0.0. A match scores
    /// `required_score + (1 - required_score) * matched_len / path_len`,
    /// so any match clears the router's threshold and fuller matches score
    /// closer to 1.0. An empty remaining path that still matches scores a
    /// full 1.0.
    #[must_use]
    pub fn score(&self, path: &str, required_score: f32) -> f32 {
        match self.template.match_path(path, self.mode) {
            None => 0.0,
            Some(m) => {
                if path.is_empty() {
                    1.0
                } else {
                    #[allow(clippy::cast_precision_loss)]
                    let ratio = m.matched_len as f32 / path.len() as f32;
                    required_score + (1.0 - required_score) * ratio
                }
            }
        }
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("template", &self.template.pattern())
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
