//! Virtual hosts and the top-level component.
//!
//! A [`VirtualHost`] pairs host-matching criteria (domain, port, scheme —
//! each an anchored regex) with its own [`Router`]. The [`Component`] owns
//! an ordered host list plus a default host and is the top-level wiring
//! point of a server: explicitly constructed and passed in, never a
//! process-wide singleton.

use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;

use crate::request::{RestRequest, RestResponse};
use crate::router::Router;
use crate::target::Target;

/// A named virtual host: matching criteria plus a router for its routes.
#[derive(Debug)]
pub struct VirtualHost {
    name: String,
    domain: Regex,
    port: Regex,
    scheme: Regex,
    router: Router,
}

/// Compile a criterion pattern anchored to the full value.
fn compile_anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

impl VirtualHost {
    /// Create a virtual host accepting any domain, port, and scheme.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: compile_anchored(".*").expect("static pattern is valid"),
            port: compile_anchored(".*").expect("static pattern is valid"),
            scheme: compile_anchored(".*").expect("static pattern is valid"),
            router: Router::new(),
        }
    }

    /// Restrict the accepted host domains.
    ///
    /// # Errors
    ///
    /// Fails when the pattern is not a valid regex; a configuration error
    /// surfaced at wiring time.
    pub fn with_domain(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.domain = compile_anchored(pattern)?;
        Ok(self)
    }

    /// Restrict the accepted ports.
    ///
    /// # Errors
    ///
    /// Fails when the pattern is not a valid regex.
    pub fn with_port(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.port = compile_anchored(pattern)?;
        Ok(self)
    }

    /// Restrict the accepted schemes.
    ///
    /// # Errors
    ///
    /// Fails when the pattern is not a valid regex.
    pub fn with_scheme(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.scheme = compile_anchored(pattern)?;
        Ok(self)
    }

    /// The host name (for logging).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// This host's router; attach routes through it.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Score the request against the host criteria: 1.0 on an exact match
    /// of every criterion, 0.0 otherwise.
    #[must_use]
    pub fn score(&self, request: &RestRequest) -> f32 {
        let host = request.host();

        let domain_ok = host
            .domain
            .as_deref()
            .is_none_or(|domain| self.domain.is_match(domain));
        let port_ok = host
            .port
            .is_none_or(|port| self.port.is_match(&port.to_string()));
        let scheme_ok = host
            .scheme
            .as_deref()
            .is_none_or(|scheme| self.scheme.is_match(scheme));

        if domain_ok && port_ok && scheme_ok {
            1.0
        } else {
            0.0
        }
    }
}

#[async_trait]
impl Target for VirtualHost {
    async fn handle(&self, request: &mut RestRequest) -> RestResponse {
        self.router.handle(request).await
    }
}

/// The top-level dispatch component: an ordered list of virtual hosts plus
/// a default host for requests no host claims.
#[derive(Debug)]
pub struct Component {
    hosts: Vec<Arc<VirtualHost>>,
    default_host: Arc<VirtualHost>,
}

impl Component {
    /// Create a component with an empty default host.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hosts: Vec::new(),
            default_host: Arc::new(VirtualHost::new("default")),
        }
    }

    /// Append a virtual host. Hosts are consulted in registration order.
    #[must_use]
    pub fn with_host(mut self, host: VirtualHost) -> Self {
        self.hosts.push(Arc::new(host));
        self
    }

    /// Replace the default host.
    #[must_use]
    pub fn with_default_host(mut self, host: VirtualHost) -> Self {
        self.default_host = Arc::new(host);
        self
    }

    /// The default host's router, the usual attachment point for a
    /// single-host server.
    #[must_use]
    pub fn default_router(&self) -> &Router {
        self.default_host.router()
    }

    /// Select the first host scoring 1.0, or the default host.
    #[must_use]
    pub fn select_host(&self, request: &RestRequest) -> &Arc<VirtualHost> {
        self.hosts
            .iter()
            .find(|host| host.score(request) >= 1.0)
            .unwrap_or(&self.default_host)
    }
}

impl Default for Component {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Target for Component {
    async fn handle(&self, request: &mut RestRequest) -> RestResponse {
        let host = Arc::clone(self.select_host(request));
        tracing::debug!(host = host.name(), path = request.path(), "host selected");
        host.handle(request).await
    }
}
