//! Per-call request and response state.

use std::collections::HashMap;

use bytes::Bytes;
use http::Method;
use reststack_model::{ClientPreferences, Conditions, Representation, RestError, Status};

/// Host metadata used for virtual-host scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostInfo {
    /// The host domain, e.g. `api.example.com`.
    pub domain: Option<String>,
    /// The host port.
    pub port: Option<u16>,
    /// The URI scheme, e.g. `http`.
    pub scheme: Option<String>,
}

/// One in-flight request, owned by exactly one task for its lifetime.
///
/// Besides the client-submitted data (method, path, preferences,
/// conditions, entity), the request carries mutable dispatch state: the
/// remaining-path cursor consumed by routers level by level, and the
/// variable bindings accumulated across nested routers.
#[derive(Debug)]
pub struct RestRequest {
    method: Method,
    path: String,
    remaining: String,
    attributes: HashMap<String, String>,
    preferences: ClientPreferences,
    conditions: Conditions,
    host: HostInfo,
    entity: Bytes,
}

impl RestRequest {
    /// Create a request for the given method and decoded path.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            method,
            remaining: path.clone(),
            path,
            attributes: HashMap::new(),
            preferences: ClientPreferences::default(),
            conditions: Conditions::default(),
            host: HostInfo::default(),
            entity: Bytes::new(),
        }
    }

    /// Attach client preferences.
    #[must_use]
    pub fn with_preferences(mut self, preferences: ClientPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Attach request preconditions.
    #[must_use]
    pub fn with_conditions(mut self, conditions: Conditions) -> Self {
        self.conditions = conditions;
        self
    }

    /// Attach host metadata.
    #[must_use]
    pub fn with_host(mut self, host: HostInfo) -> Self {
        self.host = host;
        self
    }

    /// Attach the request entity.
    #[must_use]
    pub fn with_entity(mut self, entity: impl Into<Bytes>) -> Self {
        self.entity = entity.into();
        self
    }

    /// The request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The full decoded request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The part of the path not yet consumed by routing.
    #[must_use]
    pub fn remaining_path(&self) -> &str {
        &self.remaining
    }

    /// Replace the remaining-path cursor after a router consumed a prefix.
    pub fn set_remaining_path(&mut self, remaining: impl Into<String>) {
        self.remaining = remaining.into();
    }

    /// The variable bindings captured so far.
    #[must_use]
    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    /// Look up one captured variable.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Bind a captured variable. Later bindings overwrite earlier ones with
    /// the same name (innermost router wins).
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// The client preferences.
    #[must_use]
    pub fn preferences(&self) -> &ClientPreferences {
        &self.preferences
    }

    /// The request preconditions.
    #[must_use]
    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    /// The host metadata.
    #[must_use]
    pub fn host(&self) -> &HostInfo {
        &self.host
    }

    /// The request entity bytes.
    #[must_use]
    pub fn entity(&self) -> &Bytes {
        &self.entity
    }
}

/// The outcome of handling one request.
#[derive(Debug)]
pub struct RestResponse {
    status: Status,
    message: Option<String>,
    entity: Option<Representation>,
    allowed_methods: Vec<Method>,
}

impl RestResponse {
    /// A successful response carrying an entity.
    #[must_use]
    pub fn ok(entity: Representation) -> Self {
        Self {
            status: Status::Ok,
            message: None,
            entity: Some(entity),
            allowed_methods: Vec::new(),
        }
    }

    /// A response with the given status and no entity.
    #[must_use]
    pub fn status(status: Status) -> Self {
        Self {
            status,
            message: None,
            entity: None,
            allowed_methods: Vec::new(),
        }
    }

    /// A response derived from a handler error: the error's status plus its
    /// message. The error source is intentionally dropped here — it is for
    /// logging, not for the client.
    #[must_use]
    pub fn from_error(error: &RestError) -> Self {
        Self {
            status: error.status,
            message: Some(error.message.clone()),
            entity: None,
            allowed_methods: Vec::new(),
        }
    }

    /// Attach a human-readable message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach an entity.
    #[must_use]
    pub fn with_entity(mut self, entity: Representation) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Record the methods the resource supports (used for `Allow`).
    #[must_use]
    pub fn with_allowed_methods(mut self, methods: Vec<Method>) -> Self {
        self.allowed_methods = methods;
        self
    }

    /// The resolved status.
    #[must_use]
    pub fn resolved_status(&self) -> Status {
        self.status
    }

    /// The attached message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The response entity, if any.
    #[must_use]
    pub fn entity(&self) -> Option<&Representation> {
        self.entity.as_ref()
    }

    /// Consume the response, returning its parts.
    #[must_use]
    pub fn into_parts(self) -> (Status, Option<String>, Option<Representation>, Vec<Method>) {
        (self.status, self.message, self.entity, self.allowed_methods)
    }

    /// The methods the resource supports, when known.
    #[must_use]
    pub fn allowed_methods(&self) -> &[Method] {
        &self.allowed_methods
    }

    /// Drop the entity body, keeping its metadata-bearing status (HEAD).
    pub fn clear_entity(&mut self) {
        self.entity = None;
    }
}
