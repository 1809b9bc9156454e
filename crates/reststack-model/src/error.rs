//! The framework error type.

use std::fmt;

use crate::status::Status;

/// An error produced while handling a request.
///
/// Carries the [`Status`] the response should resolve to, a human-readable
/// message, the resource path involved (if known), and the underlying source
/// error for logging. The source is preserved for diagnostics but never
/// serialized into the client-facing response.
#[derive(Debug)]
pub struct RestError {
    /// The status this error resolves to.
    pub status: Status,
    /// A human-readable error message.
    pub message: String,
    /// The resource path that caused the error.
    pub resource: Option<String>,
    /// The underlying source error, if any.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl RestError {
    /// Create an error from a status, using its default reason phrase.
    #[must_use]
    pub fn new(status: Status) -> Self {
        Self {
            status,
            message: status.reason_phrase().to_owned(),
            resource: None,
            source: None,
        }
    }

    /// Create an error from a status with a custom message.
    #[must_use]
    pub fn with_message(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            resource: None,
            source: None,
        }
    }

    /// Attach the resource path that caused the error.
    #[must_use]
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Attach the underlying source error.
    #[must_use]
    pub fn with_source(
        mut self,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// A `NotFound` error.
    #[must_use]
    pub fn not_found() -> Self {
        Self::new(Status::NotFound)
    }

    /// A `MethodNotAllowed` error for the given method name.
    #[must_use]
    pub fn method_not_allowed(method: &str) -> Self {
        Self::with_message(
            Status::MethodNotAllowed,
            format!("The {method} method is not allowed on this resource"),
        )
    }

    /// A `NotAcceptable` error.
    #[must_use]
    pub fn not_acceptable() -> Self {
        Self::new(Status::NotAcceptable)
    }

    /// A `PreconditionFailed` error.
    #[must_use]
    pub fn precondition_failed() -> Self {
        Self::new(Status::PreconditionFailed)
    }

    /// A `Conflict` error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::with_message(Status::Conflict, message)
    }

    /// A `BadRequest` error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_message(Status::BadRequest, message)
    }

    /// An `InternalError`.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_message(Status::Internal, message)
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RestError({}): {}", self.status.as_str(), self.message)
    }
}

impl std::error::Error for RestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<Status> for RestError {
    fn from(status: Status) -> Self {
        Self::new(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_build_error_with_default_message() {
        let err = RestError::not_found();
        assert_eq!(err.status, Status::NotFound);
        assert_eq!(err.message, Status::NotFound.reason_phrase());
    }

    #[test]
    fn test_should_attach_resource_and_source() {
        let io = std::io::Error::other("backing store down");
        let err = RestError::internal("lookup failed")
            .with_resource("/users/42")
            .with_source(io);
        assert_eq!(err.resource.as_deref(), Some("/users/42"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_should_format_method_not_allowed() {
        let err = RestError::method_not_allowed("PATCH");
        assert_eq!(err.status, Status::MethodNotAllowed);
        assert!(err.message.contains("PATCH"));
    }
}
