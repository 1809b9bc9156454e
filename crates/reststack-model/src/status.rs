//! The outward-facing status taxonomy.
//!
//! Routing, negotiation, and precondition outcomes are resolved as ordinary
//! [`Status`] values flowing through the dispatch pipeline, never as panics
//! or ad-hoc errors. Each status carries a stable machine-readable code
//! ([`Status::as_str`]), an HTTP mapping ([`Status::http_status`]), and a
//! human-readable reason phrase ([`Status::reason_phrase`]).

/// Terminal and intermediate outcomes of handling one request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[non_exhaustive]
pub enum Status {
    /// The request succeeded.
    #[default]
    Ok,
    /// A new resource was created.
    Created,
    /// The request was accepted for asynchronous processing.
    Accepted,
    /// The request succeeded and carries no entity.
    NoContent,
    /// The client's cached representation is still valid.
    NotModified,
    /// The request is malformed.
    BadRequest,
    /// No route or resource matched the request.
    NotFound,
    /// The resource does not support the request method.
    MethodNotAllowed,
    /// No declared variant is acceptable to the client.
    NotAcceptable,
    /// The request conflicts with the current resource state.
    Conflict,
    /// A request precondition did not hold.
    PreconditionFailed,
    /// An unexpected handler failure.
    Internal,
    /// The operation is recognized but not implemented.
    NotImplemented,
    /// A status outside the standard taxonomy, by raw HTTP code.
    Custom(u16),
}

impl Status {
    /// Returns the stable machine-readable code for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "Ok",
            Self::Created => "Created",
            Self::Accepted => "Accepted",
            Self::NoContent => "NoContent",
            Self::NotModified => "NotModified",
            Self::BadRequest => "BadRequest",
            Self::NotFound => "NotFound",
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::NotAcceptable => "NotAcceptable",
            Self::Conflict => "Conflict",
            Self::PreconditionFailed => "PreconditionFailed",
            Self::Internal => "InternalError",
            Self::NotImplemented => "NotImplemented",
            Self::Custom(_) => "Custom",
        }
    }

    /// Returns the HTTP status code this status maps to.
    #[must_use]
    pub fn http_status(&self) -> http::StatusCode {
        match self {
            Self::Ok => http::StatusCode::OK,
            Self::Created => http::StatusCode::CREATED,
            Self::Accepted => http::StatusCode::ACCEPTED,
            Self::NoContent => http::StatusCode::NO_CONTENT,
            Self::NotModified => http::StatusCode::NOT_MODIFIED,
            Self::BadRequest => http::StatusCode::BAD_REQUEST,
            Self::NotFound => http::StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => http::StatusCode::METHOD_NOT_ALLOWED,
            Self::NotAcceptable => http::StatusCode::NOT_ACCEPTABLE,
            Self::Conflict => http::StatusCode::CONFLICT,
            Self::PreconditionFailed => http::StatusCode::PRECONDITION_FAILED,
            Self::Internal => http::StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotImplemented => http::StatusCode::NOT_IMPLEMENTED,
            Self::Custom(code) => http::StatusCode::from_u16(*code)
                .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    /// Returns the default human-readable reason for this status.
    #[must_use]
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            Self::Ok => "The request succeeded",
            Self::Created => "The resource was created",
            Self::Accepted => "The request was accepted for processing",
            Self::NoContent => "The request succeeded with no content",
            Self::NotModified => "The representation has not been modified",
            Self::BadRequest => "The request could not be understood",
            Self::NotFound => "The requested resource could not be found",
            Self::MethodNotAllowed => "The method is not allowed on this resource",
            Self::NotAcceptable => "No available variant is acceptable",
            Self::Conflict => "The request conflicts with the resource state",
            Self::PreconditionFailed => "A request precondition did not hold",
            Self::Internal => "An internal error occurred",
            Self::NotImplemented => "The requested operation is not implemented",
            Self::Custom(_) => "Custom status",
        }
    }

    /// Whether this status denotes success (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.http_status().is_success()
    }

    /// Whether this status denotes a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.http_status().is_client_error()
    }

    /// Whether this status denotes a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.http_status().is_server_error()
    }

    /// Whether this status denotes any error (4xx or 5xx).
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.is_client_error() || self.is_server_error()
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.http_status().as_u16())
    }
}
