//! The call-handling state machine.
//!
//! [`DispatchPipeline::dispatch`] drives one resource call through its
//! states:
//!
//! ```text
//! Start
//!   -> ConditionalCheck   (cheap representation_info, may short-circuit)
//!   -> existence check    (nonexistent resource -> NotFound)
//!   -> method check       (unsupported verb -> MethodNotAllowed + Allow)
//!   -> Negotiate          (when enabled and variants declared)
//!   -> HandlerInvoke      (static verb dispatch table)
//!   -> ResponseAssembled
//! ```
//!
//! Every early exit carries a terminal [`Status`]; routing, negotiation,
//! and precondition outcomes are ordinary control flow here, never errors.
//! Only handler failures surface as [`RestError`] values, and those are
//! caught at the pipeline boundary.

use http::Method;
use reststack_model::{Representation, RestError, Status, Variant};

use crate::conditions;
use crate::negotiation;
use crate::request::{RestRequest, RestResponse};
use crate::resource::Resource;

/// The dispatch state machine. Stateless; all per-call state lives in the
/// request and the resource instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchPipeline;

impl DispatchPipeline {
    /// Run one resource call to completion.
    pub async fn dispatch(
        resource: &mut dyn Resource,
        request: &mut RestRequest,
    ) -> RestResponse {
        let method = request.method().clone();

        // Conditional check: evaluated on cheap metadata before any verb
        // handler runs, so a failed precondition never touches handler
        // logic.
        if resource.evaluates_conditions() && !request.conditions().is_empty() {
            let exists = resource.exists();
            let info = resource.representation_info();
            if let Some(status) =
                conditions::evaluate(&method, exists, info.as_ref(), request.conditions())
            {
                tracing::debug!(%status, path = request.path(), "precondition short-circuit");
                return RestResponse::status(status);
            }
        }

        if !resource.exists() {
            tracing::debug!(path = request.path(), "resource does not exist");
            return RestResponse::status(Status::NotFound);
        }

        let allowed = resource.allowed_methods();
        if !allowed.contains(&method) {
            tracing::debug!(%method, path = request.path(), "method not allowed");
            return RestResponse::status(Status::MethodNotAllowed)
                .with_message(format!("The {method} method is not allowed on this resource"))
                .with_allowed_methods(allowed);
        }

        // Negotiation: only representation-producing methods consume a
        // variant, and only when the resource opted in. A negotiating
        // resource with an empty catalog has nothing to represent, which
        // resolves to NotFound rather than NotAcceptable.
        let selected: Option<Variant> = if resource.negotiates_content()
            && (method == Method::GET || method == Method::HEAD)
        {
            let variants = resource.variants(&method);
            let default_language = resource.default_language();
            match negotiation::select_best(
                &variants,
                request.preferences(),
                default_language.as_ref(),
            ) {
                Some(variant) => {
                    tracing::debug!(media_type = %variant.media_type(), "variant selected");
                    Some(variant.clone())
                }
                None if variants.is_empty() => {
                    tracing::debug!(path = request.path(), "no variants declared");
                    return RestResponse::status(Status::NotFound);
                }
                None => {
                    tracing::debug!(path = request.path(), "no acceptable variant");
                    let entity = resource
                        .describe_variants()
                        .unwrap_or_else(|| describe_variants_fallback(&variants));
                    return RestResponse::status(Status::NotAcceptable).with_entity(entity);
                }
            }
        } else {
            None
        };

        // Handler invocation through the static verb table.
        let result = match method {
            Method::GET | Method::HEAD => resource.get(request, selected.as_ref()).await,
            Method::POST => resource.post(request).await,
            Method::PUT => resource.put(request).await,
            Method::DELETE => resource.delete(request).await,
            Method::OPTIONS => {
                let allowed = resource.allowed_methods();
                resource
                    .options(request)
                    .await
                    .map(|response| response.with_allowed_methods(allowed))
            }
            _ => Err(RestError::method_not_allowed(method.as_str())),
        };

        let mut response = match result {
            Ok(response) => response,
            Err(error) => Self::assemble_error(&error),
        };

        if method == Method::HEAD {
            response.clear_entity();
        }

        response
    }

    /// Convert a handler failure into a terminal response.
    ///
    /// The error's status and message are used directly for client errors;
    /// server errors respond with the generic reason phrase so internal
    /// details stay in the logs.
    fn assemble_error(error: &RestError) -> RestResponse {
        if error.status.is_server_error() {
            tracing::error!(
                status = %error.status,
                message = %error.message,
                source = ?error.source,
                "handler failure"
            );
            RestResponse::status(error.status)
                .with_message(error.status.reason_phrase().to_owned())
        } else {
            tracing::debug!(status = %error.status, message = %error.message, "handler error");
            RestResponse::from_error(error)
        }
    }
}

/// Plain-text listing of the available variants, the default
/// not-acceptable body.
fn describe_variants_fallback(variants: &[Variant]) -> Representation {
    let mut description = String::from("Available variants:\n");
    for variant in variants {
        description.push_str("- ");
        description.push_str(&variant.media_type().to_string());
        if let Some(language) = variant.language() {
            description.push_str(", language ");
            description.push_str(language.tag());
        }
        description.push('\n');
    }
    Representation::plain_text(description)
}
