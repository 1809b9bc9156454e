//! Data model for the RestStack framework.
//!
//! This crate defines the vocabulary shared by the routing, negotiation, and
//! HTTP layers:
//!
//! - **Metadata** ([`media_type`], [`metadata`]): media types, languages,
//!   character sets, and content encodings, with wildcard-aware
//!   compatibility checks used by the negotiation algorithm.
//! - **Variants** ([`variant`]): the representational forms a resource can
//!   take, plus the lightweight [`RepresentationInfo`](variant::RepresentationInfo)
//!   used by conditional requests and the materialized
//!   [`Representation`](variant::Representation) entity.
//! - **Preferences** ([`preference`]): client-submitted ranked preference
//!   lists parsed from Accept-style headers.
//! - **Conditions** ([`conditions`]): tag and date preconditions parsed from
//!   If-* headers.
//! - **Status taxonomy** ([`status`]) and the framework error type
//!   ([`error`]).
//!
//! Everything here is plain data: no I/O, no async, no interior mutability.
//! The decision algorithms that consume these types live in
//! `reststack-core`.

pub mod conditions;
pub mod error;
pub mod media_type;
pub mod metadata;
pub mod preference;
pub mod status;
pub mod tag;
pub mod variant;

pub use conditions::Conditions;
pub use error::RestError;
pub use media_type::MediaType;
pub use metadata::{CharacterSet, ContentEncoding, Language, Metadata};
pub use preference::{ClientPreferences, Preference};
pub use status::Status;
pub use tag::Tag;
pub use variant::{Representation, RepresentationInfo, Variant};
