//! Media types with wildcard-aware compatibility.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::RestError;
use crate::metadata::Metadata;

/// A media type such as `text/html` or the range `text/*`.
///
/// The main type and subtype are normalized to lowercase. Parameters (other
/// than `q`, which belongs to preferences) are preserved for formatting but
/// ignored by compatibility checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType {
    main: Cow<'static, str>,
    sub: Cow<'static, str>,
    parameters: Vec<(String, String)>,
}

impl MediaType {
    /// The full wildcard `*/*`.
    pub const ALL: Self = Self::constant("*", "*");

    /// `text/plain`.
    pub const TEXT_PLAIN: Self = Self::constant("text", "plain");

    /// `text/html`.
    pub const TEXT_HTML: Self = Self::constant("text", "html");

    /// `application/json`.
    pub const APPLICATION_JSON: Self = Self::constant("application", "json");

    /// `application/xml`.
    pub const APPLICATION_XML: Self = Self::constant("application", "xml");

    /// `application/octet-stream`.
    pub const APPLICATION_OCTET_STREAM: Self = Self::constant("application", "octet-stream");

    const fn constant(main: &'static str, sub: &'static str) -> Self {
        Self {
            main: Cow::Borrowed(main),
            sub: Cow::Borrowed(sub),
            parameters: Vec::new(),
        }
    }

    /// Create a media type from main type and subtype, normalizing case.
    #[must_use]
    pub fn new(main: impl AsRef<str>, sub: impl AsRef<str>) -> Self {
        Self {
            main: Cow::Owned(main.as_ref().trim().to_ascii_lowercase()),
            sub: Cow::Owned(sub.as_ref().trim().to_ascii_lowercase()),
            parameters: Vec::new(),
        }
    }

    /// Attach a parameter, e.g. `charset=utf-8`.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push((name.into(), value.into()));
        self
    }

    /// The main type, e.g. `text`.
    #[must_use]
    pub fn main_type(&self) -> &str {
        &self.main
    }

    /// The subtype, e.g. `html`.
    #[must_use]
    pub fn sub_type(&self) -> &str {
        &self.sub
    }

    /// The parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// Whether this type and `other` denote the same main type and subtype,
    /// ignoring parameters.
    #[must_use]
    pub fn equals_ignoring_parameters(&self, other: &Self) -> bool {
        self.main == other.main && self.sub == other.sub
    }
}

impl Metadata for MediaType {
    fn includes(&self, other: &Self) -> bool {
        if self.main == "*" {
            return true;
        }
        if self.main != other.main {
            return false;
        }
        self.sub == "*" || self.sub == other.sub
    }

    fn specificity(&self) -> u8 {
        if self.main == "*" {
            0
        } else if self.sub == "*" {
            1
        } else {
            2
        }
    }

    fn is_wildcard(&self) -> bool {
        self.main == "*" && self.sub == "*"
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main, self.sub)?;
        for (name, value) in &self.parameters {
            write!(f, "; {name}={value}")?;
        }
        Ok(())
    }
}

impl FromStr for MediaType {
    type Err = RestError;

    /// Parse a media type such as `text/html` or `text/html; charset=utf-8`.
    ///
    /// A bare `*` is accepted as shorthand for `*/*`, matching common
    /// Accept-header usage.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut sections = s.split(';');
        let type_part = sections.next().unwrap_or("").trim();

        let media_type = if type_part == "*" {
            Self::ALL
        } else {
            let (main, sub) = type_part.split_once('/').ok_or_else(|| {
                RestError::bad_request(format!("invalid media type: {s:?}"))
            })?;
            if main.trim().is_empty() || sub.trim().is_empty() {
                return Err(RestError::bad_request(format!("invalid media type: {s:?}")));
            }
            Self::new(main, sub)
        };

        let mut result = media_type;
        for section in sections {
            let section = section.trim();
            if section.is_empty() {
                continue;
            }
            match section.split_once('=') {
                Some((name, value)) => {
                    result = result.with_parameter(name.trim(), value.trim());
                }
                None => {
                    return Err(RestError::bad_request(format!(
                        "invalid media type parameter: {section:?}"
                    )));
                }
            }
        }

        Ok(result)
    }
}
