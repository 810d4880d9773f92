//! Supported HTTP verbs.
//!
//! Endpoints can only be mapped for the five verbs in [`HttpVerb`]. Any other
//! verb literal found in endpoint metadata is skipped by the mapper.

use std::fmt;

use http::Method;

/// An HTTP verb that an endpoint can be mapped to.
///
/// # Example
///
/// ```rust
/// use genesis_router::HttpVerb;
///
/// assert_eq!(HttpVerb::parse("DELETE"), Some(HttpVerb::Delete));
/// assert_eq!(HttpVerb::parse("OPTIONS"), None);
/// assert_eq!(HttpVerb::Get.as_str(), "GET");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpVerb {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl HttpVerb {
    /// All supported verbs, in slot order.
    pub const ALL: [HttpVerb; 5] = [
        HttpVerb::Get,
        HttpVerb::Post,
        HttpVerb::Put,
        HttpVerb::Patch,
        HttpVerb::Delete,
    ];

    /// Parses an upper-case verb literal.
    ///
    /// Returns `None` for literals outside the supported set, including
    /// lower-case spellings.
    #[must_use]
    pub fn parse(literal: &str) -> Option<Self> {
        match literal {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "PATCH" => Some(Self::Patch),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }

    /// Maps an [`http::Method`] to a supported verb.
    #[must_use]
    pub fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::GET => Some(Self::Get),
            Method::POST => Some(Self::Post),
            Method::PUT => Some(Self::Put),
            Method::PATCH => Some(Self::Patch),
            Method::DELETE => Some(Self::Delete),
            _ => None,
        }
    }

    /// Returns the equivalent [`http::Method`].
    #[must_use]
    pub fn as_method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Patch => Method::PATCH,
            Self::Delete => Method::DELETE,
        }
    }

    /// Returns the canonical upper-case literal.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            Self::Get => 0,
            Self::Post => 1,
            Self::Put => 2,
            Self::Patch => 3,
            Self::Delete => 4,
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpVerb> for Method {
    fn from(verb: HttpVerb) -> Self {
        verb.as_method()
    }
}
