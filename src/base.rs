use crate::{builder::UriBuilder, imp::Uri, parse::ParseError};
use alloc::string::String;
use core::str::FromStr;

/// A base URI that hands out freshly seeded builders.
///
/// Every call to [`builder`](Self::builder) decomposes the base URI anew,
/// so builders obtained from the same `BaseUri` never share state.
///
/// # Examples
///
/// ```
/// use uri_builder_tiny::BaseUri;
///
/// let base = BaseUri::parse("http://example.com")?;
///
/// let foo = base.builder().append_paths(["foo"])?.build()?;
/// assert_eq!(foo, "http://example.com/foo");
///
/// let bar = base.builder().append_paths(["bar"])?.build()?;
/// assert_eq!(bar, "http://example.com/bar");
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BaseUri {
    uri: Uri<String>,
}

impl BaseUri {
    /// Parses a base URI from a string.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string is not a valid URI reference.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        Uri::parse(s).map(Self::from)
    }

    /// Returns the base URI.
    #[must_use]
    pub fn as_uri(&self) -> Uri<&str> {
        self.uri.borrow()
    }

    /// Creates a new builder seeded from the base URI.
    pub fn builder(&self) -> UriBuilder {
        UriBuilder::from_uri(&self.uri)
    }
}

impl From<Uri<String>> for BaseUri {
    #[inline]
    fn from(uri: Uri<String>) -> Self {
        Self { uri }
    }
}

impl From<Uri<&str>> for BaseUri {
    #[inline]
    fn from(uri: Uri<&str>) -> Self {
        Self {
            uri: uri.to_owned(),
        }
    }
}

impl FromStr for BaseUri {
    type Err = ParseError;

    /// Equivalent to [`parse`](Self::parse).
    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
