//! Error types.

use crate::parse::ParseError;
use alloc::string::String;

/// An error occurred when encoding an entity for a builder.
///
/// This is raised by a [`PercentEncoder`] whose target charset label
/// is not supported.
///
/// [`PercentEncoder`]: crate::entity::PercentEncoder
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncodeError {
    pub(crate) label: String,
}

impl EncodeError {
    /// Returns the charset label that could not be resolved.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

#[cfg(feature = "impl-error")]
impl crate::Error for EncodeError {}

/// An error occurred when mutating a [`UriBuilder`] or building a URI from it.
///
/// [`UriBuilder`]: crate::UriBuilder
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum BuildError {
    /// A required argument was empty.
    InvalidInput {
        /// Name of the offending argument.
        argument: &'static str,
    },
    /// The configured entity encoder failed.
    Encoding(EncodeError),
    /// The serialized builder state is not a valid URI reference.
    MalformedUri {
        /// The serialized string that failed to parse.
        uri: String,
        /// Why it failed to parse.
        cause: ParseError,
    },
}

impl From<EncodeError> for BuildError {
    #[inline]
    fn from(e: EncodeError) -> Self {
        Self::Encoding(e)
    }
}

#[cfg(feature = "impl-error")]
impl crate::Error for BuildError {
    fn source(&self) -> Option<&(dyn crate::Error + 'static)> {
        match self {
            Self::InvalidInput { .. } => None,
            Self::Encoding(e) => Some(e),
            Self::MalformedUri { cause, .. } => Some(cause),
        }
    }
}
