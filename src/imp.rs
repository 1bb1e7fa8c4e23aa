use crate::{
    component::{Authority, Scheme},
    parse::{self, Meta, ParseError},
};
use alloc::{borrow::ToOwned, string::String};
use borrow_or_share::{BorrowOrShare, Bos};
use core::{borrow::Borrow, cmp::Ordering, hash, str::FromStr};

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Input types accepted by [`Uri::parse`].
pub trait Parse {
    type Val;

    fn parse(self) -> Result<Uri<Self::Val>, ParseError>;
}

impl<'a> Parse for &'a str {
    type Val = &'a str;

    fn parse(self) -> Result<Uri<Self::Val>, ParseError> {
        parse::parse(self).map(|meta| Uri { val: self, meta })
    }
}

impl Parse for String {
    type Val = Self;

    fn parse(self) -> Result<Uri<Self::Val>, ParseError> {
        let meta = parse::parse(&self)?;
        Ok(Uri { val: self, meta })
    }
}

/// A validated [URI reference], the output of [`UriBuilder::build`] and
/// one of the inputs a builder can be seeded from.
///
/// `Uri<&str>` borrows its input and `Uri<String>` owns it. Accessors on
/// `Uri<&'a str>` hand out slices that live for `'a`, independent of the
/// `Uri` itself:
///
/// ```
/// use uri_builder_tiny::Uri;
///
/// let path = Uri::parse("foo:bar")?.path();
/// assert_eq!(path, "bar");
/// # Ok::<_, uri_builder_tiny::ParseError>(())
/// ```
///
/// Equality, ordering and hashing go by the string value; no normalization
/// takes place.
///
/// # Examples
///
/// ```
/// use uri_builder_tiny::Uri;
///
/// let uri = Uri::parse("foo://user@example.com:8042/over/there?name=ferret#nose")?;
///
/// assert_eq!(uri.scheme().unwrap().as_str(), "foo");
/// let auth = uri.authority().unwrap();
/// assert_eq!(auth.as_str(), "user@example.com:8042");
/// assert_eq!(auth.host(), "example.com");
/// assert_eq!(auth.port(), Some("8042"));
/// assert_eq!(uri.path(), "/over/there");
/// assert_eq!(uri.query(), Some("name=ferret"));
/// assert_eq!(uri.fragment(), Some("nose"));
/// # Ok::<_, uri_builder_tiny::ParseError>(())
/// ```
///
/// [URI reference]: https://datatracker.ietf.org/doc/html/rfc3986#section-4.1
/// [`UriBuilder::build`]: crate::UriBuilder::build
#[derive(Clone, Copy)]
pub struct Uri<T> {
    val: T,
    // Always what `parse::parse` yields for `val`.
    meta: Meta,
}

impl<T> Uri<T> {
    /// Parses a URI reference, borrowing a `&str` or taking a `String`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the input is not a URI reference as defined
    /// by RFC 3986. Both absolute URIs and relative references pass.
    pub fn parse<I>(input: I) -> Result<Self, ParseError>
    where
        I: Parse<Val = T>,
    {
        input.parse()
    }
}

impl Uri<String> {
    /// Borrows this `Uri<String>` as a `Uri<&str>`.
    #[allow(clippy::should_implement_trait)]
    #[inline]
    #[must_use]
    pub fn borrow(&self) -> Uri<&str> {
        Uri {
            val: &self.val,
            meta: self.meta,
        }
    }

    /// Unwraps the underlying string.
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.val
    }
}

impl Uri<&str> {
    /// Copies the input into an owned `Uri<String>`.
    #[inline]
    #[must_use]
    pub fn to_owned(&self) -> Uri<String> {
        Uri {
            val: self.val.to_owned(),
            meta: self.meta,
        }
    }
}

impl<'i, 'o, T: BorrowOrShare<'i, 'o, str>> Uri<T> {
    /// Returns the whole URI reference.
    #[must_use]
    pub fn as_str(&'i self) -> &'o str {
        self.val.borrow_or_share()
    }

    fn slice(&'i self, (start, end): (usize, usize)) -> &'o str {
        &self.as_str()[start..end]
    }

    /// Returns the scheme, if any.
    ///
    /// ```
    /// use uri_builder_tiny::{component::Scheme, Uri};
    ///
    /// const HTTP: &Scheme = Scheme::new_or_panic("http");
    ///
    /// assert_eq!(Uri::parse("HTTP://example.com/")?.scheme(), Some(HTTP));
    /// assert_eq!(Uri::parse("/path/to/file")?.scheme(), None);
    /// # Ok::<_, uri_builder_tiny::ParseError>(())
    /// ```
    #[must_use]
    pub fn scheme(&'i self) -> Option<&'o Scheme> {
        let end = self.meta.scheme_end?;
        Some(Scheme::new_validated(self.slice((0, end))))
    }

    /// Returns the authority, if the reference has a `//` part.
    #[must_use]
    pub fn authority(&'i self) -> Option<Authority<'o>> {
        let auth = self.meta.authority?;
        let val = self.slice((auth.start, self.meta.path.0));
        let host = (auth.host.0 - auth.start, auth.host.1 - auth.start);
        Some(Authority::new(val, host))
    }

    /// Returns the path, which may be empty but is never absent.
    ///
    /// ```
    /// use uri_builder_tiny::Uri;
    ///
    /// assert_eq!(Uri::parse("http://example.com/")?.path(), "/");
    /// assert_eq!(Uri::parse("http://example.com")?.path(), "");
    /// assert_eq!(Uri::parse("mailto:user@example.com")?.path(), "user@example.com");
    /// # Ok::<_, uri_builder_tiny::ParseError>(())
    /// ```
    #[must_use]
    pub fn path(&'i self) -> &'o str {
        self.slice(self.meta.path)
    }

    /// Returns the query, without the leading `?`.
    #[must_use]
    pub fn query(&'i self) -> Option<&'o str> {
        let end = self.meta.query_end?;
        Some(self.slice((self.meta.path.1 + 1, end)))
    }

    /// Returns the fragment, without the leading `#`.
    ///
    /// ```
    /// use uri_builder_tiny::Uri;
    ///
    /// assert_eq!(Uri::parse("http://example.com/#usage")?.fragment(), Some("usage"));
    /// assert_eq!(Uri::parse("http://example.com/#")?.fragment(), Some(""));
    /// assert_eq!(Uri::parse("http://example.com/")?.fragment(), None);
    /// # Ok::<_, uri_builder_tiny::ParseError>(())
    /// ```
    #[must_use]
    pub fn fragment(&'i self) -> Option<&'o str> {
        let start = self.meta.fragment_start?;
        Some(&self.as_str()[start..])
    }

    /// Checks whether a scheme is present.
    #[inline]
    #[must_use]
    pub fn has_scheme(&self) -> bool {
        self.meta.scheme_end.is_some()
    }

    /// Checks whether an authority is present.
    #[inline]
    #[must_use]
    pub fn has_authority(&self) -> bool {
        self.meta.authority.is_some()
    }

    /// Checks whether a query is present, even an empty one.
    #[inline]
    #[must_use]
    pub fn has_query(&self) -> bool {
        self.meta.query_end.is_some()
    }

    /// Checks whether a fragment is present, even an empty one.
    #[inline]
    #[must_use]
    pub fn has_fragment(&self) -> bool {
        self.meta.fragment_start.is_some()
    }
}

impl<T: Bos<str>, U: Bos<str>> PartialEq<Uri<U>> for Uri<T> {
    fn eq(&self, other: &Uri<U>) -> bool {
        self.as_str() == other.as_str()
    }
}

macro_rules! impl_eq_with_text {
    ($($text:ty),+) => {$(
        impl<T: Bos<str>> PartialEq<$text> for Uri<T> {
            fn eq(&self, other: &$text) -> bool {
                self.as_str() == AsRef::<str>::as_ref(other)
            }
        }

        impl<T: Bos<str>> PartialEq<Uri<T>> for $text {
            fn eq(&self, other: &Uri<T>) -> bool {
                other == self
            }
        }
    )+};
}

impl_eq_with_text!(str, &str, String);

impl<T: Bos<str>> Eq for Uri<T> {}

impl<T: Bos<str>> hash::Hash for Uri<T> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl<T: Bos<str>> PartialOrd for Uri<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Bos<str>> Ord for Uri<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl<T: Bos<str>> AsRef<str> for Uri<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T: Bos<str>> Borrow<str> for Uri<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<'a> TryFrom<&'a str> for Uri<&'a str> {
    type Error = ParseError;

    /// Equivalent to [`parse`](Self::parse).
    #[inline]
    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        Uri::parse(value)
    }
}

impl TryFrom<String> for Uri<String> {
    type Error = ParseError;

    /// Equivalent to [`parse`](Self::parse).
    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Uri::parse(value)
    }
}

impl<'a> From<Uri<&'a str>> for &'a str {
    /// Equivalent to [`as_str`](Uri::as_str).
    #[inline]
    fn from(value: Uri<&'a str>) -> &'a str {
        value.val
    }
}

impl From<Uri<String>> for String {
    /// Equivalent to [`into_string`](Uri::into_string).
    #[inline]
    fn from(value: Uri<String>) -> String {
        value.val
    }
}

impl From<Uri<&str>> for Uri<String> {
    /// Equivalent to [`to_owned`](Uri::to_owned).
    #[inline]
    fn from(value: Uri<&str>) -> Self {
        value.to_owned()
    }
}

impl FromStr for Uri<String> {
    type Err = ParseError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uri::parse(s).map(|r| r.to_owned())
    }
}

#[cfg(feature = "serde")]
impl<T: Bos<str>> Serialize for Uri<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Uri<&'de str> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        Uri::parse(s).map_err(de::Error::custom)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Uri<String> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Uri::parse(s).map_err(de::Error::custom)
    }
}
