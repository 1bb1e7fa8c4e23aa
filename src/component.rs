//! Borrowed views of URI components.

use crate::table;
use ref_cast::{ref_cast_custom, RefCastCustom};

/// A scheme name, such as `http` or `svn+ssh`.
///
/// Two `Scheme`s are equal when they match ignoring ASCII case, as
/// scheme names are case-insensitive. Use [`as_str`](Self::as_str) for
/// an exact comparison.
///
/// # Examples
///
/// ```
/// use uri_builder_tiny::{component::Scheme, Uri};
///
/// const HTTP: &Scheme = Scheme::new_or_panic("http");
///
/// let uri = Uri::parse("HTTP://EXAMPLE.COM/")?;
/// let scheme = uri.scheme().unwrap();
/// assert_eq!(scheme, HTTP);
/// assert_eq!(scheme.as_str(), "HTTP");
/// # Ok::<_, uri_builder_tiny::ParseError>(())
/// ```
#[derive(RefCastCustom)]
#[repr(transparent)]
pub struct Scheme {
    inner: str,
}

impl Scheme {
    #[ref_cast_custom]
    pub(crate) const fn new_validated(s: &str) -> &Scheme;

    /// Checks that `s` is a letter followed by letters, digits, `+`, `-`
    /// or `.`, and views it as a `Scheme`.
    #[must_use]
    pub const fn new(s: &str) -> Option<&Scheme> {
        match s.as_bytes() {
            [first, rest @ ..]
                if first.is_ascii_alphabetic() && table::SCHEME.matches_all(rest) =>
            {
                Some(Scheme::new_validated(s))
            }
            _ => None,
        }
    }

    /// Like [`new`](Self::new), for use in constants.
    ///
    /// # Panics
    ///
    /// Panics if `s` is not a scheme name.
    #[must_use]
    pub const fn new_or_panic(s: &str) -> &Scheme {
        match Self::new(s) {
            Some(scheme) => scheme,
            None => panic!("not a scheme name"),
        }
    }

    /// Returns the scheme as written.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl PartialEq for Scheme {
    fn eq(&self, other: &Self) -> bool {
        self.inner.eq_ignore_ascii_case(&other.inner)
    }
}

impl Eq for Scheme {}

/// The part of a URI between `//` and the path.
///
/// A seeded builder keeps the host and the port. Userinfo is parsed
/// but dropped.
#[derive(Clone, Copy)]
pub struct Authority<'a> {
    val: &'a str,
    host: (usize, usize),
}

impl<'a> Authority<'a> {
    pub(crate) const fn new(val: &'a str, host: (usize, usize)) -> Self {
        Self { val, host }
    }

    /// Returns the whole authority, userinfo included.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'a str {
        self.val
    }

    /// Returns the host, which may be empty.
    ///
    /// IP literals keep their brackets.
    ///
    /// ```
    /// use uri_builder_tiny::Uri;
    ///
    /// let uri = Uri::parse("file:///etc/hosts")?;
    /// assert_eq!(uri.authority().unwrap().host(), "");
    ///
    /// let uri = Uri::parse("http://user@[::1]:8080")?;
    /// assert_eq!(uri.authority().unwrap().host(), "[::1]");
    /// # Ok::<_, uri_builder_tiny::ParseError>(())
    /// ```
    #[must_use]
    pub fn host(&self) -> &'a str {
        &self.val[self.host.0..self.host.1]
    }

    /// Returns the digits after the host's `:`, which may be empty.
    ///
    /// ```
    /// use uri_builder_tiny::Uri;
    ///
    /// fn port(s: &str) -> Option<&str> {
    ///     Uri::parse(s).ok()?.authority()?.port()
    /// }
    ///
    /// assert_eq!(port("ssh://device.local:4673/"), Some("4673"));
    /// assert_eq!(port("ssh://device.local:/"), Some(""));
    /// assert_eq!(port("ssh://device.local/"), None);
    /// ```
    #[must_use]
    pub fn port(&self) -> Option<&'a str> {
        self.val[self.host.1..].strip_prefix(':')
    }
}
