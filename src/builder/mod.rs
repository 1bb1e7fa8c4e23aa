mod build;

use crate::{
    entity::{EntityEncoder, EntityEncoderExt, PercentEncoder, RawEncoder},
    error::BuildError,
    imp::Uri,
    parse::ParseError,
};
use alloc::{
    collections::BTreeMap,
    string::{String, ToString},
    sync::Arc,
    vec,
    vec::Vec,
};
use borrow_or_share::Bos;
use core::{fmt::Display, str::FromStr};
use tracing::{debug, trace};

/// A mutable, chainable URI builder.
///
/// The builder holds a scheme, a host, a port, path segments, query
/// parameters and a fragment. Each non-raw mutator passes its input
/// through the configured [`EntityEncoder`] (a UTF-8 [`PercentEncoder`]
/// by default) before storing it, and each `*_raw_*` twin stores its
/// input as is. [`build`] serializes the state into a [`Uri`].
///
/// Mutators take `&mut self` and return `&mut Self`, or
/// `Result<&mut Self, BuildError>` when they may fail, so that calls
/// can be chained with `?`.
///
/// # Examples
///
/// ```
/// use uri_builder_tiny::UriBuilder;
///
/// let uri = UriBuilder::new()
///     .set_scheme("https")
///     .set_host("java.example.com")?
///     .set_port(8080)
///     .set_paths(["foo", "bar"])?
///     .append_paths(["buz", "qux"])?
///     .set_query_parameter("hoge", "fuga")?
///     .add_query_parameter("piyo", "hogera")?
///     .set_fragment("frag")?
///     .build()?;
///
/// assert_eq!(
///     uri,
///     "https://java.example.com:8080/foo/bar/buz/qux?hoge=fuga&piyo=hogera#frag"
/// );
/// # Ok::<_, uri_builder_tiny::BuildError>(())
/// ```
///
/// Seed a builder from an existing URI:
///
/// ```
/// use uri_builder_tiny::UriBuilder;
///
/// let uri = UriBuilder::parse("http://java.example.com?foo&buz=qux")?
///     .set_port(8080)
///     .build_string();
///
/// // The ambiguous term "foo" is dropped.
/// assert_eq!(uri, "http://java.example.com:8080?buz=qux");
/// # Ok::<_, uri_builder_tiny::ParseError>(())
/// ```
///
/// [`build`]: Self::build
#[derive(Clone, Debug)]
#[must_use]
pub struct UriBuilder {
    scheme: String,
    host: String,
    port: Option<u32>,
    paths: Vec<String>,
    query_parameters: BTreeMap<String, String>,
    fragment: String,
    force_remove_trailing_slash: bool,
    encoder: Arc<dyn EntityEncoder>,
}

impl Default for UriBuilder {
    fn default() -> Self {
        Self {
            scheme: String::new(),
            host: String::new(),
            port: None,
            paths: Vec::new(),
            query_parameters: BTreeMap::new(),
            fragment: String::new(),
            force_remove_trailing_slash: false,
            encoder: Arc::new(PercentEncoder::default()),
        }
    }
}

impl UriBuilder {
    /// Creates an empty builder.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a URI reference and creates a builder seeded from it.
    ///
    /// See [`from_uri`](Self::from_uri) for how the components are taken apart.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string is not a valid URI reference.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        Uri::parse(s).map(|uri| Self::from_uri(&uri))
    }

    /// Creates a builder seeded from the components of `uri`.
    ///
    /// Seed components are stored without any encoding or decoding:
    ///
    /// - The host is kept as written, brackets included for IP literals.
    ///   Userinfo is dropped.
    /// - A port that is empty or out of the `u32` range is left unset.
    /// - The path is split on `'/'`. A leading empty segment is kept and
    ///   trailing empty segments are dropped.
    /// - The query is split on `'&'`, then each term on `'='`. A term is
    ///   kept only when it splits into exactly a key and a value, so that
    ///   `"foo"` and `"foo="` are both dropped.
    /// - A URI with a scheme but neither an authority nor an absolute path,
    ///   such as `mailto:user@example.com`, contributes no path or query.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_builder_tiny::{Uri, UriBuilder};
    ///
    /// let uri = Uri::parse("https://user@java.example.com/foo/bar?hoge=fuga&x#frag")?;
    /// let builder = UriBuilder::from_uri(&uri);
    ///
    /// assert_eq!(builder.scheme(), "https");
    /// assert_eq!(builder.host(), "java.example.com");
    /// assert_eq!(builder.port(), None);
    /// assert_eq!(builder.paths(), ["", "foo", "bar"]);
    /// assert_eq!(builder.query_parameters().len(), 1);
    /// assert_eq!(builder.fragment(), "frag");
    /// # Ok::<_, uri_builder_tiny::ParseError>(())
    /// ```
    pub fn from_uri<T: Bos<str>>(uri: &Uri<T>) -> Self {
        let mut builder = Self::new();

        if let Some(scheme) = uri.scheme() {
            builder.scheme = scheme.as_str().to_string();
        }

        if let Some(auth) = uri.authority() {
            builder.host = auth.host().to_string();
            builder.port = auth.port().and_then(|port| port.parse().ok());
        }

        let path = uri.path();
        let opaque = uri.has_scheme() && !uri.has_authority() && !path.starts_with('/');
        if !opaque {
            if !path.is_empty() {
                builder.paths = split_terms(path, '/')
                    .into_iter()
                    .map(String::from)
                    .collect();
            }

            let query = uri.query().unwrap_or_default();
            if !query.is_empty() {
                for term in split_terms(query, '&') {
                    match *split_terms(term, '=').as_slice() {
                        [key, value] => {
                            builder
                                .query_parameters
                                .insert(key.to_string(), value.to_string());
                        }
                        _ => trace!(term, "dropping query term without a single key and value"),
                    }
                }
            }
        }

        if let Some(fragment) = uri.fragment() {
            builder.fragment = fragment.to_string();
        }

        debug!(
            seed = uri.as_str(),
            segments = builder.paths.len(),
            query_parameters = builder.query_parameters.len(),
            "seeded builder"
        );
        builder
    }

    /// Replaces the encoder used by the non-raw mutators.
    ///
    /// Values already stored are not re-encoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_builder_tiny::{
    ///     entity::{Charset, PercentEncoder},
    ///     UriBuilder,
    /// };
    ///
    /// let uri = UriBuilder::new()
    ///     .with_encoder(PercentEncoder::new(Charset::Latin1))
    ///     .set_host("example.com")?
    ///     .append_paths(["café"])?
    ///     .build_string();
    ///
    /// assert_eq!(uri, "example.com/caf%E9");
    /// # Ok::<_, uri_builder_tiny::BuildError>(())
    /// ```
    pub fn with_encoder<E: EntityEncoder + 'static>(mut self, encoder: E) -> Self {
        self.encoder = Arc::new(encoder);
        self
    }

    fn entity(&self, raw: bool) -> &dyn EntityEncoder {
        if raw {
            &RawEncoder
        } else {
            &*self.encoder
        }
    }

    /// Sets the scheme. The scheme is never encoded.
    pub fn set_scheme(&mut self, scheme: &str) -> &mut Self {
        self.scheme = scheme.to_string();
        self
    }

    /// Sets the host after encoding it.
    ///
    /// A trailing `'/'` is kept out of the encoding and marks that the
    /// built URI should end with a slash, unless
    /// [`force_remove_trailing_slash`](Self::force_remove_trailing_slash)
    /// is set.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidInput`] if `host` is empty,
    /// or [`BuildError::Encoding`] if the encoder fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_builder_tiny::UriBuilder;
    ///
    /// let mut builder = UriBuilder::new();
    /// builder.set_host("java.e%xample.com/")?;
    /// assert_eq!(builder.host(), "java.e%25xample.com/");
    /// # Ok::<_, uri_builder_tiny::BuildError>(())
    /// ```
    pub fn set_host(&mut self, host: &str) -> Result<&mut Self, BuildError> {
        self.set_host_with(host, false)
    }

    /// Sets the host without encoding it.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidInput`] if `host` is empty.
    pub fn set_raw_host(&mut self, host: &str) -> Result<&mut Self, BuildError> {
        self.set_host_with(host, true)
    }

    fn set_host_with(&mut self, host: &str, raw: bool) -> Result<&mut Self, BuildError> {
        if host.is_empty() {
            return Err(BuildError::InvalidInput { argument: "host" });
        }

        let (host, trailing_slash) = match host.strip_suffix('/') {
            Some(stripped) => (stripped, true),
            None => (host, false),
        };

        let mut encoded = self.entity(raw).encode(&host)?;
        if trailing_slash {
            encoded.push('/');
        }
        self.host = encoded;
        Ok(self)
    }

    /// Sets the port. A negative value leaves the port unset.
    pub fn set_port(&mut self, port: i32) -> &mut Self {
        self.port = u32::try_from(port).ok();
        self
    }

    /// Replaces the path segments, encoding each of them.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Encoding`] if the encoder fails,
    /// in which case the segments are left unchanged.
    pub fn set_paths<I>(&mut self, paths: I) -> Result<&mut Self, BuildError>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.push_paths(paths, false, true)
    }

    /// Replaces the path segments without encoding them.
    ///
    /// # Errors
    ///
    /// Never fails with the built-in raw encoder.
    pub fn set_raw_paths<I>(&mut self, paths: I) -> Result<&mut Self, BuildError>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.push_paths(paths, true, true)
    }

    /// Appends path segments, encoding each of them.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Encoding`] if the encoder fails,
    /// in which case the segments are left unchanged.
    pub fn append_paths<I>(&mut self, paths: I) -> Result<&mut Self, BuildError>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.push_paths(paths, false, false)
    }

    /// Appends path segments without encoding them.
    ///
    /// # Errors
    ///
    /// Never fails with the built-in raw encoder.
    pub fn append_raw_paths<I>(&mut self, paths: I) -> Result<&mut Self, BuildError>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.push_paths(paths, true, false)
    }

    /// Replaces the path segments with those of a `'/'`-delimited string,
    /// encoding each of them.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Encoding`] if the encoder fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_builder_tiny::UriBuilder;
    ///
    /// let uri = UriBuilder::new()
    ///     .set_scheme("http")
    ///     .set_host("java.example.com")?
    ///     .set_paths_by_str("/foo/bar")?
    ///     .append_paths_by_str("/a b/c")?
    ///     .build()?;
    ///
    /// assert_eq!(uri, "http://java.example.com/foo/bar/a+b/c");
    /// # Ok::<_, uri_builder_tiny::BuildError>(())
    /// ```
    pub fn set_paths_by_str(&mut self, paths: &str) -> Result<&mut Self, BuildError> {
        self.push_paths(split_terms(paths, '/'), false, true)
    }

    /// Replaces the path segments with those of a `'/'`-delimited string,
    /// without encoding them.
    ///
    /// # Errors
    ///
    /// Never fails with the built-in raw encoder.
    pub fn set_raw_paths_by_str(&mut self, paths: &str) -> Result<&mut Self, BuildError> {
        self.push_paths(split_terms(paths, '/'), true, true)
    }

    /// Appends the path segments of a `'/'`-delimited string,
    /// encoding each of them.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Encoding`] if the encoder fails.
    pub fn append_paths_by_str(&mut self, paths: &str) -> Result<&mut Self, BuildError> {
        self.push_paths(split_terms(paths, '/'), false, false)
    }

    /// Appends the path segments of a `'/'`-delimited string,
    /// without encoding them.
    ///
    /// # Errors
    ///
    /// Never fails with the built-in raw encoder.
    pub fn append_raw_paths_by_str(&mut self, paths: &str) -> Result<&mut Self, BuildError> {
        self.push_paths(split_terms(paths, '/'), true, false)
    }

    fn push_paths<I>(&mut self, paths: I, raw: bool, replace: bool) -> Result<&mut Self, BuildError>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let encoded = self.entity(raw).encode_all(paths)?;
        if replace {
            self.paths = encoded;
        } else {
            self.paths.extend(encoded);
        }
        Ok(self)
    }

    /// Replaces the query parameters, encoding every key and value.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Encoding`] if the encoder fails,
    /// in which case the parameters are left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use uri_builder_tiny::UriBuilder;
    ///
    /// let params = HashMap::from([("piyo", 2), ("hoge", 1)]);
    ///
    /// let uri = UriBuilder::new()
    ///     .set_host("example.com")?
    ///     .set_query_parameters(&params)?
    ///     .build_string();
    ///
    /// assert_eq!(uri, "example.com?hoge=1&piyo=2");
    /// # Ok::<_, uri_builder_tiny::BuildError>(())
    /// ```
    pub fn set_query_parameters<I, K, V>(&mut self, params: I) -> Result<&mut Self, BuildError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Display,
        V: Display,
    {
        self.push_query_parameters(params, false, true)
    }

    /// Replaces the query parameters without encoding them.
    ///
    /// # Errors
    ///
    /// Never fails with the built-in raw encoder.
    pub fn set_raw_query_parameters<I, K, V>(&mut self, params: I) -> Result<&mut Self, BuildError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Display,
        V: Display,
    {
        self.push_query_parameters(params, true, true)
    }

    /// Merges query parameters into the existing ones, encoding every
    /// key and value. A key that is already present gets the new value.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Encoding`] if the encoder fails,
    /// in which case the parameters are left unchanged.
    pub fn add_query_parameters<I, K, V>(&mut self, params: I) -> Result<&mut Self, BuildError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Display,
        V: Display,
    {
        self.push_query_parameters(params, false, false)
    }

    /// Merges query parameters into the existing ones without encoding them.
    ///
    /// # Errors
    ///
    /// Never fails with the built-in raw encoder.
    pub fn add_raw_query_parameters<I, K, V>(&mut self, params: I) -> Result<&mut Self, BuildError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Display,
        V: Display,
    {
        self.push_query_parameters(params, true, false)
    }

    /// Replaces **all** query parameters with a single encoded pair.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Encoding`] if the encoder fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_builder_tiny::UriBuilder;
    ///
    /// let uri = UriBuilder::new()
    ///     .set_scheme("https")
    ///     .set_host("java.example.com")?
    ///     .set_query_parameter("foo", "bar")?
    ///     .set_query_parameter("buz", "qux")?
    ///     .build()?;
    ///
    /// assert_eq!(uri, "https://java.example.com?buz=qux");
    /// # Ok::<_, uri_builder_tiny::BuildError>(())
    /// ```
    pub fn set_query_parameter<K, V>(&mut self, key: K, value: V) -> Result<&mut Self, BuildError>
    where
        K: Display,
        V: Display,
    {
        self.push_query_parameters([(key, value)], false, true)
    }

    /// Replaces **all** query parameters with a single pair, without encoding it.
    ///
    /// # Errors
    ///
    /// Never fails with the built-in raw encoder.
    pub fn set_raw_query_parameter<K, V>(
        &mut self,
        key: K,
        value: V,
    ) -> Result<&mut Self, BuildError>
    where
        K: Display,
        V: Display,
    {
        self.push_query_parameters([(key, value)], true, true)
    }

    /// Adds one encoded query parameter, replacing the value of an equal key.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Encoding`] if the encoder fails.
    pub fn add_query_parameter<K, V>(&mut self, key: K, value: V) -> Result<&mut Self, BuildError>
    where
        K: Display,
        V: Display,
    {
        self.push_query_parameters([(key, value)], false, false)
    }

    /// Adds one query parameter without encoding it.
    ///
    /// # Errors
    ///
    /// Never fails with the built-in raw encoder.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_builder_tiny::UriBuilder;
    ///
    /// let uri = UriBuilder::new()
    ///     .set_host("example.com")?
    ///     .add_raw_query_parameter("q", "a%20b")?
    ///     .add_query_parameter("r", "a%20b")?
    ///     .build_string();
    ///
    /// assert_eq!(uri, "example.com?q=a%20b&r=a%2520b");
    /// # Ok::<_, uri_builder_tiny::BuildError>(())
    /// ```
    pub fn add_raw_query_parameter<K, V>(
        &mut self,
        key: K,
        value: V,
    ) -> Result<&mut Self, BuildError>
    where
        K: Display,
        V: Display,
    {
        self.push_query_parameters([(key, value)], true, false)
    }

    fn push_query_parameters<I, K, V>(
        &mut self,
        params: I,
        raw: bool,
        replace: bool,
    ) -> Result<&mut Self, BuildError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Display,
        V: Display,
    {
        let encoded = self.entity(raw).encode_pairs(params)?;
        if replace {
            self.query_parameters = encoded;
        } else {
            self.query_parameters.extend(encoded);
        }
        Ok(self)
    }

    /// Sets the fragment after encoding it.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Encoding`] if the encoder fails.
    pub fn set_fragment(&mut self, fragment: &str) -> Result<&mut Self, BuildError> {
        self.fragment = self.entity(false).encode(&fragment)?;
        Ok(self)
    }

    /// Sets the fragment without encoding it.
    ///
    /// # Errors
    ///
    /// Never fails with the built-in raw encoder.
    pub fn set_raw_fragment(&mut self, fragment: &str) -> Result<&mut Self, BuildError> {
        self.fragment = self.entity(true).encode(&fragment)?;
        Ok(self)
    }

    /// Sets whether a trailing slash implied by the host is dropped when building.
    ///
    /// Only the slash that comes from a host ending with `'/'` is affected.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_builder_tiny::UriBuilder;
    ///
    /// let mut builder = UriBuilder::new();
    /// builder.set_scheme("http").set_host("java.example.com/")?;
    /// assert_eq!(builder.build_string(), "http://java.example.com/");
    ///
    /// builder.force_remove_trailing_slash(true);
    /// assert_eq!(builder.build_string(), "http://java.example.com");
    /// # Ok::<_, uri_builder_tiny::BuildError>(())
    /// ```
    pub fn force_remove_trailing_slash(&mut self, remove: bool) -> &mut Self {
        self.force_remove_trailing_slash = remove;
        self
    }

    /// Returns the scheme.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns the host, including a trailing slash if one was set.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port, or `None` if unset.
    #[must_use]
    pub fn port(&self) -> Option<u32> {
        self.port
    }

    /// Returns the path segments in insertion order.
    #[must_use]
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Returns the query parameters in ascending key order.
    #[must_use]
    pub fn query_parameters(&self) -> &BTreeMap<String, String> {
        &self.query_parameters
    }

    /// Returns the fragment.
    #[must_use]
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Returns whether a host-implied trailing slash is dropped when building.
    #[must_use]
    pub fn is_force_remove_trailing_slash(&self) -> bool {
        self.force_remove_trailing_slash
    }
}

impl FromStr for UriBuilder {
    type Err = ParseError;

    /// Equivalent to [`parse`](Self::parse).
    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<T: Bos<str>> From<&Uri<T>> for UriBuilder {
    /// Equivalent to [`from_uri`](Self::from_uri).
    #[inline]
    fn from(uri: &Uri<T>) -> Self {
        Self::from_uri(uri)
    }
}

impl<T: Bos<str>> From<Uri<T>> for UriBuilder {
    /// Equivalent to [`from_uri`](Self::from_uri).
    #[inline]
    fn from(uri: Uri<T>) -> Self {
        Self::from_uri(&uri)
    }
}

/// Splits `s` on `delim` and drops the trailing empty pieces.
///
/// A string without `delim` yields itself, even when empty.
fn split_terms(s: &str, delim: char) -> Vec<&str> {
    if !s.contains(delim) {
        return vec![s];
    }
    let mut terms: Vec<&str> = s.split(delim).collect();
    while terms.last() == Some(&"") {
        terms.pop();
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_drops_trailing_empties() {
        assert_eq!(split_terms("", '/'), [""]);
        assert_eq!(split_terms("foo", '/'), ["foo"]);
        assert_eq!(split_terms("/", '/'), [] as [&str; 0]);
        assert_eq!(split_terms("/foo/bar/", '/'), ["", "foo", "bar"]);
        assert_eq!(split_terms("a//b", '/'), ["a", "", "b"]);
        assert_eq!(split_terms("k=", '='), ["k"]);
        assert_eq!(split_terms("=v", '='), ["", "v"]);
    }

    #[test]
    fn seed_query_terms() {
        let builder = UriBuilder::parse("http://h.com?a=1&b&c=&=d&e=f=&g==h").unwrap();
        let params: Vec<_> = builder
            .query_parameters()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(params, [("", "d"), ("a", "1"), ("e", "f")]);
    }

    #[test]
    fn seed_opaque_uri() {
        let builder = UriBuilder::parse("mailto:user@example.com?subject=hi#top").unwrap();
        assert_eq!(builder.scheme(), "mailto");
        assert_eq!(builder.host(), "");
        assert!(builder.paths().is_empty());
        assert!(builder.query_parameters().is_empty());
        assert_eq!(builder.fragment(), "top");
    }

    #[test]
    fn seed_port() {
        assert_eq!(UriBuilder::parse("http://h:8080").unwrap().port(), Some(8080));
        assert_eq!(UriBuilder::parse("http://h:").unwrap().port(), None);
        assert_eq!(UriBuilder::parse("http://h:99999999999").unwrap().port(), None);
        assert_eq!(UriBuilder::parse("http://h").unwrap().port(), None);
    }

    #[test]
    fn failed_encoding_keeps_state() {
        use crate::entity::PercentEncoder;

        let mut builder = UriBuilder::new();
        builder.append_raw_paths(["kept"]).unwrap();
        let mut builder = builder.with_encoder(PercentEncoder::for_label("inv"));

        let e = builder.set_paths(["x"]).unwrap_err();
        assert!(matches!(e, BuildError::Encoding(ref e) if e.label() == "inv"));
        assert_eq!(builder.paths(), ["kept"]);

        builder.set_raw_host("raw.example.com").unwrap();
        assert_eq!(builder.host(), "raw.example.com");
    }
}
