use super::UriBuilder;
use crate::{error::BuildError, imp::Uri};
use alloc::string::String;
use core::fmt::Write;
use tracing::{debug, warn};

impl UriBuilder {
    /// Serializes the builder state and parses the result into a [`Uri`].
    ///
    /// The builder is left untouched and may be built again.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MalformedUri`] if the serialized string is
    /// not a valid URI reference, which can happen when raw mutators
    /// were given characters that a URI cannot hold.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_builder_tiny::{BuildError, UriBuilder};
    ///
    /// let uri = UriBuilder::new()
    ///     .set_scheme("http")
    ///     .set_host("java.example.com/")?
    ///     .set_port(8080)
    ///     .set_paths(["foo", "bar"])?
    ///     .build()?;
    /// assert_eq!(uri, "http://java.example.com:8080/foo/bar/");
    ///
    /// let err = UriBuilder::new()
    ///     .set_raw_host("example.com")?
    ///     .set_raw_fragment("not a fragment")?
    ///     .build()
    ///     .unwrap_err();
    /// assert!(matches!(err, BuildError::MalformedUri { .. }));
    /// # Ok::<_, BuildError>(())
    /// ```
    pub fn build(&self) -> Result<Uri<String>, BuildError> {
        let buf = self.build_string();
        match Uri::parse(buf.as_str()) {
            Ok(uri) => {
                debug!(uri = uri.as_str(), "built URI");
                Ok(uri.to_owned())
            }
            Err(cause) => {
                warn!(uri = %buf, %cause, "built string is not a valid URI");
                Err(BuildError::MalformedUri { uri: buf, cause })
            }
        }
    }

    /// Serializes the builder state into a string without validating it.
    ///
    /// Components are written in the order host, port, path segments,
    /// query and fragment. Empty path segments are skipped, query
    /// parameters come in ascending key order, and every run of
    /// consecutive slashes is then squashed into one. A non-empty scheme
    /// is prepended last, followed by `"://"`, or by `":/"` when the rest
    /// already starts with a slash.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_builder_tiny::UriBuilder;
    ///
    /// assert_eq!(UriBuilder::new().build_string(), "");
    ///
    /// let uri = UriBuilder::new()
    ///     .set_scheme("http")
    ///     .append_paths(["foo", "bar"])?
    ///     .build_string();
    /// assert_eq!(uri, "http://foo/bar");
    /// # Ok::<_, uri_builder_tiny::BuildError>(())
    /// ```
    #[must_use]
    pub fn build_string(&self) -> String {
        let mut buf = String::new();

        let mut trailing_slash = false;
        if !self.host.is_empty() {
            let host = match self.host.strip_suffix('/') {
                Some(stripped) => {
                    trailing_slash = !self.force_remove_trailing_slash;
                    stripped
                }
                None => &self.host,
            };
            buf.push_str(host);
        }

        if let Some(port) = self.port {
            // Writing to a `String` cannot fail.
            let _ = write!(buf, ":{port}");
        }

        for segment in self.paths.iter().filter(|s| !s.is_empty()) {
            buf.push('/');
            buf.push_str(segment);
        }

        if trailing_slash {
            buf.push('/');
        }

        for (i, (key, value)) in self.query_parameters.iter().enumerate() {
            buf.push(if i == 0 { '?' } else { '&' });
            buf.push_str(key);
            buf.push('=');
            buf.push_str(value);
        }

        if !self.fragment.is_empty() {
            buf.push('#');
            buf.push_str(&self.fragment);
        }

        let rest = squash_slashes(&buf);
        if self.scheme.is_empty() {
            return rest;
        }

        let glue = if rest.starts_with('/') { ":/" } else { "://" };
        let mut out = String::with_capacity(self.scheme.len() + glue.len() + rest.len());
        out.push_str(&self.scheme);
        out.push_str(glue);
        out.push_str(&rest);
        out
    }
}

/// Replaces every run of `'/'` with a single one.
fn squash_slashes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_slash = false;
    for ch in s.chars() {
        let slash = ch == '/';
        if !(slash && prev_slash) {
            out.push(ch);
        }
        prev_slash = slash;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn squash() {
        assert_eq!(squash_slashes(""), "");
        assert_eq!(squash_slashes("///"), "/");
        assert_eq!(squash_slashes("h.com//a///b?q=//#f//"), "h.com/a/b?q=/#f/");
    }

    #[test]
    fn build_leaves_state_untouched() {
        let mut builder = UriBuilder::new();
        builder
            .set_scheme("http")
            .set_host("java.example.com/")
            .unwrap()
            .force_remove_trailing_slash(true);

        assert_eq!(builder.build_string(), "http://java.example.com");
        assert_eq!(builder.host(), "java.example.com/");

        builder.force_remove_trailing_slash(false);
        assert_eq!(builder.build_string(), "http://java.example.com/");
    }

    #[test]
    fn scheme_with_empty_rest() {
        let mut builder = UriBuilder::new();
        builder.set_scheme("http");
        assert_eq!(builder.build_string(), "http://");
        assert_eq!(builder.build().unwrap(), "http://");
    }

    #[test]
    fn port_is_written_in_place() {
        let mut builder = UriBuilder::new();
        builder.set_raw_host("h").unwrap().set_port(0);
        assert_eq!(builder.build_string(), "h:0");

        builder.set_port(i32::MAX).append_raw_paths(["p"]).unwrap();
        assert_eq!(builder.build_string(), "h:2147483647/p");

        builder.set_port(-1);
        assert_eq!(builder.build_string(), "h/p");
    }

    #[test]
    #[traced_test]
    fn malformed_build_is_logged() {
        let mut builder = UriBuilder::new();
        builder.set_raw_host("exa mple.com").unwrap();
        assert!(builder.build().is_err());
        assert!(logs_contain("built string is not a valid URI"));
        assert!(logs_contain("exa mple.com"));
        assert!(!logs_contain("built URI"));

        builder.set_raw_host("example.com").unwrap();
        assert_eq!(builder.build().unwrap(), "example.com");
        assert!(logs_contain("built URI"));
    }

    #[test]
    fn malformed_keeps_string() {
        let mut builder = UriBuilder::new();
        builder.set_raw_paths(["a b"]).unwrap();
        match builder.build() {
            Err(BuildError::MalformedUri { uri, cause }) => {
                assert_eq!(uri, "/a b");
                assert_eq!(cause.index(), 2);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
