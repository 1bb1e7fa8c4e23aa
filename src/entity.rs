//! Entity encoders applied to builder input at write time.
//!
//! Every non-raw mutator of [`UriBuilder`] passes its input through an
//! [`EntityEncoder`] before storing it. The default is a UTF-8
//! [`PercentEncoder`], which follows the `application/x-www-form-urlencoded`
//! serializer: `A-Z a-z 0-9 . - * _` are kept, the space character becomes
//! `"+"`, and every other byte is written as an uppercase `%XX` triplet.
//!
//! # Examples
//!
//! ```
//! use uri_builder_tiny::entity::{Charset, EntityEncoder, PercentEncoder, RawEncoder};
//!
//! let utf8 = PercentEncoder::default();
//! assert_eq!(utf8.encode(&"a b&c")?, "a+b%26c");
//! assert_eq!(utf8.encode(&"é")?, "%C3%A9");
//!
//! let latin1 = PercentEncoder::new(Charset::Latin1);
//! assert_eq!(latin1.encode(&"é")?, "%E9");
//!
//! assert_eq!(RawEncoder.encode(&"a b&c")?, "a b&c");
//! # Ok::<_, uri_builder_tiny::EncodeError>(())
//! ```
//!
//! [`UriBuilder`]: crate::UriBuilder

use crate::{error::EncodeError, table::FORM_UNRESERVED};
use alloc::{
    collections::BTreeMap,
    string::{String, ToString},
    vec::Vec,
};
use core::fmt::{Debug, Display};

/// A strategy for turning a displayable value into the text stored by a builder.
pub trait EntityEncoder: Debug + Send + Sync {
    /// Encodes the string form of `value`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the encoder cannot produce output for its
    /// configured target encoding.
    fn encode(&self, value: &dyn Display) -> Result<String, EncodeError>;
}

/// Batch helpers implemented for every [`EntityEncoder`].
pub trait EntityEncoderExt: EntityEncoder {
    /// Encodes every item of `values`, preserving order.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`EntityEncoder::encode`].
    fn encode_all<I>(&self, values: I) -> Result<Vec<String>, EncodeError>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        values.into_iter().map(|v| self.encode(&v)).collect()
    }

    /// Encodes both the key and the value of every pair of `pairs`.
    ///
    /// When two keys are equal after encoding, the later pair wins.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`EntityEncoder::encode`].
    fn encode_pairs<I, K, V>(&self, pairs: I) -> Result<BTreeMap<String, String>, EncodeError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Display,
        V: Display,
    {
        pairs
            .into_iter()
            .map(|(k, v)| Ok((self.encode(&k)?, self.encode(&v)?)))
            .collect()
    }
}

impl<E: EntityEncoder + ?Sized> EntityEncoderExt for E {}

/// A character encoding that text is converted to before percent-encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Charset {
    /// UTF-8.
    #[default]
    Utf8,
    /// ISO-8859-1.
    ///
    /// Characters above U+00FF cannot be represented and are
    /// replaced with `"?"` before percent-encoding.
    Latin1,
}

impl Charset {
    /// Looks up a charset by one of its labels, ignoring ASCII case.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_builder_tiny::entity::Charset;
    ///
    /// assert_eq!(Charset::from_label("UTF-8"), Some(Charset::Utf8));
    /// assert_eq!(Charset::from_label("latin1"), Some(Charset::Latin1));
    /// assert_eq!(Charset::from_label("x-unknown"), None);
    /// ```
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        const UTF8: &[&str] = &["utf-8", "utf8", "unicode-1-1-utf-8"];
        const LATIN1: &[&str] = &[
            "iso-8859-1",
            "iso8859-1",
            "iso_8859-1",
            "iso_8859_1",
            "latin1",
            "l1",
            "cp819",
            "ibm819",
        ];

        let label = label.trim();
        let matches = |names: &[&str]| names.iter().any(|n| n.eq_ignore_ascii_case(label));
        if matches(UTF8) {
            Some(Self::Utf8)
        } else if matches(LATIN1) {
            Some(Self::Latin1)
        } else {
            None
        }
    }

    /// Returns the canonical label of the charset.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Latin1 => "ISO-8859-1",
        }
    }
}

/// A form-style percent-encoder over a target [`Charset`].
///
/// An encoder created with [`for_label`](Self::for_label) from a label that
/// names no supported charset is still constructible, but every call to
/// [`encode`](EntityEncoder::encode) on it fails with [`EncodeError`].
#[derive(Clone, Debug)]
pub struct PercentEncoder {
    charset: Result<Charset, EncodeError>,
}

impl PercentEncoder {
    /// Creates a percent-encoder targeting the given charset.
    #[must_use]
    pub const fn new(charset: Charset) -> Self {
        Self {
            charset: Ok(charset),
        }
    }

    /// Creates a percent-encoder targeting the charset named by `label`.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_builder_tiny::entity::{EntityEncoder, PercentEncoder};
    ///
    /// let enc = PercentEncoder::for_label("ISO-8859-1");
    /// assert_eq!(enc.encode(&"ü")?, "%FC");
    ///
    /// let enc = PercentEncoder::for_label("invalid");
    /// assert_eq!(enc.encode(&"foo").unwrap_err().label(), "invalid");
    /// # Ok::<_, uri_builder_tiny::EncodeError>(())
    /// ```
    #[must_use]
    pub fn for_label(label: &str) -> Self {
        Self {
            charset: Charset::from_label(label).ok_or_else(|| EncodeError {
                label: label.to_string(),
            }),
        }
    }

    /// Returns the target charset, or `None` if the label was not recognized.
    #[must_use]
    pub fn charset(&self) -> Option<Charset> {
        self.charset.as_ref().ok().copied()
    }
}

impl Default for PercentEncoder {
    fn default() -> Self {
        Self::new(Charset::Utf8)
    }
}

impl EntityEncoder for PercentEncoder {
    fn encode(&self, value: &dyn Display) -> Result<String, EncodeError> {
        let charset = match &self.charset {
            Ok(charset) => *charset,
            Err(e) => return Err(e.clone()),
        };

        let s = value.to_string();
        let mut buf = String::with_capacity(s.len());
        let mut utf8 = [0; 4];
        for ch in s.chars() {
            let bytes: &[u8] = match charset {
                Charset::Utf8 => ch.encode_utf8(&mut utf8).as_bytes(),
                Charset::Latin1 => {
                    utf8[0] = u8::try_from(ch).unwrap_or(b'?');
                    &utf8[..1]
                }
            };
            for &x in bytes {
                push_form_byte(&mut buf, x);
            }
        }
        Ok(buf)
    }
}

fn push_form_byte(buf: &mut String, x: u8) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    if x == b' ' {
        buf.push('+');
    } else if FORM_UNRESERVED.contains(x) {
        buf.push(x as char);
    } else {
        buf.push('%');
        buf.push(HEX[usize::from(x >> 4)] as char);
        buf.push(HEX[usize::from(x & 0xf)] as char);
    }
}

/// An encoder that stores its input as is.
#[derive(Clone, Copy, Debug, Default)]
pub struct RawEncoder;

impl EntityEncoder for RawEncoder {
    #[inline]
    fn encode(&self, value: &dyn Display) -> Result<String, EncodeError> {
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_style() {
        let enc = PercentEncoder::default();
        assert_eq!(enc.encode(&"foo bar").unwrap(), "foo+bar");
        assert_eq!(enc.encode(&"%").unwrap(), "%25");
        assert_eq!(enc.encode(&"a.b-c*d_e").unwrap(), "a.b-c*d_e");
        assert_eq!(enc.encode(&"~+/").unwrap(), "%7E%2B%2F");
        assert_eq!(enc.encode(&"あ").unwrap(), "%E3%81%82");
        assert_eq!(enc.encode(&8080).unwrap(), "8080");
    }

    #[test]
    fn latin1_replaces_unmappable() {
        let enc = PercentEncoder::new(Charset::Latin1);
        assert_eq!(enc.encode(&"é").unwrap(), "%E9");
        assert_eq!(enc.encode(&"あ").unwrap(), "%3F");
    }

    #[test]
    fn unknown_label() {
        let enc = PercentEncoder::for_label("inv");
        assert_eq!(enc.charset(), None);
        let e = enc.encode(&"foo").unwrap_err();
        assert_eq!(e.label(), "inv");
        assert!(enc.encode_all(["a", "b"]).is_err());
    }

    #[test]
    fn batch_helpers() {
        let enc = PercentEncoder::default();
        assert_eq!(enc.encode_all(["a b", "c/d"]).unwrap(), ["a+b", "c%2Fd"]);

        let latin1 = PercentEncoder::new(Charset::Latin1);
        let map = latin1.encode_pairs([("あ", 1), ("い", 2)]).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["%3F"], "2");

        let map = RawEncoder.encode_pairs([("k&", "v="), ("a", "b")]).unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), ["a", "k&"]);
    }
}
