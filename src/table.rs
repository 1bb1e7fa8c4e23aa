//! ASCII character classes used by the parser and the form encoder.

/// A set of ASCII bytes, plus whether `%XX` triplets are accepted.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Table {
    ascii: u128,
    pct_encoded: bool,
}

impl Table {
    const fn of(bytes: &[u8]) -> Self {
        let mut ascii = 0u128;
        let mut i = 0;
        while i < bytes.len() {
            assert!(bytes[i].is_ascii() && bytes[i] != b'%');
            ascii |= 1u128 << bytes[i];
            i += 1;
        }
        Self {
            ascii,
            pct_encoded: false,
        }
    }

    const fn range(lo: u8, hi: u8) -> Self {
        let mut ascii = 0u128;
        let mut b = lo;
        while b <= hi {
            ascii |= 1u128 << b;
            b += 1;
        }
        Self {
            ascii,
            pct_encoded: false,
        }
    }

    const fn or(self, other: Self) -> Self {
        Self {
            ascii: self.ascii | other.ascii,
            pct_encoded: self.pct_encoded || other.pct_encoded,
        }
    }

    const fn with_pct_encoded(self) -> Self {
        Self {
            ascii: self.ascii,
            pct_encoded: true,
        }
    }

    /// Whether the unencoded byte `x` is a member.
    #[inline]
    pub(crate) const fn contains(self, x: u8) -> bool {
        x < 128 && self.ascii & (1u128 << x) != 0
    }

    #[inline]
    pub(crate) const fn pct_encoded(self) -> bool {
        self.pct_encoded
    }

    /// Whether every byte of `s` is a member. `%` is never accepted here.
    pub(crate) const fn matches_all(self, s: &[u8]) -> bool {
        let mut i = 0;
        while i < s.len() {
            if !self.contains(s[i]) {
                return false;
            }
            i += 1;
        }
        true
    }
}

const ALPHA: Table = Table::range(b'A', b'Z').or(Table::range(b'a', b'z'));
const DIGIT: Table = Table::range(b'0', b'9');
const UNRESERVED: Table = ALPHA.or(DIGIT).or(Table::of(b"-._~"));
const SUB_DELIMS: Table = Table::of(b"!$&'()*+,;=");

/// Scheme characters after the leading letter.
pub(crate) const SCHEME: Table = ALPHA.or(DIGIT).or(Table::of(b"+-."));
pub(crate) const USERINFO: Table = UNRESERVED
    .or(SUB_DELIMS)
    .or(Table::of(b":"))
    .with_pct_encoded();
pub(crate) const REG_NAME: Table = UNRESERVED.or(SUB_DELIMS).with_pct_encoded();
pub(crate) const IPV_FUTURE: Table = UNRESERVED.or(SUB_DELIMS).or(Table::of(b":"));
/// A path segment that must not contain a colon: the first segment
/// of a relative reference.
pub(crate) const SEGMENT_NC: Table = UNRESERVED
    .or(SUB_DELIMS)
    .or(Table::of(b"@"))
    .with_pct_encoded();
const PCHAR: Table = SEGMENT_NC.or(Table::of(b":"));
pub(crate) const PATH: Table = PCHAR.or(Table::of(b"/"));
pub(crate) const QUERY: Table = PCHAR.or(Table::of(b"/?"));
pub(crate) const FRAGMENT: Table = QUERY;

/// Bytes the `application/x-www-form-urlencoded` serializer keeps as is.
pub(crate) const FORM_UNRESERVED: Table = ALPHA.or(DIGIT).or(Table::of(b".-*_"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_unreserved() {
        for x in b"azAZ09.-*_" {
            assert!(FORM_UNRESERVED.contains(*x));
        }
        for x in b" ~+/%=&" {
            assert!(!FORM_UNRESERVED.contains(*x));
        }
        assert!(!FORM_UNRESERVED.contains(0xe9));
        assert!(!FORM_UNRESERVED.pct_encoded());

        // Encoder output stays legal wherever the builder puts it.
        for x in 0..128u8 {
            if FORM_UNRESERVED.contains(x) {
                assert!(SEGMENT_NC.contains(x) && REG_NAME.contains(x), "{x}");
            }
        }
    }

    #[test]
    fn component_classes() {
        assert!(PATH.contains(b'/') && !PATH.contains(b'?') && !PATH.contains(b'#'));
        assert!(QUERY.contains(b'?') && !QUERY.contains(b'#'));
        assert!(!SEGMENT_NC.contains(b':') && PATH.contains(b':'));
        assert!(USERINFO.contains(b':') && !USERINFO.contains(b'@'));
        assert!(!REG_NAME.contains(b':'));
        assert!(!IPV_FUTURE.pct_encoded() && QUERY.pct_encoded());
        assert!(SCHEME.matches_all(b"svn+ssh") && !SCHEME.matches_all(b"a_b"));
    }
}
