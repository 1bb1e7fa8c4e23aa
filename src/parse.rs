//! An RFC 3986 URI-reference recognizer.
//!
//! [`parse`] walks the input once, validates it against the grammar and
//! records where each component starts and ends. It never allocates.

use crate::table::{self, Table};

/// Detailed cause of a [`ParseError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseErrorKind {
    /// A character that the grammar does not allow here, or a premature end.
    ///
    /// The index is that of the offending byte, or the input length.
    UnexpectedCharOrEnd,
    /// The text between `[` and `]` is not an IPv6 address.
    ///
    /// The index is that of the first byte after `[`.
    InvalidIpv6Addr,
}

/// An error occurred when parsing a URI reference.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParseError {
    pub(crate) index: usize,
    pub(crate) kind: ParseErrorKind,
}

impl ParseError {
    /// Returns the byte index at which parsing stopped.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns why parsing stopped.
    #[must_use]
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }
}

#[cfg(feature = "impl-error")]
impl crate::Error for ParseError {}

type Result<T> = core::result::Result<T, ParseError>;

const fn unexpected(index: usize) -> ParseError {
    ParseError {
        index,
        kind: ParseErrorKind::UnexpectedCharOrEnd,
    }
}

/// Component positions within a parsed URI reference.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Meta {
    /// Index of the colon after the scheme.
    pub(crate) scheme_end: Option<usize>,
    pub(crate) authority: Option<AuthMeta>,
    pub(crate) path: (usize, usize),
    /// Index one past the query.
    pub(crate) query_end: Option<usize>,
    /// Index one past the `#`.
    pub(crate) fragment_start: Option<usize>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct AuthMeta {
    /// Index one past the `//`.
    pub(crate) start: usize,
    pub(crate) host: (usize, usize),
}

pub(crate) fn parse(s: &str) -> Result<Meta> {
    let mut cur = Cursor {
        bytes: s.as_bytes(),
        pos: 0,
    };
    let mut meta = Meta {
        scheme_end: cur.scheme()?,
        ..Meta::default()
    };

    if cur.rest().starts_with(b"//") {
        cur.pos += 2;
        meta.authority = Some(cur.authority()?);
    }

    let path_start = cur.pos;
    if meta.scheme_end.is_none() && meta.authority.is_none() {
        // Without a scheme, a colon in the first segment is an error.
        cur.skip(table::SEGMENT_NC)?;
        if cur.peek() == Some(b':') {
            return Err(unexpected(cur.pos));
        }
    }
    cur.skip(table::PATH)?;
    meta.path = (path_start, cur.pos);

    if cur.eat(b'?') {
        cur.skip(table::QUERY)?;
        meta.query_end = Some(cur.pos);
    }
    if cur.eat(b'#') {
        meta.fragment_start = Some(cur.pos);
        cur.skip(table::FRAGMENT)?;
    }

    if cur.pos != cur.bytes.len() {
        return Err(unexpected(cur.pos));
    }
    Ok(meta)
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Cursor<'_> {
    fn rest(&self) -> &[u8] {
        &self.bytes[self.pos..]
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eat(&mut self, x: u8) -> bool {
        let hit = self.peek() == Some(x);
        if hit {
            self.pos += 1;
        }
        hit
    }

    fn count_while(&mut self, f: impl Fn(u8) -> bool) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(&f) {
            self.pos += 1;
        }
        self.pos - start
    }

    /// Advances over members of `table`, and over `%XX` triplets when
    /// the table takes them. Stops at the first byte that is neither.
    fn skip(&mut self, table: Table) -> Result<()> {
        while let Some(x) = self.peek() {
            if table.contains(x) {
                self.pos += 1;
            } else if x == b'%' && table.pct_encoded() {
                for i in 1..3 {
                    if !self
                        .bytes
                        .get(self.pos + i)
                        .is_some_and(u8::is_ascii_hexdigit)
                    {
                        return Err(unexpected(self.pos + i));
                    }
                }
                self.pos += 3;
            } else {
                break;
            }
        }
        Ok(())
    }

    /// Consumes `scheme ":"` when the input starts with one.
    fn scheme(&mut self) -> Result<Option<usize>> {
        let end = match self.bytes.iter().position(|x| b":/?#".contains(x)) {
            Some(i) if self.bytes[i] == b':' => i,
            _ => return Ok(None),
        };

        let name = &self.bytes[..end];
        if name.is_empty() || !table::SCHEME.matches_all(name) {
            return Ok(None);
        }
        if !name[0].is_ascii_alphabetic() {
            return Err(unexpected(0));
        }
        self.pos = end + 1;
        Ok(Some(end))
    }

    /// Reads `[ userinfo "@" ] host [ ":" port ]` up to the next `/`, `?` or `#`.
    fn authority(&mut self) -> Result<AuthMeta> {
        let start = self.pos;
        let end = self
            .rest()
            .iter()
            .position(|x| b"/?#".contains(x))
            .map_or(self.bytes.len(), |i| start + i);

        if let Some(at) = self.bytes[start..end].iter().position(|&x| x == b'@') {
            self.skip(table::USERINFO)?;
            if self.pos != start + at {
                return Err(unexpected(self.pos));
            }
            self.pos += 1;
        }

        let host_start = self.pos;
        if self.eat(b'[') {
            self.ip_literal()?;
        } else {
            self.skip(table::REG_NAME)?;
        }
        let host = (host_start, self.pos);

        if self.eat(b':') {
            self.count_while(|x| x.is_ascii_digit());
        }
        if self.pos != end {
            return Err(unexpected(self.pos));
        }
        Ok(AuthMeta { start, host })
    }

    /// Reads an IPv6 or IPvFuture address and the closing `]`.
    fn ip_literal(&mut self) -> Result<()> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'v' | b'V')) {
            self.pos += 1;
            if self.count_while(|x| x.is_ascii_hexdigit()) == 0 || !self.eat(b'.') {
                return Err(unexpected(self.pos));
            }
            if self.count_while(|x| table::IPV_FUTURE.contains(x)) == 0 {
                return Err(unexpected(self.pos));
            }
        } else {
            let len = self.count_while(|x| x.is_ascii_hexdigit() || x == b':' || x == b'.');
            if len == 0 {
                return Err(unexpected(start));
            }
            if !is_ipv6(&self.bytes[start..self.pos]) {
                return Err(ParseError {
                    index: start,
                    kind: ParseErrorKind::InvalidIpv6Addr,
                });
            }
        }

        if !self.eat(b']') {
            return Err(unexpected(self.pos));
        }
        Ok(())
    }
}

fn is_ipv6(addr: &[u8]) -> bool {
    let ellipsis = |s: &[u8]| s.windows(2).position(|w| w == b"::");
    match ellipsis(addr) {
        Some(i) => {
            let (head, tail) = (&addr[..i], &addr[i + 2..]);
            if ellipsis(tail).is_some() {
                return false;
            }
            // The ellipsis stands for at least one piece.
            matches!(
                (pieces(head, false), pieces(tail, true)),
                (Some(h), Some(t)) if h + t < 8
            )
        }
        None => pieces(addr, true) == Some(8),
    }
}

/// Counts the 16-bit pieces of a colon-separated run. A dotted IPv4
/// address in last place counts as two.
fn pieces(run: &[u8], v4_last: bool) -> Option<usize> {
    if run.is_empty() {
        return Some(0);
    }

    let mut count = 0;
    let mut groups = run.split(|&x| x == b':').peekable();
    while let Some(group) = groups.next() {
        if v4_last && groups.peek().is_none() && group.contains(&b'.') {
            if !is_ipv4(group) {
                return None;
            }
            count += 2;
        } else if (1..=4).contains(&group.len()) && group.iter().all(u8::is_ascii_hexdigit) {
            count += 1;
        } else {
            return None;
        }
    }
    Some(count)
}

fn is_ipv4(addr: &[u8]) -> bool {
    let mut octets = 0;
    for octet in addr.split(|&x| x == b'.') {
        octets += 1;
        let dec_octet = matches!(
            octet,
            [b'0'..=b'9']
                | [b'1'..=b'9', b'0'..=b'9']
                | [b'1', b'0'..=b'9', b'0'..=b'9']
                | [b'2', b'0'..=b'4', b'0'..=b'9']
                | [b'2', b'5', b'0'..=b'5']
        );
        if !dec_octet {
            return false;
        }
    }
    octets == 4
}
