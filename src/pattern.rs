//! Route pattern compilation and request path normalization.
//!
//! A pattern such as `/users/:id/files/*` is compiled once, at registration time, into a flat list
//! of typed [`Segment`]s. At request time the path is [`clean`]ed, [`split`] into pieces and the
//! pieces are percent-decoded, see [`split_decoded`]. They are then compared position by position
//! against those segments.

use crate::helpers;
use smallvec::{smallvec, SmallVec};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// The path separator. A cleaned root path is the separator itself.
pub const SEPARATOR: &str = "/";

/// The pieces of a split request path. Most paths fit inline.
pub type Pieces<'a> = SmallVec<[&'a str; 8]>;

/// The percent-decoded pieces of a request path. Pieces without escapes stay borrowed.
pub type DecodedPieces<'a> = SmallVec<[Cow<'a, str>; 8]>;

/// The kind of a compiled pattern segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// Matches a piece by exact string equality.
    Static,
    /// `:name`, captures one non-empty piece.
    Parameter,
    /// `:name?`, captures one piece which may be absent.
    Optional,
    /// `*`, accepts any piece and absorbs the remaining ones.
    Any,
}

/// One typed unit of a compiled route pattern.
#[derive(Clone, PartialEq, Eq)]
pub struct Segment {
    original: Arc<str>,
    kind: SegmentKind,
    value: String,
}

impl Segment {
    fn new(original: &Arc<str>, kind: SegmentKind, value: &str) -> Self {
        Segment {
            original: Arc::clone(original),
            kind,
            value: value.to_owned(),
        }
    }

    /// The full pattern this segment was compiled from.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    /// The literal text for static segments, the parameter name for parameters and the wildcard
    /// marker for wildcards.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub(crate) fn accepts(&self, piece: &str) -> bool {
        match self.kind {
            SegmentKind::Static => self.value == piece,
            SegmentKind::Parameter => !is_placeholder(piece),
            SegmentKind::Optional | SegmentKind::Any => true,
        }
    }

    pub(crate) fn captures(&self) -> bool {
        self.kind != SegmentKind::Static
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?})", self.kind, self.value)
    }
}

/// Compiles a route pattern into its ordered list of segments.
///
/// The returned list is never empty: the root pattern compiles to a single static segment valued
/// `/`. A wildcard ends compilation, anything after its segment is ignored.
///
/// # Examples
///
/// ```
/// use segroute::pattern::{compile, SegmentKind};
///
/// let segments = compile("/users/:id?");
/// assert_eq!(segments.len(), 2);
/// assert_eq!(segments[0].kind(), SegmentKind::Static);
/// assert_eq!(segments[1].kind(), SegmentKind::Optional);
/// assert_eq!(segments[1].value(), "id");
/// ```
pub fn compile(pattern: &str) -> Vec<Segment> {
    let original: Arc<str> = Arc::from(pattern);
    let cleaned = clean(pattern);

    if cleaned == SEPARATOR {
        return vec![Segment::new(&original, SegmentKind::Static, SEPARATOR)];
    }

    let mut segments = Vec::new();
    let mut rest = cleaned;

    while !rest.is_empty() {
        let end = rest.find('/').unwrap_or(rest.len());
        let token = &rest[..end];

        if let Some(name) = token.strip_prefix(':') {
            match name.find('?') {
                Some(pos) => segments.push(Segment::new(&original, SegmentKind::Optional, &name[..pos])),
                None => segments.push(Segment::new(&original, SegmentKind::Parameter, name)),
            }
        } else if token.starts_with('*') {
            segments.push(Segment::new(&original, SegmentKind::Any, token));
            break;
        } else {
            segments.push(Segment::new(&original, SegmentKind::Static, token));
        }

        rest = &rest[end..];
        rest = rest.strip_prefix('/').unwrap_or(rest);
    }

    segments
}

/// Drops every leading and trailing separator. An empty result is the separator itself.
pub fn clean(path: &str) -> &str {
    let trimmed = path.trim_start_matches('/').trim_end_matches('/');
    if trimmed.is_empty() {
        SEPARATOR
    } else {
        trimmed
    }
}

/// Cleans a path and splits it into pieces. The root path is the single piece `/`.
pub fn split(path: &str) -> Pieces<'_> {
    let cleaned = clean(path);
    if cleaned == SEPARATOR {
        smallvec![SEPARATOR]
    } else {
        cleaned.split('/').collect()
    }
}

/// Splits a path like [`split`] and percent-decodes every piece. Decoding happens after the split,
/// so an encoded separator stays inside its piece.
///
/// # Examples
///
/// ```
/// use segroute::pattern::split_decoded;
///
/// let pieces = split_decoded("/caf%C3%A9/a%2Fb");
/// assert_eq!(pieces.as_slice(), &["caf\u{e9}", "a/b"]);
/// ```
pub fn split_decoded(path: &str) -> DecodedPieces<'_> {
    split(path).into_iter().map(helpers::percent_decode_piece).collect()
}

/// A piece standing for an empty slot: the root piece, or the gap left by adjacent separators.
pub fn is_placeholder(piece: &str) -> bool {
    piece.is_empty() || piece == SEPARATOR
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(pattern: &str) -> Vec<(SegmentKind, String)> {
        compile(pattern)
            .into_iter()
            .map(|s| (s.kind(), s.value().to_owned()))
            .collect()
    }

    #[test]
    fn compiles_root() {
        assert_eq!(kinds("/"), vec![(SegmentKind::Static, "/".to_owned())]);
        assert_eq!(kinds(""), vec![(SegmentKind::Static, "/".to_owned())]);
        assert_eq!(kinds("///"), vec![(SegmentKind::Static, "/".to_owned())]);
    }

    #[test]
    fn compiles_parameters() {
        assert_eq!(
            kinds("/users/:id"),
            vec![(SegmentKind::Static, "users".to_owned()), (SegmentKind::Parameter, "id".to_owned())]
        );
        assert_eq!(
            kinds("/users/:id?"),
            vec![(SegmentKind::Static, "users".to_owned()), (SegmentKind::Optional, "id".to_owned())]
        );
        assert_eq!(
            kinds("/users/:userId/books/:bookId"),
            vec![
                (SegmentKind::Static, "users".to_owned()),
                (SegmentKind::Parameter, "userId".to_owned()),
                (SegmentKind::Static, "books".to_owned()),
                (SegmentKind::Parameter, "bookId".to_owned()),
            ]
        );
    }

    #[test]
    fn optional_name_is_cut_at_question_mark() {
        assert_eq!(kinds("/:id?x"), vec![(SegmentKind::Optional, "id".to_owned())]);
    }

    #[test]
    fn wildcard_ends_compilation() {
        assert_eq!(
            kinds("/files/*"),
            vec![(SegmentKind::Static, "files".to_owned()), (SegmentKind::Any, "*".to_owned())]
        );
        assert_eq!(kinds("/*/ignored/:x"), vec![(SegmentKind::Any, "*".to_owned())]);
    }

    #[test]
    fn trailing_separators_are_dropped() {
        assert_eq!(kinds("/about/"), vec![(SegmentKind::Static, "about".to_owned())]);
    }

    #[test]
    fn adjacent_separators_yield_empty_static() {
        assert_eq!(
            kinds("/a//b"),
            vec![
                (SegmentKind::Static, "a".to_owned()),
                (SegmentKind::Static, "".to_owned()),
                (SegmentKind::Static, "b".to_owned()),
            ]
        );
    }

    #[test]
    fn segments_remember_their_pattern() {
        let segments = compile("/users/:id");
        assert!(segments.iter().all(|s| s.original() == "/users/:id"));
        assert!(segments.iter().all(|s| !s.value().contains('/') || s.value() == SEPARATOR));
    }

    #[test]
    fn cleans_and_splits_paths() {
        assert_eq!(clean("//users//"), "users");
        assert_eq!(clean("/"), "/");
        assert_eq!(clean(""), "/");

        assert_eq!(split("/").as_slice(), &["/"]);
        assert_eq!(split("/users/42/").as_slice(), &["users", "42"]);
        assert_eq!(split("/a//b").as_slice(), &["a", "", "b"]);
    }

    #[test]
    fn decodes_pieces_after_splitting() {
        assert_eq!(split_decoded("/").as_slice(), &["/"]);
        assert_eq!(split_decoded("/users/j%C3%B6rg/").as_slice(), &["users", "j\u{f6}rg"]);
        assert_eq!(split_decoded("/a%2Fb/c").as_slice(), &["a/b", "c"]);
        assert!(matches!(split_decoded("/plain")[0], Cow::Borrowed("plain")));
    }

    #[test]
    fn placeholder_pieces() {
        assert!(is_placeholder(""));
        assert!(is_placeholder("/"));
        assert!(!is_placeholder("users"));
    }
}
