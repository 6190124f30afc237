// patterns/expand.rs
//! Compound pattern expansion.
//!
//! `{a,b,c}` substitutes each comma-separated alternative; `[abc]`
//! substitutes each character of a literal run. Every substitution is
//! rescanned from the start, so multiple groups in one pattern expand into
//! their full cross-product, left to right as written. An opener without a
//! matching closer makes the whole pattern literal; it is never an error.

use crate::error::EnumError;
use crate::flags::MatchFlags;
use crate::walker::{self, Callbacks, WalkEnv};

/// Where the first alternation operator sits in a pattern.
enum OperatorScan<'a> {
    /// No `{` or `[` at all.
    None,
    /// An opener with no closer; the pattern is literal text.
    Unterminated,
    Group {
        before: &'a str,
        body: &'a str,
        after: &'a str,
        single_char: bool,
    },
}

fn scan(spec: &str) -> OperatorScan<'_> {
    let Some(open) = spec.find(|c| c == '{' || c == '[') else {
        return OperatorScan::None;
    };
    let single_char = spec.as_bytes()[open] == b'[';
    let closer = if single_char { ']' } else { '}' };
    let Some(close) = spec[open + 1..].find(closer) else {
        return OperatorScan::Unterminated;
    };
    let close = open + 1 + close;
    OperatorScan::Group {
        before: &spec[..open],
        body: &spec[open + 1..close],
        after: &spec[close + 1..],
        single_char,
    }
}

/// Expand every alternation group in `spec` into the cross-product of
/// concrete patterns, in the left-to-right order the alternatives are
/// written.
///
/// A pattern without groups (or with an unterminated opener) comes back as
/// itself. `{}` contributes a single empty alternative; `[]` contributes
/// none.
pub fn expand(spec: &str) -> Vec<String> {
    match scan(spec) {
        OperatorScan::None | OperatorScan::Unterminated => vec![spec.to_string()],
        OperatorScan::Group {
            before,
            body,
            after,
            single_char,
        } => {
            let mut out = Vec::new();
            if single_char {
                for ch in body.chars() {
                    out.extend(expand(&format!("{before}{ch}{after}")));
                }
            } else {
                for alt in body.split(',') {
                    out.extend(expand(&format!("{before}{alt}{after}")));
                }
            }
            out
        }
    }
}

/// Drive the walker once per concrete alternative of `spec`.
///
/// Patterns without operators are handed the home-directory expansion
/// first; unterminated-operator literals go to the walker untouched. A
/// failing alternative aborts the remainder — matches already reported for
/// earlier alternatives stay reported.
pub(crate) fn drive(
    env: &WalkEnv<'_>,
    spec: &str,
    depth: u32,
    callbacks: &mut Callbacks<'_>,
) -> Result<(), EnumError> {
    if env.flags.contains(MatchFlags::BASIC_EXPANSION) {
        return walker::enumerate(env, spec, depth, callbacks);
    }

    match scan(spec) {
        OperatorScan::None => {
            if let Some(expanded) = env.fs.expand_home(spec) {
                walker::enumerate(env, &expanded, depth, callbacks)
            } else {
                walker::enumerate(env, spec, depth, callbacks)
            }
        }
        OperatorScan::Unterminated => {
            tracing::trace!(pattern = spec, "unterminated alternation, matching literally");
            walker::enumerate(env, spec, depth, callbacks)
        }
        OperatorScan::Group {
            before,
            body,
            after,
            single_char,
        } => {
            if single_char {
                for ch in body.chars() {
                    drive(env, &format!("{before}{ch}{after}"), depth, callbacks)?;
                }
            } else {
                for alt in body.split(',') {
                    drive(env, &format!("{before}{alt}{after}"), depth, callbacks)?;
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_groups_passes_through() {
        assert_eq!(expand("plain.txt"), vec!["plain.txt"]);
        assert_eq!(expand("*.rs"), vec!["*.rs"]);
        assert_eq!(expand(""), vec![""]);
    }

    #[test]
    fn brace_alternation() {
        assert_eq!(expand("f{1,2,3}.txt"), vec!["f1.txt", "f2.txt", "f3.txt"]);
        assert_eq!(expand("{a,b}"), vec!["a", "b"]);
        assert_eq!(expand("lib{foo,bar}.so"), vec!["libfoo.so", "libbar.so"]);
    }

    #[test]
    fn bracket_alternation() {
        assert_eq!(expand("f[ab].txt"), vec!["fa.txt", "fb.txt"]);
        assert_eq!(expand("[xyz]"), vec!["x", "y", "z"]);
    }

    #[test]
    fn cross_product_order() {
        assert_eq!(expand("{a,b}{1,2}"), vec!["a1", "a2", "b1", "b2"]);
        assert_eq!(expand("[ab]{1,2}"), vec!["a1", "a2", "b1", "b2"]);
        assert_eq!(
            expand("x{a,b}y[12]z"),
            vec!["xay1z", "xay2z", "xby1z", "xby2z"]
        );
    }

    #[test]
    fn unterminated_is_literal() {
        assert_eq!(expand("file{1,2.txt"), vec!["file{1,2.txt"]);
        assert_eq!(expand("file[ab.txt"), vec!["file[ab.txt"]);
        assert_eq!(expand("{"), vec!["{"]);
        assert_eq!(expand("["), vec!["["]);
    }

    #[test]
    fn closer_without_opener_is_literal_text() {
        assert_eq!(expand("ab}cd"), vec!["ab}cd"]);
        assert_eq!(expand("ab]cd"), vec!["ab]cd"]);
    }

    #[test]
    fn body_stops_at_first_closer() {
        // No nesting awareness: the body ends at the first closer and the
        // leftover brace text re-expands only if it forms a new group.
        assert_eq!(expand("{a,b}c}"), vec!["ac}", "bc}"]);
    }

    #[test]
    fn empty_bodies() {
        assert_eq!(expand("a{}b"), vec!["ab"]);
        assert_eq!(expand("a[]b"), Vec::<String>::new());
        assert_eq!(expand("{,un}do"), vec!["do", "undo"]);
    }

    #[test]
    fn mixed_operator_order() {
        // The first operator wins regardless of kind.
        assert_eq!(expand("[ab]{c,d}"), vec!["ac", "ad", "bc", "bd"]);
        assert_eq!(expand("{c,d}[ab]"), vec!["ca", "cb", "da", "db"]);
    }
}
