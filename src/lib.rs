// lib.rs
#![forbid(unsafe_code)]

//! # filespec
//!
//! Shell-style file pattern enumeration. A pattern may combine literal path
//! segments, a trailing segment with `*`/`?` wildcards, `{a,b,c}` brace
//! alternation, `[abc]` single-character alternation, a leading `~`, and an
//! optional `file:///` prefix. Every alternation group expands into its
//! cross-product of concrete patterns; each concrete pattern drives a
//! recursive directory walk that invokes a callback once per match.
//!
//! ```no_run
//! use filespec::{for_each_file, MatchFlags};
//!
//! let flags = MatchFlags::RETURN_FILES | MatchFlags::RECURSE_AFTER_REPORT;
//! for_each_file("src/*.{rs,toml}", flags, |path, entry, depth| {
//!     println!("{depth} {} ({} bytes)", path, entry.size);
//!     true // keep going
//! })
//! .unwrap();
//! ```
//!
//! Returning `false` from the callback stops the whole enumeration with
//! [`EnumError::Stopped`]; a shared [`CancelToken`] does the same from
//! outside the callback. Enumeration is single-threaded and depth-first;
//! see [`Enumerator`] for cancellation, custom filesystems and metadata
//! predicates.

pub mod cancel;
pub mod entry;
pub mod error;
pub mod flags;
pub mod fs;
pub mod paths;
pub mod patterns;
pub mod predicates;
pub mod roots;
pub mod testing;
mod walker;

pub use crate::cancel::CancelToken;
pub use crate::entry::{DirEntry, FileAttributes, ReparseKind};
pub use crate::error::EnumError;
pub use crate::flags::MatchFlags;
pub use crate::fs::{FileSystem, OsFileSystem};
pub use crate::predicates::{EntryKind, Predicates};

use camino::Utf8Path;
use std::io;
use walker::{Callbacks, WalkEnv};

static OS_FILE_SYSTEM: OsFileSystem = OsFileSystem;

/// Invoke `on_match` once per filesystem entry matching `spec`.
///
/// The callback receives the full path, the entry metadata, and the
/// recursion depth; returning `false` aborts the enumeration. This is the
/// convenience form of [`Enumerator`] over the host filesystem with no
/// error callback: directories that fail to list are skipped silently.
pub fn for_each_file<M>(spec: &str, flags: MatchFlags, on_match: M) -> Result<(), EnumError>
where
    M: FnMut(&Utf8Path, &DirEntry, u32) -> bool,
{
    Enumerator::new(flags).run(spec, on_match)
}

/// Configurable enumeration
///
/// Builder-style: choose the filesystem, share a cancellation token, attach
/// metadata predicates or start at a non-zero depth, then [`run`](Self::run)
/// one or more patterns.
pub struct Enumerator<'fs> {
    fs: &'fs dyn FileSystem,
    flags: MatchFlags,
    cancel: CancelToken,
    predicates: Option<Predicates>,
    initial_depth: u32,
}

impl Enumerator<'static> {
    /// An enumerator over the host filesystem.
    pub fn new(flags: MatchFlags) -> Self {
        Self::with_fs(&OS_FILE_SYSTEM, flags)
    }
}

impl<'fs> Enumerator<'fs> {
    /// An enumerator over any [`FileSystem`] implementation.
    pub fn with_fs(fs: &'fs dyn FileSystem, flags: MatchFlags) -> Self {
        Self {
            fs,
            flags,
            cancel: CancelToken::new(),
            predicates: None,
            initial_depth: 0,
        }
    }

    /// Share a cancellation token; cancelling it unwinds a running
    /// enumeration after the current match.
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Filter reported entries by metadata. Recursion is unaffected.
    pub fn predicates(mut self, predicates: Predicates) -> Self {
        self.predicates = Some(predicates);
        self
    }

    /// Report depths starting from `depth` instead of zero. The top-level
    /// directory rewrites only apply at depth zero.
    pub fn initial_depth(mut self, depth: u32) -> Self {
        self.initial_depth = depth;
        self
    }

    /// Enumerate `spec`, skipping unlistable directories silently.
    pub fn run<M>(&self, spec: &str, mut on_match: M) -> Result<(), EnumError>
    where
        M: FnMut(&Utf8Path, &DirEntry, u32) -> bool,
    {
        let env = self.env();
        let mut callbacks = Callbacks {
            on_match: &mut on_match,
            on_error: None,
        };
        patterns::expand::drive(&env, spec, self.initial_depth, &mut callbacks)
    }

    /// Enumerate `spec` with an error callback.
    ///
    /// `on_error` is invoked with the path that failed to list, the
    /// underlying error, and the depth; returning `false` fails the whole
    /// walk, returning `true` skips that directory.
    pub fn run_with<M, E>(&self, spec: &str, mut on_match: M, mut on_error: E) -> Result<(), EnumError>
    where
        M: FnMut(&Utf8Path, &DirEntry, u32) -> bool,
        E: FnMut(&Utf8Path, &io::Error, u32) -> bool,
    {
        let env = self.env();
        let mut callbacks = Callbacks {
            on_match: &mut on_match,
            on_error: Some(&mut on_error),
        };
        patterns::expand::drive(&env, spec, self.initial_depth, &mut callbacks)
    }

    fn env(&self) -> WalkEnv<'_> {
        WalkEnv {
            fs: self.fs,
            flags: self.flags,
            cancel: &self.cancel,
            predicates: self.predicates.as_ref(),
        }
    }
}
