// predicates.rs
use crate::entry::{DirEntry, FileAttributes};
use std::time::SystemTime;

/// Entry kind predicates for filtering
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// Plain files
    File,
    /// Directories
    Directory,
    /// Reparse points (symlinks, mount points)
    ReparsePoint,
}

/// Metadata filters applied to reported entries
///
/// Evaluated after the type flags and before the match callback; entries
/// that fail a predicate are simply not reported. Predicates never affect
/// which directories are recursed into.
#[derive(Clone, Debug, Default)]
pub struct Predicates {
    /// Minimum entry size in bytes
    pub min_size: Option<u64>,

    /// Maximum entry size in bytes
    pub max_size: Option<u64>,

    /// Required entry kind
    pub kind: Option<EntryKind>,

    /// Last modified at or after this time
    pub modified_after: Option<SystemTime>,

    /// Last modified at or before this time
    pub modified_before: Option<SystemTime>,
}

impl Predicates {
    /// Checks whether an entry satisfies every configured predicate.
    pub fn matches(&self, entry: &DirEntry) -> bool {
        if let Some(min) = self.min_size {
            if entry.size < min {
                return false;
            }
        }

        if let Some(max) = self.max_size {
            if entry.size > max {
                return false;
            }
        }

        if let Some(kind) = self.kind {
            let ok = match kind {
                EntryKind::File => !entry.is_directory(),
                EntryKind::Directory => entry.is_directory(),
                EntryKind::ReparsePoint => {
                    entry.attributes.contains(FileAttributes::REPARSE_POINT)
                }
            };
            if !ok {
                return false;
            }
        }

        if let Some(modified) = entry.modified {
            if let Some(after) = self.modified_after {
                if modified < after {
                    return false;
                }
            }
            if let Some(before) = self.modified_before {
                if modified > before {
                    return false;
                }
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_window() {
        let predicates = Predicates {
            min_size: Some(10),
            max_size: Some(100),
            ..Predicates::default()
        };
        assert!(predicates.matches(&DirEntry::file("mid", 50)));
        assert!(!predicates.matches(&DirEntry::file("small", 5)));
        assert!(!predicates.matches(&DirEntry::file("big", 500)));
    }

    #[test]
    fn kind_filter() {
        let files_only = Predicates {
            kind: Some(EntryKind::File),
            ..Predicates::default()
        };
        assert!(files_only.matches(&DirEntry::file("f", 0)));
        assert!(!files_only.matches(&DirEntry::directory("d")));

        let links_only = Predicates {
            kind: Some(EntryKind::ReparsePoint),
            ..Predicates::default()
        };
        assert!(links_only.matches(&DirEntry::symlink("l", false)));
        assert!(!links_only.matches(&DirEntry::file("f", 0)));
    }

    #[test]
    fn empty_predicates_match_everything() {
        let predicates = Predicates::default();
        assert!(predicates.matches(&DirEntry::file("f", 0)));
        assert!(predicates.matches(&DirEntry::directory("d")));
    }
}
