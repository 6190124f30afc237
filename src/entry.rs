// entry.rs
use bitflags::bitflags;
use std::time::SystemTime;

bitflags! {
    /// Attribute bits attached to a listed entry
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FileAttributes: u32 {
        const DIRECTORY = 0x01;
        const REPARSE_POINT = 0x02;
        const READ_ONLY = 0x04;
        const HIDDEN = 0x08;
    }
}

/// What kind of reparse point an entry is, if any
///
/// Only symlinks and mount points are ever withheld from recursion by
/// [`MatchFlags::NO_LINK_TRAVERSAL`](crate::MatchFlags::NO_LINK_TRAVERSAL);
/// other reparse kinds are traversed normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReparseKind {
    #[default]
    None,
    Symlink,
    MountPoint,
}

/// One entry produced by a directory listing
///
/// Carries the full metadata set returned by the listing operation so
/// callers can render sizes and timestamps without re-stat'ing the path.
/// The `name` is the final component only; the walker combines it with the
/// resolved parent directory to form the reported full path.
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub attributes: FileAttributes,
    pub reparse: ReparseKind,
    pub size: u64,
    pub modified: Option<SystemTime>,
    pub accessed: Option<SystemTime>,
    pub created: Option<SystemTime>,
}

impl DirEntry {
    /// A plain file entry with the given size.
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            attributes: FileAttributes::empty(),
            reparse: ReparseKind::None,
            size,
            modified: None,
            accessed: None,
            created: None,
        }
    }

    /// A directory entry.
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: FileAttributes::DIRECTORY,
            reparse: ReparseKind::None,
            size: 0,
            modified: None,
            accessed: None,
            created: None,
        }
    }

    /// A symlink entry; `target_is_directory` controls whether the entry
    /// also carries the directory bit, as a directory link does.
    pub fn symlink(name: impl Into<String>, target_is_directory: bool) -> Self {
        let mut attributes = FileAttributes::REPARSE_POINT;
        if target_is_directory {
            attributes |= FileAttributes::DIRECTORY;
        }
        Self {
            name: name.into(),
            attributes,
            reparse: ReparseKind::Symlink,
            size: 0,
            modified: None,
            accessed: None,
            created: None,
        }
    }

    /// The pseudo-entry synthesized when a bare volume root is enumerated
    /// directly. The empty name makes the reported path equal the root
    /// itself.
    pub(crate) fn pseudo_root(attributes: FileAttributes) -> Self {
        Self {
            name: String::new(),
            attributes: attributes | FileAttributes::DIRECTORY,
            reparse: ReparseKind::None,
            size: 0,
            modified: None,
            accessed: None,
            created: None,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.attributes.contains(FileAttributes::DIRECTORY)
    }

    /// True for the `.` and `..` pseudo-entries.
    pub fn is_dot_entry(&self) -> bool {
        self.name == "." || self.name == ".."
    }

    /// True when the entry is a link that traversal may be told to avoid.
    pub fn is_traversal_link(&self) -> bool {
        self.attributes.contains(FileAttributes::REPARSE_POINT)
            && matches!(self.reparse, ReparseKind::Symlink | ReparseKind::MountPoint)
    }
}
