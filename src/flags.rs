// flags.rs
use bitflags::bitflags;

bitflags! {
    /// Options controlling a single enumeration
    ///
    /// Every flag is independent; callers combine them with `|`. An empty
    /// set lists a single directory level and reports nothing, so most
    /// callers start from `RETURN_FILES`, `RETURN_DIRECTORIES`, or both.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MatchFlags: u32 {
        /// Report entries that are plain files
        const RETURN_FILES = 0x0001;

        /// Report entries that are directories
        const RETURN_DIRECTORIES = 0x0002;

        /// A top-level pattern naming a bare directory is rewritten to
        /// enumerate its contents (`dir` becomes `dir<sep>*`) rather than
        /// match the directory object itself
        const DIRECTORY_CONTENTS = 0x0004;

        /// Include the `.` and `..` pseudo-entries in reports; they are
        /// never recursed into regardless of this flag
        const INCLUDE_DOT_ENTRIES = 0x0008;

        /// Descend into subdirectories before reporting the current level
        const RECURSE_BEFORE_REPORT = 0x0010;

        /// Report the current level before descending into subdirectories
        const RECURSE_AFTER_REPORT = 0x0020;

        /// When recursing, reapply the original trailing wildcard in each
        /// subdirectory instead of a bare `*`
        const RECURSE_PRESERVE_WILDCARD = 0x0040;

        /// Do not recurse into reparse points (symlinks, mount points)
        const NO_LINK_TRAVERSAL = 0x0080;

        /// Bypass brace/bracket expansion and home-directory shorthand;
        /// the pattern reaches the walker verbatim
        const BASIC_EXPANSION = 0x0100;
    }
}

impl MatchFlags {
    /// True if either recursion ordering flag is set.
    pub fn recursing(&self) -> bool {
        self.intersects(MatchFlags::RECURSE_BEFORE_REPORT | MatchFlags::RECURSE_AFTER_REPORT)
    }
}
