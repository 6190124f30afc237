// testing.rs
//! In-memory filesystem for exercising the engine without touching disk.
//!
//! The separator style is inferred from the configured current directory,
//! so a tree rooted at `C:\` behaves like a drive-letter filesystem and one
//! rooted at `/` like a POSIX one. Drive-letter and share paths therefore
//! stay testable on any host.

use std::collections::BTreeMap;
use std::io;

use crate::entry::{DirEntry, FileAttributes};
use crate::fs::FileSystem;
use crate::paths;
use crate::patterns::wildcard;
use crate::roots;

/// A [`FileSystem`] backed by an in-memory tree
pub struct MemoryFileSystem {
    separator: char,
    cwd: String,
    home: Option<String>,
    directories: BTreeMap<String, Vec<DirEntry>>,
}

impl MemoryFileSystem {
    /// Create an empty filesystem whose current directory is `cwd` (must be
    /// absolute). The directory itself is registered.
    pub fn new(cwd: &str) -> Self {
        let separator = if cwd.contains('\\') || roots::is_drive_letter_with_colon(cwd) {
            '\\'
        } else {
            '/'
        };
        let mut fs = Self {
            separator,
            cwd: paths::resolve_lexical(cwd, cwd, separator, true),
            home: None,
            directories: BTreeMap::new(),
        };
        fs.add_dir(cwd);
        fs
    }

    /// The home directory reported for `~` expansion.
    pub fn set_home(&mut self, home: &str) {
        self.home = Some(home.to_string());
    }

    /// Register a directory, creating its entry in the parent listing.
    pub fn add_dir(&mut self, path: &str) {
        let key = self.absolute(path);
        if let Some((parent, name)) = self.split_parent(&key) {
            self.push_entry(parent, DirEntry::directory(name));
        }
        self.directories.entry(key).or_default();
    }

    /// Register a file with the given size.
    pub fn add_file(&mut self, path: &str, size: u64) {
        let key = self.absolute(path);
        if let Some((parent, name)) = self.split_parent(&key) {
            self.push_entry(parent, DirEntry::file(name, size));
        }
    }

    /// Register a directory symlink; it lists like a directory but carries
    /// the reparse attributes.
    pub fn add_symlink_dir(&mut self, path: &str) {
        let key = self.absolute(path);
        if let Some((parent, name)) = self.split_parent(&key) {
            self.push_entry(parent, DirEntry::symlink(name, true));
        }
        self.directories.entry(key).or_default();
    }

    fn absolute(&self, path: &str) -> String {
        paths::resolve_lexical(path, &self.cwd, self.separator, true)
    }

    fn split_parent(&self, key: &str) -> Option<(String, String)> {
        let root_len = roots::root_prefix_len(key)?;
        if key.len() <= root_len {
            return None; // the root itself has no parent listing
        }
        let split = paths::final_separator(key)?;
        let name = key[split..].to_string();
        let parent = self.absolute(&key[..split]);
        Some((parent, name))
    }

    fn push_entry(&mut self, parent: String, entry: DirEntry) {
        let listing = self.directories.entry(parent).or_default();
        if !listing.iter().any(|existing| existing.name == entry.name) {
            listing.push(entry);
        }
    }
}

impl FileSystem for MemoryFileSystem {
    fn list_directory(&self, pattern: &str) -> io::Result<Vec<DirEntry>> {
        let (dir, fragment) = match paths::final_separator(pattern) {
            Some(split) => (&pattern[..split], &pattern[split..]),
            None => ("", pattern),
        };
        if fragment.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "search pattern names no entry",
            ));
        }
        let key = if dir.is_empty() {
            self.cwd.clone()
        } else {
            self.absolute(dir)
        };
        let listing = self.directories.get(&key).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no such directory: {key}"))
        })?;

        let mut entries = Vec::new();
        for dot in [".", ".."] {
            if wildcard::matches(dot, fragment) {
                entries.push(DirEntry::directory(dot));
            }
        }
        let mut named: Vec<DirEntry> = listing
            .iter()
            .filter(|entry| wildcard::matches(&entry.name, fragment))
            .cloned()
            .collect();
        named.sort_by(|a, b| a.name.cmp(&b.name));
        entries.extend(named);
        Ok(entries)
    }

    fn resolve_absolute(&self, path: &str, keep_long_form: bool) -> io::Result<String> {
        Ok(paths::resolve_lexical(
            path,
            &self.cwd,
            self.separator,
            keep_long_form,
        ))
    }

    fn get_attributes(&self, path: &str) -> Option<FileAttributes> {
        let key = self.absolute(path);
        if self.directories.contains_key(&key) {
            return Some(FileAttributes::DIRECTORY);
        }
        let (parent, name) = self.split_parent(&key)?;
        self.directories
            .get(&parent)?
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(&name))
            .map(|entry| entry.attributes)
    }

    fn expand_home(&self, spec: &str) -> Option<String> {
        let rest = spec.strip_prefix('~')?;
        if !rest.is_empty() && !rest.starts_with(paths::is_sep) {
            return None;
        }
        let home = self.home.as_ref()?;
        Some(format!("{home}{rest}"))
    }

    fn separator(&self) -> char {
        self.separator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_matches_fragment() {
        let mut fs = MemoryFileSystem::new("/work");
        fs.add_file("/work/a.txt", 1);
        fs.add_file("/work/b.log", 2);
        let names: Vec<String> = fs
            .list_directory("/work/*.txt")
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["a.txt"]);
    }

    #[test]
    fn listing_includes_dot_entries_for_star() {
        let mut fs = MemoryFileSystem::new("/work");
        fs.add_file("/work/a.txt", 1);
        let names: Vec<String> = fs
            .list_directory("/work/*")
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec![".", "..", "a.txt"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let fs = MemoryFileSystem::new("/work");
        assert!(fs.list_directory("/absent/*").is_err());
    }

    #[test]
    fn windows_flavored_tree() {
        let mut fs = MemoryFileSystem::new("C:\\cwd");
        fs.add_dir("C:\\data");
        fs.add_file("C:\\data\\report.txt", 10);
        assert_eq!(fs.separator(), '\\');
        assert!(fs
            .get_attributes("C:\\data")
            .unwrap()
            .contains(FileAttributes::DIRECTORY));
        let names: Vec<String> = fs
            .list_directory("C:\\data\\*.txt")
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["report.txt"]);
    }
}
