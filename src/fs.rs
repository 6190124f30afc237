// fs.rs
use camino::{Utf8Path, Utf8PathBuf};
use std::fs as stdfs;
use std::io;

use crate::entry::{DirEntry, FileAttributes, ReparseKind};
use crate::paths;
use crate::patterns::wildcard;

/// The operating system abstraction the enumeration engine runs against
///
/// The walker never touches the filesystem directly; everything goes
/// through this trait, which keeps the engine testable against an
/// in-memory tree (see [`testing::MemoryFileSystem`](crate::testing::MemoryFileSystem))
/// and lets hosts substitute their own path policy.
pub trait FileSystem {
    /// List the entries matching `pattern`.
    ///
    /// The pattern combines a parent directory and a trailing name fragment
    /// that may contain `*`/`?`; matching is case-insensitive. The `.` and
    /// `..` pseudo-entries are included when the fragment matches them. An
    /// empty fragment is a listing error: a bare root or a pattern ending
    /// in a separator names no entry that can be searched for.
    fn list_directory(&self, pattern: &str) -> io::Result<Vec<DirEntry>>;

    /// Resolve `path` to an absolute, separator-normalized form.
    ///
    /// Resolution is lexical: `.` and `..` fold without consulting the
    /// filesystem. `keep_long_form` preserves a long-path prefix already
    /// present on the input; the prefix is never added.
    fn resolve_absolute(&self, path: &str, keep_long_form: bool) -> io::Result<String>;

    /// Attributes of `path`, or `None` when it does not exist.
    fn get_attributes(&self, path: &str) -> Option<FileAttributes>;

    /// Expand a leading home-directory shorthand, or `None` when the
    /// pattern has none (or no home directory is known).
    fn expand_home(&self, spec: &str) -> Option<String>;

    /// The separator inserted between a parent path and an entry name.
    fn separator(&self) -> char {
        std::path::MAIN_SEPARATOR
    }
}

/// [`FileSystem`] over the host filesystem
///
/// Listings read the parent directory and filter names through the
/// wildcard matcher, sorted by name so enumeration order is stable across
/// runs. Non-unicode names cannot be expressed as patterns and are skipped.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn list_directory(&self, pattern: &str) -> io::Result<Vec<DirEntry>> {
        let (dir, fragment) = match paths::final_separator(pattern) {
            Some(split) => (&pattern[..split], &pattern[split..]),
            None => (".", pattern),
        };
        if fragment.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "search pattern names no entry",
            ));
        }

        let reader = stdfs::read_dir(dir)?;
        let mut entries = Vec::new();

        for dot in [".", ".."] {
            if wildcard::matches(dot, fragment) {
                let probe = Utf8Path::new(dir).join(dot);
                if let Ok(meta) = stdfs::metadata(&probe) {
                    entries.push(entry_from_metadata(dot.to_string(), &meta, false));
                }
            }
        }

        let mut named = Vec::new();
        for item in reader {
            let item = item?;
            let name = match item.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    tracing::trace!(?raw, "skipping non-unicode name");
                    continue;
                }
            };
            if !wildcard::matches(&name, fragment) {
                continue;
            }
            let meta = match item.metadata() {
                Ok(meta) => meta,
                Err(err) => {
                    tracing::trace!(%name, %err, "skipping unreadable entry");
                    continue;
                }
            };
            let link_target_is_dir = meta.file_type().is_symlink()
                && stdfs::metadata(item.path()).map(|m| m.is_dir()).unwrap_or(false);
            named.push(entry_from_metadata(name, &meta, link_target_is_dir));
        }

        named.sort_by(|a, b| a.name.cmp(&b.name));
        entries.extend(named);
        Ok(entries)
    }

    fn resolve_absolute(&self, path: &str, keep_long_form: bool) -> io::Result<String> {
        let cwd = std::env::current_dir()?;
        let cwd = Utf8PathBuf::from_path_buf(cwd).map_err(|raw| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("current directory {} is not unicode", raw.display()),
            )
        })?;
        Ok(paths::resolve_lexical(
            path,
            cwd.as_str(),
            self.separator(),
            keep_long_form,
        ))
    }

    fn get_attributes(&self, path: &str) -> Option<FileAttributes> {
        let meta = stdfs::symlink_metadata(path).ok()?;
        let link_target_is_dir = meta.file_type().is_symlink()
            && stdfs::metadata(path).map(|m| m.is_dir()).unwrap_or(false);
        let name = Utf8Path::new(path).file_name().unwrap_or("");
        Some(attributes_from(&meta, link_target_is_dir, name).0)
    }

    fn expand_home(&self, spec: &str) -> Option<String> {
        let rest = spec.strip_prefix('~')?;
        if !rest.is_empty() && !rest.starts_with(paths::is_sep) {
            return None;
        }
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .ok()?;
        Some(format!("{home}{rest}"))
    }
}

fn attributes_from(
    meta: &stdfs::Metadata,
    link_target_is_dir: bool,
    name: &str,
) -> (FileAttributes, ReparseKind) {
    let mut attributes = FileAttributes::empty();
    let mut reparse = ReparseKind::None;
    let file_type = meta.file_type();
    if file_type.is_symlink() {
        attributes |= FileAttributes::REPARSE_POINT;
        reparse = ReparseKind::Symlink;
        // A link to a directory carries the directory bit, the way a
        // directory reparse point does.
        if link_target_is_dir {
            attributes |= FileAttributes::DIRECTORY;
        }
    } else if file_type.is_dir() {
        attributes |= FileAttributes::DIRECTORY;
    }
    if meta.permissions().readonly() {
        attributes |= FileAttributes::READ_ONLY;
    }
    if name.starts_with('.') && name != "." && name != ".." {
        attributes |= FileAttributes::HIDDEN;
    }
    (attributes, reparse)
}

fn entry_from_metadata(name: String, meta: &stdfs::Metadata, link_target_is_dir: bool) -> DirEntry {
    let (attributes, reparse) = attributes_from(meta, link_target_is_dir, &name);
    DirEntry {
        name,
        attributes,
        reparse,
        size: meta.len(),
        modified: meta.modified().ok(),
        accessed: meta.accessed().ok(),
        created: meta.created().ok(),
    }
}
