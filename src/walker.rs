// walker.rs
//! The recursive directory walker.
//!
//! One invocation enumerates one concrete pattern at one depth: it locates
//! the search directory, resolves it to an absolute parent exactly once,
//! then runs one or two passes over the listing — a report phase that
//! invokes the match callback and, when recursion was requested, a recurse
//! phase that descends into subdirectories. Each level owns its buffers, so
//! reentrancy needs no shared state beyond the environment and callbacks
//! threaded through.

use camino::Utf8Path;
use std::io;

use crate::cancel::CancelToken;
use crate::entry::{DirEntry, FileAttributes};
use crate::error::EnumError;
use crate::flags::MatchFlags;
use crate::fs::FileSystem;
use crate::paths;
use crate::patterns::strip_file_url;
use crate::predicates::Predicates;
use crate::roots;

/// Read-only surroundings shared by every recursion level.
pub(crate) struct WalkEnv<'a> {
    pub fs: &'a dyn FileSystem,
    pub flags: MatchFlags,
    pub cancel: &'a CancelToken,
    pub predicates: Option<&'a Predicates>,
}

/// The caller's callbacks, threaded through every recursion level.
pub(crate) struct Callbacks<'a> {
    pub on_match: &'a mut dyn FnMut(&Utf8Path, &DirEntry, u32) -> bool,
    pub on_error: Option<&'a mut dyn FnMut(&Utf8Path, &io::Error, u32) -> bool>,
}

/// Enumerate one concrete pattern (no alternation groups) at `depth`.
pub(crate) fn enumerate(
    env: &WalkEnv<'_>,
    spec: &str,
    depth: u32,
    callbacks: &mut Callbacks<'_>,
) -> Result<(), EnumError> {
    let sep = env.fs.separator();
    let mut effective = strip_file_url(spec).to_string();

    // Top-level rewrites. A bare directory either turns into a listing of
    // its contents, or, when recursion was requested, into its absolute
    // form so every level can reconstruct a stable parent path.
    if depth == 0 {
        if env.flags.contains(MatchFlags::DIRECTORY_CONTENTS) {
            if is_existing_directory(env.fs, &effective) {
                effective.push(sep);
                effective.push('*');
            }
        } else if env.flags.recursing() && is_existing_directory(env.fs, &effective) {
            effective = resolve(env, &effective)?;
        }
    }

    // Everything before the final separator is the search directory,
    // everything after it the match fragment. `X:name` splits after the
    // colon; no separator at all means the current directory.
    let split = paths::final_separator(&effective);

    let parent = {
        let mut resolved = match split {
            Some(n) => resolve(env, paths::trim_directory_part(&effective[..n]))?,
            None => resolve(env, ".")?,
        };
        // Children are reported as parent + separator + name, so a trailing
        // separator here (as a resolved `C:\` has) would double up.
        if resolved.ends_with(paths::is_sep) {
            resolved.pop();
        }
        resolved
    };

    let fragment = &effective[split.unwrap_or(0)..];
    let preserve = env.flags.contains(MatchFlags::RECURSE_PRESERVE_WILDCARD);
    let number_phases: u32 = if env.flags.recursing() { 2 } else { 1 };

    let mut full_path = String::with_capacity(parent.len() + 64);

    for phase in 0..number_phases {
        let recurse_phase = recurse_phase_for(env.flags, phase);

        // The listing pattern. A recurse phase that preserves the original
        // wildcard must visit every subdirectory, so it lists `*`; all
        // other phases list the match fragment against the parent.
        full_path.clear();
        full_path.push_str(&parent);
        full_path.push(sep);
        if recurse_phase && preserve {
            full_path.push('*');
        } else {
            full_path.push_str(fragment);
        }

        let mut listing_error = None;
        let entries = match env.fs.list_directory(&full_path) {
            Ok(entries) => entries,
            Err(err) => {
                // A bare volume root cannot be opened as a search; report
                // the root itself through a synthesized entry instead.
                let synthesized = if !(recurse_phase && preserve) && roots::is_volume_root(&full_path)
                {
                    env.fs.get_attributes(&full_path)
                } else {
                    None
                };
                match synthesized {
                    Some(attributes) => {
                        tracing::debug!(root = %full_path, "synthesizing volume root entry");
                        vec![DirEntry::pseudo_root(attributes)]
                    }
                    None => {
                        listing_error = Some(err);
                        Vec::new()
                    }
                }
            }
        };

        if let Some(err) = listing_error {
            match callbacks.on_error.as_mut() {
                Some(on_error) => {
                    if !on_error(Utf8Path::new(&full_path), &err, depth) {
                        return Err(EnumError::Enumerate {
                            path: full_path.clone(),
                            source: err,
                        });
                    }
                    // The caller chose to skip this directory; the other
                    // phase would fail the same way.
                    break;
                }
                None => {
                    tracing::trace!(pattern = %full_path, error = %err, "listing failed, treating as no matches");
                    continue;
                }
            }
        }

        for entry in &entries {
            let dot_entry = entry.is_dot_entry();

            // Reportability: dot entries only on request, then the type
            // filter, then any metadata predicates.
            let mut report = !dot_entry || env.flags.contains(MatchFlags::INCLUDE_DOT_ENTRIES);
            if entry.is_directory() {
                if !env.flags.contains(MatchFlags::RETURN_DIRECTORIES) {
                    report = false;
                }
            } else if !env.flags.contains(MatchFlags::RETURN_FILES) {
                report = false;
            }
            if report {
                if let Some(predicates) = env.predicates {
                    if !predicates.matches(entry) {
                        report = false;
                    }
                }
            }

            let blocked_link =
                env.flags.contains(MatchFlags::NO_LINK_TRAVERSAL) && entry.is_traversal_link();

            if !dot_entry && entry.is_directory() && recurse_phase && !blocked_link {
                let mut criteria = String::with_capacity(
                    parent.len() + entry.name.len() + fragment.len() + 2,
                );
                criteria.push_str(&parent);
                criteria.push(sep);
                if !entry.name.is_empty() {
                    criteria.push_str(&entry.name);
                    criteria.push(sep);
                }
                if preserve {
                    criteria.push_str(fragment);
                } else {
                    criteria.push('*');
                }
                enumerate(env, &criteria, depth + 1, callbacks)?;
            }

            if report && !recurse_phase {
                full_path.clear();
                full_path.push_str(&parent);
                full_path.push(sep);
                full_path.push_str(&entry.name);
                if !(callbacks.on_match)(Utf8Path::new(&full_path), entry, depth) {
                    return Err(EnumError::Stopped);
                }
                if env.cancel.is_cancelled() {
                    return Err(EnumError::Cancelled);
                }
            }
        }
    }

    Ok(())
}

/// Whether `phase` descends into subdirectories or reports matches.
///
/// With both ordering flags set the first phase recurses, which is the
/// same observable ordering as RECURSE_BEFORE_REPORT alone; the
/// combination buys nothing but a second listing pass.
fn recurse_phase_for(flags: MatchFlags, phase: u32) -> bool {
    let before = flags.contains(MatchFlags::RECURSE_BEFORE_REPORT);
    let after = flags.contains(MatchFlags::RECURSE_AFTER_REPORT);
    if before && after {
        phase == 0
    } else if after {
        phase == 1
    } else if before {
        phase == 0
    } else {
        false
    }
}

fn is_existing_directory(fs: &dyn FileSystem, path: &str) -> bool {
    fs.get_attributes(path)
        .is_some_and(|attributes| attributes.contains(FileAttributes::DIRECTORY))
}

fn resolve(env: &WalkEnv<'_>, path: &str) -> Result<String, EnumError> {
    env.fs
        .resolve_absolute(path, true)
        .map_err(|source| EnumError::Resolve {
            path: path.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryFileSystem;

    fn collect(
        fs: &MemoryFileSystem,
        spec: &str,
        flags: MatchFlags,
    ) -> (Result<(), EnumError>, Vec<(String, u32)>) {
        let cancel = CancelToken::new();
        let env = WalkEnv {
            fs,
            flags,
            cancel: &cancel,
            predicates: None,
        };
        let mut seen = Vec::new();
        let mut on_match = |path: &Utf8Path, _entry: &DirEntry, depth: u32| {
            seen.push((path.to_string(), depth));
            true
        };
        let mut callbacks = Callbacks {
            on_match: &mut on_match,
            on_error: None,
        };
        let result = enumerate(&env, spec, 0, &mut callbacks);
        (result, seen)
    }

    fn sample_tree() -> MemoryFileSystem {
        let mut fs = MemoryFileSystem::new("C:\\cwd");
        fs.add_dir("C:\\data");
        fs.add_file("C:\\data\\a.txt", 1);
        fs.add_dir("C:\\data\\sub");
        fs.add_file("C:\\data\\sub\\b.txt", 2);
        fs
    }

    #[test]
    fn drive_parent_is_trimmed_without_doubling() {
        let mut fs = MemoryFileSystem::new("C:\\cwd");
        fs.add_file("C:\\top.txt", 3);
        let (result, seen) = collect(&fs, "C:\\*.txt", MatchFlags::RETURN_FILES);
        result.unwrap();
        assert_eq!(seen, vec![("C:\\top.txt".to_string(), 0)]);
    }

    #[test]
    fn volume_root_is_synthesized() {
        let fs = MemoryFileSystem::new("C:\\cwd");
        let (result, seen) = collect(&fs, "C:\\", MatchFlags::RETURN_DIRECTORIES);
        result.unwrap();
        assert_eq!(seen, vec![("C:\\".to_string(), 0)]);
    }

    #[test]
    fn drive_relative_split_applies_in_current_directory() {
        let mut fs = MemoryFileSystem::new("C:\\cwd");
        fs.add_file("C:\\cwd\\notes.txt", 4);
        let (result, seen) = collect(&fs, "C:notes.txt", MatchFlags::RETURN_FILES);
        result.unwrap();
        assert_eq!(seen, vec![("C:\\cwd\\notes.txt".to_string(), 0)]);
    }

    #[test]
    fn both_recursion_flags_behave_like_before() {
        let both = MatchFlags::RETURN_FILES
            | MatchFlags::RECURSE_BEFORE_REPORT
            | MatchFlags::RECURSE_AFTER_REPORT;
        let before = MatchFlags::RETURN_FILES | MatchFlags::RECURSE_BEFORE_REPORT;
        let fs = sample_tree();
        let (r1, seen_both) = collect(&fs, "C:\\data\\*", both);
        let (r2, seen_before) = collect(&fs, "C:\\data\\*", before);
        r1.unwrap();
        r2.unwrap();
        assert_eq!(seen_both, seen_before);
        // Depth-first: the subdirectory's file precedes the parent's.
        assert_eq!(
            seen_both,
            vec![
                ("C:\\data\\sub\\b.txt".to_string(), 1),
                ("C:\\data\\a.txt".to_string(), 0),
            ]
        );
    }

    #[test]
    fn share_parent_resolves() {
        let mut fs = MemoryFileSystem::new("\\\\server\\share\\cwd");
        fs.add_file("\\\\server\\share\\cwd\\doc.txt", 5);
        let (result, seen) = collect(&fs, "doc.*", MatchFlags::RETURN_FILES);
        result.unwrap();
        assert_eq!(seen, vec![("\\\\server\\share\\cwd\\doc.txt".to_string(), 0)]);
    }

    #[test]
    fn file_url_prefix_is_stripped() {
        let mut fs = MemoryFileSystem::new("C:\\cwd");
        fs.add_file("C:\\cwd\\a.txt", 1);
        let (result, seen) = collect(
            &fs,
            "file:///C:\\cwd\\*.txt",
            MatchFlags::RETURN_FILES,
        );
        result.unwrap();
        assert_eq!(seen, vec![("C:\\cwd\\a.txt".to_string(), 0)]);
    }

    #[test]
    fn link_traversal_can_be_blocked() {
        let mut fs = MemoryFileSystem::new("C:\\cwd");
        fs.add_dir("C:\\data");
        fs.add_dir("C:\\data\\real");
        fs.add_file("C:\\data\\real\\inner.txt", 1);
        fs.add_symlink_dir("C:\\data\\link");
        fs.add_file("C:\\data\\link\\behind.txt", 1);

        let flags = MatchFlags::RETURN_FILES
            | MatchFlags::RECURSE_BEFORE_REPORT
            | MatchFlags::NO_LINK_TRAVERSAL;
        let (result, seen) = collect(&fs, "C:\\data\\*", flags);
        result.unwrap();
        let paths: Vec<&str> = seen.iter().map(|(p, _)| p.as_str()).collect();
        assert!(paths.contains(&"C:\\data\\real\\inner.txt"));
        assert!(!paths.iter().any(|p| p.ends_with("behind.txt")));

        let flags = MatchFlags::RETURN_FILES | MatchFlags::RECURSE_BEFORE_REPORT;
        let (result, seen) = collect(&fs, "C:\\data\\*", flags);
        result.unwrap();
        assert!(seen.iter().any(|(p, _)| p.ends_with("behind.txt")));
    }

    #[test]
    fn no_recursion_flag_means_no_descent() {
        let fs = sample_tree();
        let (result, seen) = collect(
            &fs,
            "C:\\data\\*",
            MatchFlags::RETURN_FILES | MatchFlags::RETURN_DIRECTORIES,
        );
        result.unwrap();
        assert_eq!(
            seen,
            vec![
                ("C:\\data\\a.txt".to_string(), 0),
                ("C:\\data\\sub".to_string(), 0),
            ]
        );
    }
}
