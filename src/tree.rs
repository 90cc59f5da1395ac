//! Directory expansion for recursive hashing.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A path the walk could not list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkError {
    pub path: PathBuf,
    pub message: String,
}

/// Inputs to hash plus per-path walk failures.
#[derive(Debug, Default)]
pub struct Expansion {
    pub paths: Vec<PathBuf>,
    pub errors: Vec<WalkError>,
}

/// List the regular files under `root`, sorted by path.
///
/// Symlinks are skipped rather than followed so a tree cannot loop or
/// escape its root. Unreadable subdirectories are recorded and skipped;
/// the rest of the tree is still listed.
pub fn collect_files(root: &Path) -> Expansion {
    let mut expansion = Expansion::default();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        match entry {
            Ok(entry) if entry.file_type().is_file() => expansion.paths.push(entry.into_path()),
            Ok(_) => {}
            Err(err) => expansion.errors.push(WalkError {
                path: err.path().unwrap_or(root).to_path_buf(),
                message: err
                    .io_error()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| err.to_string()),
            }),
        }
    }
    expansion
}

/// Expand directory arguments into their files when `recursive` is set.
///
/// Everything else passes through untouched, including `-`, missing paths,
/// and directories in non-recursive mode; those fail per input when read.
pub fn expand_paths(paths: &[PathBuf], recursive: bool) -> Expansion {
    let mut expanded = Expansion::default();
    for path in paths {
        if !(recursive && path.is_dir()) {
            expanded.paths.push(path.clone());
            continue;
        }
        let tree = collect_files(path);
        if tree.paths.is_empty() && tree.errors.is_empty() {
            expanded.errors.push(WalkError {
                path: path.clone(),
                message: "no regular files found".to_string(),
            });
        }
        expanded.paths.extend(tree.paths);
        expanded.errors.extend(tree.errors);
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn collects_nested_files_in_order() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dir.path();
        fs::create_dir_all(root.join("b/inner")).expect("create dirs");
        fs::write(root.join("z.txt"), b"z").expect("write z");
        fs::write(root.join("a.txt"), b"a").expect("write a");
        fs::write(root.join("b/inner/c.txt"), b"c").expect("write c");

        let tree = collect_files(root);
        assert!(tree.errors.is_empty());
        let rel: Vec<PathBuf> = tree
            .paths
            .iter()
            .map(|path| path.strip_prefix(root).expect("strip prefix").to_path_buf())
            .collect();
        assert_eq!(
            rel,
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("b/inner/c.txt"),
                PathBuf::from("z.txt"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_is_reported_and_walk_continues() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dir.path();
        let locked = root.join("locked");
        fs::create_dir(&locked).expect("create locked dir");
        fs::write(locked.join("hidden.txt"), b"h").expect("write hidden");
        fs::write(root.join("a.txt"), b"a").expect("write a");
        fs::write(root.join("z.txt"), b"z").expect("write z");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("lock dir");

        // Privileged users can still list the directory.
        let still_readable = fs::read_dir(&locked).is_ok();
        let tree = collect_files(root);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("unlock dir");
        if still_readable {
            return;
        }

        assert_eq!(tree.paths, vec![root.join("a.txt"), root.join("z.txt")]);
        assert_eq!(tree.errors.len(), 1);
        assert_eq!(tree.errors[0].path, locked);
    }

    #[test]
    fn directory_kept_as_is_without_recursive() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("a.txt"), b"a").expect("write a");
        let paths = vec![dir.path().to_path_buf()];
        let expanded = expand_paths(&paths, false);
        assert_eq!(expanded.paths, paths);
        assert!(expanded.errors.is_empty());
    }

    #[test]
    fn empty_directory_is_a_per_path_error() {
        let empty = tempfile::tempdir().expect("create temp dir");
        let full = tempfile::tempdir().expect("create temp dir");
        fs::write(full.path().join("a.txt"), b"a").expect("write a");

        let paths = vec![empty.path().to_path_buf(), full.path().to_path_buf()];
        let expanded = expand_paths(&paths, true);
        assert_eq!(expanded.paths, vec![full.path().join("a.txt")]);
        assert_eq!(expanded.errors.len(), 1);
        assert_eq!(expanded.errors[0].path, empty.path());
        assert!(expanded.errors[0].message.contains("no regular files"));
    }

    #[test]
    fn plain_paths_pass_through() {
        let paths = vec![PathBuf::from("-"), PathBuf::from("does/not/exist")];
        let expanded = expand_paths(&paths, true);
        assert_eq!(expanded.paths, paths);
        assert!(expanded.errors.is_empty());
    }
}
