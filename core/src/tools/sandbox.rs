//! Scoped root directory that bounds every file operation

use crate::error::{Result, ToolError};
use std::path::{Component, Path, PathBuf};

/// The single directory the agent may act within.
///
/// Paths handed to tools are resolved against the root, normalized, and
/// rejected unless the result (with symlinks followed) stays inside it.
#[derive(Debug, Clone)]
pub struct ScopedRoot {
    root: PathBuf,
}

impl ScopedRoot {
    /// Open an existing directory as the scoped root
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let root = std::fs::canonicalize(path.as_ref())?;
        if !root.is_dir() {
            return Err(crate::error::ConfigError::InvalidValue {
                field: "root_dir".to_string(),
                value: format!("{} is not a directory", root.display()),
            }
            .into());
        }
        Ok(Self { root })
    }

    /// Create the directory if needed, then open it
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        std::fs::create_dir_all(path.as_ref())?;
        Self::open(path)
    }

    /// Canonical path of the root
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Resolve a user-supplied path against the root.
    ///
    /// `arg` names the tool parameter and only feeds the error message.
    pub fn resolve(&self, arg: &str, user_path: &str) -> Result<PathBuf> {
        let denied = || ToolError::PathOutsideRoot {
            arg: arg.to_string(),
            path: user_path.to_string(),
        };

        let joined = self.root.join(user_path);
        let normalized = normalize_lexically(&joined).ok_or_else(denied)?;
        let resolved = canonicalize_existing_prefix(&normalized)?;

        if resolved.starts_with(&self.root) {
            tracing::debug!("Resolved {}={} to {}", arg, user_path, resolved.display());
            Ok(resolved)
        } else {
            tracing::warn!("Rejected {}={} outside scoped root", arg, user_path);
            Err(denied().into())
        }
    }

    /// Render an absolute path relative to the root for tool output
    pub fn display(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
            Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
            Err(_) => path.to_string_lossy().to_string(),
        }
    }
}

/// Collapse `.` and `..` without touching the filesystem.
/// Returns `None` when `..` would climb above the filesystem root.
fn normalize_lexically(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    return None;
                }
            }
            Component::Normal(part) => out.push(part),
        }
    }
    Some(out)
}

/// Symlinks followed while resolving one dangling link chain
const MAX_LINK_DEPTH: usize = 32;

/// Canonicalize the longest existing ancestor and re-append the rest.
///
/// "Existing" includes dangling symlinks: their target is resolved in turn so
/// a write through the link is checked against where it actually lands.
fn canonicalize_existing_prefix(path: &Path) -> Result<PathBuf> {
    canonicalize_with_depth(path, 0)
}

fn canonicalize_with_depth(path: &Path, depth: usize) -> Result<PathBuf> {
    let mut existing = path.to_path_buf();
    let mut missing = Vec::new();

    while std::fs::symlink_metadata(&existing).is_err() {
        match existing.file_name() {
            Some(name) => {
                missing.push(name.to_os_string());
                existing.pop();
            }
            None => break,
        }
    }

    let mut resolved = match std::fs::canonicalize(&existing) {
        Ok(resolved) => resolved,
        Err(_) if existing.is_symlink() => follow_dangling_link(&existing, depth)?,
        Err(e) => return Err(e.into()),
    };
    for part in missing.into_iter().rev() {
        resolved.push(part);
    }
    Ok(resolved)
}

/// Resolve where a symlink with a missing target would point
fn follow_dangling_link(link: &Path, depth: usize) -> Result<PathBuf> {
    if depth >= MAX_LINK_DEPTH {
        return Err(std::io::Error::other(format!(
            "Too many levels of symbolic links at {}",
            link.display()
        ))
        .into());
    }

    let target = std::fs::read_link(link)?;
    let base = link.parent().unwrap_or_else(|| Path::new("/"));
    let normalized = normalize_lexically(&base.join(target)).ok_or_else(|| {
        std::io::Error::other(format!("Symlink {} points above /", link.display()))
    })?;
    canonicalize_with_depth(&normalized, depth + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scoped() -> (TempDir, ScopedRoot) {
        let dir = TempDir::new().unwrap();
        let root = ScopedRoot::open(dir.path()).unwrap();
        (dir, root)
    }

    #[test]
    fn test_resolves_inside_root() {
        let (_dir, root) = scoped();
        let resolved = root.resolve("file_path", "notes/today.txt").unwrap();
        assert_eq!(resolved, root.path().join("notes").join("today.txt"));
        assert_eq!(root.display(&resolved), "notes/today.txt");
    }

    #[test]
    fn test_dot_resolves_to_root() {
        let (_dir, root) = scoped();
        let resolved = root.resolve("dir_path", ".").unwrap();
        assert_eq!(resolved, root.path());
        assert_eq!(root.display(&resolved), ".");
    }

    #[test]
    fn test_inner_parent_dir_is_allowed() {
        let (_dir, root) = scoped();
        let resolved = root.resolve("file_path", "a/../b.txt").unwrap();
        assert_eq!(resolved, root.path().join("b.txt"));
    }

    #[test]
    fn test_rejects_parent_escape() {
        let (_dir, root) = scoped();
        let err = root.resolve("file_path", "../outside.txt").unwrap_err();
        assert!(err
            .to_string()
            .contains("Access denied to file_path: ../outside.txt"));
    }

    #[test]
    fn test_rejects_absolute_path_outside() {
        let (_dir, root) = scoped();
        assert!(root.resolve("file_path", "/etc/passwd").is_err());
    }

    #[test]
    fn test_accepts_absolute_path_inside() {
        let (_dir, root) = scoped();
        let inside = root.path().join("x.txt");
        let resolved = root
            .resolve("file_path", inside.to_str().unwrap())
            .unwrap();
        assert_eq!(resolved, inside);
    }

    #[cfg(unix)]
    #[test]
    fn test_rejects_symlink_escape() {
        use std::os::unix::fs::symlink;

        let outside = TempDir::new().unwrap();
        let (_dir, root) = scoped();
        symlink(outside.path(), root.path().join("escape")).unwrap();

        assert!(root.resolve("file_path", "escape/hijack.txt").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_rejects_dangling_symlink_escape() {
        use std::os::unix::fs::symlink;

        let outside = TempDir::new().unwrap();
        let (_dir, root) = scoped();
        let target = outside.path().join("pwned.txt");
        symlink(&target, root.path().join("link.txt")).unwrap();

        let err = root.resolve("file_path", "link.txt").unwrap_err();
        assert!(err.to_string().contains("Access denied to file_path: link.txt"));
        assert!(root.resolve("file_path", "link.txt/below.txt").is_err());
        assert!(!target.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_inside_root_resolves_to_target() {
        use std::os::unix::fs::symlink;

        let (_dir, root) = scoped();
        symlink("drafts/note.txt", root.path().join("latest.txt")).unwrap();

        let resolved = root.resolve("file_path", "latest.txt").unwrap();
        assert_eq!(resolved, root.path().join("drafts").join("note.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loop_is_an_error() {
        use std::os::unix::fs::symlink;

        let (_dir, root) = scoped();
        symlink("b", root.path().join("a")).unwrap();
        symlink("a", root.path().join("b")).unwrap();

        assert!(root.resolve("file_path", "a").is_err());
    }

    #[test]
    fn test_create_makes_missing_directory() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("temp");
        let root = ScopedRoot::create(&target).unwrap();
        assert!(target.is_dir());
        assert_eq!(root.path(), std::fs::canonicalize(&target).unwrap());
    }
}
