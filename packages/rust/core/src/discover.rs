//! Recursive `.md` page discovery below the docs root.

use std::fs;
use std::path::{Path, PathBuf};

use mxdocs_shared::{MxDocsError, Result};
use tracing::{debug, instrument};

/// Find every `.md` page below `root`, sorted.
///
/// Pages below a directory named in `exclude_dirs`, or whose file name is in
/// `exclude_files`, are left out. Symlinked directories are not descended into.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn discover_markdown_files(
    root: &Path,
    exclude_dirs: &[String],
    exclude_files: &[String],
) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(MxDocsError::config(format!(
            "docs root {} is not a directory",
            root.display()
        )));
    }

    let mut files = Vec::new();
    scan_directory_recursive(root, exclude_dirs, exclude_files, &mut files)?;
    files.sort();

    debug!(count = files.len(), "pages discovered");
    Ok(files)
}

fn scan_directory_recursive(
    dir: &Path,
    exclude_dirs: &[String],
    exclude_files: &[String],
    files: &mut Vec<PathBuf>,
) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| MxDocsError::io(dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| MxDocsError::io(dir, e))?;
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let file_type = entry.file_type().map_err(|e| MxDocsError::io(&path, e))?;

        if file_type.is_symlink() && path.is_dir() {
            debug!(path = %path.display(), "symlinked directory not followed");
            continue;
        }

        if file_type.is_dir() {
            if exclude_dirs.iter().any(|d| *d == name) {
                debug!(path = %path.display(), "excluded directory");
                continue;
            }
            scan_directory_recursive(&path, exclude_dirs, exclude_files, files)?;
        } else if path.extension().is_some_and(|ext| ext == "md") {
            if exclude_files.iter().any(|f| *f == name) {
                debug!(path = %path.display(), "excluded file");
                continue;
            }
            files.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "# x\n").unwrap();
    }

    #[test]
    fn finds_nested_markdown_sorted() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b/page.md");
        touch(dir.path(), "a.md");
        touch(dir.path(), "b/deeper/other.md");
        touch(dir.path(), "b/notes.txt");

        let files = discover_markdown_files(dir.path(), &[], &[]).unwrap();
        let rel: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            rel,
            vec![
                PathBuf::from("a.md"),
                PathBuf::from("b/deeper/other.md"),
                PathBuf::from("b/page.md"),
            ]
        );
    }

    #[test]
    fn applies_directory_and_basename_exclusions() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "guide.md");
        touch(dir.path(), "README.md");
        touch(dir.path(), "sub/utils.md");
        touch(dir.path(), "node_modules/pkg/readme.md");
        touch(dir.path(), "sub/node_modules/x.md");

        let files = discover_markdown_files(
            dir.path(),
            &["node_modules".to_string()],
            &["README.md".to_string(), "utils.md".to_string()],
        )
        .unwrap();

        assert_eq!(files, vec![dir.path().join("guide.md")]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "sub/page.md");
        std::os::unix::fs::symlink(dir.path(), dir.path().join("sub/loop")).unwrap();

        let files = discover_markdown_files(dir.path(), &[], &[]).unwrap();
        assert_eq!(files, vec![dir.path().join("sub/page.md")]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_pages_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "real.md");
        std::os::unix::fs::symlink(dir.path().join("real.md"), dir.path().join("alias.md"))
            .unwrap();

        let files = discover_markdown_files(dir.path(), &[], &[]).unwrap();
        assert_eq!(files, vec![dir.path().join("alias.md"), dir.path().join("real.md")]);
    }

    #[test]
    fn missing_root_is_config_error() {
        let err = discover_markdown_files(Path::new("/definitely/not/here"), &[], &[]).unwrap_err();
        assert!(matches!(err, MxDocsError::Config { .. }));
    }
}
