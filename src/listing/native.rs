use std::fmt::Write as _;
use std::fs::{self, Metadata};
use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use super::TreeLister;

/// In-process recursive walk. Symlinks are listed but never followed.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeLister;

impl TreeLister for NativeLister {
    fn describe(&self) -> String {
        "native walk".to_owned()
    }

    fn list(&self, root: &Path) -> Result<String> {
        let metadata = fs::symlink_metadata(root)
            .with_context(|| format!("reading metadata for {}", root.display()))?;

        let mut output = String::new();
        push_entry(&mut output, root, &metadata);
        if metadata.is_dir() {
            walk_directory(root, &mut output)?;
        }
        Ok(output)
    }
}

fn walk_directory(path: &Path, output: &mut String) -> Result<()> {
    let mut entries = fs::read_dir(path)
        .with_context(|| format!("reading directory {}", path.display()))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("reading directory {}", path.display()))?;

    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let entry_path = entry.path();
        let metadata = fs::symlink_metadata(&entry_path)
            .with_context(|| format!("reading metadata for {}", entry_path.display()))?;

        push_entry(output, &entry_path, &metadata);
        if metadata.is_dir() {
            walk_directory(&entry_path, output)?;
        }
    }

    Ok(())
}

fn push_entry(output: &mut String, path: &Path, metadata: &Metadata) {
    let modified = metadata
        .modified()
        .map(format_timestamp)
        .unwrap_or_else(|_| "unknown".to_string());
    let _ = writeln!(
        output,
        "{} {:>12} {} {}",
        mode_string(metadata),
        metadata.len(),
        modified,
        path.display()
    );
}

fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

fn type_char(metadata: &Metadata) -> char {
    let file_type = metadata.file_type();
    if file_type.is_dir() {
        'd'
    } else if file_type.is_symlink() {
        'l'
    } else if file_type.is_file() {
        '-'
    } else {
        '?'
    }
}

#[cfg(unix)]
fn mode_string(metadata: &Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;

    let mode = metadata.permissions().mode();
    let mut out = String::with_capacity(10);
    out.push(type_char(metadata));
    for shift in [6, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

#[cfg(not(unix))]
fn mode_string(metadata: &Metadata) -> String {
    let archive = if metadata.is_file() { 'a' } else { '-' };
    let readonly = if metadata.permissions().readonly() { 'r' } else { '-' };
    format!("{}{}{}---", type_char(metadata), archive, readonly)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_root_first_then_sorted_depth_first() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("b").join("inner")).unwrap();
        fs::write(root.join("a.txt"), "alpha").unwrap();
        fs::write(root.join("b").join("inner").join("z.rs"), "fn main() {}").unwrap();
        fs::write(root.join("c.md"), "").unwrap();

        let listing = NativeLister.list(root).unwrap();
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 6, "listing was: {listing}");

        let expected = [
            root.to_path_buf(),
            root.join("a.txt"),
            root.join("b"),
            root.join("b").join("inner"),
            root.join("b").join("inner").join("z.rs"),
            root.join("c.md"),
        ];
        for (line, path) in lines.iter().zip(expected.iter()) {
            assert!(
                line.ends_with(&format!(" {}", path.display())),
                "line `{line}` should end with {}",
                path.display()
            );
        }
        assert!(lines[0].starts_with('d'));
        assert!(lines[1].starts_with('-'));
        assert!(lines[2].starts_with('d'));
    }

    #[test]
    fn reports_file_sizes() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("five.txt"), "12345").unwrap();

        let listing = NativeLister.list(tmp.path()).unwrap();
        let line = listing
            .lines()
            .find(|line| line.ends_with("five.txt"))
            .unwrap();
        let size: u64 = line.split_whitespace().nth(1).unwrap().parse().unwrap();
        assert_eq!(size, 5);
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = NativeLister.list(&tmp.path().join("nope")).unwrap_err();
        assert!(format!("{err:#}").contains("reading metadata for"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_followed() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("real");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("inside.txt"), "x").unwrap();
        std::os::unix::fs::symlink(&target, tmp.path().join("link")).unwrap();

        let listing = NativeLister.list(tmp.path()).unwrap();
        let link_line = listing
            .lines()
            .find(|line| line.ends_with("/link"))
            .unwrap();
        assert!(link_line.starts_with('l'));
        assert_eq!(listing.matches("inside.txt").count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn mode_string_renders_permission_bits() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("script.sh");
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o750)).unwrap();

        let metadata = fs::symlink_metadata(&path).unwrap();
        assert_eq!(mode_string(&metadata), "-rwxr-x---");
    }
}
