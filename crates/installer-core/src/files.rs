//! File copy, backup and hashing helpers used by the execution engine

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::{self, File, FileTimes};
use std::path::{Path, PathBuf};

/// SHA-256 digest of a file's content, hex encoded
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    /// Hash the current content of the file at `path`
    pub fn of_file(path: &Path) -> Result<Self> {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self::of_bytes(&bytes))
    }

    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(format!("{:x}", Sha256::digest(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0[..12.min(self.0.len())])
    }
}

/// Create the parent directory of `path` (and its ancestors) if missing
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

/// Copy `src` over `dest`, carrying permission bits and timestamps across
pub fn copy_with_metadata(src: &Path, dest: &Path) -> Result<()> {
    fs::copy(src, dest)
        .with_context(|| format!("Failed to copy {} to {}", src.display(), dest.display()))?;

    let meta =
        fs::metadata(src).with_context(|| format!("Failed to stat {}", src.display()))?;
    let modified = meta
        .modified()
        .with_context(|| format!("Failed to read mtime of {}", src.display()))?;
    let mut times = FileTimes::new().set_modified(modified);
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }

    // A read-only copy can still have its times set by the owner on Unix.
    let file = File::options()
        .write(true)
        .open(dest)
        .or_else(|_| File::open(dest))
        .with_context(|| format!("Failed to open {}", dest.display()))?;
    file.set_times(times)
        .with_context(|| format!("Failed to set timestamps on {}", dest.display()))?;

    Ok(())
}

/// Whether `a` and `b` name the same file on disk (through links or not)
#[cfg(unix)]
pub fn same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Replace `dest` with a copy of `src` by renaming a staged sibling over it.
///
/// `dest` is never opened for writing, so it may be a running executable.
/// The staged copy is removed if anything fails before the rename.
pub fn replace_with_copy(src: &Path, dest: &Path) -> Result<()> {
    let parent = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let staged = tempfile::Builder::new()
        .prefix(".claude_init_")
        .tempfile_in(parent)
        .with_context(|| format!("Failed to stage a copy in {}", parent.display()))?;

    copy_with_metadata(src, staged.path())?;
    staged
        .persist(dest)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace {}", dest.display()))?;
    Ok(())
}

/// Copy the current content of `dest` into `backup_root` under its own file name.
///
/// The backup root is created on first use. If a backup with the same name was
/// already taken into this root, a numeric suffix is appended rather than
/// overwriting it. Returns the path of the backup copy.
pub fn backup_file(dest: &Path, backup_root: &Path) -> Result<PathBuf> {
    fs::create_dir_all(backup_root).with_context(|| {
        format!(
            "Failed to create backup directory: {}",
            backup_root.display()
        )
    })?;

    let name = dest
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Cannot back up {}: no file name", dest.display()))?;

    let mut backup_path = backup_root.join(name);
    let mut n = 1;
    while backup_path.exists() {
        let mut suffixed = name.to_os_string();
        suffixed.push(format!(".{}", n));
        backup_path = backup_root.join(suffixed);
        n += 1;
    }

    copy_with_metadata(dest, &backup_path)?;
    Ok(backup_path)
}

/// Mark `path` as executable by its owner (rwxr-xr-x)
#[cfg(unix)]
pub fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("Failed to set permissions on {}", path.display()))
}

#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    #[test]
    fn test_hash_matches_for_identical_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "hello").unwrap();

        assert_eq!(
            ContentHash::of_file(&path).unwrap(),
            ContentHash::of_bytes(b"hello")
        );
        assert_ne!(ContentHash::of_bytes(b"hello"), ContentHash::of_bytes(b"world"));
        assert_eq!(ContentHash::of_bytes(b"").as_str().len(), 64);
    }

    #[test]
    fn test_copy_preserves_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.txt");
        let dest = dir.path().join("dest.txt");
        fs::write(&src, "content").unwrap();

        let past = SystemTime::now() - Duration::from_secs(3600 * 24);
        File::options()
            .write(true)
            .open(&src)
            .unwrap()
            .set_times(FileTimes::new().set_modified(past))
            .unwrap();

        copy_with_metadata(&src, &dest).unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "content");
        assert_eq!(
            fs::metadata(&dest).unwrap().modified().unwrap(),
            fs::metadata(&src).unwrap().modified().unwrap()
        );
    }

    #[test]
    fn test_backup_never_clobbers_within_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("backups");
        let first = dir.path().join("one").join("settings.json");
        let second = dir.path().join("two").join("settings.json");
        ensure_parent_dir(&first).unwrap();
        ensure_parent_dir(&second).unwrap();
        fs::write(&first, "1").unwrap();
        fs::write(&second, "2").unwrap();

        let a = backup_file(&first, &root).unwrap();
        let b = backup_file(&second, &root).unwrap();

        assert_eq!(a, root.join("settings.json"));
        assert_eq!(b, root.join("settings.json.1"));
        assert_eq!(fs::read_to_string(a).unwrap(), "1");
        assert_eq!(fs::read_to_string(b).unwrap(), "2");
    }

    #[test]
    fn test_same_file() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::write(&a, "x").unwrap();
        fs::write(&b, "x").unwrap();

        assert!(same_file(&a, &a));
        assert!(same_file(&a, &dir.path().join(".").join("a")));
        assert!(!same_file(&a, &b));
        assert!(!same_file(&a, &dir.path().join("missing")));
    }

    #[test]
    fn test_replace_with_copy_leaves_no_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("build").join("tool");
        let dest = dir.path().join("bin").join("tool");
        ensure_parent_dir(&src).unwrap();
        ensure_parent_dir(&dest).unwrap();
        fs::write(&src, "v2").unwrap();
        fs::write(&dest, "v1").unwrap();

        replace_with_copy(&src, &dest).unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "v2");
        let names: Vec<_> = fs::read_dir(dest.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["tool"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_make_executable_sets_owner_exec_bit() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tool");
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        make_executable(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
