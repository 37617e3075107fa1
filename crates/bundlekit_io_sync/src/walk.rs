//! Directory tree enumeration.

use std::fs;
use std::path::{Path, PathBuf};

use crate::spec::{EnumSyncOp, SyncTreeError};

/// Kind of one enumerated entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumEntryKind {
    /// Regular file, or a symlink whose target is a regular file.
    File,
    /// Directory, or a symlink whose target is a directory.
    Directory,
}

/// One enumerated entry under the walk root.
#[derive(Debug, Clone)]
pub struct SpecWalkEntry {
    /// Full path of the entry.
    pub path_entry: PathBuf,
    /// File/directory classification.
    pub kind: EnumEntryKind,
}

/// List every entry of `dir_root`, descending depth-first when `if_recursive`.
///
/// Entries appear in the order the underlying directory listing provides,
/// with a subdirectory's contents inserted directly after the subdirectory
/// itself. Directories are included alongside files; callers filter by
/// [`EnumEntryKind`] as needed.
///
/// Symlink policy: a symlink to a regular file is reported as a `File` (the
/// target bytes are what gets copied); a symlink to a directory is reported
/// as a `Directory` but never descended, so link loops cannot occur. A
/// broken symlink fails entry inspection and aborts the walk. Entries that
/// are neither file nor directory (sockets, fifos) are omitted.
///
/// Any IO failure while reading a directory or inspecting an entry
/// propagates to the caller; nothing is caught here.
pub fn list_entries<P>(
    dir_root: P,
    if_recursive: bool,
) -> Result<Vec<SpecWalkEntry>, SyncTreeError>
where
    P: AsRef<Path>,
{
    let path_dir_root = dir_root.as_ref();
    let mut l_entries: Vec<SpecWalkEntry> = Vec::new();

    // Explicit iterator stack instead of self-recursion; the top of the
    // stack is the directory currently being listed.
    let mut l_readers: Vec<fs::ReadDir> = vec![read_dir_checked(path_dir_root)?];

    while let Some(iter_current) = l_readers.last_mut() {
        let Some(entry_res) = iter_current.next() else {
            l_readers.pop();
            continue;
        };

        let entry = match entry_res {
            Ok(v) => v,
            Err(e) => {
                return Err(SyncTreeError::from_read(
                    path_dir_root,
                    EnumSyncOp::EntryStat,
                    e,
                ));
            }
        };

        let path_entry = entry.path();
        let cfg_file_type = entry
            .file_type()
            .map_err(|e| SyncTreeError::from_read(&path_entry, EnumSyncOp::EntryStat, e))?;

        let kind = if cfg_file_type.is_dir() {
            if if_recursive {
                l_readers.push(read_dir_checked(&path_entry)?);
            }
            EnumEntryKind::Directory
        } else if cfg_file_type.is_file() {
            EnumEntryKind::File
        } else {
            // Symlink (or special file): classify by the stat of its target.
            // Symlinked directories are recorded but never descended.
            let stat_target = fs::metadata(&path_entry)
                .map_err(|e| SyncTreeError::from_read(&path_entry, EnumSyncOp::EntryStat, e))?;
            if stat_target.is_dir() {
                EnumEntryKind::Directory
            } else if stat_target.is_file() {
                EnumEntryKind::File
            } else {
                continue;
            }
        };

        l_entries.push(SpecWalkEntry { path_entry, kind });
    }

    Ok(l_entries)
}

fn read_dir_checked(path_dir: &Path) -> Result<fs::ReadDir, SyncTreeError> {
    fs::read_dir(path_dir).map_err(|e| SyncTreeError::from_read(path_dir, EnumSyncOp::EntryStat, e))
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{EnumEntryKind, list_entries};
    use crate::spec::SyncTreeError;

    struct TestDir {
        path: PathBuf,
    }

    impl TestDir {
        fn new() -> Self {
            let n = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos();
            let path = std::env::temp_dir().join(format!("bundlekit_walk_test_{n}"));
            std::fs::create_dir_all(&path).expect("create test dir");
            Self { path }
        }

        fn path(&self) -> &Path {
            &self.path
        }
    }

    impl Drop for TestDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }

    fn write_text(path: &Path, txt: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, txt).expect("write text");
    }

    #[test]
    fn recursive_listing_covers_all_entries() {
        let tmp = TestDir::new();
        let src = tmp.path().join("src");
        write_text(&src.join("a.txt"), "a");
        write_text(&src.join("sub/b.txt"), "b");
        write_text(&src.join("sub/deep/c.txt"), "c");

        let l_entries = list_entries(&src, true).expect("list entries");
        let cnt_files = l_entries
            .iter()
            .filter(|e| e.kind == EnumEntryKind::File)
            .count();
        let cnt_dirs = l_entries
            .iter()
            .filter(|e| e.kind == EnumEntryKind::Directory)
            .count();

        assert_eq!(l_entries.len(), 5);
        assert_eq!(cnt_files, 3);
        assert_eq!(cnt_dirs, 2);
        assert!(l_entries.iter().any(|e| e.path_entry == src.join("sub/deep/c.txt")));
    }

    #[test]
    fn subdirectory_contents_follow_their_directory() {
        let tmp = TestDir::new();
        let src = tmp.path().join("src");
        write_text(&src.join("sub/b.txt"), "b");

        let l_entries = list_entries(&src, true).expect("list entries");
        let idx_dir = l_entries
            .iter()
            .position(|e| e.path_entry == src.join("sub"))
            .expect("dir listed");
        let idx_file = l_entries
            .iter()
            .position(|e| e.path_entry == src.join("sub/b.txt"))
            .expect("file listed");
        assert!(idx_dir < idx_file);
    }

    #[test]
    fn non_recursive_listing_stays_at_top_level() {
        let tmp = TestDir::new();
        let src = tmp.path().join("src");
        write_text(&src.join("a.txt"), "a");
        write_text(&src.join("sub/b.txt"), "b");

        let l_entries = list_entries(&src, false).expect("list entries");
        assert_eq!(l_entries.len(), 2);
        assert!(
            !l_entries
                .iter()
                .any(|e| e.path_entry == src.join("sub/b.txt"))
        );
    }

    #[test]
    fn missing_directory_propagates_error() {
        let tmp = TestDir::new();
        let missing = tmp.path().join("does_not_exist");
        let err = list_entries(&missing, true).expect_err("must fail");
        assert!(matches!(err, SyncTreeError::Io { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_file_is_listed_as_file() {
        use std::os::unix::fs::symlink;

        let tmp = TestDir::new();
        let src = tmp.path().join("src");
        write_text(&src.join("real.txt"), "real");
        symlink(src.join("real.txt"), src.join("link.txt")).expect("create symlink");

        let l_entries = list_entries(&src, true).expect("list entries");
        let entry_link = l_entries
            .iter()
            .find(|e| e.path_entry == src.join("link.txt"))
            .expect("link listed");
        assert_eq!(entry_link.kind, EnumEntryKind::File);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_is_not_descended() {
        use std::os::unix::fs::symlink;

        let tmp = TestDir::new();
        let src = tmp.path().join("src");
        let other = tmp.path().join("other");
        write_text(&other.join("inner.txt"), "x");
        std::fs::create_dir_all(&src).expect("create src");
        symlink(&other, src.join("linked_dir")).expect("create dir symlink");

        let l_entries = list_entries(&src, true).expect("list entries");
        let entry_link = l_entries
            .iter()
            .find(|e| e.path_entry == src.join("linked_dir"))
            .expect("dir symlink listed");
        assert_eq!(entry_link.kind, EnumEntryKind::Directory);
        assert!(
            !l_entries
                .iter()
                .any(|e| e.path_entry.ends_with("inner.txt"))
        );
    }
}
