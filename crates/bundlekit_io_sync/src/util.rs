use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use filetime::FileTime;

use crate::spec::{EnumSyncOp, SyncTreeError};

////////////////////////////////////////////////////////////////////////////////
// #region SkipCopyDecision

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EnumSyncDecision {
    Copy,
    Skip,
}

/// Per-file skip/copy policy.
///
/// Overwrite gates first: with `if_overwrite` false an existing destination
/// is always kept, whatever `if_incremental` says. Past that gate, an
/// incremental run copies only when the destination needs updating.
pub(crate) fn decide_file_action(
    path_file_src: &Path,
    path_file_dst: &Path,
    if_overwrite: bool,
    if_incremental: bool,
) -> EnumSyncDecision {
    if !if_overwrite && path_file_dst.exists() {
        return EnumSyncDecision::Skip;
    }
    if if_incremental && !should_update_file(path_file_src, path_file_dst) {
        return EnumSyncDecision::Skip;
    }
    EnumSyncDecision::Copy
}

/// Freshness check for incremental mode: update when the source is strictly
/// newer, or the sizes differ. A destination that cannot be stat'd (absent
/// or otherwise) always needs updating; a source stat failure also resolves
/// to update, so the real error surfaces at copy time.
pub(crate) fn should_update_file(path_file_src: &Path, path_file_dst: &Path) -> bool {
    let Ok(stat_src) = fs::metadata(path_file_src) else {
        return true;
    };
    let Ok(stat_dst) = fs::metadata(path_file_dst) else {
        return true;
    };

    let time_modify_src = FileTime::from_last_modification_time(&stat_src);
    let time_modify_dst = FileTime::from_last_modification_time(&stat_dst);
    time_modify_src > time_modify_dst || stat_src.len() != stat_dst.len()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FsHelpers

/// Create `path_dir` and any missing ancestors; idempotent.
pub(crate) fn ensure_dir(path_dir: &Path) -> Result<(), SyncTreeError> {
    fs::create_dir_all(path_dir)
        .map_err(|e| SyncTreeError::from_write(path_dir, EnumSyncOp::DirCreate, e))
}

/// Destination path for one source entry, by relative-path substitution.
pub(crate) fn derive_destination_path(
    path_entry: &Path,
    path_dir_src: &Path,
    path_dir_dst: &Path,
) -> PathBuf {
    match path_entry.strip_prefix(path_dir_src) {
        Ok(path_rel) => path_dir_dst.join(path_rel),
        // Entries always originate under the walk root; fall back to the
        // basename if the prefix ever fails to strip.
        Err(_) => match path_entry.file_name() {
            Some(name_entry) => path_dir_dst.join(name_entry),
            None => path_dir_dst.to_path_buf(),
        },
    }
}

pub(crate) fn copy_file_with_metadata(
    path_file_src: &Path,
    path_file_dst: &Path,
) -> Result<(), io::Error> {
    fs::copy(path_file_src, path_file_dst)?;
    #[cfg(target_os = "linux")]
    {
        apply_metadata_linux(path_file_src, path_file_dst)?;
    }
    Ok(())
}

#[cfg(target_os = "linux")]
fn apply_metadata_linux(path_file_src: &Path, path_file_dst: &Path) -> Result<(), io::Error> {
    use filetime::set_file_times;

    let stat_src = fs::metadata(path_file_src)?;
    fs::set_permissions(path_file_dst, stat_src.permissions())?;

    let file_time_access = FileTime::from_last_access_time(&stat_src);
    let file_time_modify = FileTime::from_last_modification_time(&stat_src);
    set_file_times(path_file_dst, file_time_access, file_time_modify)?;

    copy_xattrs_linux(path_file_src, path_file_dst);
    Ok(())
}

#[cfg(target_os = "linux")]
fn copy_xattrs_linux(path_file_src: &Path, path_file_dst: &Path) {
    let iter_xattr_names = match xattr::list(path_file_src) {
        Ok(v) => v,
        Err(_) => return,
    };

    for name in iter_xattr_names {
        let Some(raw_value) = xattr::get(path_file_src, &name).ok().flatten() else {
            continue;
        };
        let _ = xattr::set(path_file_dst, &name, &raw_value);
    }
}

/// Resolve `num_workers_max` into an effective worker count. `None` keeps
/// the sequential reference behavior; explicit values clamp to the CPU count.
pub(crate) fn calculate_worker_limit(num_workers_max: Option<usize>) -> usize {
    match num_workers_max {
        None => 1,
        Some(n) => {
            let n_cpu = std::thread::available_parallelism()
                .map(|v| v.get())
                .unwrap_or(1);
            n.clamp(1, n_cpu)
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
