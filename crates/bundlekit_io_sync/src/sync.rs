//! Sync orchestration: stat the source, plan per-file tasks, decide and copy.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use bundlekit_log::{LogSink, LogSinkNull};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

use crate::report::{ReportSync, ReportSyncBuilder};
use crate::spec::{EnumSyncOp, SpecSyncOptions, SyncTreeError};
use crate::util::{
    EnumSyncDecision, calculate_worker_limit, copy_file_with_metadata, decide_file_action,
    derive_destination_path, ensure_dir,
};
use crate::walk::{EnumEntryKind, list_entries};

#[derive(Debug, Clone)]
struct SpecSyncTaskFile {
    path_file_src: PathBuf,
    path_file_dst: PathBuf,
}

/// Synchronize `path_source` to `path_target` without log output.
///
/// See [`sync_tree_with_log`] for the full contract.
pub fn sync_tree<P, Q>(
    path_source: P,
    path_target: Q,
    spec_sync_options: SpecSyncOptions,
) -> Result<ReportSync, SyncTreeError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    sync_tree_with_log(path_source, path_target, spec_sync_options, &LogSinkNull)
}

/// Synchronize `path_source` to `path_target`.
///
/// A directory source is mirrored file by file: every file discovered under
/// it (recursively when `if_recursive`) is copied to the corresponding
/// destination path unless the overwrite/incremental policy decides to skip
/// it. A single-file source gets the same decision applied directly, with
/// the target's parent directory created on demand.
///
/// Returns a [`ReportSync`] with copy/skip/directory counters and the
/// wall-clock run time. Any IO failure during directory creation or file
/// copy aborts the whole run with a [`SyncTreeError`]; accumulated counters
/// are discarded. The invariant `cnt_files_copied + cnt_files_skipped ==
/// discovered file entries` holds for sequential and pooled execution alike.
pub fn sync_tree_with_log<P, Q>(
    path_source: P,
    path_target: Q,
    spec_sync_options: SpecSyncOptions,
    log_sink: &dyn LogSink,
) -> Result<ReportSync, SyncTreeError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let instant_start = Instant::now();
    let path_src = path_source.as_ref().to_path_buf();
    let path_dst = path_target.as_ref().to_path_buf();

    log_sink.info(&format!(
        "Sync start: {} -> {}",
        path_src.display(),
        path_dst.display()
    ));

    let stat_src =
        fs::metadata(&path_src).map_err(|e| SyncTreeError::from_source_stat(&path_src, e))?;

    let mut builder_sync_report = ReportSyncBuilder::default();

    if stat_src.is_dir() {
        sync_directory(
            &path_src,
            &path_dst,
            &spec_sync_options,
            log_sink,
            &mut builder_sync_report,
        )?;
    } else {
        sync_single_file(&path_src, &path_dst, &spec_sync_options, &mut builder_sync_report)?;
    }

    let report = builder_sync_report.build(instant_start.elapsed().as_millis() as u64);
    log_sink.success(&report.format("Sync complete:"));
    Ok(report)
}

fn sync_directory(
    path_dir_src: &Path,
    path_dir_dst: &Path,
    spec_sync_options: &SpecSyncOptions,
    log_sink: &dyn LogSink,
    builder_sync_report: &mut ReportSyncBuilder,
) -> Result<(), SyncTreeError> {
    ensure_dir(path_dir_dst)?;

    let l_entries = list_entries(path_dir_src, spec_sync_options.if_recursive)?;

    let mut l_tasks_file: Vec<SpecSyncTaskFile> = Vec::new();
    let mut cnt_dirs: u64 = 0;

    for entry in &l_entries {
        match entry.kind {
            EnumEntryKind::Directory => {
                cnt_dirs += 1;
                if !spec_sync_options.if_skip_empty_dirs {
                    ensure_dir(&derive_destination_path(
                        &entry.path_entry,
                        path_dir_src,
                        path_dir_dst,
                    ))?;
                }
            }
            EnumEntryKind::File => {
                l_tasks_file.push(SpecSyncTaskFile {
                    path_file_src: entry.path_entry.clone(),
                    path_file_dst: derive_destination_path(
                        &entry.path_entry,
                        path_dir_src,
                        path_dir_dst,
                    ),
                });
            }
        }
    }

    builder_sync_report.add_dirs(cnt_dirs);
    flush_file_tasks(l_tasks_file, spec_sync_options, log_sink, builder_sync_report)
}

fn sync_single_file(
    path_file_src: &Path,
    path_file_dst: &Path,
    spec_sync_options: &SpecSyncOptions,
    builder_sync_report: &mut ReportSyncBuilder,
) -> Result<(), SyncTreeError> {
    let spec_task = SpecSyncTaskFile {
        path_file_src: path_file_src.to_path_buf(),
        path_file_dst: path_file_dst.to_path_buf(),
    };
    apply_task_outcome(
        execute_file_task(&spec_task, spec_sync_options)?,
        builder_sync_report,
    );
    Ok(())
}

fn execute_file_task(
    spec_task: &SpecSyncTaskFile,
    spec_sync_options: &SpecSyncOptions,
) -> Result<EnumSyncDecision, SyncTreeError> {
    if let Some(path_parent_dst) = spec_task.path_file_dst.parent()
        && !path_parent_dst.as_os_str().is_empty()
    {
        ensure_dir(path_parent_dst)?;
    }

    let decision = decide_file_action(
        &spec_task.path_file_src,
        &spec_task.path_file_dst,
        spec_sync_options.if_overwrite,
        spec_sync_options.if_incremental,
    );
    if decision == EnumSyncDecision::Copy {
        copy_file_with_metadata(&spec_task.path_file_src, &spec_task.path_file_dst)
            .map_err(|e| SyncTreeError::from_write(&spec_task.path_file_dst, EnumSyncOp::FileCopy, e))?;
    }
    Ok(decision)
}

fn apply_task_outcome(decision: EnumSyncDecision, builder_sync_report: &mut ReportSyncBuilder) {
    match decision {
        EnumSyncDecision::Copy => builder_sync_report.add_file_copied(),
        EnumSyncDecision::Skip => builder_sync_report.add_file_skipped(),
    }
}

fn flush_file_tasks(
    l_tasks_file: Vec<SpecSyncTaskFile>,
    spec_sync_options: &SpecSyncOptions,
    log_sink: &dyn LogSink,
    builder_sync_report: &mut ReportSyncBuilder,
) -> Result<(), SyncTreeError> {
    if l_tasks_file.is_empty() {
        return Ok(());
    }

    let n_workers_max = calculate_worker_limit(spec_sync_options.num_workers_max);
    if n_workers_max <= 1 {
        for spec_task in &l_tasks_file {
            apply_task_outcome(
                execute_file_task(spec_task, spec_sync_options)?,
                builder_sync_report,
            );
        }
        return Ok(());
    }

    let thread_pool = match ThreadPoolBuilder::new().num_threads(n_workers_max).build() {
        Ok(v) => v,
        Err(e) => {
            log_sink.warn(&format!(
                "Failed to initialize thread pool (workers={n_workers_max}, {e}); fallback to serial copy."
            ));
            for spec_task in &l_tasks_file {
                apply_task_outcome(
                    execute_file_task(spec_task, spec_sync_options)?,
                    builder_sync_report,
                );
            }
            return Ok(());
        }
    };

    // Each task yields exactly one outcome; outcomes are reassembled here in
    // task order, so counters stay exact and the first error aborts the run.
    let l_results: Vec<Result<EnumSyncDecision, SyncTreeError>> = thread_pool.install(|| {
        l_tasks_file
            .par_iter()
            .map(|spec_task| execute_file_task(spec_task, spec_sync_options))
            .collect()
    });

    for res_task in l_results {
        apply_task_outcome(res_task?, builder_sync_report);
    }
    Ok(())
}
