use chrono::{DateTime, Local};
use std::fs::{FileType, Metadata};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use super::entry::{DirectoryEntry, EntryKind, ListingResponse};
use super::signature;
use crate::error::ListingError;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Lists directories below a fixed base path, one level at a time.
#[derive(Debug, Clone)]
pub struct DirectoryLister {
    base: PathBuf,
}

impl DirectoryLister {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        DirectoryLister { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Lists the immediate children of `relative` (resolved against the base).
    ///
    /// One leading separator is stripped so `/sub` and `sub` name the same
    /// directory. Entries come back sorted by file name.
    pub fn list(&self, relative: &str) -> Result<Vec<DirectoryEntry>, ListingError> {
        let relative = normalize_relative(relative)?;
        let target = self.base.join(&relative);

        if !target.is_dir() {
            return Err(ListingError::NotFound(target.display().to_string()));
        }

        let mut entries = Vec::new();
        for result in WalkDir::new(&target)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let dirent = match result {
                Ok(v) => v,
                Err(e) if e.depth() == 0 => {
                    return Err(e
                        .into_io_error()
                        .map(ListingError::Io)
                        .unwrap_or_else(|| ListingError::NotFound(target.display().to_string())));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            let metadata = match dirent.metadata() {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!(path = %dirent.path().display(), error = %e, "skipping entry without metadata");
                    continue;
                }
            };

            let name = dirent.file_name().to_string_lossy().into_owned();
            let kind = entry_kind(dirent.file_type());
            let file_type = match kind {
                EntryKind::File => signature::classify_path(dirent.path()),
                _ => None,
            };

            entries.push(DirectoryEntry {
                path: entry_path(&relative, &name),
                name,
                size: size_in_kb(metadata.len()),
                kind,
                file_type,
                date: modified_date(&metadata),
            });
        }

        tracing::debug!(dir = %relative, count = entries.len(), "listed directory");
        Ok(entries)
    }

    /// Same as [`list`](Self::list) but folded into the wire record.
    pub fn respond(&self, relative: &str) -> ListingResponse {
        let result = self.list(relative);
        if let Err(e) = &result {
            tracing::info!(dir = relative, error = %e, "listing failed");
        }
        ListingResponse::from(result)
    }
}

// Components are `/`-separated; a single leading `\` is also stripped. Anything
// that would climb out of the base is refused.
fn normalize_relative(relative: &str) -> Result<String, ListingError> {
    let trimmed = relative
        .strip_prefix('/')
        .or_else(|| relative.strip_prefix('\\'))
        .unwrap_or(relative);

    let mut parts = Vec::new();
    for part in trimmed.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        let escapes = Path::new(part)
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if part == ".." || escapes {
            return Err(ListingError::InvalidPath(relative.to_string()));
        }
        parts.push(part);
    }
    Ok(parts.join("/"))
}

fn entry_path(relative: &str, name: &str) -> String {
    if relative.is_empty() {
        format!("/{name}")
    } else {
        format!("/{relative}/{name}")
    }
}

fn size_in_kb(bytes: u64) -> u64 {
    bytes.div_ceil(1000)
}

fn modified_date(metadata: &Metadata) -> String {
    metadata
        .modified()
        .map(|t| DateTime::<Local>::from(t).format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

#[cfg(unix)]
fn entry_kind(ft: FileType) -> EntryKind {
    use std::os::unix::fs::FileTypeExt;

    if ft.is_file() {
        EntryKind::File
    } else if ft.is_dir() {
        EntryKind::Dir
    } else if ft.is_symlink() {
        EntryKind::Link
    } else if ft.is_fifo() {
        EntryKind::Fifo
    } else if ft.is_char_device() {
        EntryKind::Char
    } else if ft.is_block_device() {
        EntryKind::Block
    } else if ft.is_socket() {
        EntryKind::Socket
    } else {
        EntryKind::Unknown
    }
}

#[cfg(not(unix))]
fn entry_kind(ft: FileType) -> EntryKind {
    if ft.is_file() {
        EntryKind::File
    } else if ft.is_dir() {
        EntryKind::Dir
    } else if ft.is_symlink() {
        EntryKind::Link
    } else {
        EntryKind::Unknown
    }
}
