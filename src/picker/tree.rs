use std::collections::HashMap;
use std::fmt;

use super::request::RequestId;
use crate::listing::{DirectoryEntry, EntryKind, FileKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(usize);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a row is a folder or a (classified) file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Directory,
    File(FileKind),
}

/// An entry as the popup keeps it: path already relative to the base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowEntry {
    pub name: String,
    pub relative_path: String,
    pub kind: RowKind,
    pub size: u64,
    pub date: String,
}

/// Contents rendered after a row (or at the top of the popup).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Children {
    Rows(Vec<RowId>),
    /// The "no contents" placeholder.
    Empty,
}

#[derive(Debug, Clone)]
pub struct Row {
    pub entry: RowEntry,
    /// Number of lists this row is nested in; top-level rows are at depth 1.
    pub depth: usize,
    children: Option<Children>,
    pending: Option<RequestId>,
}

impl Row {
    pub fn children(&self) -> Option<&Children> {
        self.children.as_ref()
    }

    /// A directory is expanded exactly when something is rendered after it.
    pub fn is_expanded(&self) -> bool {
        self.children.is_some()
    }

    pub fn pending(&self) -> Option<&RequestId> {
        self.pending.as_ref()
    }
}

/// One line of the popup in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisibleRow {
    Root { label: String },
    Item { id: RowId, depth: usize, name: String, kind: RowKind, expanded: bool, loading: bool },
    Placeholder { depth: usize },
}

/// Rows of one popup keyed by id. Ids are never reused, so an id held for a
/// removed row stays dead.
#[derive(Debug, Clone, Default)]
pub struct RowTree {
    rows: HashMap<RowId, Row>,
    next_id: usize,
    top: Option<Children>,
}

impl RowTree {
    pub fn new() -> Self {
        RowTree::default()
    }

    pub fn top(&self) -> Option<&Children> {
        self.top.as_ref()
    }

    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.get(&id)
    }

    /// Number of rows currently rendered (placeholders excluded).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replaces the top-level list with `entries`.
    pub fn set_top(&mut self, entries: Vec<DirectoryEntry>, base_directory: &str) {
        if let Some(old) = self.top.take() {
            self.remove_children(old);
        }
        self.top = Some(self.insert_list(entries, base_directory, 1));
    }

    /// Renders `entries` after `parent`, one level deeper. Returns false when
    /// the row no longer exists.
    pub fn expand(&mut self, parent: RowId, entries: Vec<DirectoryEntry>, base_directory: &str) -> bool {
        let Some(depth) = self.row(parent).map(|r| r.depth) else {
            return false;
        };
        self.collapse(parent);
        let children = self.insert_list(entries, base_directory, depth + 1);
        if let Some(row) = self.row_mut(parent) {
            row.children = Some(children);
        }
        true
    }

    /// Removes every row rendered after `parent`. Returns how many were removed.
    pub fn collapse(&mut self, parent: RowId) -> usize {
        let before = self.len();
        if let Some(children) = self.row_mut(parent).and_then(|r| r.children.take()) {
            self.remove_children(children);
        }
        before - self.len()
    }

    pub fn set_pending(&mut self, id: RowId, request: Option<RequestId>) {
        if let Some(row) = self.row_mut(id) {
            row.pending = request;
        }
    }

    /// The row waiting on `request`, if it still exists.
    pub fn find_pending(&self, request: &RequestId) -> Option<RowId> {
        self.rows
            .iter()
            .find(|(_, row)| row.pending.as_ref() == Some(request))
            .map(|(&id, _)| id)
    }

    /// Flattens the tree into display order, with an optional root line.
    pub fn visible_rows(&self, root_label: Option<&str>) -> Vec<VisibleRow> {
        let mut out = Vec::new();
        if let Some(label) = root_label {
            out.push(VisibleRow::Root { label: label.to_string() });
        }
        if let Some(top) = &self.top {
            self.push_visible(top, 1, &mut out);
        }
        out
    }

    fn push_visible(&self, children: &Children, depth: usize, out: &mut Vec<VisibleRow>) {
        match children {
            Children::Empty => out.push(VisibleRow::Placeholder { depth }),
            Children::Rows(ids) => {
                for &id in ids {
                    let Some(row) = self.row(id) else { continue };
                    out.push(VisibleRow::Item {
                        id,
                        depth: row.depth,
                        name: row.entry.name.clone(),
                        kind: row.entry.kind,
                        expanded: row.is_expanded(),
                        loading: row.pending.is_some(),
                    });
                    if let Some(nested) = &row.children {
                        self.push_visible(nested, depth + 1, out);
                    }
                }
            }
        }
    }

    fn insert_list(
        &mut self,
        entries: Vec<DirectoryEntry>,
        base_directory: &str,
        depth: usize,
    ) -> Children {
        let ordered = order_entries(entries, base_directory);
        if ordered.is_empty() {
            return Children::Empty;
        }
        let ids = ordered
            .into_iter()
            .map(|entry| {
                let id = RowId(self.next_id);
                self.next_id += 1;
                self.rows.insert(
                    id,
                    Row {
                        entry,
                        depth,
                        children: None,
                        pending: None,
                    },
                );
                id
            })
            .collect();
        Children::Rows(ids)
    }

    fn remove_children(&mut self, children: Children) {
        let Children::Rows(ids) = children else { return };
        for id in ids {
            if let Some(row) = self.rows.remove(&id) {
                if let Some(nested) = row.children {
                    self.remove_children(nested);
                }
            }
        }
    }

    fn row_mut(&mut self, id: RowId) -> Option<&mut Row> {
        self.rows.get_mut(&id)
    }
}

/// Directories first, then files, each group in listing order. Entries that
/// are neither (links, devices) are not shown.
pub fn order_entries(entries: Vec<DirectoryEntry>, base_directory: &str) -> Vec<RowEntry> {
    let (dirs, files): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .filter(|e| matches!(e.kind, EntryKind::Dir | EntryKind::File))
        .partition(|e| e.kind == EntryKind::Dir);

    dirs.into_iter()
        .chain(files)
        .map(|e| RowEntry {
            relative_path: strip_base(&e.path, base_directory).to_string(),
            kind: match e.kind {
                EntryKind::Dir => RowKind::Directory,
                _ => RowKind::File(e.file_type.unwrap_or(FileKind::File)),
            },
            name: e.name,
            size: e.size,
            date: e.date,
        })
        .collect()
}

/// Paths that start with the base directory are stored without it. The
/// prefix only counts when it ends at a separator.
pub fn strip_base<'a>(path: &'a str, base_directory: &str) -> &'a str {
    if base_directory.is_empty() {
        return path;
    }
    let at_boundary = |rest: &str| {
        rest.starts_with(['/', '\\']) || base_directory.ends_with(['/', '\\'])
    };
    match path.strip_prefix(base_directory) {
        Some(rest) if at_boundary(rest) => rest,
        _ => path,
    }
}
