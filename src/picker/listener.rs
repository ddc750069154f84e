use crate::listing::FileKind;

/// A file the user clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelection {
    pub name: String,
    /// Base directory followed by the entry's relative path.
    pub path: String,
    pub file_type: FileKind,
}

/// What a folder click is about to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderState {
    /// The folder is collapsed and will be expanded.
    Open,
    /// The folder shows its contents and will be collapsed.
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderSelection {
    pub name: String,
    pub path: String,
    pub folder_state: FolderState,
}

/// Lifecycle and selection hooks of one picker. Every hook defaults to a no-op.
pub trait SelectionListener {
    fn on_pre_open(&mut self) {}
    fn on_post_open(&mut self) {}
    fn on_pre_close(&mut self) {}
    fn on_post_close(&mut self) {}
    fn before_select_file(&mut self, _file: &FileSelection) {}
    fn after_select_file(&mut self, _file: &FileSelection) {}
    fn before_select_folder(&mut self, _folder: &FolderSelection) {}
    fn after_select_folder(&mut self, _folder: &FolderSelection) {}
}

/// Listener for pickers that only care about the effects they emit.
#[derive(Debug, Default)]
pub struct NoopListener;

impl SelectionListener for NoopListener {}
