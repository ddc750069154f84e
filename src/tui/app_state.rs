use crossbeam_channel::Sender;
use ratatui::layout::Rect;

use filepicker::picker::{FileSelection, FolderSelection, FolderState, SelectionListener};

/// Blocking prompt drawn over the popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Modal {
    Alert(String),
    Confirm(String),
}

/// What the picker's hooks report back to the app loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum PickerNotice {
    Selected(FileSelection),
    Folder(FolderSelection),
}

/// Forwards selection hooks to the app over a channel.
pub(super) struct ChannelListener {
    tx: Sender<PickerNotice>,
}

impl ChannelListener {
    pub(super) fn new(tx: Sender<PickerNotice>) -> Self {
        ChannelListener { tx }
    }
}

impl SelectionListener for ChannelListener {
    fn after_select_file(&mut self, file: &FileSelection) {
        let _ = self.tx.send(PickerNotice::Selected(file.clone()));
    }

    fn before_select_folder(&mut self, folder: &FolderSelection) {
        let _ = self.tx.send(PickerNotice::Folder(folder.clone()));
    }

    fn on_post_close(&mut self) {
        tracing::debug!("popup removed");
    }
}

impl PickerNotice {
    pub(super) fn describe(&self) -> String {
        match self {
            PickerNotice::Selected(file) => format!("Selected {} ({})", file.path, file.file_type.as_str()),
            PickerNotice::Folder(folder) => match folder.folder_state {
                FolderState::Open => format!("Opening {}", folder.path),
                FolderState::Closed => format!("Closed {}", folder.path),
            },
        }
    }
}

/// Screen areas recorded by the last draw, used to hit-test mouse clicks.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct HitAreas {
    pub(super) screen: Rect,
    pub(super) trigger: Rect,
    pub(super) popup: Option<Rect>,
    /// Inner area of the popup where rows are drawn.
    pub(super) rows: Option<Rect>,
}
