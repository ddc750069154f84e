// Widget core: per-trigger state machine, row tree, placement and HTML.
mod config;
mod listener;
mod position;
mod registry;
mod render;
mod request;
mod tree;
mod widget;

pub use config::{HorizontalAlign, PickerConfig, RequestMethod};
pub use listener::{FileSelection, FolderSelection, FolderState, NoopListener, SelectionListener};
pub use position::{Anchor, Edges, Placement, TriggerGeometry, Viewport, place};
pub use registry::{ClickTarget, PickerManager};
pub use render::{NO_CONTENTS, render_listing};
pub use request::{ListingReply, ListingRequest, RequestId, TriggerId};
pub use tree::{Children, Row, RowEntry, RowId, RowKind, RowTree, VisibleRow};
pub use widget::{Effect, FilePicker, PickerState, Popup};

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{Effect, FileSelection, FolderSelection, ListingRequest, SelectionListener};

    /// Listener that records every hook call as a short string.
    #[derive(Debug, Clone, Default)]
    pub(crate) struct Recorder {
        calls: Rc<RefCell<Vec<String>>>,
    }

    impl Recorder {
        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        fn push(&self, call: String) {
            self.calls.borrow_mut().push(call);
        }

        fn file(&self, hook: &str, file: &FileSelection) {
            self.push(format!("{hook}:{}:{}", file.path, file.file_type.as_str()));
        }

        fn folder(&self, hook: &str, folder: &FolderSelection) {
            self.push(format!("{hook}:{}:{:?}", folder.path, folder.folder_state));
        }
    }

    impl SelectionListener for Recorder {
        fn on_pre_open(&mut self) {
            self.push("pre_open".into());
        }
        fn on_post_open(&mut self) {
            self.push("post_open".into());
        }
        fn on_pre_close(&mut self) {
            self.push("pre_close".into());
        }
        fn on_post_close(&mut self) {
            self.push("post_close".into());
        }
        fn before_select_file(&mut self, file: &FileSelection) {
            self.file("before_file", file);
        }
        fn after_select_file(&mut self, file: &FileSelection) {
            self.file("after_file", file);
        }
        fn before_select_folder(&mut self, folder: &FolderSelection) {
            self.folder("before_folder", folder);
        }
        fn after_select_folder(&mut self, folder: &FolderSelection) {
            self.folder("after_folder", folder);
        }
    }

    pub(crate) fn fetches(effects: &[Effect]) -> Vec<ListingRequest> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Fetch(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }
}
