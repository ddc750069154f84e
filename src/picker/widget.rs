use std::time::Duration;

use super::config::PickerConfig;
use super::listener::{FileSelection, FolderSelection, FolderState, SelectionListener};
use super::position::{self, Placement, Viewport};
use super::render;
use super::request::{ListingReply, ListingRequest, RequestId, TriggerId};
use super::tree::{RowId, RowKind, RowTree, VisibleRow};

/// Lifecycle of one picker.
///
/// `Opening` lasts until the root listing arrives; rows only exist (and can
/// only be clicked) in `Open`. `Closing` covers the fade-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerState {
    Closed,
    Opening,
    Open,
    Closing,
}

/// Work the front-end has to carry out on the picker's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch(ListingRequest),
    Alert(String),
    /// Ask the user; answer with [`FilePicker::answer_confirmation`].
    Confirm(String),
    FadeIn(Duration),
    /// Call [`FilePicker::finish_close`] once the transition has played.
    FadeOut(Duration),
    Closed,
}

/// The floating panel, alive between open and close.
#[derive(Debug)]
pub struct Popup {
    session: u64,
    placement: Placement,
    tree: RowTree,
    root_request: Option<RequestId>,
    awaiting_confirmation: Option<FileSelection>,
}

impl Popup {
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn tree(&self) -> &RowTree {
        &self.tree
    }

    /// True until the root listing has been rendered.
    pub fn is_loading(&self) -> bool {
        self.tree.top().is_none()
    }

    pub fn awaiting_confirmation(&self) -> Option<&FileSelection> {
        self.awaiting_confirmation.as_ref()
    }
}

/// A file picker bound to one trigger.
pub struct FilePicker {
    trigger: TriggerId,
    config: PickerConfig,
    listener: Box<dyn SelectionListener>,
    separator: char,
    state: PickerState,
    popup: Option<Popup>,
    session: u64,
    next_seq: u64,
}

impl FilePicker {
    pub fn new(trigger: TriggerId, config: PickerConfig, listener: Box<dyn SelectionListener>) -> Self {
        let separator = config.directory_separator();
        FilePicker {
            trigger,
            config,
            listener,
            separator,
            state: PickerState::Closed,
            popup: None,
            session: 0,
            next_seq: 0,
        }
    }

    pub fn trigger(&self) -> &TriggerId {
        &self.trigger
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn state(&self) -> PickerState {
        self.state
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.popup.is_some()
    }

    /// Shows the popup below the trigger and asks for the root listing.
    /// Does nothing while a popup is already showing.
    pub fn open(&mut self, viewport: &Viewport) -> Vec<Effect> {
        if self.state != PickerState::Closed {
            return Vec::new();
        }
        self.listener.on_pre_open();

        self.session += 1;
        let request = self.request("");
        self.popup = Some(Popup {
            session: self.session,
            placement: position::place(viewport, &self.config),
            tree: RowTree::new(),
            root_request: Some(request.id.clone()),
            awaiting_confirmation: None,
        });
        self.state = PickerState::Opening;
        tracing::debug!(trigger = %self.trigger, session = self.session, "picker opening");

        let effects = vec![
            Effect::FadeIn(self.config.fade_in.unwrap_or(Duration::ZERO)),
            Effect::Fetch(request),
        ];
        self.listener.on_post_open();
        effects
    }

    /// Applies a finished listing. Replies for an older session, a closing
    /// popup, or a row that is gone or was asked again are dropped.
    pub fn deliver(&mut self, reply: ListingReply) -> Vec<Effect> {
        let live = matches!(self.state, PickerState::Opening | PickerState::Open);
        let Some(popup) = self.popup.as_mut().filter(|p| live && p.session == reply.id.session) else {
            tracing::debug!(request = %reply.id, "dropping reply for a closed popup");
            return Vec::new();
        };
        if reply.id.trigger != self.trigger {
            return Vec::new();
        }

        if popup.root_request.as_ref() == Some(&reply.id) {
            popup.root_request = None;
            return match reply.result {
                Ok(entries) => {
                    popup.tree.set_top(entries, &self.config.base_directory);
                    self.state = PickerState::Open;
                    Vec::new()
                }
                Err(message) => vec![Effect::Alert(message)],
            };
        }

        let Some(row) = popup.tree.find_pending(&reply.id) else {
            tracing::debug!(request = %reply.id, "dropping superseded reply");
            return Vec::new();
        };
        popup.tree.set_pending(row, None);
        match reply.result {
            Ok(entries) => {
                popup.tree.expand(row, entries, &self.config.base_directory);
                Vec::new()
            }
            Err(message) => vec![Effect::Alert(message)],
        }
    }

    /// Handles a click on an item row.
    pub fn click_row(&mut self, id: RowId) -> Vec<Effect> {
        if self.state != PickerState::Open {
            return Vec::new();
        }
        let Some(popup) = self.popup.as_ref() else {
            return Vec::new();
        };
        if popup.awaiting_confirmation.is_some() {
            return Vec::new();
        }
        let Some(row) = popup.tree.row(id) else {
            return Vec::new();
        };
        let name = row.entry.name.clone();
        let relative = row.entry.relative_path.clone();
        let expanded = row.is_expanded();
        let kind = row.entry.kind;

        match kind {
            RowKind::File(file_type) => {
                let selection = FileSelection {
                    name,
                    path: self.full_path(&relative),
                    file_type,
                };
                self.listener.before_select_file(&selection);
                if self.config.confirm_selection {
                    if let Some(popup) = self.popup.as_mut() {
                        popup.awaiting_confirmation = Some(selection);
                    }
                    return vec![Effect::Confirm(self.config.confirm_text.clone())];
                }
                self.complete_selection(selection)
            }
            RowKind::Directory => {
                let folder = FolderSelection {
                    name,
                    path: self.full_path(&relative),
                    folder_state: if expanded { FolderState::Closed } else { FolderState::Open },
                };
                self.listener.before_select_folder(&folder);

                let mut effects = Vec::new();
                if expanded {
                    if let Some(popup) = self.popup.as_mut() {
                        popup.tree.collapse(id);
                    }
                } else {
                    let request = self.request(&relative);
                    if let Some(popup) = self.popup.as_mut() {
                        popup.tree.set_pending(id, Some(request.id.clone()));
                    }
                    effects.push(Effect::Fetch(request));
                }

                self.listener.after_select_folder(&folder);
                effects
            }
        }
    }

    /// Resolves a pending [`Effect::Confirm`].
    pub fn answer_confirmation(&mut self, accepted: bool) -> Vec<Effect> {
        let Some(selection) = self.popup.as_mut().and_then(|p| p.awaiting_confirmation.take()) else {
            return Vec::new();
        };
        if !accepted {
            tracing::debug!(path = %selection.path, "selection declined");
            return Vec::new();
        }
        self.complete_selection(selection)
    }

    pub fn close(&mut self) -> Vec<Effect> {
        if !matches!(self.state, PickerState::Opening | PickerState::Open) {
            return Vec::new();
        }
        self.listener.on_pre_close();
        self.state = PickerState::Closing;
        match self.config.fade_out {
            Some(duration) if !duration.is_zero() => vec![Effect::FadeOut(duration)],
            _ => self.finish_close(),
        }
    }

    /// Removes the popup once the fade-out is over.
    pub fn finish_close(&mut self) -> Vec<Effect> {
        if self.state != PickerState::Closing {
            return Vec::new();
        }
        self.popup = None;
        self.state = PickerState::Closed;
        tracing::debug!(trigger = %self.trigger, session = self.session, "picker closed");
        self.listener.on_post_close();
        vec![Effect::Closed]
    }

    pub fn escape(&mut self) -> Vec<Effect> {
        self.dismiss()
    }

    pub fn outside_click(&mut self) -> Vec<Effect> {
        self.dismiss()
    }

    /// Rows in display order; empty while closed.
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        let Some(popup) = &self.popup else {
            return Vec::new();
        };
        let root = self
            .config
            .show_root_folder
            .then_some(self.config.base_directory.as_str());
        popup.tree.visible_rows(root)
    }

    pub fn render_html(&self) -> Option<String> {
        self.popup.as_ref().map(|popup| {
            render::render_popup(&popup.tree, &self.config, &popup.placement, popup.is_loading())
        })
    }

    fn dismiss(&mut self) -> Vec<Effect> {
        if self.config.close_on_outside_click {
            self.close()
        } else {
            Vec::new()
        }
    }

    fn complete_selection(&mut self, selection: FileSelection) -> Vec<Effect> {
        tracing::info!(path = %selection.path, "file selected");
        self.listener.after_select_file(&selection);
        if self.config.close_on_select_file {
            self.close()
        } else {
            Vec::new()
        }
    }

    fn request(&mut self, dir: &str) -> ListingRequest {
        self.next_seq += 1;
        ListingRequest {
            id: RequestId {
                trigger: self.trigger.clone(),
                session: self.session,
                seq: self.next_seq,
            },
            endpoint: self.config.data_source.trim().to_string(),
            method: self.config.request_method,
            dir: dir.to_string(),
            base_directory: self.config.base_directory.clone(),
        }
    }

    /// Base directory plus the relative path, in this picker's separator.
    /// Listings always use `/`; a `\` inside a name is part of the name.
    fn full_path(&self, relative: &str) -> String {
        let path = format!("{}{}", self.config.base_directory, relative);
        match self.separator {
            '/' => path,
            separator => path.replace('/', &separator.to_string()),
        }
    }
}
