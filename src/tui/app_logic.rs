use super::app_state::{ChannelListener, HitAreas, Modal, PickerNotice};
use filepicker::picker::{
    ClickTarget, Edges, Effect, FilePicker, ListingReply, PickerConfig, PickerManager, TriggerGeometry,
    TriggerId, Viewport, VisibleRow,
};
use filepicker::source::Fetcher;
use crossbeam_channel::{Receiver, unbounded};
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use std::time::Instant;

pub(super) const TRIGGER_LABEL: &str = "Browse…";

/// Where the trigger button sits on a screen of the given size.
pub(super) fn trigger_area(screen: Rect) -> Rect {
    let width = TRIGGER_LABEL.chars().count() as u16 + 4;
    Rect::new(2, 1, width, 3).intersection(screen)
}

pub struct TuiApp {
    pub(super) manager: PickerManager,
    pub(super) trigger: TriggerId,
    fetcher: Fetcher,
    replies: Receiver<ListingReply>,
    notices: Receiver<PickerNotice>,
    pub(super) cursor: usize,
    pub(super) scroll_offset: usize,
    pub(super) list_viewport_height: usize,
    pub(super) modal: Option<Modal>,
    pub(super) status: String,
    pub(super) selected: Option<String>,
    selected_this_session: bool,
    close_deadline: Option<Instant>,
    fade_in_until: Option<Instant>,
    pub(super) quit: bool,
    pub(super) areas: HitAreas,
}

impl TuiApp {
    pub fn new(config: PickerConfig, fetcher: Fetcher, replies: Receiver<ListingReply>, screen: Rect) -> Self {
        let (tx, notices) = unbounded();
        let trigger = TriggerId::new("browse");
        let mut manager = PickerManager::new();
        manager.attach(trigger.clone(), config, Box::new(ChannelListener::new(tx)));

        TuiApp {
            manager,
            trigger,
            fetcher,
            replies,
            notices,
            cursor: 0,
            scroll_offset: 0,
            list_viewport_height: 0,
            modal: None,
            status: "Enter/o or click the button to browse, q to quit".to_string(),
            selected: None,
            selected_this_session: false,
            close_deadline: None,
            fade_in_until: None,
            quit: false,
            areas: HitAreas {
                screen,
                trigger: trigger_area(screen),
                popup: None,
                rows: None,
            },
        }
    }

    pub(super) fn picker(&self) -> Option<&FilePicker> {
        self.manager.get(&self.trigger)
    }

    pub(super) fn is_open(&self) -> bool {
        self.picker().is_some_and(FilePicker::is_visible)
    }

    pub(super) fn rows(&self) -> Vec<VisibleRow> {
        self.picker().map(FilePicker::visible_rows).unwrap_or_default()
    }

    pub(super) fn is_fading_in(&self, now: Instant) -> bool {
        self.fade_in_until.is_some_and(|until| now < until)
    }

    pub(super) fn is_fading_out(&self) -> bool {
        self.close_deadline.is_some()
    }

    /// The trigger's geometry as the placement code expects it: a bordered
    /// box with one line of content.
    fn viewport(&self) -> Viewport {
        let t = self.areas.trigger;
        Viewport {
            trigger: TriggerGeometry {
                left: i32::from(t.x),
                top: i32::from(t.y),
                width: i32::from(t.width.saturating_sub(2)),
                height: i32::from(t.height.saturating_sub(2)),
                padding: Edges::default(),
                border: Edges { top: 1, right: 1, bottom: 1, left: 1 },
            },
            body_width: i32::from(self.areas.screen.width),
        }
    }

    pub(super) fn open_popup(&mut self) {
        let viewport = self.viewport();
        let effects = self.manager.open(&self.trigger, &viewport);
        if !effects.is_empty() {
            self.cursor = 0;
            self.scroll_offset = 0;
            self.selected_this_session = false;
        }
        self.dispatch(effects);
    }

    /// Carries out what the picker asked for. Hook notices are drained first
    /// so a `Closed` effect sees the selection that caused it.
    pub(super) fn dispatch(&mut self, effects: Vec<Effect>) {
        self.drain_notices();
        for effect in effects {
            match effect {
                Effect::Fetch(request) => {
                    tracing::debug!(request = %request.id, dir = %request.dir, "submitting listing request");
                    self.fetcher.submit(request);
                }
                Effect::Alert(message) => self.modal = Some(Modal::Alert(message)),
                Effect::Confirm(text) => self.modal = Some(Modal::Confirm(text)),
                Effect::FadeIn(duration) => self.fade_in_until = Some(Instant::now() + duration),
                Effect::FadeOut(duration) => self.close_deadline = Some(Instant::now() + duration),
                Effect::Closed => {
                    self.close_deadline = None;
                    self.fade_in_until = None;
                    self.modal = None;
                    self.areas.popup = None;
                    self.areas.rows = None;
                    if self.selected_this_session {
                        self.quit = true;
                    }
                }
            }
        }
        self.clamp_cursor();
    }

    fn dispatch_tagged(&mut self, effects: Vec<(TriggerId, Effect)>) {
        self.dispatch(effects.into_iter().map(|(_, effect)| effect).collect());
    }

    fn drain_notices(&mut self) {
        while let Ok(notice) = self.notices.try_recv() {
            self.status = notice.describe();
            if let PickerNotice::Selected(file) = notice {
                self.selected = Some(file.path);
                self.selected_this_session = true;
            }
        }
    }

    /// Applies finished listings and expired transitions.
    pub(super) fn tick(&mut self, now: Instant) {
        while let Ok(reply) = self.replies.try_recv() {
            let effects = self.manager.deliver(reply);
            self.dispatch(effects);
        }
        if self.close_deadline.is_some_and(|deadline| now >= deadline) {
            self.close_deadline = None;
            let effects = self.manager.finish_close(&self.trigger);
            self.dispatch(effects);
        }
        if self.fade_in_until.is_some_and(|until| now >= until) {
            self.fade_in_until = None;
        }
    }

    pub(super) fn move_cursor(&mut self, delta: i32) {
        let count = self.rows().len();
        if count == 0 {
            return;
        }
        self.cursor = (self.cursor as i32 + delta).rem_euclid(count as i32) as usize;
        self.ensure_cursor_visible();
    }

    fn clamp_cursor(&mut self) {
        let count = self.rows().len();
        self.cursor = self.cursor.min(count.saturating_sub(1));
        self.ensure_cursor_visible();
    }

    pub(super) fn ensure_cursor_visible(&mut self) {
        let count = self.rows().len();
        let height = self.list_viewport_height;
        if height == 0 || count <= height {
            self.scroll_offset = 0;
            return;
        }
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + height {
            self.scroll_offset = self.cursor + 1 - height;
        }
        self.scroll_offset = self.scroll_offset.min(count - height);
    }

    /// Clicks the row under the cursor. Root rows and placeholders do nothing.
    pub(super) fn activate_cursor(&mut self) {
        let Some(VisibleRow::Item { id, .. }) = self.rows().get(self.cursor).cloned() else {
            return;
        };
        let effects = self.manager.click_row(&self.trigger, id);
        self.dispatch(effects);
    }

    fn answer(&mut self, accepted: bool) {
        self.modal = None;
        let effects = self.manager.answer_confirmation(&self.trigger, accepted);
        self.dispatch(effects);
    }

    // --- Event handling sub-methods ---
    pub(super) fn handle_key(&mut self, key_event: KeyEvent) {
        match self.modal {
            Some(Modal::Alert(_)) => {
                self.modal = None;
                return;
            }
            Some(Modal::Confirm(_)) => {
                match key_event.code {
                    KeyCode::Char('y' | 'Y') | KeyCode::Enter => self.answer(true),
                    KeyCode::Char('n' | 'N') | KeyCode::Esc => self.answer(false),
                    _ => {}
                }
                return;
            }
            None => {}
        }

        if !self.is_open() {
            match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
                KeyCode::Enter | KeyCode::Char('o' | ' ') => self.open_popup(),
                _ => {}
            }
            return;
        }

        match key_event.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate_cursor(),
            KeyCode::Esc => {
                let effects = self.manager.escape();
                self.dispatch_tagged(effects);
            }
            _ => {}
        }
    }

    pub(super) fn handle_mouse(&mut self, mouse_event: MouseEvent) {
        if self.modal.is_some() {
            return;
        }
        match mouse_event.kind {
            MouseEventKind::ScrollDown if self.is_open() => self.move_cursor(1),
            MouseEventKind::ScrollUp if self.is_open() => self.move_cursor(-1),
            MouseEventKind::Down(MouseButton::Left) => {
                self.click_at(Position::new(mouse_event.column, mouse_event.row));
            }
            _ => {}
        }
    }

    fn click_at(&mut self, pos: Position) {
        if self.areas.trigger.contains(pos) {
            let effects = self.manager.document_click(&ClickTarget::Trigger(self.trigger.clone()));
            self.dispatch_tagged(effects);
            self.open_popup();
            return;
        }
        if self.areas.popup.is_some_and(|popup| popup.contains(pos)) {
            let effects = self.manager.document_click(&ClickTarget::Popup(self.trigger.clone()));
            self.dispatch_tagged(effects);
            if let Some(rows) = self.areas.rows.filter(|rows| rows.contains(pos)) {
                let index = usize::from(pos.y - rows.y) + self.scroll_offset;
                if index < self.rows().len() {
                    self.cursor = index;
                    self.activate_cursor();
                }
            }
            return;
        }
        let effects = self.manager.document_click(&ClickTarget::Elsewhere);
        self.dispatch_tagged(effects);
    }
}
