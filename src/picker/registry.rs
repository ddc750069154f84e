use std::collections::HashMap;

use super::config::PickerConfig;
use super::listener::SelectionListener;
use super::position::Viewport;
use super::request::{ListingReply, TriggerId};
use super::tree::RowId;
use super::widget::{Effect, FilePicker};

/// Where a pointer click landed, as far as pickers are concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    Trigger(TriggerId),
    Popup(TriggerId),
    Elsewhere,
}

/// Owns every picker of a page, keyed by trigger, and tracks which of them
/// currently show a popup.
#[derive(Default)]
pub struct PickerManager {
    pickers: HashMap<TriggerId, FilePicker>,
    active: Vec<TriggerId>,
}

impl PickerManager {
    pub fn new() -> Self {
        PickerManager::default()
    }

    /// Binds a picker to `trigger`. Returns false, leaving the existing picker
    /// untouched, when the trigger already has one.
    pub fn attach(
        &mut self,
        trigger: TriggerId,
        config: PickerConfig,
        listener: Box<dyn SelectionListener>,
    ) -> bool {
        if self.pickers.contains_key(&trigger) {
            tracing::debug!(%trigger, "picker already attached");
            return false;
        }
        let picker = FilePicker::new(trigger.clone(), config, listener);
        self.pickers.insert(trigger, picker);
        true
    }

    pub fn get(&self, trigger: &TriggerId) -> Option<&FilePicker> {
        self.pickers.get(trigger)
    }

    /// Triggers whose popup is showing, in the order they were opened.
    pub fn active(&self) -> &[TriggerId] {
        &self.active
    }

    pub fn open(&mut self, trigger: &TriggerId, viewport: &Viewport) -> Vec<Effect> {
        let Some(picker) = self.pickers.get_mut(trigger) else {
            return Vec::new();
        };
        let effects = picker.open(viewport);
        if picker.is_visible() && !self.active.contains(trigger) {
            self.active.push(trigger.clone());
        }
        effects
    }

    /// Routes a reply to the picker that issued the request.
    pub fn deliver(&mut self, reply: ListingReply) -> Vec<Effect> {
        let trigger = reply.id.trigger.clone();
        self.with_picker(&trigger, |p| p.deliver(reply))
    }

    pub fn click_row(&mut self, trigger: &TriggerId, row: RowId) -> Vec<Effect> {
        self.with_picker(trigger, |p| p.click_row(row))
    }

    pub fn answer_confirmation(&mut self, trigger: &TriggerId, accepted: bool) -> Vec<Effect> {
        self.with_picker(trigger, |p| p.answer_confirmation(accepted))
    }

    pub fn close(&mut self, trigger: &TriggerId) -> Vec<Effect> {
        self.with_picker(trigger, FilePicker::close)
    }

    pub fn finish_close(&mut self, trigger: &TriggerId) -> Vec<Effect> {
        self.with_picker(trigger, FilePicker::finish_close)
    }

    /// A click somewhere on the page: every open picker whose popup and
    /// trigger were both missed is dismissed.
    pub fn document_click(&mut self, target: &ClickTarget) -> Vec<(TriggerId, Effect)> {
        let missed: Vec<TriggerId> = self
            .active
            .iter()
            .filter(|t| match target {
                ClickTarget::Trigger(hit) | ClickTarget::Popup(hit) => hit != *t,
                ClickTarget::Elsewhere => true,
            })
            .cloned()
            .collect();
        self.for_each(missed, FilePicker::outside_click)
    }

    /// The escape key dismisses every open picker.
    pub fn escape(&mut self) -> Vec<(TriggerId, Effect)> {
        let open = self.active.clone();
        self.for_each(open, FilePicker::escape)
    }

    /// Forgets active entries whose popup is gone.
    pub fn prune(&mut self) {
        let pickers = &self.pickers;
        self.active
            .retain(|t| pickers.get(t).is_some_and(FilePicker::is_visible));
    }

    fn with_picker(
        &mut self,
        trigger: &TriggerId,
        action: impl FnOnce(&mut FilePicker) -> Vec<Effect>,
    ) -> Vec<Effect> {
        let effects = self.pickers.get_mut(trigger).map(action).unwrap_or_default();
        if effects.contains(&Effect::Closed) {
            self.prune();
        }
        effects
    }

    fn for_each(
        &mut self,
        triggers: Vec<TriggerId>,
        action: impl Fn(&mut FilePicker) -> Vec<Effect>,
    ) -> Vec<(TriggerId, Effect)> {
        let mut out = Vec::new();
        for trigger in triggers {
            if let Some(picker) = self.pickers.get_mut(&trigger) {
                out.extend(action(picker).into_iter().map(|e| (trigger.clone(), e)));
            }
        }
        self.prune();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::NoopListener;

    fn quiet() -> PickerConfig {
        PickerConfig {
            fade_in: None,
            fade_out: None,
            ..PickerConfig::default()
        }
    }

    fn manager_with(triggers: &[&str]) -> PickerManager {
        let mut manager = PickerManager::new();
        for t in triggers {
            assert!(manager.attach(TriggerId::new(*t), quiet(), Box::new(NoopListener)));
        }
        manager
    }

    #[test]
    fn attaching_twice_to_one_trigger_is_a_no_op() {
        let mut manager = manager_with(&["a"]);
        let sticky = PickerConfig {
            close_on_outside_click: false,
            ..quiet()
        };
        assert!(!manager.attach(TriggerId::new("a"), sticky, Box::new(NoopListener)));
        assert!(manager.get(&TriggerId::new("a")).unwrap().config().close_on_outside_click);
    }

    #[test]
    fn open_registers_and_close_prunes() {
        let mut manager = manager_with(&["a", "b"]);
        let a = TriggerId::new("a");
        manager.open(&a, &Viewport::default());
        assert_eq!(manager.active(), &[a.clone()]);

        assert_eq!(manager.close(&a), vec![Effect::Closed]);
        assert!(manager.active().is_empty());
    }

    #[test]
    fn clicking_inside_a_popup_only_dismisses_the_others() {
        let mut manager = manager_with(&["a", "b"]);
        let a = TriggerId::new("a");
        let b = TriggerId::new("b");
        manager.open(&a, &Viewport::default());
        manager.open(&b, &Viewport::default());

        let effects = manager.document_click(&ClickTarget::Popup(a.clone()));
        assert_eq!(effects, vec![(b.clone(), Effect::Closed)]);
        assert_eq!(manager.active(), &[a.clone()]);

        assert!(manager.document_click(&ClickTarget::Trigger(a.clone())).is_empty());
        assert_eq!(manager.document_click(&ClickTarget::Elsewhere), vec![(a, Effect::Closed)]);
        assert!(manager.active().is_empty());
    }

    #[test]
    fn escape_closes_every_open_picker() {
        let mut manager = manager_with(&["a", "b"]);
        manager.open(&TriggerId::new("a"), &Viewport::default());
        manager.open(&TriggerId::new("b"), &Viewport::default());

        assert_eq!(manager.escape().len(), 2);
        assert!(manager.active().is_empty());
    }

    #[test]
    fn fading_pickers_stay_active_until_finished() {
        let mut manager = PickerManager::new();
        let a = TriggerId::new("a");
        manager.attach(a.clone(), PickerConfig::default(), Box::new(NoopListener));
        manager.open(&a, &Viewport::default());

        assert!(matches!(manager.close(&a)[..], [Effect::FadeOut(_)]));
        assert_eq!(manager.active().len(), 1);
        manager.finish_close(&a);
        assert!(manager.active().is_empty());
    }

    #[test]
    fn replies_are_routed_by_trigger() {
        let mut manager = manager_with(&["a", "b"]);
        let b = TriggerId::new("b");
        let effects = manager.open(&b, &Viewport::default());
        let Some(Effect::Fetch(request)) = effects.into_iter().find(|e| matches!(e, Effect::Fetch(_)))
        else {
            panic!("no fetch effect");
        };

        manager.deliver(ListingReply { id: request.id, result: Ok(vec![]) });
        assert_eq!(
            manager.get(&b).unwrap().state(),
            crate::picker::PickerState::Open
        );
        assert_eq!(
            manager.get(&TriggerId::new("a")).unwrap().state(),
            crate::picker::PickerState::Closed
        );
    }
}
