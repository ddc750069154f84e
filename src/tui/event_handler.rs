use super::app_logic::TuiApp;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use std::time::{Duration, Instant};

pub(super) fn handle_events(app: &mut TuiApp) -> Result<()> {
    if event::poll(Duration::from_millis(50))? {
        match event::read()? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                app.handle_key(key_event)
            }
            Event::Mouse(mouse_event) => app.handle_mouse(mouse_event),
            _ => {}
        }
    }
    // Listings and fade timers advance even without input.
    app.tick(Instant::now());
    Ok(())
}
