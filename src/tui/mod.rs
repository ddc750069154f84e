// Terminal front-end for the picker: a trigger button and the popup it opens.
mod app_logic;
mod app_state;
mod event_handler;
mod ui_renderer;

pub use self::run_tui::run_picker;

// Main loop and terminal setup/teardown
mod run_tui {
    use super::app_logic::TuiApp;
    use super::event_handler::handle_events;
    use super::ui_renderer::ui_frame;
    use filepicker::picker::{ListingReply, PickerConfig};
    use filepicker::source::Fetcher;
    use anyhow::Result;
    use crossbeam_channel::Receiver;
    use crossterm::{
        event::{DisableMouseCapture, EnableMouseCapture},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    };
    use ratatui::prelude::{CrosstermBackend, Terminal};
    use std::io::{self, Stdout};

    /// Runs the picker until the user selects a file or quits. Returns the
    /// last selected path, if any.
    pub fn run_picker(
        config: PickerConfig,
        fetcher: Fetcher,
        replies: Receiver<ListingReply>,
    ) -> Result<Option<String>> {
        let mut terminal = init_terminal()?;
        let screen = terminal.get_frame().area();
        let mut app = TuiApp::new(config, fetcher, replies, screen);

        let outcome = run_loop(&mut terminal, &mut app);
        restore_terminal(terminal)?;
        outcome?;

        Ok(app.selected.take())
    }

    fn run_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut TuiApp) -> Result<()> {
        while !app.quit {
            terminal.draw(|frame| ui_frame(frame, app))?;
            handle_events(app)?;
        }
        Ok(())
    }

    fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend).map_err(Into::into)
    }

    fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor().map_err(Into::into)
    }
}
