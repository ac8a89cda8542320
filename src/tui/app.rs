use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use regex::Regex;
use tracing::info;

use crate::editor::TagEditor;
use crate::editor::drag::ChipLayout;
use crate::io::config_io::ResolvedConfig;

use super::input;
use super::render;
use super::theme::Theme;

/// Longest the event loop sleeps when nothing is scheduled
const IDLE_TICK: Duration = Duration::from_millis(250);

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Typing into the query box
    Search,
    /// Cursor on the tag strip
    Tags,
    /// Waiting for y/n on "clear all tags"
    Confirm,
}

/// Main application state
pub struct App {
    pub editor: TagEditor,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    pub show_key_hints: bool,
    /// Help overlay visible
    pub show_help: bool,
    /// Export overlay visible
    pub show_export: bool,
    /// Index of the focused chip in Tags mode
    pub tag_cursor: usize,
    /// First visible candidate row
    pub results_scroll: usize,
    /// Tag strip as last drawn, for pointer hit-testing
    pub chip_layout: ChipLayout,
    /// Candidate rows as last drawn, for click-to-add
    pub results_area: Option<Rect>,
    /// One-shot message for the status row
    pub status_message: Option<String>,
}

impl App {
    pub fn new(editor: TagEditor, theme: Theme) -> Self {
        App {
            editor,
            mode: Mode::Search,
            should_quit: false,
            theme,
            show_key_hints: true,
            show_help: false,
            show_export: false,
            tag_cursor: 0,
            results_scroll: 0,
            chip_layout: ChipLayout::default(),
            results_area: None,
            status_message: None,
        }
    }

    /// Keep the chip cursor on an existing tag
    pub fn clamp_tag_cursor(&mut self) {
        let len = self.editor.collection().len();
        self.tag_cursor = if len == 0 {
            0
        } else {
            self.tag_cursor.min(len - 1)
        };
    }

    /// Case-insensitive regex for highlighting the query inside candidates
    pub fn query_re(&self) -> Option<Regex> {
        let query = self.editor.search().query().trim();
        if query.is_empty() {
            return None;
        }
        Regex::new(&format!("(?i){}", regex::escape(query))).ok()
    }

    /// Keep the selected candidate inside a window of `visible` rows
    pub fn scroll_results_to_selection(&mut self, visible: usize) {
        let selected = self.editor.search().selected();
        if visible == 0 {
            return;
        }
        if selected < self.results_scroll {
            self.results_scroll = selected;
        } else if selected >= self.results_scroll + visible {
            self.results_scroll = selected + 1 - visible;
        }
    }
}

/// Run the TUI application
pub fn run(resolved: &ResolvedConfig, ephemeral: bool) -> Result<(), Box<dyn std::error::Error>> {
    let editor = TagEditor::open(resolved, ephemeral)?;
    let mut app = App::new(editor, Theme::from_config(&resolved.config.ui));
    app.show_key_hints = resolved.config.ui.show_key_hints;
    info!(
        tags = app.editor.collection().len(),
        store = %resolved.store_path.display(),
        "starting tui"
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableFocusChange,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    info!(tags = app.editor.collection().len(), "tui closed");
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.editor.take_redraw();
        terminal.draw(|frame| render::render(frame, app))?;

        // Sleep until the next input, the debounce deadline, or the idle tick
        let timeout = app
            .editor
            .next_deadline()
            .map(|d| d.saturating_duration_since(Instant::now()))
            .map_or(IDLE_TICK, |d| d.min(IDLE_TICK));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key, Instant::now());
                }
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                Event::FocusLost => input::handle_focus_lost(app),
                _ => {}
            }
        }

        app.editor.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::app_with_tags;

    #[test]
    fn clamp_cursor_after_removal() {
        let mut app = app_with_tags(&["a", "b", "c"]);
        app.tag_cursor = 2;
        app.editor.remove("c");
        app.clamp_tag_cursor();
        assert_eq!(app.tag_cursor, 1);
        app.editor.clear_confirmed();
        app.clamp_tag_cursor();
        assert_eq!(app.tag_cursor, 0);
    }

    #[test]
    fn query_re_escapes_and_ignores_case() {
        let mut app = app_with_tags(&[]);
        app.editor.set_query(" (Red ", Instant::now());
        let re = app.query_re().unwrap();
        assert!(re.is_match("dark_(red)"));
        app.editor.set_query("", Instant::now());
        assert!(app.query_re().is_none());
    }

    #[test]
    fn scroll_follows_selection() {
        let mut app = app_with_tags(&[]);
        app.results_scroll = 5;
        app.scroll_results_to_selection(3);
        assert_eq!(app.results_scroll, 0);
    }
}
