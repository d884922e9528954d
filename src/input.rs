//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  Adding a new keybinding is
//! a single match arm in [`handle_key_event`].
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in [`handle_key_event`] that calls it.
//! 3. Update the help text in `ui::draw_status_bar`.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::{App, Tab};
use crate::loader::PageRequester;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.  `now` timestamps any
/// end-of-list signal the move produces.
pub fn handle_key_event<R: PageRequester + Clone>(app: &mut App<R>, key: KeyEvent, now: Instant) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.detail.is_some() {
        match key.code {
            KeyCode::Char('q') => app.quit = true,
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => {
                app.close_detail()
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(now),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(now),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(now),
        KeyCode::End | KeyCode::Char('G') => app.select_last(now),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Tab => app.next_tab(),
        KeyCode::BackTab => app.previous_tab(),
        KeyCode::Char('1') => app.select_tab(Tab::Home),
        KeyCode::Char('2') => app.select_tab(Tab::Services),
        KeyCode::Char('3') => app.select_tab(Tab::Contact),
        KeyCode::Char('r') => app.refresh(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers};

    use crate::config::{ClinicConfig, FeedConfig};
    use crate::fetch::{PageMsg, PageRequest};
    use crate::source::FeedItem;

    #[derive(Clone, Default)]
    struct Sink;

    impl PageRequester for Sink {
        fn request(&mut self, _req: PageRequest) {}
    }

    fn app() -> App<Sink> {
        App::new(FeedConfig::default(), ClinicConfig::default(), Sink, Sink)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn with_articles(app: &mut App<Sink>) {
        let items = (0..3)
            .map(|i| FeedItem {
                id: i.to_string().as_str().into(),
                title: format!("Article {i}"),
                description: None,
                body: None,
                url: None,
                admin: None,
                published: None,
            })
            .collect();
        app.handle_page(PageMsg {
            tab: Tab::Home,
            session: 1,
            page: 1,
            outcome: Ok(items),
        });
    }

    #[test]
    fn q_quits() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Char('q')), Instant::now());
        assert!(app.quit);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut app = app();
        let key = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        handle_key_event(&mut app, key, Instant::now());
        assert!(!app.quit);
    }

    #[test]
    fn tab_keys_switch_screens() {
        let mut app = app();
        let now = Instant::now();

        handle_key_event(&mut app, press(KeyCode::Tab), now);
        assert_eq!(app.tab, Tab::Services);
        handle_key_event(&mut app, press(KeyCode::BackTab), now);
        assert_eq!(app.tab, Tab::Home);
        handle_key_event(&mut app, press(KeyCode::Char('3')), now);
        assert_eq!(app.tab, Tab::Contact);
    }

    #[test]
    fn esc_in_detail_goes_back_instead_of_quitting() {
        let mut app = app();
        let now = Instant::now();
        with_articles(&mut app);

        handle_key_event(&mut app, press(KeyCode::Char('j')), now);
        handle_key_event(&mut app, press(KeyCode::Enter), now);
        assert!(app.detail.is_some());

        handle_key_event(&mut app, press(KeyCode::Esc), now);
        assert!(app.detail.is_none());
        assert!(!app.quit);
    }

    #[test]
    fn movement_keys_move_selection() {
        let mut app = app();
        let now = Instant::now();
        with_articles(&mut app);

        handle_key_event(&mut app, press(KeyCode::Char('G')), now);
        assert_eq!(app.pane(Tab::Home).unwrap().list_state.selected(), Some(2));
        handle_key_event(&mut app, press(KeyCode::Up), now);
        assert_eq!(app.pane(Tab::Home).unwrap().list_state.selected(), Some(1));
        handle_key_event(&mut app, press(KeyCode::Home), now);
        assert_eq!(app.pane(Tab::Home).unwrap().list_state.selected(), Some(0));
    }
}
