use std::collections::VecDeque;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use hb_core::rng::GameRng;
use hb_core::testing::{sample_blue_mage, sample_mage};
use hb_core::{Dispatcher, Session, UiError, UiOptions};
use hb_tui::{App, Command, TerminalUi, Theme};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

fn terminal_ui(keys: &[KeyCode]) -> TerminalUi<TestBackend, VecDeque<Event>> {
    let terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    let events = keys
        .iter()
        .map(|code| Event::Key(KeyEvent::new(*code, KeyModifiers::NONE)))
        .collect();
    TerminalUi::new(terminal, events, Theme::dark())
}

fn screen_text(ui: &TerminalUi<TestBackend, VecDeque<Event>>) -> String {
    let buffer = ui.terminal().backend().buffer();
    let mut text = String::new();
    for y in 0..24u16 {
        for x in 0..80u16 {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

#[test]
fn test_menu_browse_draws_spell_list() {
    let options = UiOptions {
        use_menu: true,
        ..UiOptions::default()
    };
    let mut app = App::new(
        Session::new(sample_mage()),
        Dispatcher::new(options, GameRng::new(1)),
    );
    let mut ui = terminal_ui(&[KeyCode::Char('a'), KeyCode::Esc]);
    assert_eq!(app.execute(Command::Browse, &mut ui).unwrap(), None);

    let screen = screen_text(&ui);
    assert!(screen.contains("Phase Door"));
    assert_eq!(app.session().turns(), 0);
}

#[test]
fn test_browse_description_stays_on_screen() {
    let mut app = App::new(
        Session::new(sample_mage()),
        Dispatcher::new(UiOptions::default(), GameRng::new(1)),
    );
    let mut ui = terminal_ui(&[KeyCode::Char('a'), KeyCode::Char('b')]);
    // Waiting at -more- when the keys run out
    assert!(matches!(
        app.execute(Command::Browse, &mut ui),
        Err(UiError::InputClosed)
    ));
    let screen = screen_text(&ui);
    assert!(screen.contains("Teleports you a short distance."));
    assert!(screen.contains("-more-"));
}

#[test]
fn test_browse_continues_after_more() {
    let mut app = App::new(
        Session::new(sample_mage()),
        Dispatcher::new(UiOptions::default(), GameRng::new(1)),
    );
    let mut ui = terminal_ui(&[
        KeyCode::Char('a'),
        KeyCode::Char('b'),
        KeyCode::Char(' '),
        KeyCode::Esc,
    ]);
    assert_eq!(app.execute(Command::Browse, &mut ui).unwrap(), None);
    assert!(screen_text(&ui).contains("Browse which spell?"));
    assert_eq!(app.session().turns(), 0);
}

#[test]
fn test_typed_blue_magic_through_terminal() {
    let mut app = App::new(
        Session::new(sample_blue_mage()),
        Dispatcher::new(UiOptions::default(), GameRng::new(1)),
    );
    let mut ui = terminal_ui(&[KeyCode::Char('a'), KeyCode::Char('a')]);
    let outcome = app.execute(Command::Cast, &mut ui).unwrap();
    assert!(outcome.is_some_and(|o| o.took_turn()));
    assert_eq!(app.session().uses, 1);
}

#[test]
fn test_run_stops_when_input_closes() {
    let mut app = App::new(
        Session::new(sample_mage()),
        Dispatcher::new(UiOptions::default(), GameRng::new(1)),
    );
    let mut ui = terminal_ui(&[KeyCode::Char('=')]);
    assert!(matches!(app.run(&mut ui), Err(UiError::InputClosed)));
    assert!(app.dispatcher().options().use_menu);
    assert!(!app.should_quit());
}
