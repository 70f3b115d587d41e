use crate::app::App;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

const PAGE: u16 = 10;

pub fn handle_event(event: Event, app: &mut App) {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_chat_input(key, app),
        Event::Paste(text) => {
            let mut input = app.chat.input().to_string();
            input.push_str(&text.replace(['\r', '\n'], ""));
            app.chat.set_input(input);
        }
        _ => {}
    }
}

pub fn handle_chat_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => app.quit(),
        KeyCode::Enter => {
            app.submit();
        }
        KeyCode::PageUp => app.chat.scroll.scroll_up(PAGE),
        KeyCode::PageDown => app.chat.scroll.scroll_down(PAGE),
        KeyCode::End => app.chat.scroll.follow_bottom(),
        KeyCode::Backspace => app.chat.backspace(),
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match c {
                    'c' => app.quit(),
                    's' => app.save_attachment(),
                    'o' => app.open_attachment(),
                    'u' => app.chat.scroll.scroll_up(PAGE),
                    'd' => app.chat.scroll.scroll_down(PAGE),
                    'w' => app.chat.clear_input(),
                    _ => {}
                }
            } else {
                app.chat.insert_char(c);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppEvent;
    use crate::config::Config;
    use tokio::sync::mpsc;

    fn make_app() -> (App, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel(4);
        let config = Config {
            server_url: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        };
        (App::new(&config, tx).unwrap(), rx)
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_chat_input(KeyEvent::new(code, KeyModifiers::NONE), app);
    }

    fn ctrl(app: &mut App, c: char) {
        handle_chat_input(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL), app);
    }

    #[test]
    fn test_typing_edits_input() {
        let (mut app, _rx) = make_app();
        for c in "abc".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.chat.input(), "ab");

        ctrl(&mut app, 'w');
        assert_eq!(app.chat.input(), "");
    }

    #[test]
    fn test_enter_on_blank_input_does_nothing() {
        let (mut app, _rx) = make_app();
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Enter);
        assert!(app.chat.log().is_empty());
        assert_eq!(app.chat.input(), " ");
    }

    #[tokio::test]
    async fn test_enter_submits() {
        let (mut app, _rx) = make_app();
        app.chat.set_input("https://github.com/a/b");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.chat.log().len(), 1);
        assert!(app.chat.is_loading());
    }

    #[test]
    fn test_quit_keys() {
        let (mut app, _rx) = make_app();
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);

        let (mut app, _rx) = make_app();
        ctrl(&mut app, 'c');
        assert!(app.should_quit);
    }

    #[test]
    fn test_paste_strips_newlines() {
        let (mut app, _rx) = make_app();
        handle_event(Event::Paste("https://github.com/a/b\n".to_string()), &mut app);
        assert_eq!(app.chat.input(), "https://github.com/a/b");
    }

    #[test]
    fn test_scroll_keys_detach_follow() {
        let (mut app, _rx) = make_app();
        press(&mut app, KeyCode::PageUp);
        assert!(!app.chat.scroll.is_following());
        press(&mut app, KeyCode::End);
        assert!(app.chat.scroll.is_following());
    }
}
