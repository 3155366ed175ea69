// Unit tests for user-directory
// These exercise the public API of individual modules.

#[cfg(test)]
mod keymap_tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use user_directory::app::keymap::{KeyAction, Keymap, format_action};

    fn temp_path(tag: &str) -> String {
        let nonce = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut p = std::env::temp_dir();
        p.push(format!("udir_{tag}_{}_{}.conf", std::process::id(), nonce));
        p.to_string_lossy().to_string()
    }

    #[test]
    fn test_keymap_file_overrides_defaults() {
        let path = temp_path("keys");
        std::fs::write(&path, "# custom\nRefetch = F\nCtrl+x = Quit\nbogus line\nAddFakeUsers = nope\n").unwrap();
        let km = Keymap::from_file(&path).expect("readable");

        let f = KeyEvent::new(KeyCode::Char('F'), KeyModifiers::NONE);
        let ctrl_x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL);
        let a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(km.resolve(&f), Some(KeyAction::Refetch));
        assert_eq!(km.resolve(&ctrl_x), Some(KeyAction::Quit));
        // Defaults survive.
        assert_eq!(km.resolve(&a), Some(KeyAction::AddFakeUsers));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_keymap_write_then_read() {
        let path = temp_path("keys_rt");
        Keymap::default().write_file(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Refetch = r"));
        assert!(written.contains("AddFakeUsers = a"));
        assert!(written.contains("Quit = Ctrl+c"));

        let km = Keymap::from_file(&path).unwrap();
        let r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);
        assert_eq!(km.resolve(&r), Some(KeyAction::Refetch));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_keymap_file() {
        assert!(Keymap::from_file("/nonexistent/udir/keybinds.conf").is_none());
    }

    #[test]
    fn test_format_action_names() {
        assert_eq!(format_action(KeyAction::AddFakeUsers), "AddFakeUsers");
        assert_eq!(format_action(KeyAction::PageDown), "PageDown");
    }
}

#[cfg(test)]
mod state_tests {
    use user_directory::app::keymap::Keymap;
    use user_directory::app::{AppState, Theme, ViewState};
    use user_directory::client::ClientEvent;
    use user_directory::gql::{FetchError, ReadOp, User, UserListView};

    fn loaded(n: usize) -> ClientEvent {
        ClientEvent::Read {
            id: 1,
            op: ReadOp::AllUsers,
            result: Ok(UserListView {
                total_users: n as u32,
                all_users: (0..n)
                    .map(|i| User {
                        github_login: format!("login{i}"),
                        name: format!("Name {i}"),
                        avatar: format!("{i}.png"),
                    })
                    .collect(),
            }),
        }
    }

    #[test]
    fn test_new_state_is_loading() {
        let app = AppState::new(Theme::dark(), Keymap::default());
        assert_eq!(app.view, ViewState::Loading);
        assert!(!app.controls_visible());
        assert_eq!(app.user_count(), 0);
    }

    #[test]
    fn test_apply_success_and_failure() {
        let mut app = AppState::new(Theme::dark(), Keymap::default());
        app.apply(loaded(3));
        assert!(app.controls_visible());
        assert_eq!(app.user_count(), 3);

        app.apply(ClientEvent::Read {
            id: 2,
            op: ReadOp::AllUsers,
            result: Err(FetchError::Status(502)),
        });
        match &app.view {
            ViewState::Failed(msg) => assert!(msg.contains("502")),
            other => panic!("unexpected view: {other:?}"),
        }
        assert_eq!(app.user_count(), 0);
    }

    #[test]
    fn test_total_count_shown_as_reported() {
        // The count comes from the response, not from the list length.
        let mut app = AppState::new(Theme::dark(), Keymap::default());
        app.apply(ClientEvent::Read {
            id: 1,
            op: ReadOp::AllUsers,
            result: Ok(UserListView {
                total_users: 40,
                all_users: vec![],
            }),
        });
        let ViewState::Loaded(list) = &app.view else {
            panic!("expected loaded view");
        };
        assert_eq!(list.total_users, 40);
    }
}

#[cfg(test)]
mod key_activation_tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use user_directory::app::keymap::Keymap;
    use user_directory::app::update::{Flow, handle_key};
    use user_directory::app::{AppState, Theme};
    use user_directory::client::{ClientEvent, QueryClient};
    use user_directory::gql::{DataSource, FetchError, User, UserListView};

    #[derive(Default)]
    struct CallLog {
        calls: Mutex<Vec<String>>,
    }

    impl DataSource for CallLog {
        fn all_users(&self) -> Result<UserListView, FetchError> {
            self.calls.lock().unwrap().push("read".into());
            Ok(UserListView::default())
        }

        fn add_fake_users(&self, count: u32) -> Result<Vec<User>, FetchError> {
            self.calls.lock().unwrap().push(format!("write:{count}"));
            Ok(Vec::new())
        }
    }

    fn press(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn next(client: &QueryClient) -> ClientEvent {
        client.next_timeout(Duration::from_secs(5)).expect("request should finish")
    }

    fn loaded_app(client: &QueryClient) -> AppState {
        let mut app = AppState::new(Theme::dark(), Keymap::default());
        app.mount(client);
        app.apply(next(client));
        app
    }

    #[test]
    fn test_refetch_key_sends_one_read() {
        let source = Arc::new(CallLog::default());
        let client = QueryClient::new(source.clone());
        let mut app = loaded_app(&client);
        source.calls.lock().unwrap().clear();

        assert_eq!(handle_key(&mut app, &client, press('r')), Flow::Continue);
        assert!(matches!(next(&client), ClientEvent::Read { .. }));
        assert!(client.next_timeout(Duration::from_millis(200)).is_none());
        assert_eq!(*source.calls.lock().unwrap(), vec!["read".to_string()]);
    }

    #[test]
    fn test_add_fake_users_key_sends_one_write_then_one_read() {
        let source = Arc::new(CallLog::default());
        let client = QueryClient::new(source.clone());
        let mut app = loaded_app(&client);
        source.calls.lock().unwrap().clear();

        assert_eq!(handle_key(&mut app, &client, press('a')), Flow::Continue);
        assert!(matches!(next(&client), ClientEvent::Write { .. }));
        assert!(matches!(next(&client), ClientEvent::Read { .. }));
        assert!(client.next_timeout(Duration::from_millis(200)).is_none());
        assert_eq!(
            *source.calls.lock().unwrap(),
            vec!["write:1".to_string(), "read".to_string()]
        );
    }
}
