//! Line-driven terminal front-end for a remote item list.
//!
//! Reads one command per line from stdin, applies it through a `Session`,
//! and redraws the page after every command. Unlike the bare controller,
//! failures are printed so the user knows an action did not take. A refresh
//! that fails after a change was applied shows up in the page's error line
//! instead.

mod command;
mod config;
mod render;

use std::io::{self, BufRead, Write};

use clap::Parser;
use owo_colors::OwoColorize;
use pager_core::{
    ApiError, ItemClient, PageController, PageView, Session, Transport, UreqTransport,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use command::{Command, ParseError, HELP};
use config::Args;

#[derive(Debug, Error)]
enum ActionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("no row {0} on this page")]
    NoSuchRow(usize),

    #[error("nothing is being edited (use 'edit <row>' first)")]
    NotEditing,
}

#[derive(Debug)]
enum Flow {
    Continue,
    Quit,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    init_tracing();

    let controller = PageController::new(ItemClient::new(&args.base_url), args.controller_config());
    let mut session = Session::new(controller, UreqTransport::new(args.timeout()))
        .with_retry(args.retry_policy());

    let mut stdout = io::stdout();
    if let Err(err) = session.mount() {
        report(&err);
    }
    write!(stdout, "{}", render::render(&PageView::project(session.controller())))?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(ParseError::Empty) => continue,
            Err(err) => {
                report(&err);
                continue;
            }
        };
        if command == Command::Help {
            writeln!(stdout, "{HELP}")?;
            continue;
        }
        match apply(&mut session, command) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(err) => report(&err),
        }
        write!(stdout, "{}", render::render(&PageView::project(session.controller())))?;
        stdout.flush()?;
    }
    Ok(())
}

fn apply<T: Transport>(session: &mut Session<T>, command: Command) -> Result<Flow, ActionError> {
    match command {
        Command::Add(text) => session.add_item(&text)?,
        Command::Toggle(row) => {
            let id = row_id(session, row)?;
            session.toggle_completion(id)?;
        }
        Command::Delete(row) => {
            let id = row_id(session, row)?;
            session.delete_item(id)?;
        }
        Command::Edit(row) => {
            let id = row_id(session, row)?;
            let text = session
                .controller()
                .state()
                .items
                .iter()
                .find(|item| item.id == id)
                .map(|item| item.text.clone())
                .unwrap_or_default();
            session.begin_edit(id, &text);
        }
        Command::Draft(text) => {
            editing_target(session)?;
            session.set_draft(&text);
        }
        Command::Save(text) => {
            let id = editing_target(session)?;
            if let Some(text) = text {
                session.set_draft(&text);
            }
            let draft = session.controller().edit_session().draft_text.clone();
            session.save_edit(id, &draft)?;
        }
        Command::Cancel => session.cancel_edit(),
        Command::Next => {
            session.navigate(1)?;
        }
        Command::Prev => {
            session.navigate(-1)?;
        }
        Command::Refresh => session.reload()?,
        Command::Help => {}
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn row_id<T: Transport>(session: &Session<T>, row: usize) -> Result<Uuid, ActionError> {
    row.checked_sub(1)
        .and_then(|index| session.controller().state().items.get(index))
        .map(|item| item.id)
        .ok_or(ActionError::NoSuchRow(row))
}

fn editing_target<T: Transport>(session: &Session<T>) -> Result<Uuid, ActionError> {
    session
        .controller()
        .edit_session()
        .target_id
        .ok_or(ActionError::NotEditing)
}

fn report(err: &dyn std::error::Error) {
    eprintln!("{} {err}", "error:".red().bold());
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use pager_core::{ControllerConfig, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};

    use super::*;

    /// Replays canned results in order and records every request.
    #[derive(Default)]
    struct Scripted {
        replies: RefCell<VecDeque<Result<HttpResponse, ApiError>>>,
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl Scripted {
        fn reply(&self, status: u16, body: &str) -> &Self {
            self.replies.borrow_mut().push_back(Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            }));
            self
        }

        fn fail(&self, msg: &str) -> &Self {
            self.replies
                .borrow_mut()
                .push_back(Err(ApiError::Transport(msg.to_string())));
            self
        }

        fn last(&self) -> HttpRequest {
            self.seen.borrow().last().cloned().unwrap()
        }
    }

    impl Transport for Scripted {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.borrow_mut().push(request.clone());
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Transport("script exhausted".to_string())))
        }
    }

    fn item_json(n: u128, text: &str, completed: bool) -> String {
        format!(
            r#"{{"id":"{}","text":"{text}","completed":{completed}}}"#,
            Uuid::from_u128(n)
        )
    }

    fn page_json() -> String {
        let items: Vec<String> = (1..=5).map(|n| item_json(n, &format!("item {n}"), false)).collect();
        format!("[{}]", items.join(","))
    }

    /// Session showing items 1..=5 on the only page.
    fn mounted(transport: &Scripted) -> Session<&Scripted> {
        let page = page_json();
        transport.reply(200, &page).reply(200, &page);
        let controller = PageController::new(ItemClient::new("http://store"), ControllerConfig::default());
        let mut session = Session::new(controller, transport).with_retry(RetryPolicy::none());
        session.mount().unwrap();
        session
    }

    #[test]
    fn rows_are_one_based() {
        let transport = Scripted::default();
        let mut session = mounted(&transport);
        transport.reply(200, &item_json(2, "item 2", true)).reply(200, &page_json());

        apply(&mut session, Command::Toggle(2)).unwrap();
        let patch = transport.seen.borrow()[2].clone();
        assert_eq!(patch.method, HttpMethod::Patch);
        assert_eq!(patch.path, format!("http://store/items/{}", Uuid::from_u128(2)));
    }

    #[test]
    fn row_outside_page_is_rejected_without_a_request() {
        let transport = Scripted::default();
        let mut session = mounted(&transport);

        let err = apply(&mut session, Command::Toggle(6)).unwrap_err();
        assert!(matches!(err, ActionError::NoSuchRow(6)));
        assert!(matches!(apply(&mut session, Command::Delete(0)), Err(ActionError::NoSuchRow(0))));
        assert!(matches!(apply(&mut session, Command::Edit(9)), Err(ActionError::NoSuchRow(9))));
        assert_eq!(transport.seen.borrow().len(), 2);
    }

    #[test]
    fn edit_starts_session_with_current_text() {
        let transport = Scripted::default();
        let mut session = mounted(&transport);

        apply(&mut session, Command::Edit(3)).unwrap();
        let edit = session.controller().edit_session();
        assert_eq!(edit.target_id, Some(Uuid::from_u128(3)));
        assert_eq!(edit.draft_text, "item 3");
    }

    #[test]
    fn save_with_text_replaces_draft_before_saving() {
        let transport = Scripted::default();
        let mut session = mounted(&transport);
        apply(&mut session, Command::Edit(1)).unwrap();
        apply(&mut session, Command::Draft("ignored".to_string())).unwrap();
        transport.reply(200, &item_json(1, "renamed", false)).reply(200, &page_json());

        apply(&mut session, Command::Save(Some("renamed".to_string()))).unwrap();
        let patch = transport.seen.borrow()[2].clone();
        assert_eq!(patch.body.as_deref(), Some(r#"{"text":"renamed"}"#));
        assert!(session.controller().edit_session().target_id.is_none());
    }

    #[test]
    fn save_without_text_sends_the_draft() {
        let transport = Scripted::default();
        let mut session = mounted(&transport);
        apply(&mut session, Command::Edit(4)).unwrap();
        apply(&mut session, Command::Draft("fourth".to_string())).unwrap();
        transport.reply(200, &item_json(4, "fourth", false)).reply(200, &page_json());

        apply(&mut session, Command::Save(None)).unwrap();
        assert_eq!(transport.seen.borrow()[2].body.as_deref(), Some(r#"{"text":"fourth"}"#));
    }

    #[test]
    fn draft_and_save_need_an_active_edit() {
        let transport = Scripted::default();
        let mut session = mounted(&transport);

        let err = apply(&mut session, Command::Draft("x".to_string())).unwrap_err();
        assert!(matches!(err, ActionError::NotEditing));
        let err = apply(&mut session, Command::Save(Some("x".to_string()))).unwrap_err();
        assert!(matches!(err, ActionError::NotEditing));
        assert_eq!(transport.seen.borrow().len(), 2);
    }

    #[test]
    fn failed_refresh_after_toggle_is_not_an_action_error() {
        let transport = Scripted::default();
        let mut session = mounted(&transport);
        transport.reply(200, &item_json(1, "item 1", true)).fail("down");

        apply(&mut session, Command::Toggle(1)).unwrap();
        assert_eq!(transport.last().method, HttpMethod::Get);
        let state = session.controller().state();
        assert!(state.items[0].completed);
        assert!(state.last_error.is_some());
    }

    #[test]
    fn store_errors_pass_through() {
        let transport = Scripted::default();
        let mut session = mounted(&transport);
        transport.reply(404, "");

        let err = apply(&mut session, Command::Delete(5)).unwrap_err();
        assert!(matches!(err, ActionError::Api(ApiError::NotFound)));
    }

    #[test]
    fn quit_stops_the_loop() {
        let transport = Scripted::default();
        let mut session = mounted(&transport);
        assert!(matches!(apply(&mut session, Command::Quit), Ok(Flow::Quit)));
        assert!(matches!(apply(&mut session, Command::Cancel), Ok(Flow::Continue)));
    }
}
