use std::io::{BufReader, Cursor, Read};

use rex_core::action_executor::RecordingSink;
use rex_core::candidate_store::CandidateStore;
use rex_core::contract::{RenderSnapshot, SessionOutcome};
use rex_core::keys::decode_line;
use rex_core::render::RenderSink;
use rex_core::runtime::{drive_session, run_key_script, RuntimeError};
use rex_core::session::{InputSession, KeyEvent, SessionSignal};

#[derive(Default)]
struct CollectingRenderer {
    frames: Vec<RenderSnapshot>,
    outcome: Option<SessionOutcome>,
}

impl RenderSink for CollectingRenderer {
    fn render(&mut self, snapshot: &RenderSnapshot) {
        self.frames.push(snapshot.clone());
    }

    fn finish(&mut self, outcome: &SessionOutcome) {
        self.outcome = Some(outcome.clone());
    }
}

fn scenario_store() -> CandidateStore {
    CandidateStore::from_words(["find", "finger", "fish", "cat"])
}

fn type_text(session: &mut InputSession<'_>, text: &str) {
    for ch in text.chars() {
        assert_eq!(session.handle(KeyEvent::Char(ch)), SessionSignal::Continue);
    }
}

#[test]
fn navigation_on_empty_list_is_noop() {
    let store = scenario_store();
    let mut session = InputSession::new(&store, 4);

    session.handle(KeyEvent::Next);
    assert_eq!(session.selected_index(), 0);
    session.handle(KeyEvent::Previous);
    assert_eq!(session.selected_index(), 0);
    assert!(session.candidates().is_empty());
}

#[test]
fn commit_with_empty_list_invokes_nothing() {
    let store = scenario_store();
    let mut renderer = CollectingRenderer::default();
    let mut sink = RecordingSink::default();

    let events = [KeyEvent::Char('q'), KeyEvent::Commit];
    let outcome = drive_session(&store, 4, events, &mut renderer, &mut sink);

    assert_eq!(outcome, SessionOutcome::CommittedEmpty);
    assert!(sink.invocations.is_empty());
}

#[test]
fn commit_invokes_selected_candidate_with_no_args() {
    let store = scenario_store();
    let mut renderer = CollectingRenderer::default();
    let mut sink = RecordingSink::default();

    let events: Vec<KeyEvent> = ["fi", "<down>", "<down>", "<enter>"]
        .iter()
        .flat_map(|line| decode_line(line))
        .collect();
    let outcome = drive_session(&store, 4, events, &mut renderer, &mut sink);

    assert_eq!(sink.invocations.len(), 1);
    assert_eq!(sink.invocations[0].0, "finger");
    assert!(sink.invocations[0].1.is_empty());
    assert!(matches!(outcome, SessionOutcome::Launched { ref program } if program == "finger"));
    assert_eq!(renderer.outcome, Some(outcome));
}

#[test]
fn renders_initial_state_and_every_non_terminal_event() {
    let store = scenario_store();
    let mut renderer = CollectingRenderer::default();
    let mut sink = RecordingSink::default();

    let events = [
        KeyEvent::Char('c'),
        KeyEvent::Unrecognized,
        KeyEvent::Backspace,
        KeyEvent::Cancel,
        KeyEvent::Char('x'),
    ];
    let outcome = drive_session(&store, 4, events, &mut renderer, &mut sink);

    assert_eq!(outcome, SessionOutcome::Cancelled);
    assert_eq!(renderer.frames.len(), 4);
    assert_eq!(renderer.frames[0].buffer, "");
    assert_eq!(renderer.frames[1].candidates, vec!["cat"]);
    assert_eq!(renderer.frames[2], renderer.frames[1]);
    assert!(renderer.frames[3].candidates.is_empty());
    assert!(sink.invocations.is_empty());
}

#[test]
fn running_out_of_input_ends_without_invocation() {
    let store = scenario_store();
    let mut renderer = CollectingRenderer::default();
    let mut sink = RecordingSink::default();

    let outcome = drive_session(&store, 4, [KeyEvent::Char('f')], &mut renderer, &mut sink);

    assert_eq!(outcome, SessionOutcome::InputClosed);
    assert!(sink.invocations.is_empty());
}

#[test]
fn capacity_caps_list_and_wraps_navigation() {
    let store = CandidateStore::from_words(["aa1", "aa2", "aa3", "aa4", "aa5", "aa6"]);
    let mut session = InputSession::new(&store, 4);
    type_text(&mut session, "aa");
    assert_eq!(session.candidates().len(), 4);

    for _ in 0..3 {
        session.handle(KeyEvent::Next);
    }
    assert_eq!(session.selected_index(), 3);
    session.handle(KeyEvent::Next);
    assert_eq!(session.selected_index(), 0);

    session.handle(KeyEvent::Previous);
    assert_eq!(session.selected_index(), 3);
}

#[test]
fn short_list_wraps_at_its_own_end() {
    let store = CandidateStore::from_words(["vim", "vimdiff", "cat"]);
    let mut session = InputSession::new(&store, 4);
    type_text(&mut session, "vi");
    assert_eq!(session.candidates(), &["vim", "vimdiff"]);

    session.handle(KeyEvent::Next);
    assert_eq!(session.selected_index(), 1);
    session.handle(KeyEvent::Next);
    assert_eq!(session.selected_index(), 0);
    session.handle(KeyEvent::Previous);
    assert_eq!(session.selected_index(), 1);
}

#[test]
fn backspace_recomputes_from_shorter_buffer() {
    let store = scenario_store();
    let mut session = InputSession::new(&store, 4);
    type_text(&mut session, "fig");
    assert_eq!(session.candidates(), &["finger"]);

    session.handle(KeyEvent::Backspace);
    assert_eq!(session.buffer(), "fi");
    assert_eq!(session.candidates().len(), 3);
    assert_eq!(session.selected_index(), 0);

    session.handle(KeyEvent::Backspace);
    session.handle(KeyEvent::Backspace);
    assert!(session.buffer().is_empty());
    assert!(session.candidates().is_empty());
}

struct FailingInput;

impl Read for FailingInput {
    fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "device went away"))
    }
}

#[test]
fn invalid_utf8_line_still_reaches_commit() {
    let store = CandidateStore::from_words(["vim", "vi-tool"]);
    let mut renderer = CollectingRenderer::default();
    let mut sink = RecordingSink::default();

    let input = Cursor::new(b"vi\n\xff\n<bs>\n<enter>\n".to_vec());
    let outcome = run_key_script(&store, 4, input, &mut renderer, &mut sink).unwrap();

    assert!(matches!(outcome, SessionOutcome::Launched { ref program } if program == "vim"));
    assert_eq!(sink.invocations.len(), 1);
}

#[test]
fn read_failure_is_returned_as_io_error() {
    let store = scenario_store();
    let mut renderer = CollectingRenderer::default();
    let mut sink = RecordingSink::default();

    let result = run_key_script(
        &store,
        4,
        BufReader::new(FailingInput),
        &mut renderer,
        &mut sink,
    );

    assert!(matches!(result, Err(RuntimeError::Io(_))));
    assert_eq!(renderer.outcome, Some(SessionOutcome::InputClosed));
    assert!(sink.invocations.is_empty());
}
