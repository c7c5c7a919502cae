use crate::candidate_store::CandidateStore;
use crate::contract::RenderSnapshot;
use crate::model::Word;
use crate::navigation::NavigationCursor;

/// A key press already classified by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Char(char),
    Backspace,
    Previous,
    Next,
    Commit,
    Cancel,
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSignal {
    Continue,
    /// Carries the selected candidate, or `None` when the list was empty.
    Commit(Option<Word>),
    Cancel,
}

/// Query buffer, current suggestions and highlight for one launcher run.
///
/// The candidate list is recomputed from scratch on every buffer edit and
/// the cursor goes back to the top each time.
#[derive(Debug)]
pub struct InputSession<'a> {
    store: &'a CandidateStore,
    buffer: String,
    candidates: Vec<Word>,
    cursor: NavigationCursor,
    finished: Option<SessionSignal>,
}

impl<'a> InputSession<'a> {
    pub fn new(store: &'a CandidateStore, capacity: usize) -> Self {
        Self {
            store,
            buffer: String::new(),
            candidates: Vec::new(),
            cursor: NavigationCursor::new(capacity),
            finished: None,
        }
    }

    pub fn handle(&mut self, event: KeyEvent) -> SessionSignal {
        if let Some(signal) = &self.finished {
            return signal.clone();
        }

        match event {
            KeyEvent::Char(ch) if !ch.is_control() => {
                self.buffer.push(ch);
                self.refresh();
                SessionSignal::Continue
            }
            KeyEvent::Backspace => {
                if self.buffer.pop().is_some() {
                    self.refresh();
                }
                SessionSignal::Continue
            }
            KeyEvent::Previous => {
                self.cursor.move_previous(self.candidates.len());
                SessionSignal::Continue
            }
            KeyEvent::Next => {
                self.cursor.move_next(self.candidates.len());
                SessionSignal::Continue
            }
            KeyEvent::Commit => {
                let selected = self.candidates.get(self.cursor.selected()).cloned();
                self.finish(SessionSignal::Commit(selected))
            }
            KeyEvent::Cancel => self.finish(SessionSignal::Cancel),
            KeyEvent::Char(_) | KeyEvent::Unrecognized => SessionSignal::Continue,
        }
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            buffer: self.buffer.clone(),
            candidates: self.candidates.clone(),
            selected_index: self.cursor.selected(),
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn candidates(&self) -> &[Word] {
        &self.candidates
    }

    pub fn selected_index(&self) -> usize {
        self.cursor.selected()
    }

    pub fn capacity(&self) -> usize {
        self.cursor.capacity()
    }

    pub fn is_finished(&self) -> bool {
        self.finished.is_some()
    }

    fn refresh(&mut self) {
        self.candidates = self
            .store
            .best_matches(&self.buffer, self.cursor.capacity());
        self.cursor.reset();
    }

    fn finish(&mut self, signal: SessionSignal) -> SessionSignal {
        self.finished = Some(signal.clone());
        signal
    }
}
