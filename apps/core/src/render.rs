use std::io::Write;

use crate::contract::{RenderSnapshot, SessionOutcome};

/// Displays session state. Never feeds anything back into the session.
pub trait RenderSink {
    fn render(&mut self, snapshot: &RenderSnapshot);
    fn finish(&mut self, _outcome: &SessionOutcome) {}
}

pub fn format_text_frame(snapshot: &RenderSnapshot) -> String {
    let mut frame = format!("> {}\n", snapshot.buffer);
    for (index, candidate) in snapshot.candidates.iter().enumerate() {
        let marker = if index == snapshot.selected_index { '>' } else { ' ' };
        frame.push_str(&format!("  {marker} {candidate}\n"));
    }
    frame
}

pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for TextRenderer<W> {
    fn render(&mut self, snapshot: &RenderSnapshot) {
        let _ = self.out.write_all(format_text_frame(snapshot).as_bytes());
        let _ = self.out.flush();
    }
}

/// One JSON object per line: snapshots, then the outcome.
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_json<T: serde::Serialize>(&mut self, value: &T) {
        match serde_json::to_string(value) {
            Ok(line) => {
                let _ = writeln!(self.out, "{line}");
                let _ = self.out.flush();
            }
            Err(error) => crate::logging::error(&format!("render serialization failed: {error}")),
        }
    }
}

impl<W: Write> RenderSink for JsonRenderer<W> {
    fn render(&mut self, snapshot: &RenderSnapshot) {
        self.write_json(snapshot);
    }

    fn finish(&mut self, outcome: &SessionOutcome) {
        self.write_json(outcome);
    }
}
