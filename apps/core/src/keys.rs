use std::io::BufRead;

use crate::session::KeyEvent;

/// Reads the key script line by line. Bytes that are not UTF-8 are replaced
/// rather than ending the stream; genuine read failures are yielded once and
/// then the iterator stops.
pub struct KeyScript<R> {
    reader: R,
    buf: Vec<u8>,
    failed: bool,
}

impl<R: BufRead> KeyScript<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            failed: false,
        }
    }
}

impl<R: BufRead> Iterator for KeyScript<R> {
    type Item = std::io::Result<Vec<KeyEvent>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => Some(Ok(decode_line(&String::from_utf8_lossy(&self.buf)))),
            Err(error) => {
                self.failed = true;
                Some(Err(error))
            }
        }
    }
}

/// Decodes one line of the headless key script.
///
/// A line that is exactly a bracketed name (`<up>`, `<enter>`, ...) is a
/// single special key; anything else is typed text, one `Char` per character.
pub fn decode_line(line: &str) -> Vec<KeyEvent> {
    let line = line.trim_end_matches(['\r', '\n']);

    if let Some(name) = line.strip_prefix('<').and_then(|rest| rest.strip_suffix('>')) {
        if !name.is_empty() && !name.contains(['<', '>']) {
            return vec![decode_named(name)];
        }
    }

    line.chars().map(KeyEvent::Char).collect()
}

pub fn decode_named(name: &str) -> KeyEvent {
    match name.to_ascii_lowercase().as_str() {
        "bs" | "backspace" => KeyEvent::Backspace,
        "up" | "prev" | "previous" | "s-tab" => KeyEvent::Previous,
        "down" | "next" | "tab" => KeyEvent::Next,
        "enter" | "ret" | "return" => KeyEvent::Commit,
        "esc" | "escape" | "cancel" => KeyEvent::Cancel,
        "space" => KeyEvent::Char(' '),
        "lt" => KeyEvent::Char('<'),
        "gt" => KeyEvent::Char('>'),
        _ => KeyEvent::Unrecognized,
    }
}
