use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// A candidate executable name.
///
/// Only constructible through [`Word::parse`], so every `Word` holds at least
/// two characters and at least one alphanumeric character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Word(String);

impl Word {
    pub fn parse(text: &str) -> Option<Self> {
        Self::from_owned(text.to_string())
    }

    pub fn from_owned(text: String) -> Option<Self> {
        if is_valid_word(&text) {
            Some(Self(text))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for Word {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Word {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Word {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl TryFrom<String> for Word {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value.clone()).ok_or_else(|| format!("not a valid candidate word: {value:?}"))
    }
}

impl From<Word> for String {
    fn from(value: Word) -> Self {
        value.0
    }
}

pub fn is_valid_word(text: &str) -> bool {
    let mut chars = text.chars();
    if chars.next().is_none() || chars.next().is_none() {
        return false;
    }

    text.chars().any(|c| c.is_alphanumeric())
}
