use std::collections::BTreeMap;

use crate::model::Word;

const ROOT: usize = 0;

#[derive(Debug, Default, Clone)]
struct Node {
    terminal: bool,
    children: BTreeMap<char, usize>,
}

/// Prefix tree over candidate words.
///
/// Nodes live in a flat arena and refer to their children by index; the root
/// (empty prefix) is always slot 0. Nodes are never removed.
#[derive(Debug, Clone)]
pub struct PrefixIndex {
    nodes: Vec<Node>,
    words: usize,
}

impl Default for PrefixIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixIndex {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
            words: 0,
        }
    }

    pub fn insert(&mut self, word: &Word) {
        let mut current = ROOT;
        for ch in word.as_str().chars() {
            let existing = self.nodes[current].children.get(&ch).copied();
            current = match existing {
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[current].children.insert(ch, child);
                    child
                }
            };
        }

        let node = &mut self.nodes[current];
        if !node.terminal {
            node.terminal = true;
            self.words += 1;
        }
    }

    pub fn contains(&self, text: &str) -> bool {
        self.walk(text)
            .map(|index| self.nodes[index].terminal)
            .unwrap_or(false)
    }

    /// Every stored word starting with `prefix`, in ascending character order
    /// along each branch. Empty when no stored word has the prefix.
    pub fn matches_with_prefix(&self, prefix: &str) -> Vec<Word> {
        let Some(start) = self.walk(prefix) else {
            return Vec::new();
        };

        let mut matches = Vec::new();
        let mut stack: Vec<(usize, String)> = vec![(start, prefix.to_string())];
        while let Some((index, path)) = stack.pop() {
            let node = &self.nodes[index];
            // Reverse push keeps the pop order ascending.
            for (&ch, &child) in node.children.iter().rev() {
                let mut next = path.clone();
                next.push(ch);
                stack.push((child, next));
            }
            if node.terminal {
                if let Some(word) = Word::from_owned(path) {
                    matches.push(word);
                }
            }
        }

        matches
    }

    pub fn len(&self) -> usize {
        self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn walk(&self, prefix: &str) -> Option<usize> {
        let mut current = ROOT;
        for ch in prefix.chars() {
            current = *self.nodes[current].children.get(&ch)?;
        }
        Some(current)
    }
}
