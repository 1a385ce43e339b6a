use std::collections::VecDeque;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SplitterConfigError {
    #[error("chunk_size must be greater than zero")]
    ChunkSizeMustBeGreaterThanZero,
    #[error("chunk_overlap must be smaller than chunk_size")]
    OverlapMustBeSmallerThanChunkSize,
}

/// Splits text on a recursive separator hierarchy (paragraph, then line,
/// then sentence, then word, then character) so that every produced chunk
/// stays within `chunk_size` characters wherever a natural break permits,
/// with up to `chunk_overlap` characters of repeated context between
/// consecutive chunks. Deterministic and side-effect free.
#[derive(Clone, Debug)]
pub struct RecursiveCharacterTextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct SplitterBuilder {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

fn default_separators() -> Vec<String> {
    ["\n\n", "\n", ". ", " ", ""]
        .into_iter()
        .map(str::to_string)
        .collect()
}

impl SplitterBuilder {
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn chunk_overlap(mut self, chunk_overlap: usize) -> Self {
        self.chunk_overlap = chunk_overlap;
        self
    }

    pub fn separators(mut self, separators: Vec<String>) -> Self {
        self.separators = separators;
        self
    }

    pub fn build(self) -> Result<RecursiveCharacterTextSplitter, SplitterConfigError> {
        if self.chunk_size == 0 {
            return Err(SplitterConfigError::ChunkSizeMustBeGreaterThanZero);
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(SplitterConfigError::OverlapMustBeSmallerThanChunkSize);
        }
        Ok(RecursiveCharacterTextSplitter {
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            separators: self.separators,
        })
    }
}

impl Default for RecursiveCharacterTextSplitter {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 500,
            separators: default_separators(),
        }
    }
}

impl RecursiveCharacterTextSplitter {
    pub fn builder() -> SplitterBuilder {
        SplitterBuilder {
            chunk_size: 1000,
            chunk_overlap: 500,
            separators: default_separators(),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        let fragments = self.fragment(text, &self.separators);
        self.merge(fragments)
    }

    /// Breaks `text` into fragments of at most `chunk_size` characters,
    /// descending the separator hierarchy only where a piece is still too
    /// large. Separators stay attached to the preceding piece so that the
    /// fragments concatenate back to the input.
    fn fragment(&self, text: &str, separators: &[String]) -> Vec<String> {
        if char_len(text) <= self.chunk_size {
            return vec![text.to_string()];
        }

        let (separator, rest) = match separators.split_first() {
            Some((first, rest)) => (first.as_str(), rest),
            None => ("", &[] as &[String]),
        };

        if separator.is_empty() {
            return self.char_windows(text);
        }
        if !text.contains(separator) {
            return self.fragment(text, rest);
        }

        let mut fragments = Vec::new();
        for part in split_keeping_separator(text, separator) {
            if char_len(&part) <= self.chunk_size {
                fragments.push(part);
            } else {
                fragments.extend(self.fragment(&part, rest));
            }
        }
        fragments
    }

    /// Last-resort character-level windows, stepping by
    /// `chunk_size - chunk_overlap` so consecutive windows share the
    /// configured overlap.
    fn char_windows(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let step = (self.chunk_size - self.chunk_overlap).max(1);
        let mut windows = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = usize::min(start + self.chunk_size, chars.len());
            windows.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start += step;
        }

        windows
    }

    /// Greedily packs fragments into chunks of at most `chunk_size`
    /// characters. When a chunk closes, trailing fragments totalling at most
    /// `chunk_overlap` characters are carried into the next chunk.
    fn merge(&self, fragments: Vec<String>) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<(String, usize)> = VecDeque::new();
        let mut total = 0usize;

        for fragment in fragments {
            let len = char_len(&fragment);
            if total + len > self.chunk_size && !window.is_empty() {
                chunks.push(concat_window(&window));
                while total > self.chunk_overlap
                    || (total + len > self.chunk_size && total > 0)
                {
                    match window.pop_front() {
                        Some((_, dropped)) => total -= dropped,
                        None => break,
                    }
                }
            }
            window.push_back((fragment, len));
            total += len;
        }

        if !window.is_empty() {
            chunks.push(concat_window(&window));
        }
        chunks
    }
}

fn concat_window(window: &VecDeque<(String, usize)>) -> String {
    window.iter().map(|(fragment, _)| fragment.as_str()).collect()
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut start = 0;

    while let Some(found) = text[start..].find(separator) {
        let end = start + found + separator.len();
        parts.push(text[start..end].to_string());
        start = end;
    }
    if start < text.len() {
        parts.push(text[start..].to_string());
    }
    parts
}
