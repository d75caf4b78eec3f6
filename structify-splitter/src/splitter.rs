use structify_core::Chunk;
use thiserror::Error;

const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SplitterConfigError {
    #[error("chunk_size must be greater than zero")]
    ChunkSizeMustBeGreaterThanZero,
}

/// Splits text into chunks of at most `chunk_size` characters, preferring
/// natural boundaries (paragraph, line, sentence, word) and falling back to
/// raw character windows. Each chunk after the first starts with up to
/// `chunk_overlap` characters recycled from the end of the previous chunk.
///
/// Sizes are measured in `char`s, so multi-byte text never splits inside a
/// code point. Overlap at or above the chunk size is clamped to keep the
/// window advancing.
#[derive(Debug, Clone)]
pub struct RecursiveCharacterTextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

#[derive(Debug, Default)]
pub struct SplitterBuilder {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Option<Vec<String>>,
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
        self.separators = Some(separators);
        self
    }

    pub fn build(self) -> Result<RecursiveCharacterTextSplitter, SplitterConfigError> {
        if self.chunk_size == 0 {
            return Err(SplitterConfigError::ChunkSizeMustBeGreaterThanZero);
        }
        let chunk_overlap = self.chunk_overlap.min(self.chunk_size - 1);
        let separators = self.separators.unwrap_or_else(|| {
            DEFAULT_SEPARATORS.iter().map(|sep| sep.to_string()).collect()
        });
        Ok(RecursiveCharacterTextSplitter {
            chunk_size: self.chunk_size,
            chunk_overlap,
            separators,
        })
    }
}

impl RecursiveCharacterTextSplitter {
    pub fn builder() -> SplitterBuilder {
        SplitterBuilder::default()
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

    pub fn split_chunks(&self, text: &str) -> Vec<Chunk> {
        self.split_text(text).into_iter().map(Chunk::from).collect()
    }

    /// Break `text` into pieces no longer than `chunk_size`, trying each
    /// separator in priority order and keeping separators attached to the
    /// piece they terminate.
    fn fragment(&self, text: &str, separators: &[String]) -> Vec<String> {
        if text.chars().count() <= self.chunk_size {
            return vec![text.to_string()];
        }

        let Some((separator, rest)) = separators.split_first() else {
            return char_windows(text, self.chunk_size, self.chunk_overlap);
        };

        let pieces = split_keeping_separator(text, separator);
        if pieces.len() <= 1 {
            return self.fragment(text, rest);
        }

        let mut fragments = Vec::new();
        for piece in pieces {
            if piece.chars().count() <= self.chunk_size {
                fragments.push(piece);
            } else {
                fragments.extend(self.fragment(&piece, rest));
            }
        }
        fragments
    }

    /// Greedily pack fragments into chunks, seeding each new chunk with the
    /// overlap tail of the one before it. The tail shrinks when the next
    /// fragment would not fit beside it, so chunks never exceed `chunk_size`.
    fn merge(&self, fragments: Vec<String>) -> Vec<String> {
        let mut chunks: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;

        for fragment in fragments {
            let fragment_len = fragment.chars().count();
            if current_len > 0 && current_len + fragment_len > self.chunk_size {
                let tail_len = self
                    .chunk_overlap
                    .min(self.chunk_size.saturating_sub(fragment_len));
                let tail = char_tail(&current, tail_len);
                chunks.push(current);
                current_len = tail.chars().count();
                current = tail;
            }
            current.push_str(&fragment);
            current_len += fragment_len;
        }

        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }
}

fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return vec![text.to_string()];
    }
    let mut pieces = Vec::new();
    let mut rest = text;
    while let Some(index) = rest.find(separator) {
        let end = index + separator.len();
        pieces.push(rest[..end].to_string());
        rest = &rest[end..];
    }
    if !rest.is_empty() {
        pieces.push(rest.to_string());
    }
    pieces
}

fn char_tail(text: &str, len: usize) -> String {
    if len == 0 {
        return String::new();
    }
    let total = text.chars().count();
    text.chars().skip(total.saturating_sub(len)).collect()
}

fn char_windows(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let step = (chunk_size - overlap.min(chunk_size - 1)).max(1);

    let mut windows = Vec::new();
    let mut start = 0usize;
    while start < chars.len() {
        let end = usize::min(start + chunk_size, chars.len());
        windows.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }
    windows
}
