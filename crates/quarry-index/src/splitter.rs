//! Paragraph-aware text splitting with overlap.

/// Splits text into chunks of at most `chunk_size` characters, preferring
/// paragraph boundaries and seeding each chunk with up to `chunk_overlap`
/// characters of trailing context from the previous one.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self::new(1000, 200)
    }
}

impl TextSplitter {
    #[must_use]
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size / 2),
        }
    }

    #[must_use]
    pub fn split(&self, text: &str) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        if text.chars().count() <= self.chunk_size {
            return vec![text.to_string()];
        }

        let mut segments = Vec::new();
        for paragraph in text.split("\n\n") {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }
            if paragraph.chars().count() <= self.chunk_size {
                segments.push(paragraph.to_string());
            } else {
                segments.extend(hard_split(paragraph, self.chunk_size));
            }
        }

        let mut chunks = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut current_len = 0usize;
        for segment in segments {
            let segment_len = segment.chars().count();
            let separator = if current.is_empty() { 0 } else { 2 };
            if !current.is_empty() && current_len + separator + segment_len > self.chunk_size {
                chunks.push(current.join("\n\n"));
                let (kept, kept_len) = self.overlap_tail(&current);
                // Drop the overlap when it would not leave room for the
                // incoming segment.
                if kept_len + 2 + segment_len > self.chunk_size {
                    current = Vec::new();
                    current_len = 0;
                } else {
                    current = kept;
                    current_len = kept_len;
                }
            }
            if !current.is_empty() {
                current_len += 2;
            }
            current_len += segment_len;
            current.push(segment);
        }
        if !current.is_empty() {
            chunks.push(current.join("\n\n"));
        }
        chunks
    }

    /// Trailing whole segments of the finished chunk that fit within the
    /// overlap budget, in original order.
    fn overlap_tail(&self, finished: &[String]) -> (Vec<String>, usize) {
        let mut kept = Vec::new();
        let mut kept_len = 0usize;
        for segment in finished.iter().rev() {
            let segment_len = segment.chars().count();
            let separator = if kept.is_empty() { 0 } else { 2 };
            if kept_len + separator + segment_len > self.chunk_overlap {
                break;
            }
            kept_len += separator + segment_len;
            kept.push(segment.clone());
        }
        kept.reverse();
        (kept, kept_len)
    }
}

fn hard_split(text: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars.chunks(size).map(|c| c.iter().collect()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_a_single_chunk() {
        let splitter = TextSplitter::default();
        assert_eq!(splitter.split("hello world"), vec!["hello world"]);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        let splitter = TextSplitter::default();
        assert!(splitter.split("   \n\n  ").is_empty());
    }

    #[test]
    fn paragraphs_are_packed_up_to_the_limit() {
        let splitter = TextSplitter::new(25, 0);
        let chunks = splitter.split("aaaa\n\nbbbb\n\ncccc\n\ndddddddddddddddddddd");
        assert_eq!(chunks, vec!["aaaa\n\nbbbb\n\ncccc", "dddddddddddddddddddd"]);
    }

    #[test]
    fn oversize_paragraph_is_hard_split() {
        let splitter = TextSplitter::new(10, 0);
        let chunks = splitter.split(&"x".repeat(25));
        assert_eq!(chunks, vec!["x".repeat(10), "x".repeat(10), "x".repeat(5)]);
    }

    #[test]
    fn overlap_repeats_trailing_segment() {
        let splitter = TextSplitter::new(20, 8);
        let chunks = splitter.split("aaaaaaaa\n\nbbbb\n\ncccccccc");
        assert_eq!(chunks.len(), 2);
        assert!(chunks[1].starts_with("bbbb"));
        assert!(chunks[1].ends_with("cccccccc"));
    }

    #[test]
    fn every_chunk_respects_the_size_limit() {
        let splitter = TextSplitter::new(50, 10);
        let text = "para one is here\n\n".repeat(20);
        for chunk in splitter.split(&text) {
            assert!(chunk.chars().count() <= 50, "chunk too long: {chunk:?}");
        }
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let splitter = TextSplitter::new(4, 0);
        let chunks = splitter.split("ééééééééé");
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], "éééé");
    }
}
