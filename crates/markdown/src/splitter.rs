//! Markdown-aware chunking.
//!
//! Files are first cut at `#`, `##` and `###` headers, then each section is
//! split recursively on progressively finer separators until every piece fits
//! the chunk size. Lengths are counted in characters.

use hrchat::{
    constants::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE},
    types::{Document, DocumentMetadata},
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::warn;

/// Separators tried in order, from paragraph breaks down to single characters.
pub const DEFAULT_SEPARATORS: [&str; 7] = ["\n\n", "\n", ". ", "? ", "! ", " ", ""];

const HEADERS: [(&str, HeaderLevel); 3] = [
    ("###", HeaderLevel::Sub),
    ("##", HeaderLevel::Main),
    ("#", HeaderLevel::Title),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum HeaderLevel {
    Title = 1,
    Main = 2,
    Sub = 3,
}

fn parse_header(line: &str) -> Option<(HeaderLevel, &str)> {
    HEADERS.iter().find_map(|(marker, level)| {
        let rest = line.strip_prefix(marker)?;
        (rest.is_empty() || rest.starts_with(' ')).then(|| (*level, rest.trim()))
    })
}

/// Splits markdown into one document per header section.
///
/// Header lines stay in the section text. Each section records the enclosing
/// `#`, `##` and `###` headers in its metadata. Lines inside fenced code
/// blocks are never treated as headers.
pub fn split_by_headers(text: &str) -> Vec<Document> {
    let mut sections = Vec::new();
    let mut current = DocumentMetadata::default();
    let mut lines: Vec<&str> = Vec::new();
    let mut in_fence = false;

    fn flush(sections: &mut Vec<Document>, lines: &mut Vec<&str>, metadata: &DocumentMetadata) {
        let content = lines.join("\n");
        let content = content.trim();
        if !content.is_empty() {
            sections.push(Document {
                page_content: content.to_string(),
                metadata: metadata.clone(),
            });
        }
        lines.clear();
    }

    for raw in text.lines() {
        let line = raw.trim_end();
        let stripped = line.trim_start();
        if stripped.starts_with("```") || stripped.starts_with("~~~") {
            in_fence = !in_fence;
        }

        if !in_fence {
            if let Some((level, name)) = parse_header(stripped) {
                flush(&mut sections, &mut lines, &current);
                let name = Some(name.to_string());
                match level {
                    HeaderLevel::Title => {
                        current.doc_title = name;
                        current.main_category = None;
                        current.sub_category = None;
                    }
                    HeaderLevel::Main => {
                        current.main_category = name;
                        current.sub_category = None;
                    }
                    HeaderLevel::Sub => current.sub_category = name,
                }
            }
        }
        lines.push(line);
    }
    flush(&mut sections, &mut lines, &current);
    sections
}

/// A recursive character splitter with overlapping chunks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecursiveCharacterSplitter {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub separators: Vec<String>,
}

impl Default for RecursiveCharacterSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

impl RecursiveCharacterSplitter {
    /// The overlap is capped below the chunk size.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }

    /// Splits every document, copying its metadata onto each chunk.
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Document> {
        documents
            .iter()
            .flat_map(|doc| {
                self.split_text(&doc.page_content)
                    .into_iter()
                    .map(|chunk| Document {
                        page_content: chunk,
                        metadata: doc.metadata.clone(),
                    })
            })
            .collect()
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut chunks = Vec::new();

        let mut separator = separators.last().map(String::as_str).unwrap_or("");
        let mut finer: &[String] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = "";
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate.as_str();
                finer = &separators[i + 1..];
                break;
            }
        }

        let mut fitting: Vec<String> = Vec::new();
        for piece in split_keeping_separator(text, separator) {
            if char_len(&piece) < self.chunk_size {
                fitting.push(piece);
                continue;
            }
            if !fitting.is_empty() {
                chunks.extend(self.merge(&fitting));
                fitting.clear();
            }
            if finer.is_empty() {
                chunks.push(piece);
            } else {
                chunks.extend(self.split_recursive(&piece, finer));
            }
        }
        if !fitting.is_empty() {
            chunks.extend(self.merge(&fitting));
        }
        chunks
    }

    /// Greedily packs pieces into chunks, carrying up to `chunk_overlap`
    /// characters of trailing pieces into the next chunk.
    fn merge(&self, pieces: &[String]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0;

        for piece in pieces {
            let len = char_len(piece);
            if total + len > self.chunk_size {
                if total > self.chunk_size {
                    warn!(
                        "Created a chunk of size {}, which is longer than the specified {}",
                        total, self.chunk_size
                    );
                }
                if !window.is_empty() {
                    push_chunk(&mut chunks, &window);
                    while total > self.chunk_overlap
                        || (total + len > self.chunk_size && total > 0)
                    {
                        match window.pop_front() {
                            Some(front) => total -= char_len(front),
                            None => break,
                        }
                    }
                }
            }
            window.push_back(piece);
            total += len;
        }
        if !window.is_empty() {
            push_chunk(&mut chunks, &window);
        }
        chunks
    }
}

fn push_chunk(chunks: &mut Vec<String>, window: &VecDeque<&str>) {
    let joined: String = window.iter().copied().collect();
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

/// Splits on `separator`, re-attaching it to the start of every following piece.
/// An empty separator splits into single characters.
fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(String::from).collect();
    }
    let mut parts = text.split(separator);
    let mut pieces: Vec<String> = parts.next().map(String::from).into_iter().collect();
    pieces.extend(parts.map(|p| format!("{separator}{p}")));
    pieces.retain(|p| !p.is_empty());
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY: &str = "# 휴가정책\n\n## 연차\n입사 1년 후 15일.\n\n### 반차\n4시간 단위.\n\n## 경조사\n결혼 5일.";

    #[test]
    fn headers_become_metadata_and_stay_in_text() {
        let sections = split_by_headers(POLICY);
        assert_eq!(sections.len(), 4);

        assert_eq!(sections[0].page_content, "# 휴가정책");
        assert_eq!(sections[1].page_content, "## 연차\n입사 1년 후 15일.");
        assert_eq!(sections[1].metadata.doc_title.as_deref(), Some("휴가정책"));
        assert_eq!(sections[1].metadata.main_category.as_deref(), Some("연차"));
        assert_eq!(sections[2].metadata.sub_category.as_deref(), Some("반차"));

        // A new `##` clears the `###` below it.
        assert_eq!(sections[3].metadata.main_category.as_deref(), Some("경조사"));
        assert_eq!(sections[3].metadata.sub_category, None);
    }

    #[test]
    fn deeper_headers_and_code_fences_are_content() {
        let text = "## 장비\n#### 노트북\n```sh\n# not a header\n```";
        let sections = split_by_headers(text);
        assert_eq!(sections.len(), 1);
        assert!(sections[0].page_content.contains("# not a header"));
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let splitter = RecursiveCharacterSplitter::default();
        assert_eq!(splitter.split_text("  연차는 15일입니다.  "), vec!["연차는 15일입니다."]);
        assert!(splitter.split_text("   ").is_empty());
    }

    #[test]
    fn chunks_respect_size_in_characters_and_overlap() {
        let splitter = RecursiveCharacterSplitter::new(10, 4);
        let chunks = splitter.split_text("가나 다라 마바 사아 자차 카타 파하");
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 10, "chunk too long: {chunk}");
        }
        // Consecutive chunks share their boundary words.
        assert!(chunks[1].starts_with(chunks[0].split(' ').last().unwrap()));
    }

    #[test]
    fn paragraphs_are_preferred_boundaries() {
        let splitter = RecursiveCharacterSplitter::new(20, 0);
        let chunks = splitter.split_text("첫 번째 문단입니다.\n\n두 번째 문단입니다.");
        assert_eq!(chunks, vec!["첫 번째 문단입니다.", "두 번째 문단입니다."]);
    }

    #[test]
    fn unbreakable_text_falls_back_to_characters() {
        let splitter = RecursiveCharacterSplitter::new(3, 0);
        assert_eq!(splitter.split_text("가나다라마"), vec!["가나다", "라마"]);
    }
}
