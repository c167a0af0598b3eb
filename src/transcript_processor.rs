/*!
 * Transcript text processing: sentence splitting, request-sized chunking,
 * script detection, and output document rendering.
 */

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::TranslationPolicy;

/// Characters scanned backwards from a forced cut looking for whitespace
const CHUNK_LOOKBACK: usize = 40;

/// Separator line wrapping the body of an output document
const DOCUMENT_SEPARATOR: &str = "=======";

/// Sentence boundary: terminal punctuation immediately followed by whitespace.
/// A heuristic: abbreviations, decimals and ellipses are not special-cased.
static SENTENCE_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").unwrap());

/// Split transcript text into ordered sentences
///
/// The terminal punctuation stays attached to its sentence; surrounding
/// whitespace is trimmed. Order is significant and preserved.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut last = 0;

    for boundary in SENTENCE_BOUNDARY.find_iter(text) {
        // The punctuation class is single-byte, so +1 lands on a char boundary
        let end = boundary.start() + 1;
        let sentence = text[last..end].trim();
        if !sentence.is_empty() {
            sentences.push(sentence.to_string());
        }
        last = boundary.end();
    }

    let tail = text[last..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}

/// Split one sentence into chunks of at most `max_chars` characters
///
/// The cut point prefers a whitespace character within the look-back window
/// so words are not severed; the whitespace stays at the end of the earlier
/// chunk, so concatenating the chunks always reconstructs the sentence
/// exactly.
pub fn split_chunks(sentence: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let chars: Vec<char> = sentence.chars().collect();
    if chars.len() <= max_chars {
        return vec![sentence.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let remaining = chars.len() - start;
        if remaining <= max_chars {
            chunks.push(chars[start..].iter().collect());
            break;
        }

        let hard_cut = start + max_chars;
        let floor = hard_cut.saturating_sub(CHUNK_LOOKBACK).max(start + 1);
        let cut = (floor..hard_cut)
            .rev()
            .find(|&i| chars[i].is_whitespace())
            .map(|ws| ws + 1)
            .unwrap_or(hard_cut);

        chunks.push(chars[start..cut].iter().collect());
        start = cut;
    }
    chunks
}

/// True if the text contains any Hangul (syllables, Jamo, or compatibility Jamo)
pub fn contains_hangul(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c,
            '\u{AC00}'..='\u{D7A3}'
            | '\u{1100}'..='\u{11FF}'
            | '\u{3130}'..='\u{318F}')
    })
}

/// True if the text contains any Latin alphabetic character
pub fn contains_latin(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_alphabetic())
}

/// Decide whether a line should be submitted for translation
pub fn needs_translation(line: &str, policy: TranslationPolicy) -> bool {
    match policy {
        TranslationPolicy::SkipTargetScript => !contains_hangul(line),
        TranslationPolicy::RequireSourceScript => contains_latin(line),
    }
}

/// One output line: the original sentence and its translation, if any
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedLine {
    pub original: String,
    /// None when the line passed through untranslated
    pub translation: Option<String>,
}

/// The rendered per-file output document
#[derive(Debug, Clone)]
pub struct TranscriptDocument {
    /// Original input file name, used as the header line
    pub source_name: String,
    pub lines: Vec<TranslatedLine>,
}

impl TranscriptDocument {
    pub fn new<P: AsRef<Path>>(source: P, lines: Vec<TranslatedLine>) -> Self {
        let source_name = source
            .as_ref()
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { source_name, lines }
    }

    /// Render the document: header, separator, original/translation line
    /// pairs in input order, closing separator
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.source_name);
        out.push('\n');
        out.push_str(DOCUMENT_SEPARATOR);
        out.push('\n');

        for line in &self.lines {
            out.push_str(&line.original);
            out.push('\n');
            if let Some(translation) = &line.translation {
                out.push_str("    → ");
                out.push_str(translation);
                out.push('\n');
            }
        }

        out.push_str(DOCUMENT_SEPARATOR);
        out.push('\n');
        out
    }
}
