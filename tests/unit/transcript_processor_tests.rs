/*!
 * Tests for sentence splitting, chunking and document rendering
 */

use koscribe::app_config::TranslationPolicy;
use koscribe::transcript_processor::{
    contains_hangul, contains_latin, needs_translation, split_chunks, split_sentences,
    TranscriptDocument, TranslatedLine,
};

/// Test that sentences split on terminal punctuation followed by whitespace
#[test]
fn test_split_sentences_withNewlineBoundaries_shouldSplit() {
    let sentences = split_sentences("First sentence.\nSecond one! Third?");
    assert_eq!(sentences, vec!["First sentence.", "Second one!", "Third?"]);
}

/// Test that punctuation not followed by whitespace does not split
#[test]
fn test_split_sentences_withDecimalNumber_shouldNotSplitInside() {
    let sentences = split_sentences("Pi is 3.14 roughly. Yes.");
    assert_eq!(sentences, vec!["Pi is 3.14 roughly.", "Yes."]);
}

/// Test that empty input yields no sentences
#[test]
fn test_split_sentences_withWhitespaceOnly_shouldBeEmpty() {
    assert!(split_sentences("   \n  ").is_empty());
}

/// Test the chunk-length bound over a sweep of limits
#[test]
fn test_split_chunks_withVariousLimits_shouldBoundEveryChunk() {
    let sentence = "The quick brown fox jumps over the lazy dog again and again. ".repeat(30);
    for max_chars in [50, 100, 333, 1000, 1500] {
        let chunks = split_chunks(&sentence, max_chars);
        for chunk in &chunks {
            assert!(
                chunk.chars().count() <= max_chars,
                "chunk of {} chars exceeds limit {}",
                chunk.chars().count(),
                max_chars
            );
        }
        assert_eq!(chunks.concat(), sentence);
    }
}

/// Test that a sentence exactly at the limit stays a single chunk
#[test]
fn test_split_chunks_withExactLimitLength_shouldReturnSingleChunk() {
    let sentence = "a".repeat(100);
    let chunks = split_chunks(&sentence, 100);
    assert_eq!(chunks, vec![sentence]);
}

/// Test script detection over both alphabets
#[test]
fn test_script_detection_withEachScript_shouldMatchExpectations() {
    assert!(contains_hangul("안녕하세요"));
    assert!(!contains_hangul("hello"));
    assert!(contains_latin("hello"));
    assert!(!contains_latin("안녕 123"));
}

/// Test that the two policies disagree exactly on mixed-script lines
#[test]
fn test_needs_translation_withAllScriptCombinations_shouldFollowPolicy() {
    let latin_only = "Hello world.";
    let hangul_only = "안녕.";
    let mixed = "Hello 안녕.";
    let neither = "12345.";

    assert!(needs_translation(latin_only, TranslationPolicy::SkipTargetScript));
    assert!(needs_translation(latin_only, TranslationPolicy::RequireSourceScript));

    assert!(!needs_translation(hangul_only, TranslationPolicy::SkipTargetScript));
    assert!(!needs_translation(hangul_only, TranslationPolicy::RequireSourceScript));

    assert!(!needs_translation(mixed, TranslationPolicy::SkipTargetScript));
    assert!(needs_translation(mixed, TranslationPolicy::RequireSourceScript));

    assert!(needs_translation(neither, TranslationPolicy::SkipTargetScript));
    assert!(!needs_translation(neither, TranslationPolicy::RequireSourceScript));
}

/// Test that a document without translations renders bare lines
#[test]
fn test_render_withoutTranslations_shouldOmitArrowLines() {
    let doc = TranscriptDocument::new(
        "talk.mp3",
        vec![
            TranslatedLine {
                original: "첫 문장.".to_string(),
                translation: None,
            },
            TranslatedLine {
                original: "둘째 문장.".to_string(),
                translation: None,
            },
        ],
    );
    let rendered = doc.render();
    assert_eq!(rendered, "talk.mp3\n=======\n첫 문장.\n둘째 문장.\n=======\n");
    assert!(!rendered.contains('→'));
}

/// Test that the header uses only the file name, not the full path
#[test]
fn test_new_withFullPath_shouldUseFileNameAsHeader() {
    let doc = TranscriptDocument::new("/data/audio/lecture.wav", Vec::new());
    assert_eq!(doc.source_name, "lecture.wav");
}
