/*!
 * Tests for file utility functions, CSV export and transcript merging
 */

use std::fs;
use std::path::Path;

use anyhow::Result;
use koscribe::file_utils::{self, FileManager};

use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "content")?;

    assert!(FileManager::file_exists(&test_file));
    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that transcript_output_path appends the language suffix
#[test]
fn test_transcript_output_path_withValidInputs_shouldCreateCorrectPath() {
    let input_file = Path::new("/tmp/input/lecture01.wav");
    let output_dir = Path::new("/tmp/output");

    let output_path = FileManager::transcript_output_path(input_file, output_dir, "ko");

    assert_eq!(output_path, Path::new("/tmp/output/lecture01_ko.txt"));
}

/// Test that ensure_dir creates directories as needed
#[test]
fn test_ensure_dir_withNonExistentDir_shouldCreateDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_subdir = temp_dir.path().join("test_subdir");

    FileManager::ensure_dir(&test_subdir)?;

    assert!(test_subdir.exists());
    assert!(test_subdir.is_dir());
    Ok(())
}

/// Test that find_files filters by extension and sorts by name
#[test]
fn test_find_files_withMixedExtensions_shouldFilterAndSort() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "b.wav", "")?;
    common::create_test_file(temp_dir.path(), "a.WAV", "")?;
    common::create_test_file(temp_dir.path(), "c.mp3", "")?;
    common::create_test_file(temp_dir.path(), "notes.txt", "")?;

    let extensions = vec!["wav".to_string(), "mp3".to_string()];
    let found = FileManager::find_files(temp_dir.path(), &extensions)?;

    let names: Vec<String> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.WAV", "b.wav", "c.mp3"]);
    Ok(())
}

/// Test that the scan excludes hidden entries by default
#[test]
fn test_collect_file_records_withHiddenEntries_shouldExcludeThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "visible.txt", "data")?;
    common::create_test_file(temp_dir.path(), ".hidden.txt", "data")?;
    let hidden_dir = temp_dir.path().join(".cache");
    fs::create_dir(&hidden_dir)?;
    common::create_test_file(&hidden_dir, "inner.txt", "data")?;

    let records = file_utils::collect_file_records(temp_dir.path(), false)?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "visible.txt");
    assert_eq!(records[0].ext, ".txt");
    assert_eq!(records[0].size_bytes, 4);

    let with_hidden = file_utils::collect_file_records(temp_dir.path(), true)?;
    assert_eq!(with_hidden.len(), 3);
    Ok(())
}

/// Test that the CSV export writes a header and quotes fields with commas
#[test]
fn test_write_records_csv_withCommaInName_shouldQuoteField() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "a,b.txt", "data")?;
    let out_path = temp_dir.path().join("scan.csv");

    let records = file_utils::collect_file_records(temp_dir.path(), false)?;
    file_utils::write_records_csv(&records, &out_path)?;

    let content = fs::read_to_string(&out_path)?;
    let mut lines = content.lines();
    assert_eq!(
        lines.next().unwrap(),
        "full_path,parent_dir,name,ext,size_bytes,mtime,ctime"
    );
    let row = lines.next().unwrap();
    assert!(row.contains("\"a,b.txt\""));
    Ok(())
}

/// Test that merging joins transcripts numerically with a separator line
#[test]
fn test_merge_transcripts_withNumberedFiles_shouldSortNumerically() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "10_ko.txt", "tenth\n")?;
    common::create_test_file(temp_dir.path(), "2_ko.txt", "second\n")?;
    common::create_test_file(temp_dir.path(), "ignored.txt", "other\n")?;
    let out_path = temp_dir.path().join("merged_output.txt");

    let merged = file_utils::merge_transcripts(temp_dir.path(), &out_path, "ko")?;

    assert_eq!(merged, 2);
    let content = fs::read_to_string(&out_path)?;
    assert_eq!(content, "second\n=======\n\ntenth");
    Ok(())
}
