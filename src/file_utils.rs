use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use log::warn;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Output path for a translated transcript
    // @params: input_file, output_dir, target_language
    pub fn transcript_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        target_language: &str,
    ) -> PathBuf {
        let stem = input_file.as_ref().file_stem().unwrap_or_default();
        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('_');
        output_filename.push_str(target_language);
        output_filename.push_str(".txt");
        output_dir.as_ref().join(output_filename)
    }

    /// Find files with one of the given extensions directly in a directory
    ///
    /// Non-matching entries are ignored. Results are sorted by file name so
    /// batch order is stable between runs.
    pub fn find_files<P: AsRef<Path>>(dir: P, extensions: &[String]) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        for entry in WalkDir::new(dir.as_ref()).max_depth(1).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(ext) = path.extension() {
                let ext = ext.to_string_lossy().to_lowercase();
                if extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)) {
                    result.push(path.to_path_buf());
                }
            }
        }
        result.sort();
        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }
        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;
        Ok(())
    }
}

/// One row of the directory-scan CSV export
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub full_path: String,
    pub parent_dir: String,
    pub name: String,
    pub ext: String,
    pub size_bytes: u64,
    pub mtime: String,
    pub ctime: String,
}

fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

/// Recursively collect file metadata rows under a root directory
///
/// Hidden files and directories are pruned unless `include_hidden`;
/// unreadable entries are skipped with a warning rather than failing the scan.
pub fn collect_file_records<P: AsRef<Path>>(
    root: P,
    include_hidden: bool,
) -> Result<Vec<FileRecord>> {
    let root = root.as_ref();
    if !FileManager::dir_exists(root) {
        anyhow::bail!("Not a directory: {:?}", root);
    }

    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(move |e| include_hidden || e.depth() == 0 || !is_hidden(e));

    let mut records = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                warn!("skipping {:?}: {}", path, e);
                continue;
            }
        };

        let mtime = metadata
            .modified()
            .map(format_timestamp)
            .unwrap_or_default();
        // Creation time is not available on every filesystem; fall back to mtime
        let ctime = metadata
            .created()
            .map(format_timestamp)
            .unwrap_or_else(|_| mtime.clone());

        records.push(FileRecord {
            full_path: path.display().to_string(),
            parent_dir: path
                .parent()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            name: entry.file_name().to_string_lossy().to_string(),
            ext: path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
                .unwrap_or_default(),
            size_bytes: metadata.len(),
            mtime,
            ctime,
        });
    }
    Ok(records)
}

/// Quote one CSV field if it contains a delimiter, quote, or newline
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Write the scan rows to a CSV file with a header row
pub fn write_records_csv<P: AsRef<Path>>(records: &[FileRecord], out_path: P) -> Result<()> {
    let out_path = out_path.as_ref();
    if let Some(parent) = out_path.parent() {
        FileManager::ensure_dir(parent)?;
    }

    let mut file = fs::File::create(out_path)
        .with_context(|| format!("Failed to create CSV file: {:?}", out_path))?;
    writeln!(file, "full_path,parent_dir,name,ext,size_bytes,mtime,ctime")?;
    for r in records {
        writeln!(
            file,
            "{},{},{},{},{},{},{}",
            csv_field(&r.full_path),
            csv_field(&r.parent_dir),
            csv_field(&r.name),
            csv_field(&r.ext),
            r.size_bytes,
            csv_field(&r.mtime),
            csv_field(&r.ctime),
        )?;
    }
    Ok(())
}

/// Leading-number sort key so `2_ko.txt` comes before `10_ko.txt`
fn numeric_sort_key(path: &Path) -> (u64, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let digits: String = stem.chars().take_while(|c| c.is_ascii_digit()).collect();
    (digits.parse().unwrap_or(u64::MAX), stem)
}

/// Concatenate produced transcripts into one file
///
/// Collects `*_<suffix>.txt` files in the directory, sorts numeric-aware, and
/// joins their trimmed contents with a separator line between documents (none
/// after the last). Unreadable files are logged and skipped.
pub fn merge_transcripts<P1: AsRef<Path>, P2: AsRef<Path>>(
    dir: P1,
    out_path: P2,
    suffix: &str,
) -> Result<usize> {
    let marker = format!("_{}.txt", suffix);
    let mut files: Vec<PathBuf> = fs::read_dir(dir.as_ref())
        .with_context(|| format!("Failed to read directory: {:?}", dir.as_ref()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.file_name()
                    .map(|n| n.to_string_lossy().ends_with(&marker))
                    .unwrap_or(false)
        })
        .collect();
    files.sort_by_key(|p| numeric_sort_key(p));

    let mut sections = Vec::new();
    for path in &files {
        match fs::read_to_string(path) {
            Ok(content) => sections.push(content.trim_end().to_string()),
            Err(e) => warn!("skipping {:?}: {}", path, e),
        }
    }

    FileManager::write_to_file(out_path, &sections.join("\n=======\n\n"))?;
    Ok(sections.len())
}
