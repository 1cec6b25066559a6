use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use anyhow::Context;

const EMBEDDED_HASH_PREFIX: &'static str = "# hash:";

/// Writes `new_content` to `file_path` behind a crc32 header line, leaving the
/// file untouched when its embedded hash already matches.
pub fn overwrite_on_diff(file_path: &Path, new_content: &str) -> anyhow::Result<FileWriteResult> {
    let new_content_hash = crc32fast::hash(new_content.as_bytes());

    if !file_path.exists() {
        let mut file = File::create_new(file_path)
            .with_context(|| format!("Unable to create file {}", file_path.display()))?;
        write_all_with_hash(&mut file, new_content, new_content_hash)
            .with_context(|| format!("Unable to write to file {}", file_path.display()))?;
        return Ok(FileWriteResult::Created);
    }

    if read_embedded_hash(file_path)? == Some(new_content_hash) {
        return Ok(FileWriteResult::NoChange);
    }

    let mut file = File::create(file_path)
        .with_context(|| format!("Unable to create or truncate file {}", file_path.display()))?;
    write_all_with_hash(&mut file, new_content, new_content_hash)
        .with_context(|| format!("Unable to write to file {}", file_path.display()))?;
    Ok(FileWriteResult::Overwritten)
}

fn read_embedded_hash(path: &Path) -> anyhow::Result<Option<u32>> {
    let file = File::open(path)
        .with_context(|| format!("Failed while trying to open {} in order to read hash", path.display()))?;
    let mut reader = BufReader::new(&file);
    let mut hash_line = String::new();
    reader
        .read_line(&mut hash_line)
        .with_context(|| format!("Failed while trying to read first line from {}", path.display()))?;

    Ok(hash_line
        .strip_prefix(EMBEDDED_HASH_PREFIX)
        .and_then(|hash| hash.trim_end().parse().ok()))
}

fn write_all_with_hash(file: &mut File, new_content: &str, hash: u32) -> std::io::Result<()> {
    let content_with_hash = format!("{}{}\n{}", EMBEDDED_HASH_PREFIX, hash, new_content);
    file.write_all(content_with_hash.as_bytes())
}

#[derive(Debug, PartialEq, Eq)]
pub enum FileWriteResult {
    Overwritten,
    NoChange,
    Created
}

impl FileWriteResult {
    pub fn log(&self, file_name: &str) {
        match &self {
            FileWriteResult::Created => tracing::info!("{} - created", file_name),
            FileWriteResult::NoChange => tracing::info!("{} - skipped (no change)", file_name),
            FileWriteResult::Overwritten => tracing::info!("{} - overwritten", file_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_unchanged_content() {
        let path = std::env::temp_dir().join(format!("graphql-governance-output-{}.graphql", std::process::id()));
        let _ = std::fs::remove_file(&path);

        assert_eq!(overwrite_on_diff(&path, "type Query {\n}\n").unwrap(), FileWriteResult::Created);
        assert_eq!(overwrite_on_diff(&path, "type Query {\n}\n").unwrap(), FileWriteResult::NoChange);
        assert_eq!(overwrite_on_diff(&path, "scalar uuid\n").unwrap(), FileWriteResult::Overwritten);

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, format!("# hash:{}\nscalar uuid\n", crc32fast::hash(b"scalar uuid\n")));
        std::fs::remove_file(&path).unwrap();
    }
}
