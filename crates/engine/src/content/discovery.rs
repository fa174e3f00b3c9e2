use std::fs;
use std::path::{Path, PathBuf};

use super::compiler::{ContentErrorCode, LevelLoadError};

/// Level files directly under `levels_dir`, sorted by file name.
pub fn discover_levels(levels_dir: &Path) -> Result<Vec<PathBuf>, LevelLoadError> {
    let read_error = |message: String| LevelLoadError {
        code: ContentErrorCode::ReadFile,
        message,
        file_path: levels_dir.to_path_buf(),
        location: None,
    };

    let entries = fs::read_dir(levels_dir)
        .map_err(|source| read_error(format!("failed to read levels directory: {source}")))?;

    let mut levels = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|source| read_error(format!("failed to read directory entry: {source}")))?;
        let path = entry.path();
        if path.is_file() && is_xml_file(&path) {
            levels.push(path);
        }
    }
    levels.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(levels)
}

fn is_xml_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn levels_are_sorted_and_filtered() {
        let temp = TempDir::new().expect("temp");
        fs::write(temp.path().join("level_02.xml"), "<Level/>").expect("write");
        fs::write(temp.path().join("level_01.XML"), "<Level/>").expect("write");
        fs::write(temp.path().join("notes.txt"), "skip").expect("write");
        fs::create_dir_all(temp.path().join("nested.xml")).expect("dir");

        let levels = discover_levels(temp.path()).expect("levels");
        let names = levels
            .iter()
            .filter_map(|path| path.file_name().and_then(|name| name.to_str()))
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["level_01.XML", "level_02.xml"]);
    }

    #[test]
    fn missing_directory_is_read_error() {
        let temp = TempDir::new().expect("temp");
        let err = discover_levels(&temp.path().join("missing")).expect_err("err");
        assert_eq!(err.code, ContentErrorCode::ReadFile);
    }
}
