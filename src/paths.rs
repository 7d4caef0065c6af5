// Path arguments — validated while the command line is parsed.
//
// These are used as clap `value_parser`s, so a bad path is reported as a
// usage error before any work starts.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Accept an existing directory.
pub fn existing_dir(arg: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(arg);
    if !path.is_dir() {
        return Err(format!(
            "The path given {arg} is not a directory. Require a file path to a directory."
        ));
    }
    Ok(path)
}

/// Accept a directory, creating it (and its parents) if it does not exist.
/// An existing non-directory is rejected.
pub fn created_dir(arg: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(arg);
    if path.exists() {
        if !path.is_dir() {
            return Err(format!(
                "The path given {arg} is not a directory. Require a file path to a directory \
                 or to a directory that currently does not exist."
            ));
        }
    } else {
        std::fs::create_dir_all(&path)
            .map_err(|e| format!("Could not create directory {arg}: {e}"))?;
    }
    Ok(path)
}

/// Accept an existing path, resolved to an absolute path.
pub fn existing_file(arg: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(arg);
    if !path.exists() {
        return Err(format!("File {arg} does not exist"));
    }
    std::fs::canonicalize(&path).map_err(|e| format!("Could not resolve {arg}: {e}"))
}

/// Accept any path that is not an existing directory.
pub fn file_path(arg: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(arg);
    if path.is_dir() {
        return Err(format!("The path given {arg} cannot be a directory."));
    }
    Ok(path)
}

/// Regular files directly inside `dir`, sorted by name.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to list {}", dir.display()))?
            .path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let arg = tmp.path().to_str().unwrap();
        assert_eq!(existing_dir(arg).unwrap(), tmp.path());
        assert!(existing_dir(&format!("{arg}/missing")).is_err());
    }

    #[test]
    fn test_created_dir_makes_nested_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        let created = created_dir(nested.to_str().unwrap()).unwrap();
        assert!(created.is_dir());
    }

    #[test]
    fn test_created_dir_rejects_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("f.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(created_dir(file.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_file_path_rejects_directories() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(file_path(tmp.path().to_str().unwrap()).is_err());
        assert!(file_path(tmp.path().join("out.json").to_str().unwrap()).is_ok());
        assert!(existing_file(tmp.path().join("out.json").to_str().unwrap()).is_err());
    }

    #[test]
    fn test_existing_file_resolves_relative_paths() {
        // Tests run from the package root.
        let resolved = existing_file("Cargo.toml").unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("Cargo.toml"));
        assert_eq!(resolved, std::env::current_dir().unwrap().join("Cargo.toml"));
    }

    #[test]
    fn test_list_files_skips_directories_and_sorts() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("b.txt"), "b").unwrap();
        std::fs::write(tmp.path().join("a.txt"), "a").unwrap();
        std::fs::create_dir(tmp.path().join("sub")).unwrap();
        let files = list_files(tmp.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }
}
