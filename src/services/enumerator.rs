use crate::error::{Result, SyncError};
use crate::types::{InputConfig, InputSelection};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

const MARKDOWN_EXTENSION: &str = ".md";

pub struct InputEnumerator;

impl InputEnumerator {
    /// Resolves the files to publish, in the order they should be processed.
    pub fn enumerate(input: &InputConfig) -> Result<Vec<PathBuf>> {
        match &input.selection {
            InputSelection::SingleFile(file) => {
                let path = input.workspace.join(file);
                if !path.is_file() {
                    return Err(SyncError::FileNotFound {
                        path: path.display().to_string(),
                    });
                }
                info!("Publishing single file: {}", path.display());
                Ok(vec![path])
            }
            InputSelection::Directory(dir) => {
                let root = input.workspace.join(dir);
                Self::scan_directory(&root, &input.exclude_files)
            }
        }
    }

    fn scan_directory(root: &Path, exclude_files: &[String]) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(SyncError::InputDirectory {
                reason: format!("{} is not a directory", root.display()),
            });
        }

        info!("Scanning {} for markdown files", root.display());

        let excluded: HashSet<&str> = exclude_files.iter().map(String::as_str).collect();
        let mut files = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            // Directory links are not followed, but linked files are published.
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }

            let Some(name) = entry.file_name().to_str() else {
                debug!("Skipping non UTF-8 file name: {}", entry.path().display());
                continue;
            };

            if !name.ends_with(MARKDOWN_EXTENSION) {
                continue;
            }

            if excluded.contains(name) {
                debug!("Excluded: {}", entry.path().display());
                continue;
            }

            files.push(entry.into_path());
        }

        info!("Found {} markdown files", files.len());
        Ok(files)
    }
}
