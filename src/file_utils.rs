use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Prefix used for in-flight translation output, always in the target's directory
pub const TEMP_PREFIX: &str = ".tmp.";

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

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Sibling temporary path for a target file, derived deterministically
    /// from the target's filename so two different targets can never collide.
    pub fn pending_path<P: AsRef<Path>>(target: P) -> PathBuf {
        let target = target.as_ref();
        let filename = target
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let temp_name = format!("{}{}", TEMP_PREFIX, filename);

        match target.parent() {
            Some(parent) => parent.join(temp_name),
            None => PathBuf::from(temp_name),
        }
    }

    /// Replace `target` with `source` in one filesystem rename.
    ///
    /// Both paths must live in the same directory; the rename is then
    /// all-or-nothing, so `target` is never observable in a half-written state.
    pub fn atomic_replace<P1: AsRef<Path>, P2: AsRef<Path>>(source: P1, target: P2) -> Result<()> {
        fs::rename(&source, &target).with_context(|| {
            format!(
                "Failed to replace {:?} with {:?}",
                target.as_ref(),
                source.as_ref()
            )
        })
    }

    /// Best-effort removal of a leftover file; never fails, never masks the
    /// error that made the file a leftover in the first place.
    pub fn remove_quietly<P: AsRef<Path>>(path: P) {
        let path = path.as_ref();
        if path.exists() {
            if let Err(e) = fs::remove_file(path) {
                debug!("Could not remove leftover file {:?}: {}", path, e);
            }
        }
    }

    /// Find files with a specific extension in a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = if extension.starts_with('.') {
            extension.to_string()
        } else {
            format!(".{}", extension)
        };

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            // Skip in-flight output and other dotfiles (record database included)
            if path
                .file_name()
                .map(|name| name.to_string_lossy().starts_with('.'))
                .unwrap_or(false)
            {
                continue;
            }

            if let Some(ext) = path.extension() {
                if ext.to_string_lossy().eq_ignore_ascii_case(&normalized_ext[1..]) {
                    result.push(path.to_path_buf());
                }
            }
        }

        Ok(result)
    }
}
