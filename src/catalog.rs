//! Image discovery and grouping.
//!
//! A catalog maps a group name to the sorted image files belonging to it.
//! Without configured prefixes every image lands in a single group named by
//! the longest common prefix of all file names. With prefixes, each prefix
//! becomes a group holding the files whose names start with it.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

use crate::config::GalleryConfig;
use crate::error::{GalleryError, Result};

/// Extensions recognised as images, matched case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["gif", "jpg", "jpeg", "png"];

/// Group name -> file names in ascending order.
pub type Catalog = BTreeMap<String, Vec<String>>;

/// Fixed set of file extensions identifying an image.
#[derive(Debug, Clone, Copy)]
pub struct ExtensionSet {
    extensions: &'static [&'static str],
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self {
            extensions: IMAGE_EXTENSIONS,
        }
    }
}

impl ExtensionSet {
    pub fn extensions(&self) -> &'static [&'static str] {
        self.extensions
    }

    /// Whether `name` ends with `.` followed by `ext`, each letter of the
    /// extension compared without regard to case.
    pub fn has_extension(name: &str, ext: &str) -> bool {
        let name = name.as_bytes();
        let ext = ext.as_bytes();
        if name.len() <= ext.len() {
            return false;
        }
        let dot = name.len() - ext.len() - 1;
        name[dot] == b'.' && name[dot + 1..].eq_ignore_ascii_case(ext)
    }

    /// Whether `name` carries any of the recognised extensions.
    pub fn matches(&self, name: &str) -> bool {
        self.extensions
            .iter()
            .any(|ext| Self::has_extension(name, ext))
    }
}

/// List the image files directly inside `root`, sorted by name.
///
/// Hidden files (leading `.`) and directories are skipped, as are names that
/// are not valid UTF-8.
pub fn list_images(root: &Path, extensions: &ExtensionSet) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => tracing::debug!("Skipping non UTF-8 file name {:?}", raw),
        }
    }

    let mut files = Vec::new();
    for ext in extensions.extensions() {
        files.extend(
            names
                .iter()
                .filter(|name| !name.starts_with('.'))
                .filter(|name| ExtensionSet::has_extension(name, ext))
                .cloned(),
        );
    }
    files.sort();

    Ok(files)
}

/// Longest leading substring shared by every name.
///
/// Only the lexicographically smallest and largest names need comparing:
/// anything they share is shared by everything sorted between them.
pub fn common_prefix<S: AsRef<str>>(names: &[S]) -> String {
    let names: Vec<&str> = names.iter().map(|s| s.as_ref()).collect();
    let (Some(min), Some(max)) = (names.iter().min(), names.iter().max()) else {
        return String::new();
    };

    min.chars()
        .zip(max.chars())
        .take_while(|(a, b)| a == b)
        .map(|(a, _)| a)
        .collect()
}

/// Partition sorted `files` into groups.
///
/// Every configured prefix gets a group, empty when no file starts with it.
/// A file starting with several prefixes is listed under each of them.
pub fn build_catalog(files: Vec<String>, prefixes: &[String]) -> Catalog {
    let mut catalog = Catalog::new();

    if prefixes.is_empty() {
        let prefix = common_prefix(&files[..]);
        catalog.insert(prefix, files);
        return catalog;
    }

    for prefix in prefixes {
        let group = catalog.entry(prefix.clone()).or_default();
        group.extend(files.iter().filter(|f| f.starts_with(prefix.as_str())).cloned());
    }

    catalog
}

/// Scan the configured root and group its images.
pub fn load_catalog(config: &GalleryConfig) -> Result<Catalog> {
    let files = list_images(&config.root, &config.extensions)?;
    tracing::debug!("Found {} images in {}", files.len(), config.root.display());
    Ok(build_catalog(files, &config.prefixes))
}

/// Pick the newest image among `(name, timestamp)` pairs.
///
/// Ties on the timestamp go to the greater name so the choice is stable.
pub fn select_latest<I>(entries: I, extensions: &ExtensionSet) -> Option<String>
where
    I: IntoIterator<Item = (String, SystemTime)>,
{
    let mut entries: Vec<(String, SystemTime)> = entries.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));

    entries
        .into_iter()
        .map(|(name, _)| name)
        .find(|name| extensions.matches(name))
}

/// Name of the most recently created image in `root`.
///
/// Falls back to the modification time on filesystems that do not record a
/// creation time.
pub fn find_latest_image(root: &Path, extensions: &ExtensionSet) -> Result<String> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        if metadata.is_dir() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let timestamp = metadata.created().or_else(|_| metadata.modified())?;
        entries.push((name, timestamp));
    }

    select_latest(entries, extensions).ok_or(GalleryError::NoImages)
}
