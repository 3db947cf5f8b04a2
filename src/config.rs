//! Command line parsing and the validated gallery configuration.

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::catalog::ExtensionSet;
use crate::error::{GalleryError, Result};

/// URL path under which the images are served. Must end with a slash.
pub const IMAGES_URL: &str = "/images/";

pub const DEFAULT_PORT: u16 = 1235;

#[derive(Parser, Debug)]
#[command(name = "image-gallery")]
#[command(about = "Serve the images of a directory as a browsable gallery", long_about = None)]
pub struct Cli {
    /// Port to listen on
    #[arg(default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Group images by these file name prefixes instead of their common prefix
    pub prefixes: Vec<String>,

    /// Directory to serve (defaults to the current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Seconds the rendered page is cached for, 0 disables caching
    #[arg(long, default_value_t = 15)]
    pub cache_ttl: u64,
}

/// Everything a request needs to know about the gallery.
#[derive(Debug, Clone)]
pub struct GalleryConfig {
    /// Canonical directory the images are read from
    pub root: PathBuf,
    pub extensions: ExtensionSet,
    pub images_url: String,
    /// Sorted and de-duplicated, empty for automatic grouping
    pub prefixes: Vec<String>,
    pub cache_ttl: Duration,
}

impl GalleryConfig {
    pub fn new(root: PathBuf, prefixes: Vec<String>) -> Self {
        let mut prefixes = prefixes;
        prefixes.sort();
        prefixes.dedup();

        Self {
            root,
            extensions: ExtensionSet::default(),
            images_url: IMAGES_URL.to_string(),
            prefixes,
            cache_ttl: Duration::from_secs(15),
        }
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Build the configuration from parsed arguments, resolving and checking
    /// the root directory.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let root = match &cli.root {
            Some(root) => root.clone(),
            None => std::env::current_dir()?,
        };
        let root = validate_root(root)?;

        Ok(Self::new(root, cli.prefixes.clone())
            .with_cache_ttl(Duration::from_secs(cli.cache_ttl)))
    }

    /// Last component of the root, shown as the page title.
    pub fn root_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.root.display().to_string())
    }
}

fn validate_root(root: PathBuf) -> Result<PathBuf> {
    let canonical = root
        .canonicalize()
        .map_err(|e| GalleryError::InvalidRoot(format!("{}: {}", root.display(), e)))?;

    if !canonical.is_dir() {
        return Err(GalleryError::InvalidRoot(format!(
            "{} is not a directory",
            canonical.display()
        )));
    }

    // Fail at startup rather than on the first request.
    std::fs::read_dir(&canonical)
        .map_err(|e| GalleryError::InvalidRoot(format!("{}: {}", canonical.display(), e)))?;

    Ok(canonical)
}
