//! Configuration Loader
//!
//! Layered `settings.json` loader (only the `.trimctx` folder is searched).
//!
//! ## Search priority
//!
//! 1. User-level: `~/.trimctx/settings.json`
//! 2. Project-level: `.trimctx/settings.json`
//! 3. Local (gitignored): `.trimctx/settings.local.json`
//!
//! Each level overrides the fields set by the previous ones.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use trimctx_foundation::{
    Error, Result, TrimConfig, CONFIG_DIR_NAME, LOCAL_SETTINGS_FILE, SETTINGS_FILE,
};

// ============================================================================
// ConfigLoader
// ============================================================================

/// Settings loader
pub struct ConfigLoader {
    search_paths: Vec<ConfigPath>,
}

/// One candidate settings file
#[derive(Debug, Clone)]
struct ConfigPath {
    path: PathBuf,
    /// Higher wins
    priority: u8,
    description: &'static str,
}

impl ConfigLoader {
    /// Loader with the default search paths
    pub fn new(working_dir: &Path) -> Self {
        let mut paths = Vec::new();

        if let Some(home) = dirs::home_dir() {
            paths.push(ConfigPath {
                path: home.join(CONFIG_DIR_NAME).join(SETTINGS_FILE),
                priority: 10,
                description: "User settings",
            });
        }

        paths.push(ConfigPath {
            path: working_dir.join(CONFIG_DIR_NAME).join(SETTINGS_FILE),
            priority: 20,
            description: "Project settings",
        });

        paths.push(ConfigPath {
            path: working_dir.join(CONFIG_DIR_NAME).join(LOCAL_SETTINGS_FILE),
            priority: 30,
            description: "Local settings",
        });

        paths.sort_by_key(|p| p.priority);

        Self {
            search_paths: paths,
        }
    }

    /// Loader over explicit paths, later paths winning
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        let search_paths = paths
            .into_iter()
            .enumerate()
            .map(|(i, path)| ConfigPath {
                path,
                priority: i.min(u8::MAX as usize) as u8,
                description: "Custom",
            })
            .collect();

        Self { search_paths }
    }

    /// Add a search path
    pub fn add_path(&mut self, path: PathBuf, priority: u8) {
        self.search_paths.push(ConfigPath {
            path,
            priority,
            description: "Added",
        });
        self.search_paths.sort_by_key(|p| p.priority);
    }

    /// Load and merge every existing file; unreadable files are skipped
    pub fn load_all(&self) -> TrimConfig {
        let mut merged = TrimConfig::new();

        for config_path in &self.search_paths {
            if !config_path.path.exists() {
                continue;
            }
            match load_config_from_file(&config_path.path) {
                Ok(config) => {
                    info!(
                        "Loaded {} from: {}",
                        config_path.description,
                        config_path.path.display()
                    );
                    merged.merge(config);
                }
                Err(e) => {
                    warn!(
                        "Failed to load settings from {}: {}",
                        config_path.path.display(),
                        e
                    );
                }
            }
        }

        merged
    }

    /// Load one explicitly named file; a missing file is an error
    pub fn load_from(&self, path: &Path) -> Result<TrimConfig> {
        if !path.exists() {
            return Err(Error::config(format!(
                "settings file not found: {}",
                path.display()
            )));
        }
        load_config_from_file(path)
    }

    /// Settings files that exist, lowest priority first
    pub fn existing_files(&self) -> Vec<PathBuf> {
        self.search_paths
            .iter()
            .filter(|p| p.path.exists())
            .map(|p| p.path.clone())
            .collect()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Parse a settings file (JSON with comments)
pub fn load_config_from_file(path: &Path) -> Result<TrimConfig> {
    let content = std::fs::read_to_string(path)?;
    let content = strip_json_comments(&content);

    let config: TrimConfig = serde_json::from_str(&content).map_err(|e| {
        Error::config(format!(
            "Invalid settings file at {}: {}",
            path.display(),
            e
        ))
    })?;

    if let Some(ratio) = config.reducer.reduce_ratio {
        crate::select::validate_ratio(ratio)
            .map_err(|e| Error::config(format!("{} ({})", e, path.display())))?;
    }

    debug!(
        "Loaded config from {}: level {:?}, scorer {:?}",
        path.display(),
        config.reducer.reduce_level,
        config.scorer.kind
    );

    Ok(config)
}

/// Strip `//` and `/* */` comments outside of string literals
pub fn strip_json_comments(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape_next = false;

    while let Some(c) = chars.next() {
        if escape_next {
            output.push(c);
            escape_next = false;
            continue;
        }

        if c == '\\' && in_string {
            output.push(c);
            escape_next = true;
            continue;
        }

        if c == '"' {
            in_string = !in_string;
            output.push(c);
            continue;
        }

        if !in_string && c == '/' {
            match chars.peek() {
                Some('/') => {
                    chars.next();
                    for c in chars.by_ref() {
                        if c == '\n' {
                            output.push(c);
                            break;
                        }
                    }
                    continue;
                }
                Some('*') => {
                    chars.next();
                    while let Some(c) = chars.next() {
                        if c == '*' && chars.peek() == Some(&'/') {
                            chars.next();
                            break;
                        }
                    }
                    continue;
                }
                _ => {}
            }
        }

        output.push(c);
    }

    output
}
