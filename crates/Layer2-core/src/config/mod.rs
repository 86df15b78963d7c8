//! # Configuration System
//!
//! ## Priority (low → high)
//!
//! 1. User-level: `~/.trimctx/settings.json`
//! 2. Project-level: `.trimctx/settings.json`
//! 3. Local: `.trimctx/settings.local.json` (gitignored)
//!
//! ## Example
//!
//! ```ignore
//! use trimctx_core::config::ConfigLoader;
//!
//! let config = ConfigLoader::new(Path::new(".")).load_all();
//! let reducer = ReducerConfig::from(&config.reducer);
//! ```

mod loader;

pub use loader::{load_config_from_file, strip_json_comments, ConfigLoader};
