//! Config - settings schema
//!
//! - `settings.rs` - TrimConfig (reducer + scorer settings)
//!
//! Files are located and layered by the loader in `trimctx-core`.

mod settings;

pub use settings::{
    ReducerSettings, ScorerKind, ScorerSettings, TrimConfig, CONFIG_DIR_NAME, LOCAL_SETTINGS_FILE,
    SETTINGS_FILE,
};
