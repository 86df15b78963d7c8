//! Non-interactive reduction run

use crate::{output, scorer};
use anyhow::Context;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use trimctx_core::{HeuristicChunker, ReducerConfig, SelectiveContext};
use trimctx_foundation::{ReductionResult, TrimConfig};

/// What a single run reads and prints
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub input: Option<PathBuf>,
    /// Level name as typed by the user
    pub level: Option<String>,
    pub json: bool,
    pub stats: bool,
}

/// Reduce the input once and print the result
pub async fn run(config: &TrimConfig, options: &RunOptions) -> anyhow::Result<()> {
    let text = read_input(options.input.as_deref())?;
    let result = reduce(config, options.level.as_deref(), &text).await?;

    println!("{}", output::render(&result, options.json)?);
    if options.stats {
        eprintln!("{}", output::stats_line(&result));
    }

    Ok(())
}

/// Build a reducer from settings and reduce `text`
pub async fn reduce(
    config: &TrimConfig,
    level: Option<&str>,
    text: &str,
) -> anyhow::Result<ReductionResult> {
    let scorer = scorer::build_scorer(&config.scorer)?;
    let reducer = SelectiveContext::new(
        scorer,
        Arc::new(HeuristicChunker::new()),
        ReducerConfig::from(&config.reducer),
    );

    let result = match level {
        Some(level) => {
            reducer
                .reduce_named(text, reducer.config().reduce_ratio, level)
                .await?
        }
        None => reducer.reduce_default(text).await?,
    };

    Ok(result)
}

/// Read the whole input file, or stdin for `None` / `-`
fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trimctx_foundation::{Error, ReducerSettings, UnitType};

    #[tokio::test]
    async fn test_reduce_with_settings() {
        let mut config = TrimConfig::new();
        config.reducer = ReducerSettings::default()
            .reduce_ratio(0.5)
            .reduce_level(UnitType::Sentence);

        let result = reduce(&config, None, "Bella is happy. She likes apples.")
            .await
            .unwrap();
        assert_eq!(result.reduce_level, UnitType::Sentence);
        assert_eq!(
            result.masked_context,
            "<...some content omitted.> She likes apples."
        );
    }

    #[tokio::test]
    async fn test_level_flag_wins_and_is_validated() {
        let config = TrimConfig::new();

        let result = reduce(&config, Some("token"), "Bella is happy.").await.unwrap();
        assert_eq!(result.reduce_level, UnitType::Token);

        let err = reduce(&config, Some("chapter"), "Bella is happy.")
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_read_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.txt");
        std::fs::write(&path, "Bella is happy.").unwrap();

        assert_eq!(read_input(Some(&path)).unwrap(), "Bella is happy.");
        assert!(read_input(Some(&dir.path().join("missing.txt"))).is_err());
    }
}
