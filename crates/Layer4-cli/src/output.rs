//! Result rendering

use trimctx_foundation::ReductionResult;

/// Masked text, or the whole result as pretty JSON
pub fn render(result: &ReductionResult, json: bool) -> serde_json::Result<String> {
    if json {
        serde_json::to_string_pretty(result)
    } else {
        Ok(result.masked_context.clone())
    }
}

/// One-line summary for stderr
pub fn stats_line(result: &ReductionResult) -> String {
    let threshold = result
        .threshold
        .map(|t| format!("{:.3}", t))
        .unwrap_or_else(|| "none".to_string());

    format!(
        "masked {}/{} {} units (ratio {}, threshold {}), {:.1}% shorter",
        result.masked_count(),
        result.total_units,
        result.reduce_level,
        result.reduce_ratio,
        threshold,
        result.savings_percent()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use trimctx_foundation::UnitType;

    fn result() -> ReductionResult {
        ReductionResult {
            original_context: "Bella is happy. She likes apples.".into(),
            masked_context: "<...some content omitted.> She likes apples.".into(),
            reduce_level: UnitType::Sentence,
            reduce_ratio: 0.5,
            threshold: Some(2.0),
            total_units: 2,
            masked_units: vec!["Bella is happy.".into()],
        }
    }

    #[test]
    fn test_render_plain_and_json() {
        let result = result();
        assert_eq!(render(&result, false).unwrap(), result.masked_context);

        let json: serde_json::Value = serde_json::from_str(&render(&result, true).unwrap()).unwrap();
        assert_eq!(json["reduce_level"], "sentence");
        assert_eq!(json["masked_units"][0], "Bella is happy.");
    }

    #[test]
    fn test_stats_line() {
        let line = stats_line(&result());
        assert!(line.starts_with("masked 1/2 sentence units (ratio 0.5, threshold 2.000)"));
    }

    #[test]
    fn test_stats_without_threshold() {
        let mut result = result();
        result.threshold = None;
        result.masked_units.clear();
        assert!(stats_line(&result).contains("threshold none"));
    }
}
