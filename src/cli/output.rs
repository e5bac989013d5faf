//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{BhavaArgs, OutputFormat};
use crate::error::Result;

/// Result structure for training.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingResult {
    pub bundle_path: String,
    pub language: String,
    pub classifier: String,
    pub training_samples: usize,
    pub labels: Vec<String>,
    pub dimension: usize,
    pub duration_ms: u64,
}

/// Result structure for prediction.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResult {
    pub output_path: String,
    pub predictions: usize,
    pub duration_ms: u64,
}

/// Result structure for scoring.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreResult {
    pub total: usize,
    pub correct: usize,
    pub accuracy: f64,
}

/// Votes cast for one language.
#[derive(Debug, Serialize, Deserialize)]
pub struct LanguageVotes {
    pub language: String,
    pub votes: usize,
}

/// Result structure for language detection.
#[derive(Debug, Serialize, Deserialize)]
pub struct DetectionResult {
    pub language: String,
    pub lines: usize,
    pub votes: Vec<LanguageVotes>,
}

/// Bundle metadata summary.
#[derive(Debug, Serialize, Deserialize)]
pub struct BundleInfo {
    pub path: String,
    pub language: String,
    pub classifier: String,
    pub labels: Vec<String>,
    pub word_vocabulary: usize,
    pub char_vocabulary: usize,
    pub training_samples: usize,
    pub trained_at: String,
    pub version: String,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &BhavaArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &BhavaArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    // Convert to JSON value for easier manipulation
    let value = serde_json::to_value(result)?;
    for line in human_lines(&value) {
        println!("{line}");
    }
    Ok(())
}

/// Render a value as `key: value` lines.
fn human_lines(value: &serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::Object(obj) => obj
            .iter()
            .map(|(key, val)| format!("{key}: {}", format_value(val)))
            .collect(),
        _ => vec![format_value(value)],
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &BhavaArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for human output.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format!("{f:.4}"),
            _ => n.to_string(),
        },
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        serde_json::Value::Object(obj) => obj
            .iter()
            .map(|(key, val)| format!("{key}={}", format_value(val)))
            .collect::<Vec<_>>()
            .join(" "),
        serde_json::Value::Null => "null".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(
            format_value(&serde_json::Value::String("pos".to_string())),
            "pos"
        );
        assert_eq!(
            format_value(&serde_json::Value::Number(serde_json::Number::from(42))),
            "42"
        );
        assert_eq!(format_value(&serde_json::json!(0.5)), "0.5000");
        assert_eq!(format_value(&serde_json::Value::Bool(false)), "false");
        assert_eq!(format_value(&serde_json::Value::Null), "null");
    }

    #[test]
    fn test_human_lines_for_detection() {
        let result = DetectionResult {
            language: "mr".to_string(),
            lines: 3,
            votes: vec![
                LanguageVotes {
                    language: "mr".to_string(),
                    votes: 2,
                },
                LanguageVotes {
                    language: "hi".to_string(),
                    votes: 1,
                },
            ],
        };
        let value = serde_json::to_value(&result).unwrap();
        let lines = human_lines(&value);

        assert!(lines.contains(&"language: mr".to_string()));
        assert!(lines.contains(&"votes: [language=mr votes=2, language=hi votes=1]".to_string()));
    }
}
