use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecommenderError {
    /// Malformed catalog row or value.
    #[error("data format error{}: {message}", line_suffix(.line))]
    DataFormat { line: Option<u64>, message: String },

    /// Required CSV header is absent.
    #[error("missing required column '{column}' (available: {available:?})")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// Exact title or id lookup failed.
    #[error("not found in catalog: {0}")]
    NotFound(String),

    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn line_suffix(line: &Option<u64>) -> String {
    match line {
        Some(line) => format!(" at line {line}"),
        None => String::new(),
    }
}

impl RecommenderError {
    pub fn data_format(line: Option<u64>, message: impl Into<String>) -> Self {
        RecommenderError::DataFormat {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RecommenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_format_message_includes_line() {
        let err = RecommenderError::data_format(Some(7), "empty title");
        assert_eq!(err.to_string(), "data format error at line 7: empty title");

        let err = RecommenderError::data_format(None, "bad header");
        assert_eq!(err.to_string(), "data format error: bad header");
    }

    #[test]
    fn not_found_names_the_key() {
        let err = RecommenderError::NotFound("title 'Heat'".into());
        assert_eq!(err.to_string(), "not found in catalog: title 'Heat'");
    }
}
