//! Error taxonomy for a collection run.
//!
//! Every variant is fatal to the run that produced it: nothing is retried and
//! no partial output is returned.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Transport failure or a non-success HTTP status.
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// An expected markup element (or attribute) is absent.
    #[error("selector `{selector}` matched nothing on {url}")]
    SelectorMiss { selector: &'static str, url: String },

    #[error("no digit run found in article link `{link}`")]
    NoDigitsFound { link: String },

    #[error("no date token found in timestamp `{raw}`")]
    TimestampFormatMismatch { raw: String },

    /// `latest - offset` would leave the positive identifier range.
    #[error("article id {latest} - {offset} is out of range")]
    InvalidArticleId { latest: u64, offset: u64 },

    #[error("invalid url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config file error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_miss_message_names_selector() {
        let err = PipelineError::SelectorMiss {
            selector: "em.date",
            url: "https://news.kbs.co.kr/news/view.do?ncd=1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("em.date"));
        assert!(msg.contains("ncd=1"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: PipelineError = io.into();
        assert!(matches!(err, PipelineError::Io(_)));
    }
}
