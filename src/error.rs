use std::num::ParseIntError;

use thiserror::Error;

/// Why a label carrying the threshold prefix was left out of the label set.
#[derive(Debug, Error)]
pub enum LabelError {
    #[error("could not parse days in {name:?}: {source}")]
    InvalidDays {
        name: String,
        #[source]
        source: ParseIntError,
    },

    #[error("negative day count in {name:?}")]
    NegativeDays { name: String },
}

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("unknown hashing algorithm in signature {0:?}")]
    UnknownAlgorithm(String),

    #[error("wrong signature")]
    BadSignature,

    #[error("unknown event type {0}")]
    UnknownEvent(String),

    #[error("could not decode {event} event: {source}")]
    Decode {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{event} event carries no {field}")]
    MissingField {
        event: &'static str,
        field: &'static str,
    },
}
