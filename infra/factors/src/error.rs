use std::borrow::Cow;

/// A specialized [`FactorError`] enum of this crate.
#[zelo_derive::zelo_error]
pub enum FactorError {
    /// Transport failure or non-2xx status from the remote source.
    #[error("Factor request failed{}: {source}", format_context(.context))]
    Http { source: reqwest::Error, context: Option<Cow<'static, str>> },

    #[error("Factor file I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// The payload is not a flat `key -> number` JSON object.
    #[error("Malformed factor payload{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// The payload parsed but a factor is out of range.
    #[error("Invalid conversion factor{}: {source}", format_context(.context))]
    Invalid { source: zelo_domain::factors::FactorsError, context: Option<Cow<'static, str>> },

    #[error("Internal factor error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
