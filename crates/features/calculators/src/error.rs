use std::borrow::Cow;

/// A specialized [`CalcError`] enum of this crate.
#[zelo_derive::zelo_error]
pub enum CalcError {
    /// A field is missing, not a number, or outside its allowed domain.
    #[error("Invalid `{field}`{}: {message}", format_context(.context))]
    InvalidInput {
        field: Cow<'static, str>,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    /// The calculator id is not in the catalogue.
    #[error("Unknown calculator{}: {kind}", format_context(.context))]
    UnknownKind { kind: String, context: Option<Cow<'static, str>> },

    /// The inputs are valid but the result overflows `f64`.
    #[error("Result out of range{}: {metric}", format_context(.context))]
    NonFinite { metric: &'static str, context: Option<Cow<'static, str>> },

    #[error("Internal calculator error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl CalcError {
    pub(crate) fn invalid(
        field: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::InvalidInput { field: field.into(), message: message.into(), context: None }
    }

    /// The form field this error points at, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidInput { field, .. } => Some(field),
            Self::UnknownKind { .. } => Some("kind"),
            Self::NonFinite { .. } | Self::Internal { .. } => None,
        }
    }
}
