use std::borrow::Cow;
use zelo_derive::zelo_error;

#[zelo_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Invalid input{}: {field}", format_context(.context))]
    InvalidInput { field: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<String> {
    Err(std::io::Error::other("boom"))?
}

fn main() {
    let err: DemoError = "fallback".into();
    assert!(matches!(err, DemoError::Internal { .. }));
    assert!(read().is_err());
}
