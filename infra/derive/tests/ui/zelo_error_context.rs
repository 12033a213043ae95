use std::borrow::Cow;
use zelo_derive::zelo_error;

#[zelo_error]
pub enum LoadError {
    #[error("Parse failure{}: {source}", format_context(.context))]
    Parse { source: std::num::ParseFloatError, context: Option<Cow<'static, str>> },
}

fn parse(raw: &str) -> Result<f64> {
    raw.parse::<f64>().context("parsing brix")
}

fn main() {
    let err = parse("abc").unwrap_err();
    assert_eq!(err.to_string(), "Parse failure (parsing brix): invalid float literal");
}
