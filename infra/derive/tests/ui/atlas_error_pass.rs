use atlas_derive::atlas_error;
use std::borrow::Cow;

#[atlas_error]
pub enum StoreError {
    #[error("Parse error{}: {source}", format_context(.context))]
    Parse {
        #[source]
        source: std::num::ParseIntError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn parse(raw: &str) -> Result<i64, StoreError> {
    Ok(raw.parse::<i64>().context("Reading counter")?)
}

fn main() {
    let _ = parse("42");
    let _: StoreError = "boom".into();
}
