use atlas_derive::atlas_error;

#[atlas_error]
pub enum StoreError {
    #[error("Parse error: {source}")]
    Parse {
        #[source]
        source: std::num::ParseIntError,
    },
}

fn main() {}
