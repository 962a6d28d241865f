use atlas_derive::atlas_error;

#[atlas_error]
pub enum StoreError {
    #[error("Parse error: {0}")]
    Parse(std::num::ParseIntError),
}

fn main() {}
