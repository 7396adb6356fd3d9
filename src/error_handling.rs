use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("'{0}' is not a valid number")]
    invalid_number(String),

    #[error("')' has no matching '('")]
    unmatched_parenthesis,

    #[error("could not write to the output")]
    output(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CalcError>;
