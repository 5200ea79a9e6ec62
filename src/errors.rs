use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum TranslateError {
    #[error("Syntax Error on line {line}: {reason}")]
    Syntax { line: usize, reason: String },

    #[error("Semantic Error on line {line}: {reason}")]
    Semantic { line: usize, reason: String },
}
