use thiserror::Error;

use crate::param_type::ParamType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizerError {
    #[error("format expects {expected} arguments but {actual} were supplied")]
    ArgumentCountMismatch { expected: usize, actual: usize },
    #[error("argument {index} has an invalid or unsupported specifier ({param})")]
    InvalidSpecifier { index: usize, param: ParamType },
    #[error("format registry is full ({capacity} formats)")]
    RegistryFull { capacity: usize },
}

pub type Result<T> = std::result::Result<T, SizerError>;
