use thiserror::Error;

use crate::Axis;

#[derive(Debug, Error)]
pub enum Error {
    #[error("division by zero: parent {axis:?} scale has a zero component")]
    DivisionByZero { axis: Axis },

    #[error("unknown action: {name}")]
    UnknownAction { name: String },

    #[error("unknown part: {name}")]
    UnknownPart { name: String },

    #[error("invalid value: {message}")]
    InvalidValue { message: String },
}
