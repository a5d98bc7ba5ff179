//! Error macros for saass

/// Macro for returning a malformed rubric error
#[macro_export]
macro_rules! bail_rubric {
    ($($arg:tt)*) => {
        return Err($crate::error::SaassError::malformed_rubric(format!($($arg)*)))
    };
}

/// Macro for returning a malformed answer table error
#[macro_export]
macro_rules! bail_answers {
    ($($arg:tt)*) => {
        return Err($crate::error::SaassError::malformed_answers(format!($($arg)*)))
    };
}

/// Macro for returning an embedding error
#[macro_export]
macro_rules! bail_embedding {
    ($($arg:tt)*) => {
        return Err($crate::error::SaassError::embedding(format!($($arg)*)))
    };
}

/// Macro for creating invalid value errors
#[macro_export]
macro_rules! bail_invalid {
    ($context:expr, $value:expr) => {
        return Err($crate::error::SaassError::invalid_value($context, $value))
    };
}
