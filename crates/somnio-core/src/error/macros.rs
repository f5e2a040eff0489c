//! Error macros for somnio

/// Macro for returning invalid input errors
#[macro_export]
macro_rules! bail_invalid {
    ($context:expr, $value:expr) => {
        return Err($crate::error::SomnioError::invalid_input($context, $value))
    };
}

/// Macro for mapping persistence errors
#[macro_export]
macro_rules! map_db_err {
    ($op:expr, $error:expr) => {
        $crate::error::SomnioError::collaborator($op, $error)
    };
}
