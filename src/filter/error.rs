use thiserror::Error;

/// Rejections raised while turning a filter document into SQL
#[derive(Debug, Error)]
pub enum FilterError {
    /// Table and column names are interpolated, so they must be plain identifiers
    #[error("invalid {kind} name: {reason}")]
    BadIdentifier { kind: &'static str, reason: String },

    #[error("malformed where clause: {0}")]
    MalformedWhere(String),

    #[error("operator {0} is not supported")]
    UnsupportedOperator(String),

    #[error("bad operand for {op}: {expected}")]
    BadOperand { op: String, expected: &'static str },

    #[error("{0} must be non-negative")]
    NegativeWindow(&'static str),
}

impl FilterError {
    pub(crate) fn table(reason: String) -> Self {
        FilterError::BadIdentifier { kind: "table", reason }
    }

    pub(crate) fn column(reason: String) -> Self {
        FilterError::BadIdentifier { kind: "column", reason }
    }
}
