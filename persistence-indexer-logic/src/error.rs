use sea_orm::DbErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("db error: {0}")]
    Db(#[from] DbErr),
    #[error("failed to convert stored record: {0}")]
    Conversion(String),
}

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("missing required field `{field}` in {context}")]
    MissingField {
        context: &'static str,
        field: &'static str,
    },
    #[error("malformed payload in `{event}` event, attribute `{key}`: {reason}")]
    MalformedPayload {
        event: String,
        key: String,
        reason: String,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IndexError {
    pub fn missing(context: &'static str, field: &'static str) -> Self {
        Self::MissingField { context, field }
    }

    /// Store failures abort the whole run; everything else is scoped to the
    /// transaction or event that produced it.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}
