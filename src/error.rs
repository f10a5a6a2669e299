use thiserror::Error;

/// Failures of the attendance/payroll pipeline, grouped by how the request
/// layer reacts: validation rejects the request outright, parse failures
/// abort the organize run, store errors abort whatever steps remain.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("unexpected sheet layout: {0}")]
    Layout(String),

    #[error("no payroll data found for the selected month and year")]
    EmptyPeriod,

    #[error("store operation failed: {0}")]
    Store(#[from] sqlx::Error),
}
