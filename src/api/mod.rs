pub mod attendance;
pub mod events;
pub mod leave;
pub mod payroll;
pub mod payslip;
pub mod permission;
pub mod shift;
pub mod users;

use crate::error::PipelineError;

/// Months are numeric 1..=12 end to end; handlers reject anything else
/// before touching the store.
pub(crate) fn ensure_month(month: u32) -> Result<(), PipelineError> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(PipelineError::InvalidField {
            field: "month",
            reason: format!("{month} is not a calendar month"),
        })
    }
}

/// Maps a pipeline failure onto the response-level error contract:
/// validation and parse failures reject the request, an empty period is a
/// 404, store failures are opaque 500s with the detail kept in the log.
pub(crate) fn pipeline_error(e: PipelineError) -> actix_web::Error {
    match &e {
        PipelineError::MissingField(_)
        | PipelineError::InvalidField { .. }
        | PipelineError::Layout(_)
        | PipelineError::Workbook(_) => actix_web::error::ErrorBadRequest(e.to_string()),
        PipelineError::EmptyPeriod => actix_web::error::ErrorNotFound(e.to_string()),
        PipelineError::Store(err) => {
            tracing::error!(error = %err, "Store operation failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn month_guard_accepts_only_calendar_months() {
        assert!(ensure_month(1).is_ok());
        assert!(ensure_month(6).is_ok());
        assert!(ensure_month(12).is_ok());
        assert!(matches!(
            ensure_month(0),
            Err(PipelineError::InvalidField { field: "month", .. })
        ));
        assert!(matches!(
            ensure_month(13),
            Err(PipelineError::InvalidField { field: "month", .. })
        ));
    }

    #[test]
    fn pipeline_errors_map_to_response_statuses() {
        let bad = pipeline_error(PipelineError::MissingField("month"));
        assert_eq!(
            bad.as_response_error().status_code(),
            StatusCode::BAD_REQUEST
        );

        let invalid = pipeline_error(PipelineError::InvalidField {
            field: "month",
            reason: "13 is not a calendar month".to_string(),
        });
        assert_eq!(
            invalid.as_response_error().status_code(),
            StatusCode::BAD_REQUEST
        );

        let empty = pipeline_error(PipelineError::EmptyPeriod);
        assert_eq!(
            empty.as_response_error().status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
