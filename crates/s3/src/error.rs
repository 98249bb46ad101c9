//! Mapping of SDK errors into the core error taxonomy

use std::fmt::Debug;

use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use s3nav_core::Error;

/// Convert an SDK error of `operation` ("List Objects", ...) into an [`Error`]
pub(crate) fn map_sdk_error<E, R>(operation: &str, err: SdkError<E, R>) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: Debug,
{
    let mapped = match &err {
        SdkError::ServiceError(service) => {
            let service = service.err();
            let message = service
                .message()
                .or(service.code())
                .unwrap_or("no message provided")
                .to_string();
            map_code(operation, service.code(), message)
        }
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
            Error::Network(DisplayErrorContext(&err).to_string())
        }
        _ => Error::Backend {
            operation: operation.to_string(),
            message: DisplayErrorContext(&err).to_string(),
        },
    };
    tracing::debug!(operation, error = %DisplayErrorContext(&err), "request failed");
    mapped
}

fn map_code(operation: &str, code: Option<&str>, message: String) -> Error {
    match code {
        Some("NoSuchKey" | "NoSuchBucket" | "NotFound") => Error::NotFound(message),
        Some("BucketAlreadyExists" | "BucketAlreadyOwnedByYou" | "BucketNotEmpty") => {
            Error::Conflict(message)
        }
        Some(
            "AccessDenied"
            | "Forbidden"
            | "InvalidAccessKeyId"
            | "SignatureDoesNotMatch"
            | "ExpiredToken"
            | "InvalidToken",
        ) => Error::Auth(message),
        Some("NotImplemented") => Error::Unsupported(message),
        Some(code) if code != message => Error::Backend {
            operation: operation.to_string(),
            message: format!("{code}: {message}"),
        },
        _ => Error::Backend {
            operation: operation.to_string(),
            message,
        },
    }
}
