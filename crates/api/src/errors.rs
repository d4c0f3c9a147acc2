//! Domain error => gRPC status.

use tonic::Status;
use tracing::error;

use catalog_core::DomainError;

pub const INTERNAL_MESSAGE: &str = "internal server error";

/// Map a domain error to the status returned to the caller.
///
/// Storage failures are logged here with their detail and reported as a bare
/// `Internal`, so nothing about the backend leaks to the caller.
pub fn to_status(err: DomainError) -> Status {
    match err {
        DomainError::BadRequest(msg) => Status::invalid_argument(msg),
        DomainError::NotFound(msg) => Status::not_found(msg),
        DomainError::Storage(source) => {
            error!(error = %source, "storage failure");
            Status::internal(INTERNAL_MESSAGE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::StoreError;
    use tonic::Code;

    #[test]
    fn client_errors_keep_their_message() {
        let status = to_status(DomainError::bad_request("no fields to update"));
        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(status.message(), "no fields to update");

        let status = to_status(DomainError::not_found("product not found"));
        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(status.message(), "product not found");
    }

    #[test]
    fn storage_detail_is_not_leaked() {
        let status = to_status(StoreError::Database("relation \"products\" does not exist".into()).into());
        assert_eq!(status.code(), Code::Internal);
        assert_eq!(status.message(), INTERNAL_MESSAGE);
    }
}
