use actix_web::http::StatusCode;
use linkpeek::errors::{LinkpeekError, Result};
use std::error::Error;

#[cfg(test)]
mod error_creation_tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = LinkpeekError::validation("Original URL is required");

        assert!(matches!(error, LinkpeekError::Validation(_)));
        assert_eq!(error.to_string(), "Validation Error: Original URL is required");
        assert_eq!(error.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upload_and_persistence_are_bad_gateway() {
        let upload = LinkpeekError::upload("bucket not found");
        let persistence = LinkpeekError::persistence("insert failed");

        assert_eq!(upload.http_status(), StatusCode::BAD_GATEWAY);
        assert_eq!(persistence.http_status(), StatusCode::BAD_GATEWAY);
        assert_eq!(upload.public_message(), "bucket not found");
        assert_eq!(persistence.public_message(), "insert failed");
    }

    #[test]
    fn test_internal_details_are_hidden() {
        for error in [
            LinkpeekError::internal("panic in template at line 3"),
            LinkpeekError::config("store.key=secret"),
            LinkpeekError::file_operation("/etc/linkpeek/key.pem: permission denied"),
        ] {
            assert_eq!(error.public_message(), "Internal server error");
            assert_eq!(error.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_ne!(error.message(), error.public_message());
        }
    }
}

#[cfg(test)]
mod error_code_tests {
    use super::*;

    #[test]
    fn test_codes_are_unique_and_numbered() {
        let errors = [
            LinkpeekError::validation(""),
            LinkpeekError::upload(""),
            LinkpeekError::persistence(""),
            LinkpeekError::not_found(""),
            LinkpeekError::internal(""),
            LinkpeekError::config(""),
            LinkpeekError::file_operation(""),
        ];

        let codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
        assert_eq!(codes, ["E001", "E002", "E003", "E004", "E005", "E006", "E007"]);

        let numbers: Vec<i32> = errors.iter().map(|e| e.code_number()).collect();
        assert_eq!(numbers, [1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_colored_format_contains_code_and_message() {
        let error = LinkpeekError::not_found("abc123");
        let colored = error.format_colored();
        assert!(colored.contains("E004"));
        assert!(colored.contains("abc123"));
    }
}

#[cfg(test)]
mod error_conversion_tests {
    use super::*;

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let error: LinkpeekError = io.into();
        assert!(matches!(error, LinkpeekError::FileOperation(_)));
        assert!(error.message().contains("no such file"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: LinkpeekError = json_err.into();
        assert!(matches!(error, LinkpeekError::Internal(_)));
    }

    #[test]
    fn test_question_mark_propagation() {
        fn read() -> Result<String> {
            let data = std::fs::read_to_string("/definitely/not/here/linkpeek.toml")?;
            Ok(data)
        }
        assert!(matches!(read(), Err(LinkpeekError::FileOperation(_))));
    }

    #[test]
    fn test_is_std_error() {
        let error = LinkpeekError::validation("x");
        let dyn_err: &dyn Error = &error;
        assert!(dyn_err.source().is_none());
    }
}
