use crate::error::{BuddyError, BuddyResult};
use validator::{Validate, ValidationErrors};

/// Extensions accepted by the upload endpoint.
pub const SUPPORTED_UPLOAD_TYPES: &[&str] = &["pdf", "docx", "txt", "md", "markdown", "csv", "json", "html"];

pub fn validate_model<T: Validate>(model: &T) -> BuddyResult<()> {
    match model.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let error_messages = format_validation_errors(&errors);
            Err(BuddyError::validation("request", error_messages))
        }
    }
}

pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = match error.code.as_ref() {
                "length" => format!("Length validation failed for field '{}'", field),
                "range" => format!("Value out of range for field '{}'", field),
                "required" => format!("Field '{}' is required", field),
                code => format!("Validation failed for field '{}': {}", field, code),
            };
            messages.push(message);
        }
    }

    messages.sort();
    messages.join(", ")
}

/// Lowercased extension of `file_name`, empty when it has none.
pub fn file_extension(file_name: &str) -> String {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase()
}

pub fn validate_file_type(file_name: &str, allowed_types: &[&str]) -> BuddyResult<()> {
    let extension = file_extension(file_name);

    if !allowed_types.contains(&extension.as_str()) {
        return Err(BuddyError::validation(
            "file_type",
            format!("File type '{}' not allowed. Allowed types: {}", extension, allowed_types.join(", ")),
        ));
    }

    Ok(())
}

pub fn validate_file_size(file_size: u64, max_size: u64) -> BuddyResult<()> {
    if file_size > max_size {
        return Err(BuddyError::validation(
            "file_size",
            format!("File size {} bytes exceeds maximum allowed size {} bytes", file_size, max_size),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use buddy_models::{GenerateRequest, NoteTitleRequest};

    #[test]
    fn test_validate_file_type() {
        assert!(validate_file_type("lecture.pdf", SUPPORTED_UPLOAD_TYPES).is_ok());
        assert!(validate_file_type("Notes.TXT", SUPPORTED_UPLOAD_TYPES).is_ok());
        assert!(validate_file_type("song.mp3", SUPPORTED_UPLOAD_TYPES).is_err());
    }

    #[test]
    fn test_validate_file_size() {
        assert!(validate_file_size(10, 100).is_ok());
        assert!(validate_file_size(101, 100).is_err());
    }

    #[test]
    fn test_validate_model_reports_field() {
        let err = validate_model(&NoteTitleRequest { title: String::new() }).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert!(err.to_string().contains("title"));

        let req = GenerateRequest {
            n: Some(0),
            ..Default::default()
        };
        let err = validate_model(&req).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }
}
