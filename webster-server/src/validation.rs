//! Input validation for untrusted data.
//!
//! All user-supplied input MUST be validated before use.
//! This module provides the limits and validators the handlers share.

use thiserror::Error;

/// Maximum length for entity names.
pub const MAX_NAME_LEN: usize = 255;
/// Maximum length for descriptions.
pub const MAX_DESCRIPTION_LEN: usize = 2048;
/// Maximum serialized canvas content length.
pub const MAX_CONTENT_LEN: usize = 1_048_576; // 1MB
/// Maximum stage objects per canvas document.
pub const MAX_OBJECTS_PER_CANVAS: usize = 10_000;
/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 8;
/// Username length range.
pub const MIN_USERNAME_LEN: usize = 3;
/// Maximum username length.
pub const MAX_USERNAME_LEN: usize = 32;
/// Maximum length for uploaded file names we accept for deletion.
pub const MAX_FILENAME_LEN: usize = 128;

/// Image extensions accepted by the upload endpoints.
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "svg"];

/// Validation error types.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Name is empty or whitespace.
    #[error("name must not be empty")]
    NameEmpty,
    /// Name exceeds maximum length.
    #[error("name too long (max {MAX_NAME_LEN} chars)")]
    NameTooLong,
    /// Description exceeds maximum length.
    #[error("description too long (max {MAX_DESCRIPTION_LEN} chars)")]
    DescriptionTooLong,
    /// Serialized content exceeds maximum length.
    #[error("content too long (max {MAX_CONTENT_LEN} bytes)")]
    ContentTooLong,
    /// Too many objects in one canvas.
    #[error("too many objects (max {MAX_OBJECTS_PER_CANVAS})")]
    TooManyObjects,
    /// Password below minimum length.
    #[error("password too short (min {MIN_PASSWORD_LEN} chars)")]
    PasswordTooShort,
    /// Email does not look like an address.
    #[error("invalid email address")]
    EmailInvalid,
    /// Username outside length range or with invalid characters.
    #[error("invalid username (3-32 chars, alphanumeric plus . _ -)")]
    UsernameInvalid,
    /// Filename contains separators, traversal, or invalid characters.
    #[error("invalid filename")]
    FilenameInvalid,
    /// File extension outside the image allowlist.
    #[error("file extension not allowed")]
    ExtensionNotAllowed,
}

impl From<ValidationError> for crate::error::ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Validate an entity name.
///
/// # Errors
///
/// Returns [`ValidationError::NameEmpty`] for blank names and
/// [`ValidationError::NameTooLong`] past 255 characters.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::NameEmpty);
    }
    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong);
    }
    Ok(())
}

/// Validate a description.
///
/// # Errors
///
/// Returns [`ValidationError::DescriptionTooLong`] past 2048 characters.
pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::DescriptionTooLong);
    }
    Ok(())
}

/// Validate serialized canvas content size.
///
/// # Errors
///
/// Returns [`ValidationError::ContentTooLong`] past 1MB.
pub fn validate_content_len(content: &str) -> Result<(), ValidationError> {
    if content.len() > MAX_CONTENT_LEN {
        return Err(ValidationError::ContentTooLong);
    }
    Ok(())
}

/// Validate stage object count.
///
/// # Errors
///
/// Returns [`ValidationError::TooManyObjects`] past the limit.
pub fn validate_object_count(count: usize) -> Result<(), ValidationError> {
    if count > MAX_OBJECTS_PER_CANVAS {
        return Err(ValidationError::TooManyObjects);
    }
    Ok(())
}

/// Validate a registration password.
///
/// # Errors
///
/// Returns [`ValidationError::PasswordTooShort`] below 8 characters.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// Shallow email shape check. Deliverability is confirmed separately via
/// the email-confirmation flag.
///
/// # Errors
///
/// Returns [`ValidationError::EmailInvalid`] when the shape is wrong.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::EmailInvalid);
    };
    if local.is_empty() || domain.len() < 3 || !domain.contains('.') || email.len() > MAX_NAME_LEN {
        return Err(ValidationError::EmailInvalid);
    }
    Ok(())
}

/// Validate a username.
///
/// # Errors
///
/// Returns [`ValidationError::UsernameInvalid`] outside 3-32 chars or with
/// characters beyond alphanumerics and `. _ -`.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len_ok = (MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&username.len());
    let chars_ok = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-');
    if len_ok && chars_ok {
        Ok(())
    } else {
        Err(ValidationError::UsernameInvalid)
    }
}

/// Extract a lowercased file extension.
#[must_use]
pub fn extension_of(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Check an extension against the image allowlist.
///
/// # Errors
///
/// Returns [`ValidationError::ExtensionNotAllowed`] for anything outside it.
pub fn validate_extension(ext: &str) -> Result<(), ValidationError> {
    if ALLOWED_EXTENSIONS.contains(&ext) {
        Ok(())
    } else {
        Err(ValidationError::ExtensionNotAllowed)
    }
}

/// Validate a stored-file name supplied by a client (e.g. for deletion).
///
/// Valid names: 1-128 characters, alphanumeric plus `. _ -`, no path
/// separators, no traversal, and an allowlisted image extension.
///
/// # Errors
///
/// Returns [`ValidationError::FilenameInvalid`] for anything that could
/// escape the upload directory, [`ValidationError::ExtensionNotAllowed`]
/// for non-image extensions.
pub fn validate_stored_filename(filename: &str) -> Result<(), ValidationError> {
    if filename.is_empty() || filename.len() > MAX_FILENAME_LEN {
        return Err(ValidationError::FilenameInvalid);
    }
    if filename.contains("..") || filename.starts_with('.') {
        return Err(ValidationError::FilenameInvalid);
    }
    let chars_ok = filename
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-');
    if !chars_ok {
        return Err(ValidationError::FilenameInvalid);
    }
    let ext = extension_of(filename).ok_or(ValidationError::FilenameInvalid)?;
    validate_extension(&ext)
}
