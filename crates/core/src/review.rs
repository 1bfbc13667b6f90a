//! Review moderation constants and validation.
//!
//! Reviews are an opaque approve/reject log: a passenger submits one per
//! finished ride, staff approve or reject it, nothing else reads the content.

use crate::error::CoreError;

/// Newly submitted, awaiting moderation.
pub const STATUS_PENDING: &str = "pending";
/// Published by a moderator.
pub const STATUS_APPROVED: &str = "approved";
/// Hidden by a moderator.
pub const STATUS_REJECTED: &str = "rejected";

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

/// Maximum length for the free-text comment (characters).
pub const MAX_COMMENT_LENGTH: usize = 2_000;

pub fn validate_rating(rating: i16) -> Result<(), CoreError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CoreError::Validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    Ok(())
}

pub fn validate_comment(comment: &str) -> Result<(), CoreError> {
    if comment.chars().count() > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment exceeds maximum length of {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Only pending reviews can be moderated, and only to approved or rejected.
pub fn validate_moderation(current: &str, next: &str) -> Result<(), CoreError> {
    if current != STATUS_PENDING {
        return Err(CoreError::Conflict(format!(
            "Review has already been {current}"
        )));
    }
    if next != STATUS_APPROVED && next != STATUS_REJECTED {
        return Err(CoreError::Validation(format!(
            "Invalid moderation decision '{next}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn comment_length() {
        assert!(validate_comment(&"a".repeat(MAX_COMMENT_LENGTH)).is_ok());
        assert!(validate_comment(&"a".repeat(MAX_COMMENT_LENGTH + 1)).is_err());
    }

    #[test]
    fn pending_reviews_can_be_moderated_once() {
        assert!(validate_moderation(STATUS_PENDING, STATUS_APPROVED).is_ok());
        assert!(validate_moderation(STATUS_PENDING, STATUS_REJECTED).is_ok());
        assert!(validate_moderation(STATUS_APPROVED, STATUS_REJECTED).is_err());
        assert!(validate_moderation(STATUS_PENDING, STATUS_PENDING).is_err());
    }
}
