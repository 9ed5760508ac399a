use crate::error::{ContentError, ContentResult};

/// Trimmed value, `None` when blank
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn require(fields: &[&str], message: &str) -> ContentResult<()> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(ContentError::Validation(message.to_string()));
    }
    Ok(())
}
