use cachet::ItemDraft;

// Constants for validation ranges
const MAX_NAME_LEN: usize = 255;
const MAX_DESCRIPTION_LEN: usize = 4096;

#[derive(Debug, PartialEq, Eq)]
pub enum ValidationError {
    MissingRequiredField { field: &'static str },
    TooLong { field: &'static str, len: usize, max: usize },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingRequiredField { field } => {
                write!(f, "Missing required field '{}'", field)
            }
            ValidationError::TooLong { field, len, max } => {
                write!(
                    f,
                    "Field '{}' is {} characters long (max: {})",
                    field, len, max
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Checks a draft before it reaches the repository
pub fn validate_draft(draft: &ItemDraft) -> Result<(), ValidationError> {
    let name_len = draft.name.trim().chars().count();
    if name_len == 0 {
        return Err(ValidationError::MissingRequiredField { field: "name" });
    }
    if name_len > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name",
            len: name_len,
            max: MAX_NAME_LEN,
        });
    }

    let description_len = draft.description.chars().count();
    if description_len > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description",
            len: description_len,
            max: MAX_DESCRIPTION_LEN,
        });
    }

    Ok(())
}
