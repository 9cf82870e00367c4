use crate::utils::error::{Result, SplitterError};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(SplitterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(SplitterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(SplitterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_file_extension(
    field_name: &str,
    file: &str,
    allowed_extensions: &[&str],
) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    match std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) if allowed_set.contains(extension) => Ok(()),
        Some(extension) => Err(SplitterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(SplitterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| SplitterError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SplitterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Labels name the teams in output, so they must be present and distinct.
pub fn validate_labels(field_name: &str, labels: &[String], min_count: usize) -> Result<()> {
    if labels.len() < min_count {
        return Err(SplitterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: labels.join(", "),
            reason: format!("At least {} labels are required", min_count),
        });
    }

    let mut seen = HashSet::new();
    for label in labels {
        validate_non_empty_string(field_name, label)?;
        if !seen.insert(label.as_str()) {
            return Err(SplitterError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: label.clone(),
                reason: "Duplicate label".to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("balancer.max_iterations", 100, 1).is_ok());
        assert!(validate_positive_number("balancer.max_iterations", 0, 1).is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("roster", "roster.json", &["json"]).is_ok());
        assert!(validate_file_extension("roster", "roster.txt", &["json"]).is_err());
        assert!(validate_file_extension("roster", "roster", &["json"]).is_err());
    }

    #[test]
    fn test_validate_labels() {
        let labels = vec!["Red".to_string(), "Blue".to_string()];
        assert!(validate_labels("teams.labels", &labels, 2).is_ok());

        let duplicated = vec!["Red".to_string(), "Red".to_string()];
        assert!(validate_labels("teams.labels", &duplicated, 2).is_err());

        let blank = vec!["Red".to_string(), "  ".to_string()];
        assert!(validate_labels("teams.labels", &blank, 2).is_err());

        assert!(validate_labels("teams.labels", &labels[..1], 2).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some(3);
        let missing: Option<u32> = None;
        assert_eq!(*validate_required_field("seed", &present).unwrap(), 3);
        assert!(validate_required_field("seed", &missing).is_err());
    }
}
