//! Input checks shared by the services.

use std::sync::LazyLock;

use onyx_ext_core::QualityTier;
use regex::Regex;

use crate::ServiceError;

const MAX_NAME_LEN: usize = 255;

static FEATURE_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9_.\-]{0,63}$").ok());

/// Trimmed, non-empty, bounded display name.
pub(crate) fn required_name(field: &str, raw: &str) -> Result<String, ServiceError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ServiceError::InvalidInput(format!("{field} must not be empty")));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ServiceError::InvalidInput(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_owned())
}

/// Blank clears the tier; anything else must be a known tier or legacy alias.
pub(crate) fn check_tier(raw: Option<&str>) -> Result<(), ServiceError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(()),
        Some(tier) => tier
            .parse::<QualityTier>()
            .map(|_| ())
            .map_err(|e| ServiceError::InvalidInput(e.to_string())),
    }
}

pub(crate) fn check_feature_name(name: &str) -> Result<(), ServiceError> {
    let valid = FEATURE_NAME.as_ref().is_some_and(|re| re.is_match(name));
    if valid {
        Ok(())
    } else {
        Err(ServiceError::InvalidInput(format!("invalid feature name: {name}")))
    }
}

pub(crate) fn check_completion_time(minutes: Option<i32>) -> Result<(), ServiceError> {
    match minutes {
        Some(m) if m < 0 => {
            Err(ServiceError::InvalidInput("completion_time must not be negative".to_owned()))
        },
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_name() {
        assert_eq!(required_name("name", "  Course ").unwrap(), "Course");
        assert!(required_name("name", "   ").is_err());
        assert!(required_name("name", &"x".repeat(256)).is_err());
    }

    #[test]
    fn test_check_tier() {
        assert!(check_tier(None).is_ok());
        assert!(check_tier(Some(" ")).is_ok());
        assert!(check_tier(Some("Starter")).is_ok());
        assert!(check_tier(Some("gold")).is_err());
    }

    #[test]
    fn test_feature_names() {
        assert!(check_feature_name("hours_report").is_ok());
        assert!(check_feature_name("v2.pdf-export").is_ok());
        assert!(check_feature_name("Bad Name").is_err());
        assert!(check_feature_name("").is_err());
    }
}
