//! Input validation for store operations.
//!
//! Only the rules the stores cannot express locally are checked here;
//! naming constraints beyond non-emptiness are delegated to the store,
//! which signals a validation error on violation.

use crate::core::record::RecordKind;
use crate::error::{Result, ValidationError};

/// Validate a record name.
///
/// Names must be non-empty. Path shape, length, and character rules are
/// the store's to enforce.
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName.into());
    }
    Ok(())
}

/// Validate a record value for its kind.
///
/// Secrets require a non-empty value; parameters may be empty depending
/// on store rules, so nothing is enforced for them here.
pub fn validate_value(name: &str, value: &str, kind: RecordKind) -> Result<()> {
    if kind == RecordKind::Secret && value.is_empty() {
        return Err(ValidationError::EmptyValue(name.to_string()).into());
    }
    Ok(())
}

/// Parse a `KEY=VALUE` tag argument.
pub fn parse_tag(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(ValidationError::MalformedTag(raw.to_string()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(validate_name("prod/aws/secret-key").is_ok());
        assert!(validate_name("simple").is_ok());
    }

    #[test]
    fn test_invalid_names() {
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
    }

    #[test]
    fn test_secret_requires_value() {
        assert!(validate_value("k", "", RecordKind::Secret).is_err());
        assert!(validate_value("k", "v", RecordKind::Secret).is_ok());
    }

    #[test]
    fn test_parameter_may_be_empty() {
        assert!(validate_value("k", "", RecordKind::Parameter).is_ok());
    }

    #[test]
    fn test_parse_tag() {
        assert_eq!(
            parse_tag("Team=infra").unwrap(),
            ("Team".to_string(), "infra".to_string())
        );
        // Values may contain '='
        assert_eq!(
            parse_tag("Expr=a=b").unwrap(),
            ("Expr".to_string(), "a=b".to_string())
        );
        // Empty value is allowed, empty key is not
        assert!(parse_tag("Key=").is_ok());
        assert!(parse_tag("=value").is_err());
        assert!(parse_tag("no-separator").is_err());
    }
}
