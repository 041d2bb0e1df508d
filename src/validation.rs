//! Validation of user-submitted feeds.
//!
//! The `check_*` functions report the first rule a candidate breaks; the
//! `validate_*` predicates are their boolean form.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::registry::FeedRegistry;

/// Maximum feed name length, in characters, after trimming.
pub const MAX_NAME_LENGTH: usize = 47;

/// Scheme, a host of at least two dot-separated labels, optional port,
/// optional path or query.
const URL_PATTERN: &str = r"^https?://[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)+(?::\d+)?(?:[/?#]\S*)?$";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name cannot be empty")]
    NameEmpty,

    #[error("name must be at most {MAX_NAME_LENGTH} characters")]
    NameTooLong,

    #[error("name must contain at least one letter")]
    NameWithoutLetters,

    #[error("a feed named \"{0}\" already exists")]
    NameTaken(String),

    #[error("url cannot be empty")]
    UrlEmpty,

    #[error("url must look like http(s)://host.domain/path")]
    UrlMalformed,
}

fn url_regex() -> &'static Regex {
    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    URL_REGEX.get_or_init(|| Regex::new(URL_PATTERN).expect("valid feed url regex"))
}

/// Name rules that do not depend on the registry.
pub fn check_name_format(candidate: &str) -> Result<(), ValidationError> {
    let name = candidate.trim();

    if name.is_empty() {
        return Err(ValidationError::NameEmpty);
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong);
    }
    if !name.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::NameWithoutLetters);
    }
    Ok(())
}

pub fn check_name(candidate: &str, registry: &FeedRegistry) -> Result<(), ValidationError> {
    check_name_format(candidate)?;

    let name = candidate.trim();
    if registry.contains_name(name) {
        return Err(ValidationError::NameTaken(name.to_string()));
    }

    Ok(())
}

pub fn check_url(candidate: &str) -> Result<(), ValidationError> {
    if candidate.is_empty() {
        return Err(ValidationError::UrlEmpty);
    }
    if !url_regex().is_match(candidate) {
        return Err(ValidationError::UrlMalformed);
    }
    Ok(())
}

pub fn validate_name(candidate: &str, registry: &FeedRegistry) -> bool {
    check_name(candidate, registry).is_ok()
}

pub fn validate_url(candidate: &str) -> bool {
    check_url(candidate).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Feed;

    fn registry() -> FeedRegistry {
        FeedRegistry::new(vec![
            Feed::new("Udacity Blog", "http://blog.udacity.com/feed"),
            Feed::new("CSS Tricks", "http://feeds.feedburner.com/CssTricks"),
        ])
        .unwrap()
    }

    mod name_tests {
        use super::*;

        #[test]
        fn test_valid_names() {
            let registry = registry();
            assert!(validate_name("Singleword", &registry));
            assert!(validate_name("A regular nice sounding name", &registry));
            assert!(validate_name(
                "A combination of letters and others symbols! :)",
                &registry
            ));
        }

        #[test]
        fn test_empty_name() {
            let registry = registry();
            assert!(!validate_name("", &registry));
            assert_eq!(check_name("   ", &registry), Err(ValidationError::NameEmpty));
        }

        #[test]
        fn test_name_too_long() {
            let registry = registry();
            assert_eq!(
                check_name("Name that is too long should also not be allowed", &registry),
                Err(ValidationError::NameTooLong)
            );
        }

        #[test]
        fn test_length_boundary() {
            let registry = registry();
            assert_eq!(MAX_NAME_LENGTH, 47);
            assert_eq!(check_name(&"a".repeat(47), &registry), Ok(()));
            assert_eq!(
                check_name(&"a".repeat(48), &registry),
                Err(ValidationError::NameTooLong)
            );
        }

        #[test]
        fn test_longest_sample_name_accepted() {
            let registry = registry();
            let name = "A combination of letters and others symbols! :)";
            assert_eq!(name.chars().count(), MAX_NAME_LENGTH);
            assert_eq!(check_name(name, &registry), Ok(()));
        }

        #[test]
        fn test_surrounding_whitespace_not_counted() {
            let registry = registry();
            let padded = format!("  {}  ", "b".repeat(MAX_NAME_LENGTH));
            assert!(validate_name(&padded, &registry));
        }

        #[test]
        fn test_symbols_only() {
            let registry = registry();
            assert_eq!(
                check_name("*&†&$#", &registry),
                Err(ValidationError::NameWithoutLetters)
            );
            assert!(!validate_name("12345 !?", &registry));
        }

        #[test]
        fn test_existing_name() {
            let registry = registry();
            assert_eq!(
                check_name("CSS Tricks", &registry),
                Err(ValidationError::NameTaken("CSS Tricks".to_string()))
            );
            assert!(!validate_name(" CSS Tricks ", &registry));
        }

        #[test]
        fn test_existing_name_other_case_allowed() {
            let registry = registry();
            assert!(validate_name("css tricks", &registry));
        }
    }

    mod url_tests {
        use super::*;

        #[test]
        fn test_valid_urls() {
            assert!(validate_url("http://blog.udacity.com/feed"));
            assert!(validate_url(
                "http://feeds.feedburner.com/udacity-linear-digressions"
            ));
            assert!(validate_url("http://feeds.feedburner.de/bla_bla123"));
        }

        #[test]
        fn test_https_port_and_query() {
            assert!(validate_url("https://example.com"));
            assert!(validate_url("https://example.com:8443/rss?format=atom"));
        }

        #[test]
        fn test_empty_url() {
            assert_eq!(check_url(""), Err(ValidationError::UrlEmpty));
        }

        #[test]
        fn test_single_word() {
            assert!(!validate_url("justAString"));
        }

        #[test]
        fn test_host_without_dot() {
            assert_eq!(
                check_url("http://incompleteurl"),
                Err(ValidationError::UrlMalformed)
            );
        }

        #[test]
        fn test_missing_scheme() {
            assert!(!validate_url("incomplete.com/url"));
        }

        #[test]
        fn test_other_schemes() {
            assert!(!validate_url("ftp://files.example.com/feed"));
            assert!(!validate_url("file:///etc/passwd"));
        }

        #[test]
        fn test_empty_labels() {
            assert!(!validate_url("http://.com/feed"));
            assert!(!validate_url("http://example..com"));
            assert!(!validate_url("http://example.com./feed"));
        }

        #[test]
        fn test_whitespace_rejected() {
            assert!(!validate_url("http://example.com/a feed"));
            assert!(!validate_url(" http://example.com"));
        }
    }
}
