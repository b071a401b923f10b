//! Bookmark folder name type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`FolderName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FolderNameError {
    /// The input is empty or only whitespace.
    #[error("folder name cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("folder name must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A bookmark folder display name.
///
/// Surrounding whitespace is trimmed on parse; the stored value is what
/// uniqueness checks compare against (case-sensitively).
///
/// ## Constraints
///
/// - Not empty after trimming
/// - At most 100 characters
///
/// ## Examples
///
/// ```
/// use inkshelf_core::FolderName;
///
/// assert_eq!(FolderName::parse("  Favorites ").unwrap().as_str(), "Favorites");
/// assert!(FolderName::parse("").is_err());
/// assert!(FolderName::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct FolderName(String);

impl FolderName {
    /// Maximum length of a folder name, in characters.
    pub const MAX_LENGTH: usize = 100;

    /// Parse a `FolderName` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or longer than
    /// [`Self::MAX_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, FolderNameError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(FolderNameError::Empty);
        }

        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(FolderNameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `FolderName` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for FolderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for FolderName {
    type Err = FolderNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for FolderName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for FolderName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_names() {
        assert!(FolderName::parse("Favorites").is_ok());
        assert!(FolderName::parse("Read later 📚").is_ok());
        assert!(FolderName::parse("a").is_ok());
    }

    #[test]
    fn test_parse_trims() {
        let name = FolderName::parse("\t Isekai  ").unwrap();
        assert_eq!(name.as_str(), "Isekai");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(FolderName::parse(""), Err(FolderNameError::Empty)));
        assert!(matches!(
            FolderName::parse(" \n "),
            Err(FolderNameError::Empty)
        ));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "n".repeat(FolderName::MAX_LENGTH + 1);
        assert!(matches!(
            FolderName::parse(&long),
            Err(FolderNameError::TooLong { max: 100 })
        ));
        // Multi-byte characters count once each
        let wide = "é".repeat(FolderName::MAX_LENGTH);
        assert!(FolderName::parse(&wide).is_ok());
    }

    #[test]
    fn test_case_is_preserved() {
        let lower = FolderName::parse("favorites").unwrap();
        let upper = FolderName::parse("Favorites").unwrap();
        assert_ne!(lower, upper);
    }

    #[test]
    fn test_serde_roundtrip() {
        let name = FolderName::parse("Favorites").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"Favorites\"");

        let parsed: FolderName = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, name);
        assert!(serde_json::from_str::<FolderName>("\"  \"").is_err());
    }
}
