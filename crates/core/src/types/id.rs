//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.
//!
//! IDs are opaque strings assigned by the authentication provider (users) or
//! the document store (folders, works). They double as path segments in the
//! store (`users/{user}/bookmarkFolders/{folder}`), so parsing rejects empty
//! values and values containing `/`.

/// Errors that can occur when parsing an ID.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input is empty or only whitespace.
    #[error("{kind} is required")]
    Empty {
        /// Name of the ID type being parsed.
        kind: &'static str,
    },
    /// The input is longer than allowed.
    #[error("{kind} must be at most {max} characters")]
    TooLong {
        /// Name of the ID type being parsed.
        kind: &'static str,
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a path separator.
    #[error("{kind} must not contain '/'")]
    InvalidCharacter {
        /// Name of the ID type being parsed.
        kind: &'static str,
    },
}

/// Maximum length of any ID, in bytes.
pub const MAX_ID_LENGTH: usize = 128;

/// Validate a raw ID string for the given ID kind.
///
/// # Errors
///
/// Returns an [`IdError`] if the value is empty, too long, or contains `/`.
pub fn validate_id(kind: &'static str, s: &str) -> Result<(), IdError> {
    if s.trim().is_empty() {
        return Err(IdError::Empty { kind });
    }
    if s.len() > MAX_ID_LENGTH {
        return Err(IdError::TooLong {
            kind,
            max: MAX_ID_LENGTH,
        });
    }
    if s.contains('/') {
        return Err(IdError::InvalidCharacter { kind });
    }
    Ok(())
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize` with `#[serde(transparent)]`, and a validating `Deserialize`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `parse()` (validating), `as_str()`, `into_inner()`
/// - `Display`, `FromStr` and `AsRef<str>` implementations
///
/// # Example
///
/// ```rust
/// # use inkshelf_core::define_id;
/// define_id!(UserId, "user id");
/// define_id!(FolderId, "folder id");
///
/// let user_id = UserId::parse("u1").unwrap();
/// let folder_id = FolderId::parse("u1").unwrap();
///
/// // These are different types, so this won't compile:
/// // let _: UserId = folder_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $kind:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, ::serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Parse an ID, rejecting empty values and path separators.
            ///
            /// # Errors
            ///
            /// Returns an [`IdError`]($crate::IdError) if the value is not a valid ID.
            pub fn parse(id: &str) -> ::core::result::Result<Self, $crate::IdError> {
                $crate::validate_id($kind, id)?;
                Ok(Self(id.to_owned()))
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let raw = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                Self::parse(&raw).map_err(<D::Error as ::serde::de::Error>::custom)
            }
        }
    };
}

// Define standard entity IDs
define_id!(UserId, "user id");
define_id!(FolderId, "folder id");
define_id!(WorkId, "work id");
