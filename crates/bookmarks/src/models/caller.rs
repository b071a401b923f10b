//! Caller identity.

use inkshelf_core::UserId;

/// The identity on whose behalf an operation runs.
///
/// Every folder operation takes the caller explicitly instead of reading a
/// process-wide "current user".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Caller {
    /// No signed-in user.
    #[default]
    Anonymous,
    /// A signed-in user.
    User(UserId),
}

impl Caller {
    /// A signed-in caller.
    #[must_use]
    pub const fn user(id: UserId) -> Self {
        Self::User(id)
    }

    /// The signed-in user's ID, if any.
    #[must_use]
    pub const fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::Anonymous => None,
            Self::User(id) => Some(id),
        }
    }

    /// Whether the caller is signed in as `owner`.
    #[must_use]
    pub fn is(&self, owner: &UserId) -> bool {
        self.user_id() == Some(owner)
    }
}

impl From<UserId> for Caller {
    fn from(id: UserId) -> Self {
        Self::User(id)
    }
}

impl From<Option<UserId>> for Caller {
    fn from(id: Option<UserId>) -> Self {
        id.map_or(Self::Anonymous, Self::User)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_is_owner() {
        let u1 = UserId::parse("u1").unwrap();
        let u2 = UserId::parse("u2").unwrap();

        assert!(Caller::user(u1.clone()).is(&u1));
        assert!(!Caller::user(u2).is(&u1));
        assert!(!Caller::Anonymous.is(&u1));
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Caller::from(None::<UserId>), Caller::Anonymous);
        let u1 = UserId::parse("u1").unwrap();
        assert_eq!(Caller::from(Some(u1.clone())), Caller::User(u1));
    }
}
