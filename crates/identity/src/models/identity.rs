use serde::{Deserialize, Serialize};

use super::{AvatarUrl, IdentityId};

/// The user on whose behalf resolution runs.
///
/// Owned by a [`Session`](crate::binding::Session); the avatar is only ever a
/// validated URL.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Identity {
    pub id: IdentityId,
    pub name: String,
    pub avatar: Option<AvatarUrl>,
    pub balance: i64,
}

/// Minimal data the hosting platform hands over at session bootstrap.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct IdentitySeed {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Platform-provided photo, if any. Validated before use.
    #[serde(default)]
    pub avatar: Option<String>,
}

impl IdentitySeed {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}
