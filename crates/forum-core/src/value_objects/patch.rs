//! Three-state field update
//!
//! A partial update needs to tell "leave it alone" apart from "clear it".
//! Used with `#[serde(default)]`, an absent JSON key becomes [`Patch::Unset`],
//! an explicit `null` becomes [`Patch::Clear`], and a value becomes [`Patch::Set`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Field update instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Keep the stored value
    Unset,
    /// Remove the stored value
    Clear,
    /// Replace the stored value
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<T> Patch<T> {
    #[inline]
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Resolve against the current value
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Self::Unset => current,
            Self::Clear => None,
            Self::Set(value) => Some(value),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    /// `Some` sets, `None` clears. There is no way to express `Unset` from an `Option`.
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Set(v),
            None => Self::Clear,
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only reached when the key is present; absence is handled by `#[serde(default)]`
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}

impl<T> Serialize for Patch<T>
where
    T: Serialize,
{
    /// `Set` writes the value; `Unset` and `Clear` both write `null`
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Set(value) => serializer.serialize_some(value),
            Self::Unset | Self::Clear => serializer.serialize_none(),
        }
    }
}

/// Requested changes to a user's public profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub name: Patch<String>,
    pub bio: Patch<String>,
}

impl ProfileChanges {
    /// True when no field would be touched
    pub fn is_empty(&self) -> bool {
        self.name.is_unset() && self.bio.is_unset()
    }
}
