//! Tagged per-axis extent shared by the shape descriptors.

use serde::{Deserialize, Deserializer, Serialize};

use super::error::DimsError;

/// Raw sentinel marking a free (inferable) extent in legacy descriptors.
pub const FREE_DIM: i64 = -1;

/// A single axis extent: an explicit size or the one inferable slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dim {
    /// Explicit non-negative extent.
    Known(usize),
    /// Extent inferred from the target element count and the other entries.
    Free,
}

impl Dim {
    /// Decodes the raw signed representation used by legacy descriptors.
    ///
    /// `-1` marks the free extent; anything below it never described a valid
    /// dimension and is rejected outright.
    pub fn from_raw(value: i64) -> Result<Self, DimsError> {
        match value {
            FREE_DIM => Ok(Dim::Free),
            v if v >= 0 => Ok(Dim::Known(v as usize)),
            v => Err(DimsError::InvalidSize(v)),
        }
    }

    /// Encodes back into the raw signed representation (`-1` for free).
    pub fn raw(self) -> i64 {
        match self {
            Dim::Known(value) => value as i64,
            Dim::Free => FREE_DIM,
        }
    }

    /// Returns `true` for the free extent.
    pub fn is_free(self) -> bool {
        matches!(self, Dim::Free)
    }

    /// Returns the explicit size when the extent is known.
    pub fn known(self) -> Option<usize> {
        match self {
            Dim::Known(value) => Some(value),
            Dim::Free => None,
        }
    }
}

impl Serialize for Dim {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.raw())
    }
}

impl<'de> Deserialize<'de> for Dim {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Dim::from_raw(raw).map_err(serde::de::Error::custom)
    }
}
