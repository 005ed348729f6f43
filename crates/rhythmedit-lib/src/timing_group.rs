use std::fmt;

use crate::{Color, ScrollGroup};

/// String key of a timing group. The global group has no key; it's spelled `None` wherever
/// an `Option<GroupId>` shows up.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct GroupId(String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A named partition of the map with its own scroll velocities and speed factors.
#[derive(PartialEq, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingGroup {
    pub color: Color,
    pub scroll: ScrollGroup,
}

impl TimingGroup {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            scroll: ScrollGroup::new(),
        }
    }
}
