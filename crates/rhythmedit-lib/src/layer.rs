use crate::Color;

/// An editor-only grouping of hit objects. Hit objects point at layers, not the other way around.
#[derive(PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layer {
    pub name: String,
    pub color: Color,
    pub hidden: bool,
}

impl Layer {
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
            hidden: false,
        }
    }
}
