use crate::{Id, Timed};

#[derive(PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bookmark {
    pub id: Id<Bookmark>,
    pub start_time: i32,
    pub note: String,
}

impl Bookmark {
    pub fn new(start_time: i32, note: impl Into<String>) -> Self {
        Self {
            id: Id::arbitrary(),
            start_time,
            note: note.into(),
        }
    }
}

impl Timed for Bookmark {
    fn id(&self) -> Id<Self> {
        self.id
    }
    fn start_time_ms(&self) -> f64 {
        self.start_time as f64
    }
}
