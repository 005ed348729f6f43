//! Data model for the beatmap editor. Everything that has to be saved to disk lives in a
//! [`WorkingMap`]. Mutating it in a tracked (undoable) way is `rhythmedit-command`'s job.

mod id;
pub use id::{Id, IdMap, IdSet};
mod time_ordered;
pub use time_ordered::{TimeOrdered, Timed};
mod color;
pub use color::Color;
mod hit_object;
pub use hit_object::{HitObject, HitSounds};
mod timing_point;
pub use timing_point::TimingPoint;
mod scroll;
pub use scroll::{LaneMask, ScrollGroup, ScrollPoint, ScrollTarget};
mod bookmark;
pub use bookmark::Bookmark;
mod layer;
pub use layer::Layer;
mod timing_group;
pub use timing_group::{GroupId, TimingGroup};
mod map;
pub use map::WorkingMap;
