use bitflags::bitflags;

use crate::{Color, GroupId, Id, Layer, Timed};

bitflags! {
    /// Sounds played when a hit object is hit. Stored as a bitset, so adding a sound that's
    /// already there or removing one that isn't leaves the value alone.
    #[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct HitSounds: u8 {
        const NORMAL = 1 << 0;
        const WHISTLE = 1 << 1;
        const FINISH = 1 << 2;
        const CLAP = 1 << 3;
    }
}

#[derive(PartialEq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitObject {
    pub id: Id<HitObject>,
    pub start_time: i32,
    /// 0 for regular notes. Anything else makes this a long note (hold).
    pub end_time: i32,
    /// 1-based lane index.
    pub lane: u32,
    pub hit_sounds: HitSounds,
    pub color: Option<Color>,
    /// `None` means the default layer.
    pub layer: Option<Id<Layer>>,
    /// `None` means the global timing group.
    pub timing_group: Option<GroupId>,
}

impl HitObject {
    pub fn note(start_time: i32, lane: u32) -> Self {
        Self {
            id: Id::arbitrary(),
            start_time,
            end_time: 0,
            lane,
            hit_sounds: HitSounds::empty(),
            color: None,
            layer: None,
            timing_group: None,
        }
    }
    pub fn long_note(start_time: i32, end_time: i32, lane: u32) -> Self {
        Self {
            end_time,
            ..Self::note(start_time, lane)
        }
    }

    pub fn is_long_note(&self) -> bool {
        self.end_time != 0
    }

    /// Where this object stops occupying the timeline: its end for holds, its start otherwise.
    pub fn last_time(&self) -> i32 {
        if self.is_long_note() {
            self.end_time
        } else {
            self.start_time
        }
    }

    /// Shifts the object (and its tail, if it has one) by `offset` milliseconds.
    pub fn shift(&mut self, offset: i32) {
        self.start_time = self.start_time.saturating_add(offset);
        if self.is_long_note() {
            self.end_time = self.end_time.saturating_add(offset);
        }
    }
}

impl Timed for HitObject {
    fn id(&self) -> Id<Self> {
        self.id
    }
    fn start_time_ms(&self) -> f64 {
        self.start_time as f64
    }
}
