use crate::{Id, TimeOrdered, Timed};

/// Bitset of lanes (bit 0 = lane 1) a scroll point applies to.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LaneMask(pub u32);

impl LaneMask {
    pub fn from_lanes(lanes: impl IntoIterator<Item = u32>) -> Self {
        Self(
            lanes
                .into_iter()
                .filter(|lane| (1..=32).contains(lane))
                .fold(0, |mask, lane| mask | 1 << (lane - 1)),
        )
    }
    pub fn contains(self, lane: u32) -> bool {
        (1..=32).contains(&lane) && self.0 & (1 << (lane - 1)) != 0
    }
}

/// A scroll velocity (SV) or scroll speed factor (SSF) point. Both have the same shape;
/// which one it is depends on the sequence it's stored in. See [`ScrollTarget`].
#[derive(PartialEq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollPoint {
    pub id: Id<ScrollPoint>,
    pub start_time: f32,
    pub multiplier: f32,
    /// `None` applies to every lane.
    pub lane_mask: Option<LaneMask>,
}

impl ScrollPoint {
    pub fn new(start_time: f32, multiplier: f32) -> Self {
        Self {
            id: Id::arbitrary(),
            start_time,
            multiplier,
            lane_mask: None,
        }
    }
}

impl Timed for ScrollPoint {
    fn id(&self) -> Id<Self> {
        self.id
    }
    fn start_time_ms(&self) -> f64 {
        self.start_time as f64
    }
}

#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollTarget {
    Velocity,
    SpeedFactor,
}

/// The SV and SSF sequences belonging to one timing group (or the global one).
#[derive(PartialEq, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollGroup {
    pub velocities: TimeOrdered<ScrollPoint>,
    pub speed_factors: TimeOrdered<ScrollPoint>,
}

impl ScrollGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self, target: ScrollTarget) -> &TimeOrdered<ScrollPoint> {
        match target {
            ScrollTarget::Velocity => &self.velocities,
            ScrollTarget::SpeedFactor => &self.speed_factors,
        }
    }
    pub fn points_mut(&mut self, target: ScrollTarget) -> &mut TimeOrdered<ScrollPoint> {
        match target {
            ScrollTarget::Velocity => &mut self.velocities,
            ScrollTarget::SpeedFactor => &mut self.speed_factors,
        }
    }
}
