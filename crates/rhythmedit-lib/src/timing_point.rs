use crate::{Id, Timed};

#[derive(PartialEq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingPoint {
    pub id: Id<TimingPoint>,
    pub start_time: f32,
    pub bpm: f32,
    /// Beats per measure.
    pub signature: u32,
    /// Hidden timing points still affect timing but don't draw measure lines.
    pub hidden: bool,
}

impl TimingPoint {
    pub const DEFAULT_SIGNATURE: u32 = 4;

    pub fn new(start_time: f32, bpm: f32) -> Self {
        Self {
            id: Id::arbitrary(),
            start_time,
            bpm,
            signature: Self::DEFAULT_SIGNATURE,
            hidden: false,
        }
    }

    /// Length of one beat in milliseconds.
    pub fn beat_length(&self) -> f32 {
        60000.0 / self.bpm
    }

    /// Rounds `time` to the nearest `1 / divisor` of a beat, counting from this point's start.
    pub fn snap(&self, time: i32, divisor: u32) -> i32 {
        if divisor == 0 || !self.bpm.is_finite() || self.bpm <= 0.0 {
            return time;
        }
        let interval = self.beat_length() as f64 / divisor as f64;
        let start = self.start_time as f64;
        let steps = ((time as f64 - start) / interval).round();
        (start + steps * interval).round() as i32
    }
}

impl Timed for TimingPoint {
    fn id(&self) -> Id<Self> {
        self.id
    }
    fn start_time_ms(&self) -> f64 {
        self.start_time as f64
    }
}

#[cfg(test)]
mod tests {
    use super::TimingPoint;

    #[test]
    fn test_snap() {
        // 120 bpm -> 500ms beats
        let point = TimingPoint::new(0.0, 120.0);
        assert_eq!(point.snap(260, 1), 500);
        assert_eq!(point.snap(240, 1), 0);
        assert_eq!(point.snap(130, 4), 125);
        assert_eq!(point.snap(1010, 2), 1000);

        let offset = TimingPoint::new(100.0, 120.0);
        assert_eq!(offset.snap(330, 2), 350);
        assert_eq!(offset.snap(77, 0), 77);
    }
}
