//! Frame trace recording.
//!
//! A bounded history of per-frame controller outcomes, exportable as JSON for
//! offline inspection of jump arcs and animation churn.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{animation::AnimationFlags, math::Vec3};

/// One simulated frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame: u64,
    pub dt: f32,
    pub position: Vec3,
    pub displacement: Vec3,
    pub vertical_velocity: f32,
    pub grounded: bool,
    pub is_jumping: bool,
    pub flags: AnimationFlags,
    /// Animation parameter writes issued during this frame.
    pub anim_writes: u32,
}

/// Ring buffer of frame records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameTrace {
    pub started_at: DateTime<Utc>,
    capacity: usize,
    records: VecDeque<FrameRecord>,
}

impl FrameTrace {
    pub fn new(capacity: usize) -> Self {
        Self {
            started_at: Utc::now(),
            capacity: capacity.max(1),
            records: VecDeque::new(),
        }
    }

    pub fn push(&mut self, record: FrameRecord) {
        self.records.push_back(record);
        while self.records.len() > self.capacity {
            self.records.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &FrameRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&FrameRecord> {
        self.records.back()
    }

    /// Highest position reached among the buffered frames.
    pub fn peak_height(&self) -> Option<f32> {
        self.records
            .iter()
            .map(|r| r.position.y)
            .fold(None, |acc, y| Some(acc.map_or(y, |a: f32| a.max(y))))
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(frame: u64, y: f32) -> FrameRecord {
        FrameRecord {
            frame,
            dt: 1.0 / 60.0,
            position: Vec3::new(0.0, y, 0.0),
            displacement: Vec3::ZERO,
            vertical_velocity: 0.0,
            grounded: y == 0.0,
            is_jumping: false,
            flags: AnimationFlags::WALKING,
            anim_writes: 0,
        }
    }

    #[test]
    fn ring_drops_oldest() {
        let mut trace = FrameTrace::new(2);
        trace.push(record(0, 0.0));
        trace.push(record(1, 1.5));
        trace.push(record(2, 0.5));
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.records().next().unwrap().frame, 1);
        assert_eq!(trace.peak_height(), Some(1.5));
    }

    #[test]
    fn json_export_contains_flags() {
        let mut trace = FrameTrace::new(4);
        trace.push(record(0, 0.0));
        let json = trace.to_json_pretty().unwrap();
        assert!(json.contains("started_at"));
        assert!(json.contains("WALKING"));
    }
}
