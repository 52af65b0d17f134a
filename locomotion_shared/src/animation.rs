//! Animation abstraction.
//!
//! The controller only decides boolean states; blend trees and playback live
//! behind an [`AnimationSink`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Boolean animation parameters driven by the controller.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct AnimationFlags: u8 {
        const WALKING = 1 << 0;
        const RUNNING = 1 << 1;
        const JUMPING = 1 << 2;
    }
}

impl AnimationFlags {
    /// Parameter name as seen by the animation graph.
    ///
    /// Only meaningful for single-bit values; anything else maps to `""`.
    pub fn param_name(self) -> &'static str {
        if self == Self::WALKING {
            "isWalking"
        } else if self == Self::RUNNING {
            "isRunning"
        } else if self == Self::JUMPING {
            "isJumping"
        } else {
            ""
        }
    }
}

/// Receiver for animation parameter writes.
pub trait AnimationSink {
    fn set_flag(&mut self, name: &str, value: bool);
}

/// Sink that remembers values and counts writes per parameter.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    values: HashMap<String, bool>,
    writes: HashMap<String, u32>,
    log: Vec<(String, bool)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last written value; unwritten parameters read as false.
    pub fn get(&self, name: &str) -> bool {
        self.values.get(name).copied().unwrap_or(false)
    }

    pub fn writes(&self, name: &str) -> u32 {
        self.writes.get(name).copied().unwrap_or(0)
    }

    pub fn total_writes(&self) -> u32 {
        self.writes.values().sum()
    }

    /// Every write in order.
    pub fn log(&self) -> &[(String, bool)] {
        &self.log
    }
}

impl AnimationSink for RecordingSink {
    fn set_flag(&mut self, name: &str, value: bool) {
        self.values.insert(name.to_string(), value);
        *self.writes.entry(name.to_string()).or_insert(0) += 1;
        self.log.push((name.to_string(), value));
    }
}
