//! Animation flag sync.
//!
//! Keeps a mirror of what was last written to the sink and only writes on
//! change. Walking/running are derived from intent every frame; jumping is
//! driven by the vertical integrator's transitions.

use locomotion_shared::animation::{AnimationFlags, AnimationSink};
use tracing::debug;

use crate::input::InputIntent;

#[derive(Debug, Clone, Default)]
pub struct AnimationStateSync {
    current: AnimationFlags,
}

impl AnimationStateSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags as last written.
    pub fn flags(&self) -> AnimationFlags {
        self.current
    }

    /// Updates walking/running from intent. Returns the number of writes.
    ///
    /// Running is set by move + run held, and cleared only once both are
    /// released: letting go of run while still moving keeps it on.
    pub fn sync_locomotion(&mut self, intent: &InputIntent, sink: &mut impl AnimationSink) -> u32 {
        let moving = intent.is_movement_pressed();
        let run = intent.run_held;
        let walking = self.current.contains(AnimationFlags::WALKING);
        let running = self.current.contains(AnimationFlags::RUNNING);
        let mut writes = 0;

        if moving && !walking {
            writes += self.write(AnimationFlags::WALKING, true, sink);
        } else if !moving && walking {
            writes += self.write(AnimationFlags::WALKING, false, sink);
        }

        if moving && run && !running {
            writes += self.write(AnimationFlags::RUNNING, true, sink);
        } else if !moving && !run && running {
            writes += self.write(AnimationFlags::RUNNING, false, sink);
        }

        writes
    }

    /// Sets the jump flag. Returns the number of writes (0 or 1).
    pub fn set_jumping(&mut self, value: bool, sink: &mut impl AnimationSink) -> u32 {
        self.write(AnimationFlags::JUMPING, value, sink)
    }

    fn write(&mut self, flag: AnimationFlags, value: bool, sink: &mut impl AnimationSink) -> u32 {
        if self.current.contains(flag) == value {
            return 0;
        }
        self.current.set(flag, value);
        sink.set_flag(flag.param_name(), value);
        debug!(param = flag.param_name(), value, "animation flag");
        1
    }
}
