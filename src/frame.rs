//! Per-frame context handed from the frame loop to the scene.

use instant::Duration;

use crate::input::SixAxis;

/// Everything the frame updater and draw submitter need to know about the
/// frame being prepared. Built once per frame by the loop in [`crate::flow`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameContext {
    pub frame_index: usize,
    pub aspect_ratio: f32,
    pub delta_time: Duration,
    pub input: SixAxis,
}

impl FrameContext {
    pub fn new(frame_index: usize, aspect_ratio: f32, input: SixAxis) -> Self {
        Self {
            frame_index,
            aspect_ratio,
            delta_time: input.delta_time,
            input,
        }
    }
}

/// Round-robin counter over the frame-in-flight slots.
#[derive(Clone, Copy, Debug)]
pub struct FrameSlots {
    current: usize,
    count: usize,
}

impl FrameSlots {
    pub fn new(count: usize) -> Self {
        Self {
            current: 0,
            count: count.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn advance(&mut self) -> usize {
        self.current = (self.current + 1) % self.count;
        self.current
    }
}
