//! Latest-frame slot for live camera capture
//!
//! A producer pushes frames as they arrive; a consumer asks for the most
//! recent one on demand. Only one frame is held at a time and older frames
//! are dropped without being analyzed.

use crate::image_loader::LeafImage;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::trace;

/// A captured camera frame
#[derive(Debug, Clone)]
pub struct Frame {
    image: Arc<LeafImage>,
    captured_at: DateTime<Utc>,
    sequence: u64,
}

impl Frame {
    pub fn new(image: LeafImage, captured_at: DateTime<Utc>, sequence: u64) -> Self {
        Self {
            image: Arc::new(image),
            captured_at,
            sequence,
        }
    }

    /// Frame stamped with the current time
    pub fn now(image: LeafImage, sequence: u64) -> Self {
        Self::new(image, Utc::now(), sequence)
    }

    pub fn image(&self) -> &LeafImage {
        &self.image
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Thread-safe single-slot buffer holding the latest frame
#[derive(Debug, Default)]
pub struct FrameSlot {
    slot: Mutex<Option<Frame>>,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Frame>> {
        // A panicking holder cannot leave the Option half-written
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the held frame; returns true when an unconsumed frame was dropped
    pub fn push(&self, frame: Frame) -> bool {
        let sequence = frame.sequence;
        let dropped = self.lock().replace(frame);
        if let Some(old) = &dropped {
            trace!(dropped = old.sequence, latest = sequence, "Frame replaced");
        }
        dropped.is_some()
    }

    /// Most recent frame, left in place
    pub fn capture(&self) -> Option<Frame> {
        self.lock().clone()
    }

    /// Most recent frame, emptying the slot
    pub fn take(&self) -> Option<Frame> {
        self.lock().take()
    }

    pub fn clear(&self) {
        *self.lock() = None;
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_none()
    }
}
