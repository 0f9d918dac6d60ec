use std::sync::atomic::{AtomicU32, Ordering};

/// Concatenated-message reference numbers.
///
/// One counter is shared by every segmenter that submits on the same link.
/// It is incremented once per multi-segment message and truncated to the field
/// width by the caller (8 bits for UDH, 16 for SAR), so references wrap without
/// any check against messages still being reassembled.
#[derive(Debug, Default)]
pub struct ReferenceCounter {
    last: AtomicU32,
}

impl ReferenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start after `last`, mostly useful to exercise wraparound
    pub fn starting_after(last: u32) -> Self {
        Self {
            last: AtomicU32::new(last),
        }
    }

    pub fn next(&self) -> u32 {
        self.last.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    /// Most recently issued reference, 0 before the first
    pub fn current(&self) -> u32 {
        self.last.load(Ordering::Relaxed)
    }
}
