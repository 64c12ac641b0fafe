//! Lock-free scalar shared between a control actor and the audio callback.
//!
//! A settings handler writes, the block callback reads once at the top of
//! each block. The value is a single `f32` stored as its bit pattern in an
//! `AtomicU32`, so a read can never observe a torn value and no lock is
//! taken on the audio thread.

#[cfg(not(feature = "std"))]
use alloc::sync::Arc;
#[cfg(feature = "std")]
use std::sync::Arc;

use core::sync::atomic::{AtomicU32, Ordering};

/// Cloneable handle to one atomic `f32`.
///
/// All clones observe the same value. Ordering is `Relaxed`: the parameter
/// carries no happens-before obligations for other memory.
///
/// # Example
///
/// ```rust
/// use lento_core::SharedParam;
///
/// let param = SharedParam::new(1.0);
/// let writer = param.clone();
/// writer.set(0.85);
/// assert_eq!(param.get(), 0.85);
/// ```
#[derive(Debug, Clone)]
pub struct SharedParam {
    bits: Arc<AtomicU32>,
}

impl SharedParam {
    /// Create a new cell holding `value`.
    pub fn new(value: f32) -> Self {
        Self {
            bits: Arc::new(AtomicU32::new(value.to_bits())),
        }
    }

    /// Load the current value.
    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }

    /// Store a new value.
    #[inline]
    pub fn set(&self, value: f32) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }
}

impl Default for SharedParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}
