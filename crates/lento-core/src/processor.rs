//! Block processing trait and combinators.
//!
//! The host hands a [`BlockProcessor`] one block at a time. Processors
//! must not allocate or block inside `process_block*`, and must accept
//! `input` and `output` being the same buffer through
//! [`BlockProcessor::process_block_inplace`]. The trait is object-safe;
//! [`BlockProcessorExt::chain`] gives a statically dispatched pair.

/// Core trait for streaming block processors.
///
/// # Example
///
/// ```rust
/// use lento_core::BlockProcessor;
///
/// struct Gain(f32);
///
/// impl BlockProcessor for Gain {
///     fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
///         for (o, i) in output.iter_mut().zip(input) {
///             *o = i * self.0;
///         }
///     }
///
///     fn process_block_inplace(&mut self, buffer: &mut [f32]) {
///         buffer.iter_mut().for_each(|s| *s *= self.0);
///     }
///
///     fn reset(&mut self) {}
/// }
///
/// let mut gain = Gain(0.5);
/// let mut out = [0.0; 2];
/// gain.process_block(&[1.0, -1.0], &mut out);
/// assert_eq!(out, [0.5, -0.5]);
/// ```
pub trait BlockProcessor {
    /// Process one block.
    ///
    /// # Panics
    /// Implementations may panic (debug builds) if `input.len() != output.len()`.
    fn process_block(&mut self, input: &[f32], output: &mut [f32]);

    /// Process one block in place.
    fn process_block_inplace(&mut self, buffer: &mut [f32]);

    /// Clear all internal state without changing parameters.
    fn reset(&mut self);

    /// Processing latency in samples. Default 0.
    fn latency_samples(&self) -> usize {
        0
    }
}

/// Extension trait for chaining block processors.
pub trait BlockProcessorExt: BlockProcessor + Sized {
    /// Chain this processor with another; `self` runs first.
    fn chain<P: BlockProcessor>(self, next: P) -> Chain<Self, P> {
        Chain {
            first: self,
            second: next,
        }
    }
}

impl<T: BlockProcessor> BlockProcessorExt for T {}

/// Two processors in series, created by [`BlockProcessorExt::chain`].
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<A: BlockProcessor, B: BlockProcessor> BlockProcessor for Chain<A, B> {
    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        self.first.process_block(input, output);
        self.second.process_block_inplace(output);
    }

    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        self.first.process_block_inplace(buffer);
        self.second.process_block_inplace(buffer);
    }

    fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
    }

    fn latency_samples(&self) -> usize {
        self.first.latency_samples() + self.second.latency_samples()
    }
}
