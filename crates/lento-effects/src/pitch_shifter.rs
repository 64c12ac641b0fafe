//! Granular pitch shifter.
//!
//! Overlap-add granular synthesis: every hop, one Hann-windowed grain is
//! read from the input history at a rate of `pitch` source samples per
//! output sample and summed into an output accumulator. The read cursor
//! advances by one hop per grain regardless of pitch, which keeps tempo
//! while the per-grain resampling moves pitch.
//!
//! ```text
//!  input ring (4G)                     output accumulator (2G)
//!  ┌───────────────────────────┐       ┌──────────────┐
//!  │ ... read ──G·pitch──▶ ... write   │ +grain  drain│──▶ out
//!  └───────────────────────────┘       └──────────────┘
//!        read = write - 2G                 slot read, then zeroed
//! ```
//!
//! All buffers are sized for the largest legal grain when the processor is
//! built; nothing allocates afterwards, including grain-size changes.
//!
//! The pitch factor is a block-rate parameter: it is read once at the top
//! of every block from a [`SharedParam`], so a settings thread can update it
//! through [`GrainProcessor::pitch_handle`] without locking.
//!
//! A discontinuous pitch change (a preset switch, say) leaves grains from
//! the old pitch in the accumulator. The owner of the stream calls
//! [`GrainProcessor::clear`] when it knows such a change happened; the
//! processor never clears itself.

#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use lento_core::{BlockProcessor, SharedParam, fill_hann, lerp, wrap_index};

/// Smallest accepted grain size in samples.
pub const MIN_GRAIN_SIZE: usize = 512;
/// Largest accepted grain size in samples.
pub const MAX_GRAIN_SIZE: usize = 4096;
/// Default grain size in samples.
pub const DEFAULT_GRAIN_SIZE: usize = 2048;
/// Default grain overlap (hop = half a grain).
pub const DEFAULT_OVERLAP: f32 = 0.5;
/// Lowest pitch factor (one octave down).
pub const MIN_PITCH: f32 = 0.5;
/// Highest pitch factor (one octave up).
pub const MAX_PITCH: f32 = 2.0;

/// Pitch factors this close to 1.0 pass audio through untouched.
const BYPASS_TOLERANCE: f32 = 0.001;

/// Input history capacity in grains.
const INPUT_GRAINS: usize = 4;
/// Output accumulator capacity in grains.
const OUTPUT_GRAINS: usize = 2;
/// How far (in grains) the read cursor trails the write cursor. A grain at
/// pitch 2.0 spans two grains of source.
const READ_LAG_GRAINS: usize = 2;

/// Real-time granular pitch shifter for one audio stream.
///
/// Mono; [`GrainProcessor::process_channels`] broadcasts the shifted first
/// channel to the others.
///
/// # Example
///
/// ```rust
/// use lento_effects::GrainProcessor;
///
/// let mut shifter = GrainProcessor::default();
/// shifter.set_pitch_factor(1.25);
///
/// let input = vec![0.1f32; 256];
/// let mut output = vec![0.0f32; 256];
/// shifter.process(&input, &mut output);
///
/// // The first 2G samples are latency
/// assert!(output.iter().all(|s| *s == 0.0));
/// ```
#[derive(Debug)]
pub struct GrainProcessor {
    input: Vec<f32>,
    output: Vec<f32>,
    window: Vec<f32>,

    grain_size: usize,
    overlap: f32,
    hop: usize,

    write_pos: usize,
    read_pos: usize,
    out_write: usize,
    out_read: usize,
    until_next_grain: usize,

    pitch: SharedParam,
    bypass: bool,
}

impl GrainProcessor {
    /// Create a processor with the given grain size and overlap.
    ///
    /// The hop is `grain_size * (1 - overlap)`, rounded, at least one sample.
    ///
    /// # Panics
    ///
    /// Panics if `grain_size` is outside 512..=4096 or `overlap` is outside
    /// `[0, 1)`.
    pub fn new(grain_size: usize, overlap: f32) -> Self {
        assert!(
            (MIN_GRAIN_SIZE..=MAX_GRAIN_SIZE).contains(&grain_size),
            "grain size {grain_size} outside {MIN_GRAIN_SIZE}..={MAX_GRAIN_SIZE}"
        );
        assert!(
            (0.0..1.0).contains(&overlap),
            "overlap {overlap} outside [0, 1)"
        );

        let mut processor = Self {
            input: vec![0.0; INPUT_GRAINS * MAX_GRAIN_SIZE],
            output: vec![0.0; OUTPUT_GRAINS * MAX_GRAIN_SIZE],
            window: vec![0.0; MAX_GRAIN_SIZE],
            grain_size,
            overlap,
            hop: 0,
            write_pos: 0,
            read_pos: 0,
            out_write: 0,
            out_read: 0,
            until_next_grain: 0,
            pitch: SharedParam::new(1.0),
            bypass: false,
        };
        processor.configure(grain_size);
        processor
    }

    /// Current grain size in samples.
    pub fn grain_size(&self) -> usize {
        self.grain_size
    }

    /// Current hop size in samples.
    pub fn hop_size(&self) -> usize {
        self.hop
    }

    /// Grain overlap fraction.
    pub fn overlap(&self) -> f32 {
        self.overlap
    }

    /// Change the grain size.
    ///
    /// Sizes outside 512..=4096 are ignored and the current configuration
    /// is kept. An accepted size rebuilds the window and clears all state.
    pub fn set_grain_size(&mut self, grain_size: usize) {
        if !(MIN_GRAIN_SIZE..=MAX_GRAIN_SIZE).contains(&grain_size) {
            #[cfg(feature = "tracing")]
            tracing::debug!(grain_size, current = self.grain_size, "grain size ignored");
            return;
        }
        self.configure(grain_size);

        #[cfg(feature = "tracing")]
        tracing::debug!(grain_size, hop = self.hop, "grain size changed");
    }

    fn configure(&mut self, grain_size: usize) {
        self.grain_size = grain_size;
        let hop = libm::roundf(grain_size as f32 * (1.0 - self.overlap)) as usize;
        self.hop = hop.clamp(1, grain_size);
        self.window.fill(0.0);
        fill_hann(&mut self.window[..grain_size]);
        self.reset_state();
    }

    /// Set the pitch factor, clamped to 0.5..=2.0.
    ///
    /// # Panics
    ///
    /// Panics if `factor` is NaN or infinite.
    pub fn set_pitch_factor(&mut self, factor: f32) {
        assert!(factor.is_finite(), "pitch factor must be finite, got {factor}");
        self.pitch.set(factor.clamp(MIN_PITCH, MAX_PITCH));
    }

    /// Pitch factor the next block will use.
    pub fn pitch_factor(&self) -> f32 {
        self.pitch.get().clamp(MIN_PITCH, MAX_PITCH)
    }

    /// Handle through which another thread can update the pitch factor.
    ///
    /// Values written through the handle are clamped when read. Writing a
    /// non-finite value makes the next block panic.
    pub fn pitch_handle(&self) -> SharedParam {
        self.pitch.clone()
    }

    /// Force passthrough regardless of pitch.
    pub fn set_bypass(&mut self, bypass: bool) {
        self.bypass = bypass;
    }

    /// Whether the explicit bypass flag is set.
    pub fn is_bypassed(&self) -> bool {
        self.bypass
    }

    /// Whether the next block passes through unchanged, either bypassed or
    /// at unity pitch. No latency applies then.
    pub fn is_passthrough(&self) -> bool {
        self.bypass || (self.pitch_factor() - 1.0).abs() <= BYPASS_TOLERANCE
    }

    /// Zero every buffer and return the cursors to their initial positions.
    pub fn clear(&mut self) {
        self.reset_state();

        #[cfg(feature = "tracing")]
        tracing::debug!(grain_size = self.grain_size, "grain processor cleared");
    }

    fn reset_state(&mut self) {
        self.input.fill(0.0);
        self.output.fill(0.0);
        self.write_pos = 0;
        // Grain k starts reading at k*H - 2G, so its last source sample is
        // the newest one written.
        self.read_pos = self.input_len() - READ_LAG_GRAINS * self.grain_size + self.hop;
        // Grain k lands at k*H, never behind the drain cursor.
        self.out_write = self.hop;
        self.out_read = 0;
        self.until_next_grain = self.hop;
    }

    #[inline]
    fn input_len(&self) -> usize {
        INPUT_GRAINS * self.grain_size
    }

    #[inline]
    fn output_len(&self) -> usize {
        OUTPUT_GRAINS * self.grain_size
    }

    /// Read the pitch for this block. `None` means pass through.
    fn block_pitch(&self) -> Option<f32> {
        let raw = self.pitch.get();
        assert!(raw.is_finite(), "pitch factor must be finite, got {raw}");
        let pitch = raw.clamp(MIN_PITCH, MAX_PITCH);
        if self.bypass || (pitch - 1.0).abs() <= BYPASS_TOLERANCE {
            None
        } else {
            Some(pitch)
        }
    }

    /// Process one mono block.
    ///
    /// # Panics
    ///
    /// Debug builds panic if `input` and `output` differ in length.
    pub fn process(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), output.len());
        let len = input.len().min(output.len());
        output[..len].copy_from_slice(&input[..len]);
        self.process_inplace(&mut output[..len]);
    }

    /// Process one mono block in place.
    pub fn process_inplace(&mut self, buffer: &mut [f32]) {
        if buffer.is_empty() {
            return;
        }
        if let Some(pitch) = self.block_pitch() {
            self.shift(buffer, pitch);
        }
    }

    /// Process a multi-channel block.
    ///
    /// Channel 0 is shifted and copied to every output channel. When
    /// bypassing, each channel is copied through unchanged and outputs
    /// without a matching input receive channel 0.
    pub fn process_channels(&mut self, inputs: &[&[f32]], outputs: &mut [&mut [f32]]) {
        let Some(first_in) = inputs.first() else {
            return;
        };
        if first_in.is_empty() {
            return;
        }

        let Some(pitch) = self.block_pitch() else {
            for (ch, out) in outputs.iter_mut().enumerate() {
                let inp = inputs.get(ch).unwrap_or(first_in);
                let n = out.len().min(inp.len());
                out[..n].copy_from_slice(&inp[..n]);
            }
            return;
        };

        let Some((first_out, rest)) = outputs.split_first_mut() else {
            return;
        };
        let n = first_out.len().min(first_in.len());
        first_out[..n].copy_from_slice(&first_in[..n]);
        self.shift(&mut first_out[..n], pitch);
        for out in rest {
            let m = out.len().min(n);
            out[..m].copy_from_slice(&first_out[..m]);
        }
    }

    /// Shift `buffer` in place, one hop-aligned chunk at a time so the
    /// accumulator is drained between any two grains.
    fn shift(&mut self, buffer: &mut [f32], pitch: f32) {
        let mut offset = 0;
        while offset < buffer.len() {
            let take = (buffer.len() - offset).min(self.until_next_grain);
            let chunk = &mut buffer[offset..offset + take];

            let in_len = self.input_len();
            for &sample in chunk.iter() {
                self.input[self.write_pos] = sample;
                self.write_pos = wrap_index(self.write_pos, 1, in_len);
            }

            self.until_next_grain -= take;
            if self.until_next_grain == 0 {
                self.emit_grain(pitch);
                self.until_next_grain = self.hop;
            }

            let out_len = self.output_len();
            for sample in chunk.iter_mut() {
                *sample = self.output[self.out_read];
                self.output[self.out_read] = 0.0;
                self.out_read = wrap_index(self.out_read, 1, out_len);
            }

            offset += take;
        }
    }

    fn emit_grain(&mut self, pitch: f32) {
        let in_len = self.input_len();
        let out_len = self.output_len();

        for i in 0..self.grain_size {
            let source = i as f32 * pitch;
            let whole = source as usize;
            let frac = source - whole as f32;

            let a = self.input[wrap_index(self.read_pos, whole, in_len)];
            let b = self.input[wrap_index(self.read_pos, whole + 1, in_len)];
            let slot = wrap_index(self.out_write, i, out_len);
            self.output[slot] += lerp(a, b, frac) * self.window[i];
        }

        self.read_pos = wrap_index(self.read_pos, self.hop, in_len);
        self.out_write = wrap_index(self.out_write, self.hop, out_len);
    }
}

impl Default for GrainProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_GRAIN_SIZE, DEFAULT_OVERLAP)
    }
}

impl BlockProcessor for GrainProcessor {
    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        self.process(input, output);
    }

    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        self.process_inplace(buffer);
    }

    fn reset(&mut self) {
        self.clear();
    }

    /// Two grains while shifting, zero while
    /// [`GrainProcessor::is_passthrough`] holds.
    fn latency_samples(&self) -> usize {
        if self.is_passthrough() {
            0
        } else {
            READ_LAG_GRAINS * self.grain_size
        }
    }
}
