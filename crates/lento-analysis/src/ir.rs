//! Impulse response metrics.
//!
//! Schroeder backward integration gives the energy decay curve (EDC); the
//! reverberation time is read off a straight-line fit to a stretch of it.
//! Used to check synthesized kernels against the tail length they were
//! asked for.

use lento_core::linear_to_db;

/// Sum of squares, accumulated in double precision.
pub fn energy(samples: &[f32]) -> f64 {
    samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum()
}

/// Root mean square. Zero for an empty slice.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (energy(samples) / samples.len() as f64).sqrt() as f32
}

/// Largest absolute sample.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
}

/// Energy decay curve in dB, 0 dB at the first sample.
///
/// `edc[n] = 10 log10(Σ_{k≥n} x[k]² / Σ_k x[k]²)`, floored at -200 dB.
/// A silent input yields a curve of -200 dB.
pub fn energy_decay_curve(ir: &[f32]) -> Vec<f32> {
    let mut remaining: Vec<f64> = Vec::with_capacity(ir.len());
    let mut sum = 0.0f64;
    for &s in ir.iter().rev() {
        sum += f64::from(s) * f64::from(s);
        remaining.push(sum);
    }
    remaining.reverse();

    let total = sum;
    remaining
        .into_iter()
        .map(|e| {
            if total > 0.0 {
                // 10 log10(power) == 20 log10(sqrt(power))
                linear_to_db((e / total).sqrt() as f32)
            } else {
                linear_to_db(0.0)
            }
        })
        .collect()
}

/// Reverberation-time figures for one impulse response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rt60Estimate {
    /// Time to fall 60 dB, extrapolated from T30 (or T20 when the curve
    /// never reaches -35 dB).
    pub rt60_seconds: f32,
    /// Raw fall time across -5 to -25 dB.
    pub t20_seconds: f32,
    /// Raw fall time across -5 to -35 dB, zero if not reached.
    pub t30_seconds: f32,
    /// Early decay time: fall from 0 to -10 dB, scaled to 60 dB.
    pub edt_seconds: f32,
}

/// Estimate reverberation time from an impulse response.
///
/// Returns `None` for an empty or silent response, or one that never
/// decays by 25 dB.
pub fn estimate_rt60(ir: &[f32], sample_rate: f32) -> Option<Rt60Estimate> {
    if ir.is_empty() || peak(ir) == 0.0 {
        return None;
    }
    let edc = energy_decay_curve(ir);

    let t20 = fall_time(&edc, -5.0, -25.0, sample_rate)?;
    let t30 = fall_time(&edc, -5.0, -35.0, sample_rate);
    let edt = fall_time(&edc, 0.0, -10.0, sample_rate).unwrap_or(0.0);

    let rt60_seconds = match t30 {
        Some(t30) => t30 * 2.0,
        None => t20 * 3.0,
    };

    Some(Rt60Estimate {
        rt60_seconds,
        t20_seconds: t20,
        t30_seconds: t30.unwrap_or(0.0),
        edt_seconds: edt * 6.0,
    })
}

/// Least-squares fall time (seconds) across `[from_db, to_db]` of the curve.
fn fall_time(edc: &[f32], from_db: f32, to_db: f32, sample_rate: f32) -> Option<f32> {
    let start = edc.iter().position(|&e| e <= from_db)?;
    let end = edc.iter().position(|&e| e <= to_db)?;
    if end <= start {
        return None;
    }

    let points = &edc[start..=end];
    let n = points.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = points.iter().map(|&y| f64::from(y)).sum::<f64>() / n;
    let (mut sxy, mut sxx) = (0.0f64, 0.0f64);
    for (i, &y) in points.iter().enumerate() {
        let dx = i as f64 - mean_x;
        sxy += dx * (f64::from(y) - mean_y);
        sxx += dx * dx;
    }
    let slope = sxy / sxx;
    if slope >= 0.0 {
        return None;
    }
    let samples = f64::from(from_db - to_db) / -slope;
    Some((samples / f64::from(sample_rate)) as f32)
}
