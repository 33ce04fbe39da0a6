//! Amplitude envelopes for scheduled notes and hits.
//!
//! Envelopes are rendered to a gain curve of a fixed length and multiplied
//! into the event they shape. Time for sample `i` is `i / sample_rate`.

/// Exponential decay `exp(-rate * t)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpDecay {
    /// Decay rate in 1/seconds.
    pub rate: f64,
}

impl ExpDecay {
    /// Creates a decay with the given rate.
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    /// Gain at time `t` seconds.
    #[inline]
    pub fn at(&self, t: f64) -> f64 {
        (-self.rate * t).exp()
    }

    /// Renders `num_samples` gain values.
    pub fn render(&self, num_samples: usize, sample_rate: u32) -> Vec<f64> {
        let sr = sample_rate as f64;
        (0..num_samples).map(|i| self.at(i as f64 / sr)).collect()
    }
}

/// Linear ramp up, flat hold, linear ramp down.
///
/// Ramps are truncated to the note length; when they overlap the release
/// ramp wins, matching a release written after the attack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackRelease {
    /// Attack time in seconds.
    pub attack: f64,
    /// Release time in seconds.
    pub release: f64,
}

impl AttackRelease {
    /// Creates an attack/release envelope.
    pub fn new(attack: f64, release: f64) -> Self {
        Self {
            attack: attack.max(0.0),
            release: release.max(0.0),
        }
    }

    /// Accordion-style chord swell (100 ms in, 200 ms out).
    pub fn pad() -> Self {
        Self::new(0.1, 0.2)
    }

    /// Breathy lead note (50 ms in, 100 ms out).
    pub fn breath() -> Self {
        Self::new(0.05, 0.1)
    }

    /// Renders `num_samples` gain values.
    pub fn render(&self, num_samples: usize, sample_rate: u32) -> Vec<f64> {
        let sr = sample_rate as f64;
        let attack = ((self.attack * sr) as usize).min(num_samples);
        let release = ((self.release * sr) as usize).min(num_samples);

        let mut curve = vec![1.0; num_samples];
        for (i, value) in ramp(attack).enumerate() {
            curve[i] = value;
        }
        let release_start = num_samples - release;
        for (i, value) in ramp(release).enumerate() {
            curve[release_start + i] = 1.0 - value;
        }
        curve
    }
}

/// `n` evenly spaced values from 0.0 to 1.0 inclusive.
fn ramp(n: usize) -> impl Iterator<Item = f64> {
    let denom = if n > 1 { (n - 1) as f64 } else { 1.0 };
    (0..n).map(move |i| i as f64 / denom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exp_decay_shape() {
        let curve = ExpDecay::new(25.0).render(1000, 1000);
        assert_eq!(curve[0], 1.0);
        assert!((curve[40] - (-1.0f64).exp()).abs() < 1e-12);
        assert!(curve.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_attack_release_endpoints() {
        let curve = AttackRelease::new(0.1, 0.2).render(1000, 1000);
        assert_eq!(curve[0], 0.0);
        assert_eq!(curve[99], 1.0);
        assert_eq!(curve[500], 1.0);
        assert_eq!(curve[800], 1.0);
        assert_eq!(curve[999], 0.0);
    }

    #[test]
    fn test_attack_release_short_note() {
        // Ramps longer than the note are truncated, never out of bounds.
        let curve = AttackRelease::pad().render(50, 1000);
        assert_eq!(curve.len(), 50);
        assert_eq!(curve[0], 1.0);
        assert_eq!(curve[49], 0.0);
    }

    #[test]
    fn test_empty_render() {
        assert!(AttackRelease::breath().render(0, 48000).is_empty());
        assert!(ExpDecay::new(4.0).render(0, 48000).is_empty());
    }
}
