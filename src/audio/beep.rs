use rodio::Source;
use std::f32::consts::PI;
use std::time::Duration;

const BEEP_FREQ_HZ: f32 = 880.0;
const BEEP_DURATION_MS: u64 = 250;

/// Short sine tone played when a recording starts.
pub struct BeepTone {
    sample_rate: u32,
    num_sample: usize,
    total_samples: usize,
}

impl BeepTone {
    pub fn new() -> Self {
        let sample_rate = 44100;
        Self {
            sample_rate,
            num_sample: 0,
            total_samples: (sample_rate as u64 * BEEP_DURATION_MS / 1000) as usize,
        }
    }
}

impl Default for BeepTone {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for BeepTone {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.num_sample >= self.total_samples {
            return None;
        }
        self.num_sample += 1;

        let t = self.num_sample as f32 / self.sample_rate as f32;
        let sample = (2.0 * PI * BEEP_FREQ_HZ * t).sin();

        Some(sample * 0.15) // Lower amplitude to prevent clipping
    }
}

impl Source for BeepTone {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.total_samples - self.num_sample)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_millis(BEEP_DURATION_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_is_finite_and_bounded() {
        let samples: Vec<f32> = BeepTone::new().collect();
        assert_eq!(samples.len(), 44100 * 250 / 1000);
        assert!(samples.iter().all(|s| s.abs() <= 0.15));
    }
}
