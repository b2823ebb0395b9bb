//! Length conversion of sample lines to the display width.
//!
//! Mild ratios use nearest-neighbour lookup; a source at least twice as long
//! as the target is box-averaged so narrow peaks are not simply skipped.

use crate::error::{Error, Result};

/// Resample `data` to exactly `target_length` values.
pub fn resample(data: &[f64], target_length: usize) -> Result<Vec<f64>> {
    if data.is_empty() {
        return Err(Error::Precondition("cannot resample an empty line".into()));
    }
    if target_length == 0 {
        return Err(Error::Precondition("target length must be positive".into()));
    }

    let source_length = data.len() as f64;
    let last = data.len() - 1;
    // Number of input samples feeding each output sample
    let ratio = source_length / target_length as f64;

    let result = (0..target_length)
        .map(|t| {
            if ratio < 2.0 {
                // floor(len * t / target) in integers, so equal lengths map 1:1 exactly
                data[(data.len() * t / target_length).min(last)]
            } else {
                let fract = t as f64 / target_length as f64;
                let center = source_length * fract;
                let points = ratio as usize;
                let sum: f64 = (0..points)
                    .map(|i| {
                        // Truncate toward zero, then clamp so edge samples are repeated
                        let source_x = (center - ratio / 2.0 + i as f64) as i64;
                        data[source_x.clamp(0, last as i64) as usize]
                    })
                    .sum();
                sum / points as f64
            }
        })
        .collect();

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_length_always_matches_target() {
        let lengths = [1usize, 2, 3, 7, 50, 320, 1000];
        for &src in &lengths {
            let data: Vec<f64> = (0..src).map(|i| i as f64 / src as f64).collect();
            for &target in &lengths {
                assert_eq!(resample(&data, target).unwrap().len(), target);
            }
        }
    }

    #[test]
    fn equal_length_is_identity() {
        let data = vec![0.1, 0.9, 0.4, 0.0, 1.0];
        assert_eq!(resample(&data, data.len()).unwrap(), data);
    }

    #[test]
    fn identity_holds_for_awkward_lengths() {
        let data: Vec<f64> = (0..49).map(|i| i as f64 / 48.0).collect();
        assert_eq!(resample(&data, 49).unwrap(), data);
    }

    #[test]
    fn single_sample_fills_whole_width() {
        let out = resample(&[0.25], 320).unwrap();
        assert!(out.iter().all(|&v| v == 0.25));
    }

    #[test]
    fn upsampling_repeats_nearest_sample() {
        let out = resample(&[0.0, 1.0], 4).unwrap();
        assert_eq!(out, vec![0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn mild_downsampling_picks_nearest() {
        // ratio 1.5 stays on the nearest-neighbour path
        let data = vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5];
        let out = resample(&data, 4).unwrap();
        assert_eq!(out, vec![0.0, 0.1, 0.3, 0.4]);
    }

    #[test]
    fn heavy_downsampling_averages_blocks() {
        // ratio 2: each output averages source[2t - 1] and source[2t], clamped at 0
        let data = vec![1.0, 3.0, 5.0, 7.0];
        let out = resample(&data, 2).unwrap();
        assert_eq!(out, vec![1.0, 4.0]);
    }

    #[test]
    fn averaging_keeps_input_scale() {
        let data = vec![0.5; 1000];
        let out = resample(&data, 7).unwrap();
        assert!(out.iter().all(|&v| (v - 0.5).abs() < 1e-12));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(resample(&[], 10), Err(Error::Precondition(_))));
    }

    #[test]
    fn rejects_zero_target() {
        assert!(matches!(resample(&[0.5], 0), Err(Error::Precondition(_))));
    }
}
