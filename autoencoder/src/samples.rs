//! Loading, downsampling and splitting of sample images.
//!
//! A sample is a fixed-length vector of pixel intensities
//! in [0, 1], stored row by row.

use crate::SampleError;

use std::fs;
use std::ops::Range;
use std::path::Path;

/// One image, as normalised pixel intensities.
pub type Sample = Box<[f64]>;

/// Reads `count` samples of `resolution` pixels from a raw
/// file holding one byte per pixel, samples back to back.
/// Intensities are divided by `intensity_range`.
///
/// # Errors
/// Returns an error if the file cannot be read or holds
/// fewer than `count·resolution` bytes. Extra bytes are ignored.
pub fn read_samples(
    path: &Path,
    resolution: usize,
    count: usize,
    intensity_range: f64,
) -> Result<Vec<Sample>, SampleError> {
    let bytes = fs::read(path).map_err(|source| SampleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let samples = parse_samples(&bytes, resolution, count, intensity_range)?;
    log::debug!("read {} samples from {:?}", samples.len(), path);
    Ok(samples)
}

/// Splits raw bytes into `count` samples of `resolution`
/// pixels, dividing each byte by `intensity_range`.
///
/// # Examples
/// ```
/// use autoencoder::samples::parse_samples;
///
/// let samples = parse_samples(&[0, 255, 51, 102, 9], 2, 2, 255.0).unwrap();
/// assert_eq!(&*samples[0], [0.0, 1.0]);
/// assert_eq!(&*samples[1], [0.2, 0.4]);
///
/// assert!(parse_samples(&[0, 255, 51], 2, 2, 255.0).is_err());
/// ```
pub fn parse_samples(
    bytes: &[u8],
    resolution: usize,
    count: usize,
    intensity_range: f64,
) -> Result<Vec<Sample>, SampleError> {
    let expected = resolution * count;
    if bytes.len() < expected {
        return Err(SampleError::ShortData {
            expected,
            found: bytes.len(),
        });
    }
    if resolution == 0 {
        return Ok(vec![Sample::default(); count]);
    }
    Ok(bytes[..expected]
        .chunks_exact(resolution)
        .map(|pixels| pixels.iter().map(|&p| f64::from(p) / intensity_range).collect())
        .collect())
}

/// Downsamples square images of side `side` by averaging
/// blocks of `factor`×`factor` pixels.
///
/// # Errors
/// Returns an error if `factor` does not divide `side`,
/// or if a sample does not hold `side²` pixels.
///
/// # Examples
/// ```
/// use autoencoder::samples::reduce_samples;
///
/// let image = vec![
///     0.0, 1.0, 0.5, 0.5,
///     1.0, 0.0, 0.5, 0.5,
///     0.0, 0.0, 1.0, 1.0,
///     0.0, 0.0, 1.0, 0.0,
/// ]
/// .into_boxed_slice();
///
/// let reduced = reduce_samples(&[image], 2, 4).unwrap();
/// assert_eq!(&*reduced[0], [0.5, 0.5, 0.0, 0.75]);
/// ```
pub fn reduce_samples(
    samples: &[Sample],
    factor: usize,
    side: usize,
) -> Result<Vec<Sample>, SampleError> {
    if factor == 0 || side % factor != 0 {
        return Err(SampleError::IndivisibleReduction { side, factor });
    }
    let reduced_side = side / factor;
    let block_size = (factor * factor) as f64;

    samples
        .iter()
        .map(|sample| {
            if sample.len() != side * side {
                return Err(SampleError::SampleLength {
                    expected: side * side,
                    found: sample.len(),
                });
            }
            let mut reduced = vec![0.0; reduced_side * reduced_side];
            for y in 0..side {
                for x in 0..side {
                    reduced[(y / factor) * reduced_side + x / factor] += sample[y * side + x];
                }
            }
            Ok(reduced.into_iter().map(|sum| sum / block_size).collect())
        })
        .collect()
}

/// Returns all `2^bits` vectors of `bits` binary values,
/// in counting order with the most significant bit first.
///
/// # Examples
/// ```
/// use autoencoder::samples::binary_patterns;
///
/// let patterns = binary_patterns(2);
/// assert_eq!(patterns.len(), 4);
/// assert_eq!(&*patterns[1], [0.0, 1.0]);
/// assert_eq!(&*patterns[2], [1.0, 0.0]);
/// ```
///
/// # Panics
/// This function panics if `2^bits` does not fit in a `usize`.
/// Use [`binary_pattern`] to generate a prefix of a larger set.
pub fn binary_patterns(bits: u32) -> Vec<Sample> {
    assert!(
        bits < usize::BITS,
        "2^{} binary patterns cannot be enumerated",
        bits
    );
    (0..1usize << bits)
        .map(|pattern| binary_pattern(bits, pattern))
        .collect()
}

/// The binary digits of `pattern`, most significant first,
/// padded to `bits` values.
pub fn binary_pattern(bits: u32, pattern: usize) -> Sample {
    (0..bits)
        .rev()
        .map(|bit| pattern.checked_shr(bit).map_or(0, |p| p & 1) as f64)
        .collect()
}

/// Index ranges of the training and validation samples
/// when splitting `count` samples at `proportion`.
///
/// With `end = floor(count·proportion) - 1`, training covers
/// `[0, end)` and validation `[end + 1, count)`: the sample
/// at `end` belongs to neither.
// TODO: decide whether the sample at `end` should go to training;
// the experiments run so far were scored with it dropped.
pub fn split_bounds(count: usize, proportion: f64) -> (Range<usize>, Range<usize>) {
    let boundary = (count as f64 * proportion).floor() as usize;
    let end = boundary.saturating_sub(1).min(count);
    (0..end, (end + 1).min(count)..count)
}

/// Splits samples into training and validation sets,
/// as described by [`split_bounds`].
///
/// # Examples
/// ```
/// use autoencoder::samples::{binary_patterns, split_samples};
///
/// let (training, validation) = split_samples(binary_patterns(4), 0.8);
/// assert_eq!(training.len(), 11);
/// assert_eq!(validation.len(), 4);
/// ```
pub fn split_samples(samples: Vec<Sample>, proportion: f64) -> (Vec<Sample>, Vec<Sample>) {
    let (training, validation) = split_bounds(samples.len(), proportion);
    let mut samples = samples;
    let validation = samples.split_off(validation.start);
    samples.truncate(training.end);
    (samples, validation)
}
