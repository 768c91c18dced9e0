use ndarray::Array2;

use crate::error::{MotifError, Result};
use crate::meme;
use crate::types::{base_index, Background, LogOddsPwm, Pwm, ScaledPwm, ALPHABET_SIZE};

/// Default pseudocount strength: the motif behaves as if built from this many
/// additional background-distributed sites.
pub const DEFAULT_PSEUDO_SITES: f64 = 0.1;

/// Converts a probability matrix into log2 likelihood ratios against a
/// background, smoothing every cell with `pseudo_sites` background-weighted
/// pseudo observations.
///
/// A row whose four probabilities are all equal carries no discriminating
/// information and becomes exactly 0 in every cell. The returned matrix
/// carries the global minimum and maximum over all cells, which fix the
/// dynamic range available to [`scale`].
///
/// # Errors
/// * `MotifError::InvalidBackground` - If any background entry is not
///   strictly positive; entries divide the likelihood ratio
pub fn log_likelihood_ratio(
    pwm: &Pwm,
    background: &Background,
    pseudo_sites: f64,
) -> Result<LogOddsPwm> {
    if let Some(frequency) = background.iter().find(|frequency| **frequency <= 0.0) {
        return Err(MotifError::InvalidBackground(format!(
            "all entries must be positive, found {}",
            frequency
        )));
    }

    let sites = f64::from(pwm.number_of_sites);
    let mut matrix = Array2::zeros((pwm.width(), ALPHABET_SIZE));
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for (row, probabilities) in pwm.matrix.rows().into_iter().enumerate() {
        let uniform = probabilities.iter().all(|p| *p == probabilities[0]);
        for (symbol, &probability) in probabilities.iter().enumerate() {
            let log_odds = if uniform {
                0.0
            } else {
                let adjusted = (sites * probability + pseudo_sites * background[symbol])
                    / (sites + pseudo_sites);
                (adjusted / background[symbol]).log2()
            };
            matrix[[row, symbol]] = log_odds;
            min = min.min(log_odds);
            max = max.max(log_odds);
        }
    }
    if pwm.width() == 0 {
        min = 0.0;
        max = 0.0;
    }

    Ok(LogOddsPwm {
        name: pwm.name.clone(),
        number_of_sites: pwm.number_of_sites,
        matrix,
        min,
        max,
    })
}

/// Quantizes a log-odds matrix onto the integer range `[0, target_range]`.
///
/// The multiplier is `floor(target_range / (max - min))`, so the achieved
/// `range` can fall short of the request. A degenerate matrix (`max == min`)
/// scales to all zeros, as does a `target_range` smaller than the span,
/// where the multiplier floors to 0 and every score collapses to 0.
pub fn scale(log_odds: &LogOddsPwm, target_range: u32) -> ScaledPwm {
    let span = log_odds.max - log_odds.min;
    let scale = if span > 0.0 {
        (f64::from(target_range) / span).floor() as u32
    } else {
        0
    };

    let matrix = log_odds
        .matrix
        .mapv(|value| ((value - log_odds.min) * f64::from(scale)).round() as u32);

    ScaledPwm {
        name: log_odds.name.clone(),
        number_of_sites: log_odds.number_of_sites,
        matrix,
        min_before_scaling: log_odds.min,
        scale,
        range: (span * f64::from(scale)).round() as u32,
    }
}

/// Scores the window `[begin, end)` of `sequence` against a scaled matrix.
///
/// Row `r` of the matrix scores `sequence[begin + r]`; a window shorter than
/// the motif scores only its leading rows, and characters outside the
/// alphabet contribute nothing. Never fails: an empty window scores 0.
pub fn score(matrix: &Array2<u32>, sequence: &str, begin: usize, end: usize) -> u64 {
    let bytes = sequence.as_bytes();
    let window = end.saturating_sub(begin).min(matrix.nrows());

    let mut total = 0u64;
    for row in 0..window {
        let Some(&base) = bytes.get(begin + row) else {
            break;
        };
        if let Some(symbol) = base_index(base) {
            total += u64::from(matrix[[row, symbol]]);
        }
    }
    total
}

/// Reads every motif in a MEME file and runs the full pipeline: log-odds
/// conversion against the file's own background, then quantization to
/// `target_range`. Motifs come back in file order.
pub fn read_scaled_pwms(filename: &str, target_range: u32) -> Result<Vec<ScaledPwm>> {
    let motif_file = meme::read_motif_file(filename)?;
    motif_file
        .motifs
        .iter()
        .map(|pwm| {
            let log_odds = log_likelihood_ratio(pwm, &motif_file.background, DEFAULT_PSEUDO_SITES)?;
            Ok(scale(&log_odds, target_range))
        })
        .collect()
}
