use ndarray::Array2;

use crate::types::Background;

/// Computes the exact probability mass function over every integer score a
/// scaled matrix can produce under `background`.
///
/// Works by incremental convolution: the running distribution over partial
/// sums starts as a point mass at 0, and each row folds every reachable sum
/// `s` with mass `p` into `s + matrix[row][symbol]` with weight
/// `p * background[symbol]`. The buffer is dense and indexed by absolute
/// score (cells are non-negative), growing by exactly the row maximum per
/// step, so its size is bounded by the cumulative score range rather than
/// the 4^width sequence count.
///
/// The result spans `[sum of row minima, sum of row maxima]`: index 0 is the
/// minimum possible cumulative score, unreachable scores in between hold
/// exactly 0, and the whole sequence sums to 1 up to float rounding. An
/// empty matrix yields the single point mass at 0.
pub fn probability_distribution(matrix: &Array2<u32>, background: &Background) -> Vec<f64> {
    let mut probabilities = vec![1.0];

    for row in matrix.rows() {
        let row_max = row.iter().max().copied().unwrap_or(0) as usize;
        let mut convolved = vec![0.0; probabilities.len() + row_max];
        for (sum, &mass) in probabilities.iter().enumerate() {
            if mass == 0.0 {
                continue;
            }
            for (symbol, &cell) in row.iter().enumerate() {
                convolved[sum + cell as usize] += mass * background[symbol];
            }
        }
        probabilities = convolved;
    }

    let min_sum: usize = matrix
        .rows()
        .into_iter()
        .map(|row| row.iter().min().copied().unwrap_or(0) as usize)
        .sum();
    probabilities.drain(..min_sum);
    probabilities
}

/// Tail-sums a score distribution into a p-value table: `pvalues[i]` is the
/// probability of scoring at least `i` points above the distribution's
/// minimum. `pvalues[0]` is 1 and the table is non-increasing.
pub fn pvalues(distribution: &[f64]) -> Vec<f64> {
    let mut pvalues = vec![0.0; distribution.len()];
    let mut tail = 0.0;
    for (index, &mass) in distribution.iter().enumerate().rev() {
        tail += mass;
        pvalues[index] = tail;
    }
    pvalues
}
