use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Number of symbols in the nucleotide alphabet
pub const ALPHABET_SIZE: usize = 4;

/// Alphabet symbols in matrix column order
pub const ALPHABET: [char; ALPHABET_SIZE] = ['A', 'C', 'G', 'T'];

/// Background frequency of each symbol, aligned with ALPHABET order
pub type Background = [f64; ALPHABET_SIZE];

/// Uniform background: every nucleotide equally likely
pub const UNIFORM_BACKGROUND: Background = [0.25, 0.25, 0.25, 0.25];

static BASE_INDEX: phf::Map<u8, usize> = phf::phf_map! {
    b'A' => 0,
    b'a' => 0,
    b'C' => 1,
    b'c' => 1,
    b'G' => 2,
    b'g' => 2,
    b'T' => 3,
    b't' => 3,
};

/// Maps a nucleotide byte to its alphabet index, case-insensitively.
/// Anything outside {A, C, G, T} has no index.
pub fn base_index(base: u8) -> Option<usize> {
    BASE_INDEX.get(&base).copied()
}

/// A position probability matrix parsed from a motif file.
///
/// One row per motif position, one column per alphabet symbol. Rows hold
/// probabilities; `number_of_sites` is the number of binding sites the motif
/// was built from and scales the pseudocount correction downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pwm {
    pub name: String,
    pub number_of_sites: u32,
    pub matrix: Array2<f64>,
}

impl Pwm {
    /// Motif width (number of sequence positions)
    pub fn width(&self) -> usize {
        self.matrix.nrows()
    }
}

/// A probability matrix transformed into log2 likelihood ratios against a
/// background, together with the extrema over every cell.
///
/// Produced by [`crate::scoring::log_likelihood_ratio`]; `min` and `max` fix
/// the dynamic range available to integer scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogOddsPwm {
    pub name: String,
    pub number_of_sites: u32,
    pub matrix: Array2<f64>,
    pub min: f64,
    pub max: f64,
}

impl LogOddsPwm {
    pub fn width(&self) -> usize {
        self.matrix.nrows()
    }
}

/// An integer-quantized log-odds matrix.
///
/// Each cell is `round((log_odds - min_before_scaling) * scale)`, so cells
/// are non-negative and bounded by `range`. Integer cells are what make the
/// exact score-distribution computation tractable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaledPwm {
    pub name: String,
    pub number_of_sites: u32,
    pub matrix: Array2<u32>,
    pub min_before_scaling: f64,
    pub scale: u32,
    pub range: u32,
}

impl ScaledPwm {
    pub fn width(&self) -> usize {
        self.matrix.nrows()
    }

    /// The same motif read on the opposite strand: rows reversed and columns
    /// swapped A<->T and C<->G. Scoring the reverse complement of a window
    /// with `self` equals scoring the window itself with this matrix.
    pub fn reverse_complement(&self) -> ScaledPwm {
        let width = self.matrix.nrows();
        let mut matrix = Array2::zeros((width, ALPHABET_SIZE));
        for row in 0..width {
            for symbol in 0..ALPHABET_SIZE {
                matrix[[width - 1 - row, ALPHABET_SIZE - 1 - symbol]] = self.matrix[[row, symbol]];
            }
        }
        ScaledPwm {
            name: self.name.clone(),
            number_of_sites: self.number_of_sites,
            matrix,
            min_before_scaling: self.min_before_scaling,
            scale: self.scale,
            range: self.range,
        }
    }
}
