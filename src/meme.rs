use std::fs::File;
use std::io::{self, BufRead, BufReader};

use ndarray::Array2;

use crate::error::{MotifError, Result};
use crate::types::{base_index, Background, Pwm, ALPHABET_SIZE, UNIFORM_BACKGROUND};

/// Contents of one MEME-style motif stream: the declared background (uniform
/// when the file does not declare one) and every motif block in file order.
#[derive(Debug, Clone)]
pub struct MotifFile {
    pub background: Background,
    pub motifs: Vec<Pwm>,
}

/// Reads a MEME format motif file from disk.
///
/// # Errors
/// * `MotifError::Io` - If the file cannot be opened or read
/// * `MotifError::Parse` - If any motif block is malformed; the error names
///   the offending line and no motifs are returned
pub fn read_motif_file(filename: &str) -> Result<MotifFile> {
    let file = File::open(filename)?;
    read_motifs(BufReader::new(file))
}

/// Parses a MEME-style motif stream.
///
/// Recognizes the `Background letter frequencies` line and `MOTIF` blocks;
/// every other line is preamble and ignored. Each `MOTIF` block must carry a
/// `letter-probability matrix:` header declaring `alength= 4`, a width and a
/// positive `nsites=`, followed by exactly `width` rows of 4 probabilities.
pub fn read_motifs<R: BufRead>(reader: R) -> Result<MotifFile> {
    let mut lines = reader.lines().enumerate();
    let mut background = UNIFORM_BACKGROUND;
    let mut motifs = Vec::new();

    while let Some((index, line)) = lines.next() {
        let line = line?;
        if line.starts_with("Background letter frequencies") {
            let (number, frequencies) =
                next_line(&mut lines, index + 1, "background frequency values")?;
            background = parse_background(number, &frequencies)?;
        } else if line.starts_with("MOTIF") {
            let name = line
                .split_whitespace()
                .nth(1)
                .ok_or_else(|| MotifError::parse(index + 1, "MOTIF line is missing an identifier"))?
                .to_string();
            motifs.push(parse_motif(&mut lines, index + 1, name)?);
        }
    }

    Ok(MotifFile { background, motifs })
}

/// Advances to the next input line, failing with a truncation error that
/// points just past `after` when the stream ends early.
fn next_line<I>(lines: &mut I, after: usize, expected: &str) -> Result<(usize, String)>
where
    I: Iterator<Item = (usize, io::Result<String>)>,
{
    match lines.next() {
        Some((index, line)) => Ok((index + 1, line?)),
        None => Err(MotifError::parse(
            after,
            format!("unexpected end of input, expected {}", expected),
        )),
    }
}

fn parse_background(line_number: usize, line: &str) -> Result<Background> {
    let mut frequencies = [f64::NAN; ALPHABET_SIZE];
    let mut tokens = line.split_whitespace();

    while let Some(letter) = tokens.next() {
        let index = match letter.as_bytes() {
            [base] => base_index(*base),
            _ => None,
        }
        .ok_or_else(|| {
            MotifError::parse(line_number, format!("unknown alphabet symbol '{}'", letter))
        })?;
        let token = tokens.next().ok_or_else(|| {
            MotifError::parse(line_number, format!("missing frequency for '{}'", letter))
        })?;
        let value: f64 = token.parse().map_err(|_| {
            MotifError::parse(line_number, format!("invalid frequency '{}'", token))
        })?;
        if value < 0.0 {
            return Err(MotifError::parse(
                line_number,
                format!("negative frequency for '{}'", letter),
            ));
        }
        frequencies[index] = value;
    }

    if frequencies.iter().any(|frequency| frequency.is_nan()) {
        return Err(MotifError::parse(
            line_number,
            "background line must list frequencies for A, C, G and T",
        ));
    }
    Ok(frequencies)
}

fn parse_motif<I>(lines: &mut I, motif_line: usize, name: String) -> Result<Pwm>
where
    I: Iterator<Item = (usize, io::Result<String>)>,
{
    // the matrix header follows the MOTIF line, possibly after blank lines
    let (header_number, header) = loop {
        let (number, line) = next_line(lines, motif_line, "a letter-probability matrix header")?;
        if !line.trim().is_empty() {
            break (number, line);
        }
    };
    if !header.starts_with("letter-probability matrix:") {
        return Err(MotifError::parse(
            header_number,
            "expected a letter-probability matrix header",
        ));
    }
    let (width, number_of_sites) = parse_matrix_header(header_number, &header)?;

    let mut matrix = Array2::zeros((width, ALPHABET_SIZE));
    for row in 0..width {
        let (number, line) = next_line(lines, header_number, "a matrix row")?;
        let values = line
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|_| {
                    MotifError::parse(number, format!("invalid probability '{}'", token))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        if values.len() != ALPHABET_SIZE {
            return Err(MotifError::parse(
                number,
                format!(
                    "expected {} probabilities, found {}",
                    ALPHABET_SIZE,
                    values.len()
                ),
            ));
        }
        for (symbol, value) in values.into_iter().enumerate() {
            matrix[[row, symbol]] = value;
        }
    }

    Ok(Pwm {
        name,
        number_of_sites,
        matrix,
    })
}

/// Extracts `alength=`, `w=` and `nsites=` from a letter-probability header,
/// accepting the value either glued to the key or as the following token.
fn parse_matrix_header(line_number: usize, header: &str) -> Result<(usize, u32)> {
    let mut alphabet_length = None;
    let mut width = None;
    let mut number_of_sites = None;

    let mut tokens = header.split_whitespace();
    while let Some(token) = tokens.next() {
        let (key, rest) = match token.split_once('=') {
            Some(pair) => pair,
            None => continue,
        };
        let field = match key {
            "alength" => &mut alphabet_length,
            "w" => &mut width,
            "nsites" => &mut number_of_sites,
            _ => continue,
        };
        let value = if rest.is_empty() {
            tokens.next().ok_or_else(|| {
                MotifError::parse(line_number, format!("missing value for '{}='", key))
            })?
        } else {
            rest
        };
        let parsed: u32 = value.parse().map_err(|_| {
            MotifError::parse(line_number, format!("invalid value '{}' for '{}='", value, key))
        })?;
        *field = Some(parsed);
    }

    let alphabet_length = alphabet_length
        .ok_or_else(|| MotifError::parse(line_number, "missing alength= declaration"))?;
    if alphabet_length as usize != ALPHABET_SIZE {
        return Err(MotifError::parse(
            line_number,
            format!("unsupported alphabet size {}", alphabet_length),
        ));
    }
    let width = width.ok_or_else(|| MotifError::parse(line_number, "missing w= declaration"))?;
    let number_of_sites = number_of_sites
        .ok_or_else(|| MotifError::parse(line_number, "missing nsites= declaration"))?;
    if number_of_sites == 0 {
        return Err(MotifError::parse(line_number, "nsites= must be positive"));
    }

    Ok((width as usize, number_of_sites))
}
