use crate::error::{MotifError, Result};
use polars::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};

/// Reads sequences from a FASTA file into a Polars DataFrame.
///
/// # Arguments
/// * `filename` - Path to the FASTA file to read
///
/// # Returns
/// * `Result<DataFrame>` - A DataFrame with two columns:
///   - "label": The sequence identifiers (without '>' prefix)
///   - "sequence": The corresponding sequences in uppercase
///
/// # Errors
/// * Returns `MotifError::InvalidFileFormat` if no sequences are found or a
///   sequence line appears before any header
/// * Returns `MotifError::DataError` if DataFrame creation fails
/// * Returns `MotifError::Io` for file reading issues
pub fn read_fasta(filename: &str) -> Result<DataFrame> {
    let file = File::open(filename)?;
    let reader = BufReader::new(file);

    let mut labels: Vec<String> = Vec::new();
    let mut sequences: Vec<String> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix('>') {
            labels.push(header.to_string());
            sequences.push(String::new());
        } else {
            let current = sequences.last_mut().ok_or_else(|| {
                MotifError::InvalidFileFormat("sequence data before first header".into())
            })?;
            current.push_str(&line.to_uppercase());
        }
    }

    if labels.is_empty() {
        return Err(MotifError::InvalidFileFormat("No sequences found".into()));
    }

    let df = DataFrame::new(vec![
        Column::new("label".into(), labels),
        Column::new("sequence".into(), sequences),
    ])
    .map_err(|e| MotifError::DataError(e.to_string()))?;

    Ok(df)
}

/// Writes sequences from a Polars DataFrame to a FASTA file.
///
/// # Arguments
/// * `df` - DataFrame containing sequences with "label" and "sequence" columns
/// * `filename` - Path where the FASTA file should be written
///
/// # Errors
/// * Returns `MotifError::DataError` if required columns are missing
/// * Returns `MotifError::Io` for file writing issues
pub fn write_fasta(df: &DataFrame, filename: &str) -> Result<()> {
    let labels = column_str(df, "label")?;
    let sequences = column_str(df, "sequence")?;

    let mut file = File::create(filename)?;
    for (label, sequence) in labels.into_iter().zip(sequences) {
        writeln!(file, ">{}", label.unwrap_or_default())?;
        writeln!(file, "{}", sequence.unwrap_or_default())?;
    }

    Ok(())
}

fn column_str<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked> {
    df.column(name)
        .and_then(|column| column.str())
        .map_err(|e| MotifError::DataError(e.to_string()))
}

/// Generates the reverse complement of a DNA sequence.
///
/// A <-> T and C <-> G, case-insensitively; N passes through unchanged.
///
/// # Errors
/// * Returns `MotifError::InvalidSequence` naming the first position holding
///   a character other than A, C, G, T or N
pub fn reverse_complement(sequence: &str) -> Result<String> {
    sequence
        .bytes()
        .enumerate()
        .rev()
        .map(|(position, base)| match base.to_ascii_uppercase() {
            b'A' => Ok('T'),
            b'T' => Ok('A'),
            b'C' => Ok('G'),
            b'G' => Ok('C'),
            b'N' => Ok('N'),
            other => Err(MotifError::invalid_sequence(
                position,
                format!("unexpected character '{}'", other as char),
            )),
        })
        .collect()
}
