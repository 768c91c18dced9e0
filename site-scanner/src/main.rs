use clap::Parser;
use ndarray::Array2;
use polars::prelude::*;
use rayon::prelude::*;
use std::fs;
use std::path::Path;

use motif_score_rs::distribution::{probability_distribution, pvalues};
use motif_score_rs::scoring::{self, DEFAULT_PSEUDO_SITES};
use motif_score_rs::types::Background;
use motif_score_rs::{fasta, meme};

#[derive(thiserror::Error, Debug)]
pub enum ScannerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("Motif processing error: {0}")]
    Motif(#[from] motif_score_rs::error::MotifError),

    #[error("Unsupported output format, expected .csv or .parquet")]
    UnsupportedOutput,
}

#[derive(Parser)]
#[command(
    name = "site-scanner",
    about = "Scans DNA sequences for statistically significant motif matches",
    long_about = "A tool for locating transcription factor binding sites in DNA sequences. \
                  Each motif in a MEME file is converted to an integer log-odds matrix, its exact \
                  score distribution fixes a significance threshold, and every sequence window at \
                  or under the requested p-value is reported with its score and strand.",
    version,
    after_help = "Example usage:\n    \
                  site-scanner sequences.fasta motifs.meme hits.csv --pvalue 1e-4\n    \
                  site-scanner promoters.fasta jaspar.meme hits.parquet --range 10000 --forward-only",
    color = clap::ColorChoice::Always
)]
#[derive(Debug)]
struct Args {
    /// Path to input FASTA file with the sequences to scan
    #[arg(value_name = "FASTA_FILE")]
    fasta_file: String,

    /// Path to .meme format file containing the motifs to scan for
    #[arg(value_name = "PWM_FILE")]
    pwm_file: String,

    /// Path for output file (supports .csv or .parquet format)
    /// Will create output directory if it doesn't exist
    #[arg(value_name = "OUTPUT_FILE")]
    output_file: String,

    /// Target integer range for log-odds quantization
    /// Larger values give finer score and p-value resolution
    #[arg(long, default_value = "1000")]
    range: u32,

    /// Report windows whose match p-value is at or under this cutoff
    #[arg(long, default_value = "1e-4")]
    pvalue: f64,

    /// Scan the forward strand only instead of both strands
    #[arg(long)]
    forward_only: bool,
}

/// One strand-specific scoring matrix with its p-value lookup table.
struct StrandMatrix {
    name: String,
    strand: &'static str,
    matrix: Array2<u32>,
    min_score: u64,
    pvalues: Vec<f64>,
}

impl StrandMatrix {
    fn new(name: String, strand: &'static str, matrix: Array2<u32>, background: &Background) -> Self {
        let distribution = probability_distribution(&matrix, background);
        let min_score = matrix
            .rows()
            .into_iter()
            .map(|row| u64::from(row.iter().min().copied().unwrap_or(0)))
            .sum();
        StrandMatrix {
            name,
            strand,
            matrix,
            min_score,
            pvalues: pvalues(&distribution),
        }
    }

    /// P-value of scoring at least `score` on a random background window.
    /// Scores under the distribution's support (possible when a window holds
    /// characters outside the alphabet) are certain.
    fn pvalue(&self, score: u64) -> f64 {
        if score < self.min_score {
            return 1.0;
        }
        let index = (score - self.min_score) as usize;
        self.pvalues.get(index).copied().unwrap_or(0.0)
    }
}

fn prepare_motifs(args: &Args) -> Result<Vec<StrandMatrix>, ScannerError> {
    let motif_file = meme::read_motif_file(&args.pwm_file)?;
    let background = motif_file.background;

    let mut matrices = Vec::new();
    for pwm in &motif_file.motifs {
        let log_odds = scoring::log_likelihood_ratio(pwm, &background, DEFAULT_PSEUDO_SITES)?;
        let scaled = scoring::scale(&log_odds, args.range);
        let reverse = (!args.forward_only).then(|| scaled.reverse_complement());
        matrices.push(StrandMatrix::new(
            scaled.name.clone(),
            "+",
            scaled.matrix,
            &background,
        ));
        if let Some(reverse) = reverse {
            matrices.push(StrandMatrix::new(
                reverse.name.clone(),
                "-",
                reverse.matrix,
                &background,
            ));
        }
    }
    Ok(matrices)
}

struct Hit {
    label: String,
    motif: String,
    strand: &'static str,
    position: i64,
    score: i64,
    pvalue: f64,
}

fn scan_sequences(
    df: &DataFrame,
    motifs: &[StrandMatrix],
    cutoff: f64,
) -> Result<DataFrame, ScannerError> {
    let labels = df.column("label")?.str()?;
    let sequences = df.column("sequence")?.str()?;
    let records: Vec<(String, String)> = labels
        .into_iter()
        .zip(sequences)
        .filter_map(|(label, sequence)| Some((label?.to_string(), sequence?.to_string())))
        .collect();

    println!("{} sequences to scan", records.len());

    let hits: Vec<Hit> = records
        .par_iter()
        .flat_map_iter(|(label, sequence)| {
            let mut hits = Vec::new();
            for motif in motifs {
                let width = motif.matrix.nrows();
                if width == 0 || sequence.len() < width {
                    continue;
                }
                for begin in 0..=sequence.len() - width {
                    let score = scoring::score(&motif.matrix, sequence, begin, begin + width);
                    let pvalue = motif.pvalue(score);
                    if pvalue <= cutoff {
                        hits.push(Hit {
                            label: label.clone(),
                            motif: motif.name.clone(),
                            strand: motif.strand,
                            position: begin as i64,
                            score: score as i64,
                            pvalue,
                        });
                    }
                }
            }
            hits
        })
        .collect();

    println!("{} significant matches found", hits.len());

    let df = DataFrame::new(vec![
        Column::new(
            "label".into(),
            hits.iter().map(|hit| hit.label.clone()).collect::<Vec<String>>(),
        ),
        Column::new(
            "motif".into(),
            hits.iter().map(|hit| hit.motif.clone()).collect::<Vec<String>>(),
        ),
        Column::new(
            "strand".into(),
            hits.iter().map(|hit| hit.strand.to_string()).collect::<Vec<String>>(),
        ),
        Column::new(
            "position".into(),
            hits.iter().map(|hit| hit.position).collect::<Vec<i64>>(),
        ),
        Column::new(
            "score".into(),
            hits.iter().map(|hit| hit.score).collect::<Vec<i64>>(),
        ),
        Column::new(
            "pvalue".into(),
            hits.iter().map(|hit| hit.pvalue).collect::<Vec<f64>>(),
        ),
    ])?;

    Ok(df)
}

fn write_output(mut df: DataFrame, path: &str) -> Result<(), ScannerError> {
    match Path::new(path).extension().and_then(|extension| extension.to_str()) {
        Some("csv") => {
            let mut file = fs::File::create(path)?;
            CsvWriter::new(&mut file).finish(&mut df)?;
        }
        Some("parquet") => {
            let file = fs::File::create(path)?;
            ParquetWriter::new(file).finish(&mut df)?;
        }
        _ => return Err(ScannerError::UnsupportedOutput),
    }
    Ok(())
}

fn main() -> Result<(), ScannerError> {
    let start_time = std::time::Instant::now();

    let args = Args::parse();

    // Create output directory if it doesn't exist
    if let Some(parent) = Path::new(&args.output_file).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let sequences = fasta::read_fasta(&args.fasta_file)?;
    let motifs = prepare_motifs(&args)?;
    println!(
        "{} strand matrices prepared from {}",
        motifs.len(),
        args.pwm_file
    );

    let results = scan_sequences(&sequences, &motifs, args.pvalue)?;
    write_output(results, &args.output_file)?;

    let elapsed = start_time.elapsed();
    println!(
        "Total execution time: {:.4} minutes",
        elapsed.as_secs_f64() / 60.0
    );

    Ok(())
}
