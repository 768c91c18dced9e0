use motif_score_rs::fasta;
use polars::prelude::*;

#[test]
fn test_read_fasta() {
    let path = "tests/data/test1.fasta";
    let df = fasta::read_fasta(path).unwrap();
    assert_eq!(df.height(), 3);
    assert_eq!(df.width(), 2);

    let labels = df.column("label").unwrap().str().unwrap();
    assert_eq!(labels.get(0).unwrap(), "chr1-1000-1040_promoter");

    let sequences = df.column("sequence").unwrap().str().unwrap();
    assert!(sequences.get(0).unwrap().starts_with("GGGACTTTCC"));

    // test file does not exist
    let result = fasta::read_fasta("tests/data/nonexistent.fasta");
    assert!(result.is_err());
}

#[test]
fn test_read_fasta_uppercases_and_joins_wrapped_lines() {
    let path = "tests/data/test_wrapped_out.fasta";
    std::fs::write(path, ">wrapped\nacgt\nACGT\n").unwrap();

    let df = fasta::read_fasta(path).unwrap();
    let sequences = df.column("sequence").unwrap().str().unwrap();
    assert_eq!(sequences.get(0).unwrap(), "ACGTACGT");

    // clean up
    std::fs::remove_file(path).unwrap();
}

#[test]
fn test_write_fasta() {
    let path = "tests/data/test1_out.fasta";
    let df: DataFrame = df!(
        "label" => ["site_a", "site_b"],
        "sequence" => ["GGGACTTTCC", "GGAAATCCCC"],
    )
    .unwrap();

    fasta::write_fasta(&df, path).unwrap();

    let df_out = fasta::read_fasta(path).unwrap();
    assert_eq!(df_out.height(), 2);
    assert_eq!(df_out.width(), 2);
    let sequences = df_out.column("sequence").unwrap().str().unwrap();
    assert_eq!(sequences.get(1).unwrap(), "GGAAATCCCC");

    // clean up
    std::fs::remove_file(path).unwrap();
}

#[test]
fn test_reverse_complement() {
    assert_eq!(fasta::reverse_complement("ATCG").unwrap(), "CGAT");
    assert_eq!(fasta::reverse_complement("atcg").unwrap(), "CGAT");
    assert_eq!(fasta::reverse_complement("ACGTN").unwrap(), "NACGT");
    assert_eq!(fasta::reverse_complement("").unwrap(), "");

    let error = fasta::reverse_complement("ACXGT").unwrap_err();
    assert!(error.to_string().contains("position 2"), "{}", error);
}
