use std::io::Cursor;

use approx::assert_relative_eq;
use motif_score_rs::error::MotifError;
use motif_score_rs::meme;

const RELA: &str = "\
MEME version 4

ALPHABET= ACGT

strands: +

Background letter frequencies
A 0.29 C 0.21 G 0.21 T 0.29

MOTIF JASPAR2014.MA0107.1 RELA

letter-probability matrix: alength= 4 w= 10 nsites= 18 E= 0
  0.000000        0.222222        0.611111        0.166667
  0.000000        0.000000        0.944444        0.055556
  0.000000        0.000000        1.000000        0.000000
  0.611111        0.000000        0.388889        0.000000
  0.555556        0.166667        0.222222        0.055556
  0.111111        0.000000        0.000000        0.888889
  0.000000        0.000000        0.000000        1.000000
  0.000000        0.111111        0.000000        0.888889
  0.000000        1.000000        0.000000        0.000000
  0.000000        1.000000        0.000000        0.000000
";

#[test]
fn parses_single_motif_block() {
    let motif_file = meme::read_motifs(Cursor::new(RELA)).unwrap();
    assert_eq!(motif_file.motifs.len(), 1);

    let pwm = &motif_file.motifs[0];
    assert_eq!(pwm.name, "JASPAR2014.MA0107.1");
    assert_eq!(pwm.number_of_sites, 18);
    assert_eq!(pwm.width(), 10);
    assert_eq!(pwm.matrix.ncols(), 4);

    assert_relative_eq!(pwm.matrix[[0, 0]], 0.0);
    assert_relative_eq!(pwm.matrix[[0, 1]], 0.222222);
    assert_relative_eq!(pwm.matrix[[3, 2]], 0.388889);
    assert_relative_eq!(pwm.matrix[[6, 3]], 1.0);
    assert_relative_eq!(pwm.matrix[[9, 1]], 1.0);
}

#[test]
fn parses_background_line() {
    let motif_file = meme::read_motifs(Cursor::new(RELA)).unwrap();
    assert_eq!(motif_file.background, [0.29, 0.21, 0.21, 0.29]);
}

#[test]
fn defaults_to_uniform_background() {
    let input = "\
MOTIF example

letter-probability matrix: alength= 4 w= 1 nsites= 5 E= 0
0.1 0.2 0.3 0.4
";
    let motif_file = meme::read_motifs(Cursor::new(input)).unwrap();
    assert_eq!(motif_file.background, [0.25, 0.25, 0.25, 0.25]);
}

#[test]
fn reads_motif_file_from_disk() {
    let motif_file = meme::read_motif_file("tests/data/test_motifs.meme").unwrap();
    assert_eq!(motif_file.motifs.len(), 1);
    assert_eq!(motif_file.motifs[0].name, "JASPAR2014.MA0107.1");
    assert_eq!(motif_file.background, [0.29, 0.21, 0.21, 0.29]);

    // test file does not exist
    let result = meme::read_motif_file("tests/data/nonexistent.meme");
    assert!(result.is_err());
}

#[test]
fn preserves_motif_order() {
    let input = "\
MOTIF first FOO

letter-probability matrix: alength= 4 w= 1 nsites= 2 E= 0
1.0 0.0 0.0 0.0

MOTIF second BAR

letter-probability matrix: alength= 4 w= 2 nsites= 3 E= 0
0.0 1.0 0.0 0.0
0.0 0.0 1.0 0.0
";
    let motif_file = meme::read_motifs(Cursor::new(input)).unwrap();
    let names: Vec<&str> = motif_file
        .motifs
        .iter()
        .map(|pwm| pwm.name.as_str())
        .collect();
    assert_eq!(names, ["first", "second"]);
    assert_eq!(motif_file.motifs[1].width(), 2);
}

#[test]
fn rejects_wrong_alphabet_size() {
    let input = "\
MOTIF example

letter-probability matrix: alength= 6 w= 2 nsites= 10 E= 0
";
    let error = meme::read_motifs(Cursor::new(input)).unwrap_err();
    match error {
        MotifError::Parse { line, message } => {
            assert_eq!(line, 3);
            assert!(message.contains("alphabet size"), "{}", message);
        }
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn rejects_non_numeric_probability() {
    let input = "\
MOTIF example
letter-probability matrix: alength= 4 w= 1 nsites= 5 E= 0
0.1 oops 0.3 0.4
";
    let error = meme::read_motifs(Cursor::new(input)).unwrap_err();
    match error {
        MotifError::Parse { line, message } => {
            assert_eq!(line, 3);
            assert!(message.contains("oops"), "{}", message);
        }
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn rejects_truncated_matrix() {
    let input = "\
MOTIF example
letter-probability matrix: alength= 4 w= 3 nsites= 5 E= 0
0.1 0.2 0.3 0.4
0.4 0.3 0.2 0.1
";
    let error = meme::read_motifs(Cursor::new(input)).unwrap_err();
    assert!(matches!(error, MotifError::Parse { .. }), "{:?}", error);
}

#[test]
fn rejects_row_with_wrong_field_count() {
    let input = "\
MOTIF example
letter-probability matrix: alength= 4 w= 1 nsites= 5 E= 0
0.5 0.5
";
    let error = meme::read_motifs(Cursor::new(input)).unwrap_err();
    match error {
        MotifError::Parse { line, message } => {
            assert_eq!(line, 3);
            assert!(message.contains("expected 4"), "{}", message);
        }
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn rejects_zero_nsites() {
    let input = "\
MOTIF example
letter-probability matrix: alength= 4 w= 1 nsites= 0 E= 0
0.1 0.2 0.3 0.4
";
    let error = meme::read_motifs(Cursor::new(input)).unwrap_err();
    assert!(matches!(error, MotifError::Parse { line: 2, .. }), "{:?}", error);
}

#[test]
fn rejects_missing_motif_identifier() {
    let input = "MOTIF\n";
    let error = meme::read_motifs(Cursor::new(input)).unwrap_err();
    assert!(matches!(error, MotifError::Parse { line: 1, .. }), "{:?}", error);
}
