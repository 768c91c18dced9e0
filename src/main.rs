use motif_score_rs::types::UNIFORM_BACKGROUND;
use motif_score_rs::{distribution, scoring};

fn main() {
    let motifs = scoring::read_scaled_pwms("tests/data/test_motifs.meme", 1000).unwrap();
    for motif in &motifs {
        let probabilities = distribution::probability_distribution(&motif.matrix, &UNIFORM_BACKGROUND);
        println!(
            "{}: width {} scale {} range {} ({} reachable scores)",
            motif.name,
            motif.width(),
            motif.scale,
            motif.range,
            probabilities.len()
        );
    }
}
