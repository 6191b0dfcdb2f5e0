use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

const A_THRESHOLD: f64 = 0.85;
const B_THRESHOLD: f64 = 0.75;
const C_THRESHOLD: f64 = 0.60;
const D_THRESHOLD: f64 = 0.50;
/// Differences smaller than this count as equal to a threshold.
const GRADE_TOLERANCE: f64 = 1e-6;

/// Coarse bucketing of the mean per-word score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    A,
    B,
    C,
    D,
    F,
}

impl LetterGrade {
    /// Maps a mean score onto a letter using strict greater-than thresholds.
    pub fn from_mean(mean: f64) -> Self {
        if exceeds(mean, A_THRESHOLD) {
            LetterGrade::A
        } else if exceeds(mean, B_THRESHOLD) {
            LetterGrade::B
        } else if exceeds(mean, C_THRESHOLD) {
            LetterGrade::C
        } else if exceeds(mean, D_THRESHOLD) {
            LetterGrade::D
        } else {
            LetterGrade::F
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::A => "A",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        }
    }

    /// Short verdict shown beside the grade badge.
    pub fn verdict(&self) -> &'static str {
        match self {
            LetterGrade::A => "Excellent pronunciation!",
            LetterGrade::B => "Good job, keep practicing!",
            LetterGrade::C => "Fair effort, focus on the yellow words.",
            LetterGrade::D | LetterGrade::F => "Needs improvement, practice the red words.",
        }
    }
}

impl Display for LetterGrade {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn exceeds(mean: f64, threshold: f64) -> bool {
    mean - threshold > GRADE_TOLERANCE
}

/// Arithmetic mean of the per-word scores, `None` when there are none.
pub fn mean_score(scores: &[f32]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let total: f64 = scores.iter().map(|&score| score as f64).sum();
    Some(total / scores.len() as f64)
}

pub fn grade_scores(scores: &[f32]) -> Option<LetterGrade> {
    mean_score(scores).map(LetterGrade::from_mean)
}

#[cfg(test)]
mod tests {
    use super::{grade_scores, mean_score, LetterGrade};

    #[test]
    fn empty_scores_have_no_grade() {
        assert_eq!(mean_score(&[]), None);
        assert_eq!(grade_scores(&[]), None);
    }

    #[test]
    fn displays_single_letter() {
        assert_eq!(LetterGrade::C.to_string(), "C");
        assert_eq!(
            serde_json::to_string(&LetterGrade::A).unwrap(),
            "\"A\""
        );
    }

    #[test]
    fn verdicts_point_at_the_word_colors() {
        assert_eq!(LetterGrade::A.verdict(), "Excellent pronunciation!");
        assert_eq!(LetterGrade::B.verdict(), "Good job, keep practicing!");
        assert!(LetterGrade::C.verdict().contains("yellow"));
        assert_eq!(LetterGrade::D.verdict(), LetterGrade::F.verdict());
        assert!(LetterGrade::F.verdict().contains("red"));
    }

    #[test]
    fn negative_and_zero_means_fail() {
        assert_eq!(LetterGrade::from_mean(0.0), LetterGrade::F);
        assert_eq!(LetterGrade::from_mean(-1.0), LetterGrade::F);
    }
}
