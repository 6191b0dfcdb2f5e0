use serde::Serialize;

const GOOD_SCORE: f32 = 0.8;
const FAIR_SCORE: f32 = 0.6;

/// Display bucket for a single scored unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreBand {
    Good,
    Fair,
    Poor,
    Unscored,
}

impl ScoreBand {
    pub fn from_score(score: Option<f32>) -> Self {
        match score {
            None => ScoreBand::Unscored,
            Some(value) if value >= GOOD_SCORE => ScoreBand::Good,
            Some(value) if value >= FAIR_SCORE => ScoreBand::Fair,
            Some(_) => ScoreBand::Poor,
        }
    }

    pub fn is_scored(&self) -> bool {
        !matches!(self, ScoreBand::Unscored)
    }
}

/// A character or pinyin syllable paired with its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayUnit {
    pub label: String,
    pub score: Option<f32>,
    pub band: ScoreBand,
}

impl DisplayUnit {
    fn new(label: impl Into<String>, score: Option<f32>) -> Self {
        Self {
            label: label.into(),
            score,
            band: ScoreBand::from_score(score),
        }
    }
}

/// Both display rows for a recognized phrase.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlignedRows {
    pub characters: Vec<DisplayUnit>,
    pub pinyin: Vec<DisplayUnit>,
}

pub fn align(text: &str, pinyin: &str, scores: &[f32]) -> AlignedRows {
    AlignedRows {
        characters: character_units(text, pinyin, scores),
        pinyin: pinyin_units(pinyin, scores),
    }
}

pub fn pinyin_tokens(pinyin: &str) -> Vec<&str> {
    pinyin.split_whitespace().collect()
}

/// One unit per character, truncated to the number of pinyin tokens.
pub fn character_units(text: &str, pinyin: &str, scores: &[f32]) -> Vec<DisplayUnit> {
    let syllables = pinyin_tokens(pinyin).len();
    text.chars()
        .take(syllables)
        .enumerate()
        .map(|(index, ch)| DisplayUnit::new(ch, scores.get(index).copied()))
        .collect()
}

pub fn pinyin_units(pinyin: &str, scores: &[f32]) -> Vec<DisplayUnit> {
    pinyin_tokens(pinyin)
        .into_iter()
        .enumerate()
        .map(|(index, token)| DisplayUnit::new(token, scores.get(index).copied()))
        .collect()
}
