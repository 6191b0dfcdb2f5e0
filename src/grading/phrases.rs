use std::path::Path;

use serde::{Deserialize, Serialize};

use super::grade::{grade_scores, mean_score, LetterGrade};
use super::{GradingError, Result};

/// One mocked recognition result: the phrase and its fixed per-word scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseSample {
    #[serde(alias = "chinese")]
    pub text: String,
    pub pinyin: String,
    #[serde(alias = "wordScores")]
    pub scores: Vec<f32>,
}

impl PhraseSample {
    pub fn new(text: impl Into<String>, pinyin: impl Into<String>, scores: Vec<f32>) -> Self {
        Self {
            text: text.into(),
            pinyin: pinyin.into(),
            scores,
        }
    }

    pub fn mean_score(&self) -> Option<f64> {
        mean_score(&self.scores)
    }

    pub fn grade(&self) -> Option<LetterGrade> {
        grade_scores(&self.scores)
    }

    fn validate(&self, index: usize) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(GradingError::new(format!(
                "phrase {} has empty text",
                index
            )));
        }
        if self.scores.is_empty() {
            return Err(GradingError::new(format!(
                "phrase {} ({}) has no word scores",
                index, self.text
            )));
        }
        if let Some(bad) = self
            .scores
            .iter()
            .find(|score| !(0.0..=1.0).contains(*score))
        {
            return Err(GradingError::new(format!(
                "phrase {} ({}) score {} is outside [0, 1]",
                index, self.text, bad
            )));
        }
        Ok(())
    }
}

/// Non-empty collection of samples the mock recognizer draws from.
#[derive(Debug, Clone, PartialEq)]
pub struct PhraseBank {
    samples: Vec<PhraseSample>,
}

impl PhraseBank {
    /// The three phrases the widget ships with.
    pub fn builtin() -> Self {
        Self {
            samples: vec![
                PhraseSample::new("你好", "nǐ hǎo", vec![0.9, 0.8]),
                PhraseSample::new(
                    "我喜欢学习中文",
                    "wǒ xǐhuān xuéxí zhōngwén",
                    vec![0.9, 0.7, 0.5, 0.8],
                ),
                PhraseSample::new(
                    "今天天气很好",
                    "jīntiān tiānqì hěn hǎo",
                    vec![0.95, 0.6, 0.85, 0.9],
                ),
            ],
        }
    }

    pub fn from_samples(samples: Vec<PhraseSample>) -> Result<Self> {
        if samples.is_empty() {
            return Err(GradingError::new("phrase bank must contain at least one phrase"));
        }
        for (index, sample) in samples.iter().enumerate() {
            sample.validate(index)?;
        }
        Ok(Self { samples })
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let samples: Vec<PhraseSample> = serde_json::from_str(raw)
            .map_err(|err| GradingError::new(format!("invalid phrase bank JSON: {}", err)))?;
        Self::from_samples(samples)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            GradingError::new(format!("failed to read phrase bank {:?}: {}", path, err))
        })?;
        Self::from_json(&raw)
    }

    pub fn samples(&self) -> &[PhraseSample] {
        &self.samples
    }

    pub fn get(&self, index: usize) -> Option<&PhraseSample> {
        self.samples.get(index)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl Default for PhraseBank {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::{PhraseBank, PhraseSample};

    #[test]
    fn builtin_bank_is_valid() {
        let bank = PhraseBank::builtin();
        assert_eq!(bank.len(), 3);
        assert!(PhraseBank::from_samples(bank.samples().to_vec()).is_ok());
    }

    #[test]
    fn accepts_source_field_names() {
        let bank = PhraseBank::from_json(
            r#"[{"chinese": "谢谢", "pinyin": "xièxie", "wordScores": [0.7]}]"#,
        )
        .unwrap();
        assert_eq!(bank.get(0).unwrap().text, "谢谢");
    }

    #[test]
    fn rejects_out_of_range_scores() {
        let sample = PhraseSample::new("好", "hǎo", vec![1.2]);
        assert!(PhraseBank::from_samples(vec![sample]).is_err());
    }

    #[test]
    fn rejects_empty_bank() {
        assert!(PhraseBank::from_json("[]").is_err());
    }
}
