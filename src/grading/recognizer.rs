use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::phrases::{PhraseBank, PhraseSample};
use super::{GradingError, Result};

/// Produces the phrase a listening cycle will publish.
pub trait Recognizer: Send {
    fn recognize(&mut self) -> Result<PhraseSample>;
}

/// Picks a phrase uniformly at random from a fixed bank.
pub struct MockRecognizer {
    bank: PhraseBank,
    rng: StdRng,
}

impl MockRecognizer {
    pub fn new(bank: PhraseBank, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { bank, rng }
    }

    pub fn bank(&self) -> &PhraseBank {
        &self.bank
    }
}

impl Recognizer for MockRecognizer {
    fn recognize(&mut self) -> Result<PhraseSample> {
        if self.bank.is_empty() {
            return Err(GradingError::new("phrase bank is empty"));
        }
        let index = self.rng.gen_range(0..self.bank.len());
        debug!(index, "mock recognizer selected phrase");
        self.bank
            .get(index)
            .cloned()
            .ok_or_else(|| GradingError::new(format!("phrase {} missing from bank", index)))
    }
}

#[cfg(test)]
mod tests {
    use super::{MockRecognizer, Recognizer};
    use crate::grading::PhraseBank;

    #[test]
    fn seeded_recognizers_agree() {
        let mut first = MockRecognizer::new(PhraseBank::builtin(), Some(7));
        let mut second = MockRecognizer::new(PhraseBank::builtin(), Some(7));
        for _ in 0..10 {
            assert_eq!(first.recognize().unwrap(), second.recognize().unwrap());
        }
    }

    #[test]
    fn every_builtin_phrase_is_reachable() {
        let mut recognizer = MockRecognizer::new(PhraseBank::builtin(), Some(42));
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(recognizer.recognize().unwrap().text);
        }
        assert_eq!(seen.len(), recognizer.bank().len());
    }
}
