use approx::assert_relative_eq;
use tonegrader::grading::alignment::align;
use tonegrader::grading::{grade_scores, mean_score, LetterGrade, PhraseBank, ScoreBand};

#[test]
fn thresholds_are_strictly_greater_than() {
    assert_eq!(LetterGrade::from_mean(0.85), LetterGrade::B);
    assert_eq!(LetterGrade::from_mean(0.8501), LetterGrade::A);
    assert_eq!(LetterGrade::from_mean(0.75), LetterGrade::C);
    assert_eq!(LetterGrade::from_mean(0.60), LetterGrade::D);
    assert_eq!(LetterGrade::from_mean(0.50), LetterGrade::F);
    assert_eq!(LetterGrade::from_mean(0.0), LetterGrade::F);
}

#[test]
fn means_either_side_of_each_threshold() {
    let cases = [
        (0.8501, LetterGrade::A),
        (0.8499, LetterGrade::B),
        (0.7501, LetterGrade::B),
        (0.7499, LetterGrade::C),
        (0.6001, LetterGrade::C),
        (0.5999, LetterGrade::D),
        (0.5001, LetterGrade::D),
        (0.4999, LetterGrade::F),
    ];
    for (mean, grade) in cases {
        assert_eq!(LetterGrade::from_mean(mean), grade, "mean {mean}");
    }
}

#[test]
fn differences_within_a_millionth_count_as_the_threshold() {
    assert_eq!(LetterGrade::from_mean(0.85 + 5e-7), LetterGrade::B);
    assert_eq!(LetterGrade::from_mean(0.85 + 2e-6), LetterGrade::A);
    assert_eq!(LetterGrade::from_mean(0.50 + 5e-7), LetterGrade::F);
    assert_eq!(LetterGrade::from_mean(0.50 + 2e-6), LetterGrade::D);
}

#[test]
fn builtin_phrases_grade_end_to_end() {
    let bank = PhraseBank::builtin();
    let expected = [
        (0.85, LetterGrade::B),
        (0.725, LetterGrade::C),
        (0.825, LetterGrade::B),
    ];
    for (sample, (mean, grade)) in bank.samples().iter().zip(expected) {
        let computed = sample.mean_score().expect("builtin phrases are scored");
        assert_relative_eq!(computed, mean, epsilon = 1e-6);
        assert_eq!(sample.grade(), Some(grade), "phrase {}", sample.text);
    }
}

#[test]
fn empty_scores_have_no_grade() {
    assert!(mean_score(&[]).is_none());
    assert!(grade_scores(&[]).is_none());
}

#[test]
fn rows_never_run_past_the_shorter_sequence() {
    let rows = align("我喜欢学习中文", "wǒ xǐhuān xuéxí zhōngwén", &[0.9, 0.7, 0.5, 0.8]);
    let characters: String = rows.characters.iter().map(|unit| unit.label.as_str()).collect();
    assert_eq!(characters, "我喜欢学");
    assert_eq!(rows.pinyin.len(), 4);
    assert_eq!(rows.characters[2].band, ScoreBand::Poor);
    assert_eq!(rows.pinyin[1].band, ScoreBand::Fair);

    let short = align("你", "nǐ hǎo", &[0.9, 0.8]);
    assert_eq!(short.characters.len(), 1);
    assert_eq!(short.pinyin.len(), 2);
}

#[test]
fn missing_scores_render_unscored() {
    let rows = align("今天天气很好", "jīntiān tiānqì hěn hǎo", &[0.95]);
    assert_eq!(rows.characters[0].band, ScoreBand::Good);
    assert!(rows.characters[1..]
        .iter()
        .all(|unit| unit.band == ScoreBand::Unscored && unit.score.is_none()));
    assert_eq!(rows.pinyin[3].band, ScoreBand::Unscored);
}

#[test]
fn zero_score_is_poor_not_neutral() {
    let rows = align("你好", "nǐ hǎo", &[0.0, 1.0]);
    assert_eq!(rows.characters[0].band, ScoreBand::Poor);
    assert_eq!(rows.characters[1].band, ScoreBand::Good);
}
