use eframe::egui::{self, Color32, RichText};

use crate::grading::{DisplayUnit, ScoreBand};

pub const CHARACTER_SIZE: f32 = 30.0;
pub const PINYIN_SIZE: f32 = 15.0;

/// A wrapped row of characters or syllables colored by score.
pub struct ScoredRow<'a> {
    pub units: &'a [DisplayUnit],
    pub text_size: f32,
}

impl<'a> ScoredRow<'a> {
    pub fn show(&self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing.x = 6.0;
            for unit in self.units {
                let mut text = RichText::new(&unit.label)
                    .size(self.text_size)
                    .color(band_color(unit.band));
                if unit.band.is_scored() {
                    text = text.underline();
                }
                let response = ui.label(text);
                if let Some(score) = unit.score {
                    response.on_hover_text(format!("Score {:.0}%", score * 100.0));
                }
            }
        });
    }
}

pub fn band_color(band: ScoreBand) -> Color32 {
    match band {
        ScoreBand::Good => Color32::from_rgb(22, 163, 74),
        ScoreBand::Fair => Color32::from_rgb(202, 138, 4),
        ScoreBand::Poor => Color32::from_rgb(220, 38, 38),
        ScoreBand::Unscored => Color32::from_rgb(31, 41, 55),
    }
}
