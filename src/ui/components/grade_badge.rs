use eframe::egui::{self, Color32, RichText};

use crate::grading::LetterGrade;

const BADGE_DIAMETER: f32 = 56.0;
const BADGE_FILL: Color32 = Color32::from_rgb(219, 234, 254);

pub struct GradeBadge {
    pub grade: LetterGrade,
}

impl GradeBadge {
    pub fn show(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            let size = egui::vec2(BADGE_DIAMETER, BADGE_DIAMETER);
            let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
            let painter = ui.painter_at(rect);
            painter.circle_filled(rect.center(), BADGE_DIAMETER / 2.0, BADGE_FILL);
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                self.grade.as_str(),
                egui::FontId::proportional(28.0),
                grade_color(self.grade),
            );
            ui.add_space(4.0);
            ui.label(RichText::new("Your pronunciation grade").strong());
            ui.label(RichText::new(self.grade.verdict()).color(Color32::from_gray(90)));
        });
    }
}

/// Only an A is green; B and C warn in yellow, D and F are red.
pub fn grade_color(grade: LetterGrade) -> Color32 {
    match grade {
        LetterGrade::A => Color32::from_rgb(22, 163, 74),
        LetterGrade::B | LetterGrade::C => Color32::from_rgb(202, 138, 4),
        LetterGrade::D | LetterGrade::F => Color32::from_rgb(220, 38, 38),
    }
}
