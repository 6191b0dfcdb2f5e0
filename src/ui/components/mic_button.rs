use eframe::egui::{self, Color32, Stroke};

const BUTTON_DIAMETER: f32 = 64.0;
const LISTENING_COLOR: Color32 = Color32::from_rgb(239, 68, 68);
const IDLE_COLOR: Color32 = Color32::from_rgb(55, 65, 81);

/// Round microphone toggle. Returns true when clicked.
pub struct MicButton {
    pub listening: bool,
}

impl MicButton {
    pub fn show(&self, ui: &mut egui::Ui) -> bool {
        let size = egui::vec2(BUTTON_DIAMETER, BUTTON_DIAMETER);
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
        let painter = ui.painter_at(rect.expand(2.0));
        let center = rect.center();
        let radius = BUTTON_DIAMETER / 2.0;
        let (ring, glyph) = if self.listening {
            (Stroke::new(2.0, LISTENING_COLOR), LISTENING_COLOR)
        } else {
            (Stroke::new(1.0, Color32::from_gray(220)), IDLE_COLOR)
        };
        let fill = if response.hovered() {
            Color32::from_gray(248)
        } else {
            Color32::WHITE
        };
        painter.circle_filled(center, radius, fill);
        painter.circle_stroke(center, radius - 1.0, ring);
        draw_microphone(&painter, center, glyph);

        response
            .on_hover_text(hover_text(self.listening))
            .clicked()
    }
}

fn draw_microphone(painter: &egui::Painter, center: egui::Pos2, color: Color32) {
    let at = |x: f32, y: f32| center + egui::vec2(x, y);
    let capsule = egui::Rect::from_center_size(at(0.0, -5.0), egui::vec2(10.0, 18.0));
    painter.rect_filled(capsule, 5.0, color);
    let stroke = Stroke::new(2.0, color);
    for segment in [
        [at(0.0, 8.0), at(0.0, 13.0)],
        [at(-5.0, 13.0), at(5.0, 13.0)],
        [at(-8.0, -2.0), at(-8.0, 2.0)],
        [at(8.0, -2.0), at(8.0, 2.0)],
        [at(-8.0, 2.0), at(0.0, 8.0)],
        [at(8.0, 2.0), at(0.0, 8.0)],
    ] {
        painter.line_segment(segment, stroke);
    }
}

pub fn hover_text(listening: bool) -> &'static str {
    if listening {
        "Stop listening (Space)"
    } else {
        "Start listening (Space)"
    }
}

/// "Listening" followed by one to three dots, cycling with time.
pub fn listening_caption(time_secs: f64) -> String {
    let dots = (time_secs.max(0.0) * 3.0) as usize % 3 + 1;
    format!("Listening{}", ".".repeat(dots))
}

pub fn listening_indicator(ui: &mut egui::Ui) {
    let time = ui.input(|input| input.time);
    ui.label(
        egui::RichText::new(listening_caption(time))
            .color(Color32::from_gray(90))
            .size(16.0),
    );
}
