use eframe::egui;

pub const REPLAY_LABEL: &str = "Play Recording";
pub const RESET_LABEL: &str = "Start Over";

#[derive(Default, Debug)]
pub struct ResultControlsOutput {
    pub replay: bool,
    pub reset: bool,
}

/// Replay and reset buttons shown under a graded result.
pub struct ResultControls {
    pub has_recording: bool,
    pub listening: bool,
}

impl ResultControls {
    pub fn show(&self, ui: &mut egui::Ui) -> ResultControlsOutput {
        let mut output = ResultControlsOutput::default();
        ui.horizontal(|ui| {
            if ui
                .button(REPLAY_LABEL)
                .on_hover_text(replay_hint(self.has_recording))
                .clicked()
            {
                output.replay = true;
            }
            ui.add_enabled_ui(!self.listening, |ui| {
                if ui
                    .button(RESET_LABEL)
                    .on_hover_text("Press Escape to clear the result.")
                    .clicked()
                {
                    output.reset = true;
                }
            });
        });
        output
    }
}

/// Replay falls back to a beep when nothing was recorded.
pub fn replay_hint(has_recording: bool) -> &'static str {
    if has_recording {
        "Play your last recording (R)"
    } else {
        "No recording captured; plays a tone (R)"
    }
}
