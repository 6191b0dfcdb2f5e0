use std::time::Duration;

use eframe::egui::{self, Color32, RichText};
use tracing::warn;

use crate::grading::{AlignedRows, Result, SessionHandle, SessionState};
use crate::ui::components::grade_badge::GradeBadge;
use crate::ui::components::mic_button::{listening_indicator, MicButton};
use crate::ui::components::result_controls::ResultControls;
use crate::ui::components::scored_row::{ScoredRow, CHARACTER_SIZE, PINYIN_SIZE};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub const TITLE: &str = "Chinese Pronunciation Assistant";

#[derive(Default, Debug)]
struct FrameActions {
    toggle: bool,
    replay: bool,
    reset: bool,
}

pub struct SessionApp {
    handle: SessionHandle,
    state: SessionState,
    rows: AlignedRows,
}

impl SessionApp {
    pub fn new(handle: SessionHandle) -> Self {
        Self {
            handle,
            state: SessionState::default(),
            rows: AlignedRows::default(),
        }
    }

    fn pull_updates(&mut self) {
        if let Some(latest) = self.handle.latest() {
            if latest != self.state {
                self.rows = latest.rows();
                self.state = latest;
            }
        }
    }

    fn shortcuts(&self, ctx: &egui::Context) -> FrameActions {
        ctx.input(|input| FrameActions {
            toggle: input.key_pressed(egui::Key::Space),
            replay: input.key_pressed(egui::Key::R) && self.state.has_result(),
            reset: input.key_pressed(egui::Key::Escape),
        })
    }

    fn show_main(&self, ctx: &egui::Context, actions: &mut FrameActions) {
        egui::CentralPanel::default()
            .frame(egui::Frame::central_panel(&ctx.style()).fill(Color32::WHITE))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(16.0);
                    ui.heading(RichText::new(TITLE).strong().size(24.0));
                    ui.add_space(24.0);
                    if (MicButton {
                        listening: self.state.listening,
                    })
                    .show(ui)
                    {
                        actions.toggle = true;
                    }
                    ui.add_space(16.0);
                    if self.state.listening {
                        listening_indicator(ui);
                    }
                });
                if self.state.has_result() {
                    ui.add_space(16.0);
                    self.show_result(ui);
                }
                if let Some(grade) = self.state.grade {
                    ui.add_space(16.0);
                    GradeBadge { grade }.show(ui);
                    ui.add_space(8.0);
                    ui.vertical_centered(|ui| {
                        let output = ResultControls {
                            has_recording: self.state.has_recording,
                            listening: self.state.listening,
                        }
                        .show(ui);
                        actions.replay |= output.replay;
                        actions.reset |= output.reset;
                    });
                }
                if let Some(message) = &self.state.error {
                    ui.add_space(12.0);
                    ui.colored_label(Color32::from_rgb(200, 60, 60), message);
                }
            });
    }

    fn show_result(&self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(Color32::from_gray(249))
            .rounding(8.0)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new("Chinese").strong().size(17.0));
                ScoredRow {
                    units: &self.rows.characters,
                    text_size: CHARACTER_SIZE,
                }
                .show(ui);
                ui.add_space(12.0);
                ui.label(RichText::new("Pinyin").strong().size(17.0));
                ScoredRow {
                    units: &self.rows.pinyin,
                    text_size: PINYIN_SIZE,
                }
                .show(ui);
            });
    }

    fn dispatch(&mut self, actions: FrameActions) {
        let controller = self.handle.controller();
        if actions.toggle {
            self.report(controller.toggle(self.state.listening));
        }
        if actions.replay {
            self.report(controller.replay());
        }
        if actions.reset {
            self.report(controller.reset());
        }
    }

    fn report(&mut self, outcome: Result<()>) {
        if let Err(err) = outcome {
            warn!(error = %err, "session worker unavailable");
            self.state.error = Some(err.to_string());
        }
    }
}

impl eframe::App for SessionApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pull_updates();
        let mut actions = self.shortcuts(ctx);
        self.show_main(ctx, &mut actions);
        self.dispatch(actions);
        ctx.request_repaint_after(POLL_INTERVAL);
    }
}
