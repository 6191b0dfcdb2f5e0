pub mod components;
pub mod fonts;
pub mod screens;

use eframe::{egui, NativeOptions};
use tracing::{info, warn};

use crate::grading::{GradingError, Result, SessionHandle};
use screens::session::{SessionApp, TITLE};

const WINDOW_SIZE: [f32; 2] = [480.0, 640.0];

pub fn launch_ui(handle: SessionHandle) -> Result<()> {
    let preferred = handle.config().font.clone();
    let app = SessionApp::new(handle);
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(WINDOW_SIZE)
            .with_min_inner_size([360.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        TITLE,
        options,
        Box::new(move |cc| {
            match fonts::find_cjk_font(preferred.as_deref()) {
                Some(path) => match fonts::install_font(&cc.egui_ctx, &path) {
                    Ok(()) => info!(font = %path.display(), "installed Chinese font"),
                    Err(err) => warn!(error = %err, "could not load Chinese font"),
                },
                None => warn!("no Chinese font found; characters may render as boxes"),
            }
            Box::new(app)
        }),
    )
    .map_err(|err| GradingError::new(err.to_string()))
}
