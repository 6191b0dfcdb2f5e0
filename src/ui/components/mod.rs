pub mod grade_badge;
pub mod mic_button;
pub mod result_controls;
pub mod scored_row;
