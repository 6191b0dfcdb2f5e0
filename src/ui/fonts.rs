use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use eframe::egui::{self, FontData, FontDefinitions, FontFamily};

const CJK_FONT_NAME: &str = "cjk";

/// Common install locations of fonts with Chinese glyphs.
const SYSTEM_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/usr/share/fonts/wenquanyi/wqy-microhei/wqy-microhei.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/STHeiti Light.ttc",
    "C:\\Windows\\Fonts\\msyh.ttc",
    "C:\\Windows\\Fonts\\simsun.ttc",
];

/// The configured font when given, otherwise the first system font found.
pub fn find_cjk_font(preferred: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = preferred {
        return Some(path.to_path_buf());
    }
    SYSTEM_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_file())
}

/// Appends the font as a fallback to both families so Latin text keeps the
/// default look.
pub fn install_font(ctx: &egui::Context, path: &Path) -> Result<()> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read font file {:?}", path))?;
    ctx.set_fonts(with_fallback(FontDefinitions::default(), bytes));
    Ok(())
}

fn with_fallback(mut fonts: FontDefinitions, bytes: Vec<u8>) -> FontDefinitions {
    fonts
        .font_data
        .insert(CJK_FONT_NAME.to_owned(), FontData::from_owned(bytes));
    for family in [FontFamily::Proportional, FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push(CJK_FONT_NAME.to_owned());
    }
    fonts
}

#[cfg(test)]
mod tests {
    use super::{find_cjk_font, with_fallback, CJK_FONT_NAME};
    use eframe::egui::{FontDefinitions, FontFamily};
    use std::path::Path;

    #[test]
    fn preferred_font_wins() {
        let found = find_cjk_font(Some(Path::new("fonts/custom.ttf")));
        assert_eq!(found.as_deref(), Some(Path::new("fonts/custom.ttf")));
    }

    #[test]
    fn fallback_is_appended_last() {
        let fonts = with_fallback(FontDefinitions::default(), vec![0u8; 4]);
        assert!(fonts.font_data.contains_key(CJK_FONT_NAME));
        let proportional = &fonts.families[&FontFamily::Proportional];
        assert_eq!(proportional.last().map(String::as_str), Some(CJK_FONT_NAME));
        assert!(proportional.len() > 1);
    }
}
