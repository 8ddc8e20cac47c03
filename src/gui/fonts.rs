//! Hangul-capable font installation.

use egui::{FontData, FontDefinitions, FontFamily};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

const CJK_FONT_NAME: &str = "cjk_fallback";

/// Install the first readable candidate as a fallback font for both families.
///
/// Returns the path that was installed.
pub fn install_cjk_fonts(ctx: &egui::Context, candidates: &[PathBuf]) -> Option<PathBuf> {
    let Some((path, bytes)) = candidates
        .iter()
        .find_map(|path| std::fs::read(path).ok().map(|bytes| (path, bytes)))
    else {
        warn!("no CJK font found; Korean labels may not render");
        return None;
    };

    ctx.set_fonts(font_definitions(bytes));
    info!(path = %path.display(), "installed CJK font");
    Some(path.to_path_buf())
}

fn font_definitions(bytes: Vec<u8>) -> FontDefinitions {
    let mut fonts = FontDefinitions::default();
    fonts
        .font_data
        .insert(CJK_FONT_NAME.to_owned(), Arc::new(FontData::from_owned(bytes)));

    // Appended so the default Latin and emoji fonts keep priority.
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
    use super::*;

    #[test]
    fn cjk_font_is_appended_as_fallback() {
        let fonts = font_definitions(Vec::new());
        assert!(fonts.font_data.contains_key(CJK_FONT_NAME));
        for family in [FontFamily::Proportional, FontFamily::Monospace] {
            let names = &fonts.families[&family];
            assert_eq!(names.last().map(String::as_str), Some(CJK_FONT_NAME));
            assert!(names.len() > 1);
        }
    }
}
