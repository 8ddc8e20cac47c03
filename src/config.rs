//! Application configuration.

use std::path::PathBuf;

/// Monthly resident registration export looked up in the working directory.
pub const DEFAULT_CSV_FILE: &str = "202509_202509_주민등록인구및세대현황_월간.csv";

/// Number of rows shown in the data preview.
pub const PREVIEW_ROWS: usize = 5;

/// Fonts with Hangul coverage, tried in order.
const CJK_FONT_CANDIDATES: [&str; 8] = [
    "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/System/Library/Fonts/AppleSDGothicNeo.ttc",
    "/System/Library/Fonts/Supplemental/AppleGothic.ttf",
    "C:\\Windows\\Fonts\\malgun.ttf",
    "C:\\Windows\\Fonts\\gulim.ttc",
];

/// Dashboard configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub default_csv_path: PathBuf,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
    pub preview_rows: usize,
    pub font_candidates: Vec<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "주민등록 인구 및 세대 현황 시각화".to_string(),
            default_csv_path: PathBuf::from(DEFAULT_CSV_FILE),
            window_size: [1400.0, 800.0],
            min_window_size: [1000.0, 600.0],
            preview_rows: PREVIEW_ROWS,
            font_candidates: CJK_FONT_CANDIDATES.iter().map(PathBuf::from).collect(),
        }
    }
}
