// src/style.rs

use druid::Color;

/// 画布外观：选区框、检测框与标签的颜色、线宽和字体。
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasStyle {
    pub roi_color: Color,
    pub roi_stroke_width: f64,
    pub detection_color: Color,
    pub detection_stroke_width: f64,
    /// 找不到该字体族时退回无衬线字体。
    pub label_font_family: String,
    pub label_font_size: f64,
}

impl Default for CanvasStyle {
    fn default() -> Self {
        CanvasStyle {
            roi_color: Color::rgb8(0, 255, 255),
            roi_stroke_width: 5.0,
            detection_color: Color::rgb8(255, 0, 255),
            detection_stroke_width: 5.0,
            label_font_family: "Decorative".to_string(),
            label_font_size: 10.0,
        }
    }
}
