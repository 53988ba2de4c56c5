// src/paint.rs

use druid::piet::{FontFamily, InterpolationMode, Text, TextLayout, TextLayoutBuilder};
use druid::{Color, Point, Rect, RenderContext, Size};
use image::RgbImage;

/// `ImageCanvas::render` 使用的绘制接口。
///
/// 调用顺序即叠放顺序，后画的在上层。
pub trait Painter {
    fn draw_image(&mut self, image: &RgbImage, origin: Point);
    fn stroke_rect(&mut self, rect: Rect, color: &Color, width: f64);
    /// 在 `rect` 内居中绘制文字。
    fn draw_centered_text(&mut self, rect: Rect, text: &str, color: &Color, family: &str, size: f64);
}

/// 基于 piet `RenderContext` 的实现，`image` 是预先上传好的显示图像。
pub struct PietPainter<'a, R: RenderContext> {
    rc: &'a mut R,
    image: Option<&'a R::Image>,
}

impl<'a, R: RenderContext> PietPainter<'a, R> {
    pub fn new(rc: &'a mut R, image: Option<&'a R::Image>) -> Self {
        PietPainter { rc, image }
    }
}

impl<R: RenderContext> Painter for PietPainter<'_, R> {
    fn draw_image(&mut self, image: &RgbImage, origin: Point) {
        // 不缩放：目标矩形就是原图尺寸
        if let Some(img) = self.image {
            let size = Size::new(image.width() as f64, image.height() as f64);
            self.rc.draw_image(
                img,
                Rect::from_origin_size(origin, size),
                InterpolationMode::NearestNeighbor,
            );
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: &Color, width: f64) {
        self.rc.stroke(rect, color, width);
    }

    fn draw_centered_text(&mut self, rect: Rect, text: &str, color: &Color, family: &str, size: f64) {
        let family = self
            .rc
            .text()
            .font_family(family)
            .unwrap_or(FontFamily::SANS_SERIF);
        let layout = self
            .rc
            .text()
            .new_text_layout(text.to_string())
            .font(family, size)
            .text_color(color.clone())
            .build();

        match layout {
            Ok(layout) => {
                let origin = rect.center() - layout.size().to_vec2() / 2.0;
                self.rc.draw_text(&layout, origin);
            }
            Err(e) => log::warn!("label layout failed for {text:?}: {e}"),
        }
    }
}
