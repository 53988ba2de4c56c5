// src/canvas.rs

use druid::{Point, Rect, Size};
use image::RgbImage;

use crate::frame::BgrFrame;
use crate::paint::Painter;
use crate::style::CanvasStyle;

/// 拖拽完成时收到选区子图。
pub type RoiCallback = Box<dyn FnMut(BgrFrame)>;

/// 叠加在选区上的检测框和标签，坐标是画布绝对坐标。
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub rect: Rect,
    pub label: String,
}

/// 图像画布：保存当前帧、显示图、选区、检测结果和拖拽状态。
///
/// 所有状态只通过下面的方法修改；宿主负责把鼠标和重绘事件转发过来。
pub struct ImageCanvas {
    image: BgrFrame,
    display: RgbImage,
    /// `(x0, y0)` 是按下点，`(x1, y1)` 跟随鼠标；不做规范化，宽高可能为负。
    clip_rect: Rect,
    dragging: bool,
    detections: Vec<Detection>,
    on_roi: RoiCallback,
    style: CanvasStyle,
    generation: u64,
    completed: u64,
    repaint: bool,
}

impl ImageCanvas {
    pub fn new(on_roi: impl FnMut(BgrFrame) + 'static) -> Self {
        Self::with_style(CanvasStyle::default(), on_roi)
    }

    pub fn with_style(style: CanvasStyle, on_roi: impl FnMut(BgrFrame) + 'static) -> Self {
        ImageCanvas {
            image: BgrFrame::default(),
            display: RgbImage::default(),
            clip_rect: Rect::ZERO,
            dragging: false,
            detections: Vec::new(),
            on_roi: Box::new(on_roi),
            style,
            generation: 0,
            completed: 0,
            repaint: false,
        }
    }

    /// 替换当前帧并重算显示图。
    pub fn set_image(&mut self, image: BgrFrame) {
        self.display = image.to_rgb();
        self.image = image;
        self.generation += 1;
        self.repaint = true;
    }

    /// `(x, y)` 相对当前选区左上角。
    pub fn add_detection(&mut self, x: f64, y: f64, width: f64, height: f64, label: impl Into<String>) {
        let (x0, y0) = (x + self.clip_rect.x0, y + self.clip_rect.y0);
        self.detections.push(Detection {
            rect: Rect::new(x0, y0, x0 + width, y0 + height),
            label: label.into(),
        });
        self.repaint = true;
    }

    /// 依次画显示图、选区框、检测框和标签。
    pub fn render(&self, painter: &mut impl Painter) {
        let style = &self.style;
        painter.draw_image(&self.display, Point::ORIGIN);
        painter.stroke_rect(self.clip_rect, &style.roi_color, style.roi_stroke_width);

        for detection in &self.detections {
            painter.stroke_rect(
                detection.rect,
                &style.detection_color,
                style.detection_stroke_width,
            );
            painter.draw_centered_text(
                detection.rect,
                &detection.label,
                &style.detection_color,
                &style.label_font_family,
                style.label_font_size,
            );
        }
    }

    /// 返回是否开始了新的拖拽。落在显示图范围外的按下被忽略。
    pub fn on_pointer_down(&mut self, pos: Point) -> bool {
        if pos.x >= self.display.width() as f64 || pos.y >= self.display.height() as f64 {
            return false;
        }

        // 未松开的旧拖拽直接丢弃，不触发回调
        self.detections.clear();
        self.clip_rect = Rect::from_origin_size(pos, Size::ZERO);
        self.dragging = true;
        self.repaint = true;
        log::debug!("roi drag started at ({}, {})", pos.x, pos.y);
        true
    }

    pub fn on_pointer_move(&mut self, pos: Point) {
        if !self.dragging {
            return;
        }

        self.clip_rect.x1 = pos.x;
        self.clip_rect.y1 = pos.y;
        self.repaint = true;
        log::trace!("roi corner at ({}, {})", pos.x, pos.y);
    }

    /// 按当前选区切出原始帧并交给回调。
    ///
    /// 松开点本身不参与计算，选区的右下角以最后一次移动为准。
    pub fn on_pointer_up(&mut self, _pos: Point) {
        if !self.dragging {
            return;
        }

        let roi = self.image.roi(&self.clip_rect);
        log::debug!(
            "roi drag finished: {:?} -> {}x{} sub-image",
            self.clip_rect,
            roi.width(),
            roi.height()
        );
        self.completed += 1;
        (self.on_roi)(roi);
        self.dragging = false;
    }

    pub fn image(&self) -> &BgrFrame {
        &self.image
    }

    pub fn display_image(&self) -> &RgbImage {
        &self.display
    }

    pub fn clip_rect(&self) -> Rect {
        self.clip_rect
    }

    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn style(&self) -> &CanvasStyle {
        &self.style
    }

    /// 每次 `set_image` 加一，宿主据此判断缓存的显示纹理是否过期。
    pub fn frame_generation(&self) -> u64 {
        self.generation
    }

    /// 已完成（触发过回调）的拖拽次数，第 n 次回调对应的值是 n。
    pub fn completed_selections(&self) -> u64 {
        self.completed
    }

    /// 第 `selection` 次拖拽的选区是否仍在显示：之后没有再完成拖拽，也没有开始新的拖拽。
    ///
    /// 异步返回的检测结果据此丢弃过期的。
    pub fn is_current_selection(&self, selection: u64) -> bool {
        !self.dragging && self.completed == selection
    }

    /// 取走并清除重绘请求。
    pub fn take_repaint_request(&mut self) -> bool {
        std::mem::take(&mut self.repaint)
    }
}
