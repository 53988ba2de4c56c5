// src/widget.rs

use druid::piet::{ImageFormat, PietImage};
use druid::widget::prelude::*;
use druid::{Rect, Selector, SingleUse};

use crate::canvas::ImageCanvas;
use crate::frame::BgrFrame;
use crate::paint::PietPainter;

/// 推送新帧，替换当前图像。
pub const SET_FRAME: Selector<SingleUse<BgrFrame>> = Selector::new("roicanvas.set-frame");

/// 添加检测框，见 [`DetectionCommand`]。
pub const ADD_DETECTION: Selector<DetectionCommand> = Selector::new("roicanvas.add-detection");

/// 异步送回的检测结果。
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionCommand {
    /// 结果所属的拖拽：第 n 次 ROI 回调对应 n。
    pub selection: u64,
    /// 相对选区左上角。
    pub rect: Rect,
    pub label: String,
}

/// 把 druid 的鼠标、命令和绘制事件转给 `ImageCanvas`。
pub struct CanvasWidget {
    canvas: ImageCanvas,
    cached_image: Option<PietImage>,
    cached_generation: u64,
}

impl CanvasWidget {
    pub fn new(canvas: ImageCanvas) -> Self {
        CanvasWidget { canvas, cached_image: None, cached_generation: 0 }
    }

    pub fn canvas(&self) -> &ImageCanvas {
        &self.canvas
    }

    /// 选区已被新的拖拽替换时丢弃结果，返回是否添加。
    pub fn apply_detection(&mut self, detection: &DetectionCommand) -> bool {
        if !self.canvas.is_current_selection(detection.selection) {
            log::debug!(
                "dropping stale detection {:?} for selection {}",
                detection.label,
                detection.selection
            );
            return false;
        }

        let rect = detection.rect;
        self.canvas
            .add_detection(rect.x0, rect.y0, rect.width(), rect.height(), detection.label.as_str());
        true
    }

    fn set_frame(&mut self, ctx: &mut EventCtx, frame: BgrFrame) {
        let old_size = self.canvas.image().dimensions();
        self.canvas.set_image(frame);
        if self.canvas.image().dimensions() != old_size {
            ctx.request_layout();
        }
    }
}

impl<T: Data> Widget<T> for CanvasWidget {
    fn event(&mut self, ctx: &mut EventCtx, event: &Event, _data: &mut T, _env: &Env) {
        match event {
            Event::MouseDown(e) if e.button.is_left() => {
                if self.canvas.on_pointer_down(e.pos) {
                    ctx.set_active(true);
                }
            }

            Event::MouseMove(e) => self.canvas.on_pointer_move(e.pos),

            Event::MouseUp(e) if e.button.is_left() => {
                self.canvas.on_pointer_up(e.pos);
                if ctx.is_active() {
                    ctx.set_active(false);
                }
            }

            Event::Command(cmd) if cmd.is(SET_FRAME) => {
                if let Some(frame) = cmd.get(SET_FRAME).and_then(SingleUse::take) {
                    self.set_frame(ctx, frame);
                }
                ctx.set_handled();
            }

            Event::Command(cmd) if cmd.is(ADD_DETECTION) => {
                if let Some(detection) = cmd.get(ADD_DETECTION) {
                    self.apply_detection(detection);
                }
                ctx.set_handled();
            }
            _ => {}
        }

        if self.canvas.take_repaint_request() {
            ctx.request_paint();
        }
    }

    fn lifecycle(&mut self, _ctx: &mut LifeCycleCtx, _event: &LifeCycle, _data: &T, _env: &Env) {}

    fn update(&mut self, _ctx: &mut UpdateCtx, _old: &T, _data: &T, _env: &Env) {
        // 画布状态不在应用数据里，靠事件和命令驱动
    }

    fn layout(&mut self, _ctx: &mut LayoutCtx, bc: &BoxConstraints, _data: &T, _env: &Env) -> Size {
        let (w, h) = self.canvas.display_image().dimensions();
        bc.constrain(Size::new(w as f64, h as f64))
    }

    fn paint(&mut self, ctx: &mut PaintCtx, _data: &T, _env: &Env) {
        let generation = self.canvas.frame_generation();
        if self.cached_generation != generation {
            self.cached_image = None;
            self.cached_generation = generation;
        }

        let display = self.canvas.display_image();
        if self.cached_image.is_none() && display.width() > 0 && display.height() > 0 {
            self.cached_image = ctx
                .make_image(
                    display.width() as usize,
                    display.height() as usize,
                    display.as_raw(),
                    ImageFormat::Rgb,
                )
                .map_err(|e| log::warn!("failed to upload display image: {e}"))
                .ok();
        }

        let mut painter = PietPainter::new(&mut *ctx.render_ctx, self.cached_image.as_ref());
        self.canvas.render(&mut painter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use druid::Point;
    use image::{Rgb, RgbImage};

    fn widget() -> CanvasWidget {
        let mut canvas = ImageCanvas::new(|_| {});
        canvas.set_image(BgrFrame::from_rgb(&RgbImage::from_pixel(100, 100, Rgb([1, 2, 3]))));
        CanvasWidget::new(canvas)
    }

    fn drag(widget: &mut CanvasWidget, from: (f64, f64), to: (f64, f64)) {
        widget.canvas.on_pointer_down(Point::new(from.0, from.1));
        widget.canvas.on_pointer_move(Point::new(to.0, to.1));
        widget.canvas.on_pointer_up(Point::new(to.0, to.1));
    }

    fn detection(selection: u64, label: &str) -> DetectionCommand {
        DetectionCommand {
            selection,
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            label: label.to_string(),
        }
    }

    #[test]
    fn detection_for_current_selection_is_added() {
        let mut widget = widget();
        drag(&mut widget, (10.0, 20.0), (40.0, 50.0));

        assert!(widget.apply_detection(&detection(1, "hello")));
        let detections = widget.canvas().detections();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].rect, Rect::new(10.0, 20.0, 20.0, 30.0));
        assert_eq!(detections[0].label, "hello");
    }

    #[test]
    fn late_detection_after_new_drag_is_dropped() {
        let mut widget = widget();
        drag(&mut widget, (10.0, 10.0), (30.0, 30.0));

        // 第一次的结果还没回来，用户已经开始下一次拖拽
        widget.canvas.on_pointer_down(Point::new(60.0, 60.0));
        assert!(!widget.apply_detection(&detection(1, "late")));

        widget.canvas.on_pointer_move(Point::new(80.0, 80.0));
        widget.canvas.on_pointer_up(Point::new(80.0, 80.0));
        assert!(!widget.apply_detection(&detection(1, "late")));
        assert!(widget.canvas().detections().is_empty());

        assert!(widget.apply_detection(&detection(2, "fresh")));
        assert_eq!(widget.canvas().detections()[0].rect.origin(), Point::new(60.0, 60.0));
    }
}
