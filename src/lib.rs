// src/lib.rs
//! 可嵌入的图像画布：显示实时图像，鼠标拖出感兴趣区域（ROI），
//! 松开时把原始帧的子图交给回调，并在选区上叠加检测框与标签。

pub mod canvas;
pub mod frame;
pub mod paint;
pub mod style;
pub mod widget;

pub use canvas::{Detection, ImageCanvas, RoiCallback};
pub use frame::BgrFrame;
pub use paint::{Painter, PietPainter};
pub use style::CanvasStyle;
pub use widget::{CanvasWidget, DetectionCommand, ADD_DETECTION, SET_FRAME};
