// src/frame.rs

use druid::Rect;
use image::{imageops, Rgb, RgbImage};

/// 源图像：三通道、BGR 通道顺序（与相机桥接输出一致）。
///
/// 内部借用 `RgbImage` 作存储，但第 0 通道是蓝色。默认值是 0×0 的空帧。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BgrFrame {
    inner: RgbImage,
}

impl BgrFrame {
    /// 从 BGR 字节构造。长度与 `width * height * 3` 不符时返回 `None`。
    pub fn from_raw(width: u32, height: u32, bytes: Vec<u8>) -> Option<Self> {
        RgbImage::from_raw(width, height, bytes).map(|inner| BgrFrame { inner })
    }

    /// 把 RGB 图像重排成 BGR 帧。
    pub fn from_rgb(rgb: &RgbImage) -> Self {
        BgrFrame { inner: swap_red_blue(rgb) }
    }

    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.inner.dimensions()
    }

    pub fn as_raw(&self) -> &[u8] {
        self.inner.as_raw()
    }

    /// 返回 `[b, g, r]`。
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.inner.get_pixel(x, y).0
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// 转成显示用的 RGB 图像，只重排通道，不缩放。
    pub fn to_rgb(&self) -> RgbImage {
        swap_red_blue(&self.inner)
    }

    /// 按矩形切出子图。
    ///
    /// 行 `y0..y1`、列 `x0..x1`，两个角各自截断为整像素，再夹到图像范围内；
    /// 终点不大于起点的区间为空。反向拖拽因此得到空图，而不是报错。
    pub fn roi(&self, rect: &Rect) -> BgrFrame {
        let (cols_start, cols_end) = clamp_span(rect.x0, rect.x1, self.width());
        let (rows_start, rows_end) = clamp_span(rect.y0, rect.y1, self.height());

        let inner = imageops::crop_imm(
            &self.inner,
            cols_start,
            rows_start,
            cols_end - cols_start,
            rows_end - rows_start,
        )
        .to_image();
        BgrFrame { inner }
    }
}

fn swap_red_blue(src: &RgbImage) -> RgbImage {
    let mut out = src.clone();
    for Rgb(px) in out.pixels_mut() {
        px.swap(0, 2);
    }
    out
}

/// `start..end` 截断后夹到 `[0, extent]`，保证 `begin <= end`。
fn clamp_span(start: f64, end: f64, extent: u32) -> (u32, u32) {
    let extent = i64::from(extent);
    let begin = start as i64;
    let end = end as i64;
    let begin = begin.clamp(0, extent);
    let end = end.clamp(begin, extent);
    (begin as u32, end as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> BgrFrame {
        let rgb = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        BgrFrame::from_rgb(&rgb)
    }

    #[test]
    fn from_raw_rejects_wrong_length() {
        assert!(BgrFrame::from_raw(2, 2, vec![0; 11]).is_none());
        assert!(BgrFrame::from_raw(2, 2, vec![0; 12]).is_some());
    }

    #[test]
    fn to_rgb_swaps_channels_and_keeps_size() {
        let frame = BgrFrame::from_raw(2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let rgb = frame.to_rgb();
        assert_eq!(rgb.dimensions(), (2, 1));
        assert_eq!(rgb.get_pixel(0, 0).0, [3, 2, 1]);
        assert_eq!(rgb.get_pixel(1, 0).0, [6, 5, 4]);
        assert_eq!(BgrFrame::from_rgb(&rgb), frame);
    }

    #[test]
    fn roi_takes_rows_and_columns_from_origin() {
        let frame = gradient(100, 100);
        let roi = frame.roi(&Rect::new(10.0, 10.0, 50.0, 60.0));
        assert_eq!(roi.dimensions(), (40, 50));
        assert_eq!(roi.get_pixel(0, 0), frame.get_pixel(10, 10));
        assert_eq!(roi.get_pixel(39, 49), frame.get_pixel(49, 59));
    }

    #[test]
    fn roi_truncates_fractional_corners() {
        let frame = gradient(100, 100);
        let roi = frame.roi(&Rect::new(10.5, 10.5, 50.4, 60.4));
        assert_eq!(roi.dimensions(), (40, 50));
        assert_eq!(roi.get_pixel(0, 0), frame.get_pixel(10, 10));
        assert_eq!(roi.get_pixel(39, 49), frame.get_pixel(49, 59));
    }

    #[test]
    fn roi_clamps_to_image_extent() {
        let frame = gradient(20, 10);
        let roi = frame.roi(&Rect::new(15.0, 5.0, 40.0, 30.0));
        assert_eq!(roi.dimensions(), (5, 5));
        assert_eq!(roi.get_pixel(4, 4), frame.get_pixel(19, 9));
    }

    #[test]
    fn inverted_roi_is_empty() {
        let frame = gradient(100, 100);
        let roi = frame.roi(&Rect::new(50.0, 50.0, 10.0, 10.0));
        assert!(roi.is_empty());
        assert_eq!(roi.dimensions(), (0, 0));
    }
}
