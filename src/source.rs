// src/source.rs

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use roicanvas::BgrFrame;
use xcap::Monitor;

/// 演示程序的取帧来源。
#[derive(Debug, Clone)]
pub enum FrameSource {
    File(PathBuf),
    Monitor(usize),
}

impl FrameSource {
    /// 取一帧并转成 BGR，与相机桥接送来的格式一致。
    pub fn grab(&self) -> Result<BgrFrame> {
        match self {
            FrameSource::File(path) => {
                let img = image::open(path)
                    .with_context(|| format!("无法打开图像 {}", path.display()))?;
                Ok(BgrFrame::from_rgb(&img.to_rgb8()))
            }
            FrameSource::Monitor(index) => capture_monitor(*index),
        }
    }
}

fn capture_monitor(index: usize) -> Result<BgrFrame> {
    let mons = Monitor::all()?;
    let mon = mons.get(index).ok_or_else(|| anyhow!("找不到显示器 {index}"))?;
    let img = mon.capture_image()?;
    let (w, h) = (img.width(), img.height());

    // xcap 依赖的 image 版本与本 crate 不同，只取原始 RGBA 字节
    let bgr = img
        .into_raw()
        .chunks_exact(4)
        .flat_map(|px| [px[2], px[1], px[0]])
        .collect();
    BgrFrame::from_raw(w, h, bgr).ok_or_else(|| anyhow!("转换失败"))
}
