// src/qrcode.rs

use anyhow::Result;
use image::DynamicImage;
use roicanvas::BgrFrame;

/// 接收一张选区子图，并尝试扫描其中的二维码。
///
/// # 返回
/// - `Ok(Some(String))`: 成功扫描到二维码，并返回其内容。
/// - `Ok(None)`: 图像为空，或其中未找到可识别的二维码。
/// - `Err(e)`: 在扫描过程中发生错误。
pub fn scan_qr_code(roi: &BgrFrame) -> Result<Option<String>> {
    if roi.is_empty() {
        return Ok(None);
    }

    let decoder = bardecoder::default_decoder();

    // bardecoder 需要 RGB 顺序的 `DynamicImage`
    let image = DynamicImage::ImageRgb8(roi.to_rgb());

    // 一张图里可能有多个码，只取第一个成功解码的
    let first_decoded_text = decoder.decode(&image).into_iter().filter_map(Result::ok).next();

    Ok(first_decoded_text)
}
