#![windows_subsystem = "windows"]

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use arboard::Clipboard;
use clap::Parser;
use druid::{AppLauncher, ExtEventSink, Rect, SingleUse, Target, WindowDesc};
use rfd::MessageDialog;
use roicanvas::{BgrFrame, CanvasWidget, DetectionCommand, ImageCanvas, ADD_DETECTION, SET_FRAME};

mod qrcode;
mod source;

use qrcode::scan_qr_code;
use source::FrameSource;

/// 拖出选区后扫描其中的二维码，并把结果标在选区上。
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// 图像文件；不指定则截取显示器
    #[arg(long)]
    image: Option<PathBuf>,

    /// 截取第几个显示器
    #[arg(long, default_value_t = 0)]
    monitor: usize,

    /// 定时重新取帧的间隔（毫秒）
    #[arg(long)]
    refresh_ms: Option<u64>,

    /// 把识别到的内容复制到剪贴板
    #[arg(long)]
    copy: bool,
}

fn copy_text_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(text.to_string())?;
    Ok(())
}

// 选区子图在后台线程扫描，结果通过命令送回画布；画布丢弃已被新拖拽替换的结果
fn spawn_classifier(rois: Receiver<(u64, BgrFrame)>, sink: ExtEventSink, copy: bool) {
    thread::spawn(move || {
        for (selection, roi) in rois {
            let label = match scan_qr_code(&roi) {
                Ok(Some(text)) => {
                    if copy {
                        if let Err(e) = copy_text_to_clipboard(&text) {
                            log::warn!("复制到剪贴板失败: {e:#}");
                        }
                    }
                    text
                }
                Ok(None) => "no code".to_string(),
                Err(e) => {
                    log::error!("扫描失败: {e:#}");
                    continue;
                }
            };

            log::info!("roi {}x{}: {label}", roi.width(), roi.height());
            let rect = Rect::new(0.0, 0.0, roi.width() as f64, roi.height() as f64);
            let detection = DetectionCommand { selection, rect, label };
            if sink.submit_command(ADD_DETECTION, detection, Target::Global).is_err() {
                break;
            }
        }
    });
}

fn spawn_refresh(source: FrameSource, sink: ExtEventSink, every: Duration) {
    thread::spawn(move || {
        loop {
            thread::sleep(every);
            match source.grab() {
                Ok(frame) => {
                    // 窗口已关闭
                    if sink.submit_command(SET_FRAME, SingleUse::new(frame), Target::Global).is_err() {
                        break;
                    }
                }
                Err(e) => log::warn!("取帧失败: {e:#}"),
            }
        }
    });
}

fn run(args: Args) -> Result<()> {
    let source = match args.image {
        Some(path) => FrameSource::File(path),
        None => FrameSource::Monitor(args.monitor),
    };
    let first = source.grab().context("读取首帧失败")?;
    let (w, h) = first.dimensions();
    log::info!("first frame {w}x{h} from {source:?}");

    let (roi_tx, roi_rx) = mpsc::channel();
    // 每次完成拖拽回调一次，计数与 `ImageCanvas::completed_selections` 对齐
    let mut completed = 0u64;
    let mut canvas = ImageCanvas::new(move |roi| {
        completed += 1;
        if roi_tx.send((completed, roi)).is_err() {
            log::error!("classifier thread is gone, roi dropped");
        }
    });
    canvas.set_image(first);

    let window = WindowDesc::new(CanvasWidget::new(canvas))
        .title("roicanvas")
        .window_size((w as f64, h as f64));
    let launcher = AppLauncher::with_window(window);

    let sink = launcher.get_external_handle();
    spawn_classifier(roi_rx, sink.clone(), args.copy);
    if let Some(ms) = args.refresh_ms {
        spawn_refresh(source, sink, Duration::from_millis(ms));
    }

    launcher.launch(())?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("{e:#}");
        MessageDialog::new()
            .set_title("错误")
            .set_description(format!("{e:#}"))
            .show();
        return Err(e);
    }
    Ok(())
}
