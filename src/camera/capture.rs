use anyhow::{bail, Context, Result};
use opencv::{
    core::{self, Mat},
    prelude::*,
    videoio::{self, VideoCapture, VideoCaptureAPIs},
};

use crate::config::CameraConfig;

/// OpenCVを使用したカメラキャプチャ
///
/// デバイスはこの値が所有し、Drop で必ず解放する。
pub struct OpenCvCamera {
    capture: VideoCapture,
    index: i32,
    width: u32,
    height: u32,
}

impl OpenCvCamera {
    pub fn from_config(config: &CameraConfig) -> Result<Self> {
        Self::open_with_resolution(config.index, config.width, config.height)
    }

    /// 解像度を指定してカメラを開く
    pub fn open_with_resolution(index: i32, width: Option<u32>, height: Option<u32>) -> Result<Self> {
        let mut capture =
            VideoCapture::new(index, VideoCaptureAPIs::CAP_ANY as i32).context("Failed to open camera")?;

        if !capture.is_opened()? {
            bail!("Camera {} is not available", index);
        }

        if let Some(w) = width {
            capture.set(videoio::CAP_PROP_FRAME_WIDTH, w as f64)?;
        }
        if let Some(h) = height {
            capture.set(videoio::CAP_PROP_FRAME_HEIGHT, h as f64)?;
        }
        capture.set(videoio::CAP_PROP_BUFFERSIZE, 1.0)?;

        let actual_width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let actual_height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;
        let actual_fps = capture.get(videoio::CAP_PROP_FPS)?;
        log::info!(
            "camera {} opened: {}x{} @ {:.0} fps",
            index,
            actual_width,
            actual_height,
            actual_fps
        );

        Ok(Self {
            capture,
            index,
            width: actual_width,
            height: actual_height,
        })
    }

    /// 解像度を取得
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// フレームを読み込む（BGR形式）
    pub fn read_frame(&mut self) -> Result<Mat> {
        let mut frame = Mat::default();
        let ok = self
            .capture
            .read(&mut frame)
            .context("Failed to read frame")?;

        if !ok || frame.empty() {
            bail!("Empty frame received");
        }

        Ok(frame)
    }

    /// 左右反転した次のフレーム（鏡像）
    ///
    /// 読み込みに失敗したらストリーム終端として扱う。
    pub fn next_frame(&mut self) -> Result<Mat> {
        let frame = self.read_frame()?;
        let mut mirrored = Mat::default();
        core::flip(&frame, &mut mirrored, 1).context("Failed to mirror frame")?;
        Ok(mirrored)
    }
}

impl Drop for OpenCvCamera {
    fn drop(&mut self) {
        match self.capture.release() {
            Ok(()) => log::debug!("camera {} released", self.index),
            Err(e) => log::warn!("failed to release camera {}: {}", self.index, e),
        }
    }
}
