use anyhow::{bail, Context, Result};
use opencv::{core::Mat, prelude::*};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;

use super::palm::{decode_best, generate_anchors, Anchor, PalmBox};
use super::preprocess::{preprocess_for_hand, PixelRange};
use super::roi::CropRegion;
use crate::config::PalmConfig;

/// MediaPipe 手のひら検出 (ONNX, SSD)
///
/// フレーム全体から最もスコアの高い手のひらを1つ返す。
pub struct PalmDetector {
    session: Session,
    config: PalmConfig,
    anchors: Vec<Anchor>,
}

impl PalmDetector {
    /// ONNXモデルを読み込んで初期化
    pub fn new(config: &PalmConfig) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(&config.model_path)
            .with_context(|| format!("Failed to load palm detection model {}", config.model_path))?;
        let anchors = generate_anchors(config.input_size, &config.strides);
        log::debug!("palm detector: {} anchors for {}px input", anchors.len(), config.input_size);
        Ok(Self {
            session,
            config: config.clone(),
            anchors,
        })
    }

    /// フレーム全体から手のひらを検出し、`min_score` 以上ならフレームピクセル座標で返す
    pub fn detect(&mut self, frame: &Mat, min_score: f32) -> Result<Option<PalmBox>> {
        let crop = CropRegion::full().to_pixels(frame.cols() as u32, frame.rows() as u32);
        let range = if self.config.signed_input { PixelRange::Signed } else { PixelRange::Unit };
        let (input, letterbox) = preprocess_for_hand(frame, &crop, self.config.input_size, range)?;

        let input_tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs![self.config.input_name.as_str() => input_tensor])
            .context("Palm detection inference failed")?;

        // 出力: boxes [1, N, 18], scores [1, N, 1]
        let boxes: ndarray::ArrayViewD<f32> = outputs[self.config.boxes_output.as_str()]
            .try_extract_array()
            .context("Failed to extract palm box tensor")?;
        let scores: ndarray::ArrayViewD<f32> = outputs[self.config.scores_output.as_str()]
            .try_extract_array()
            .context("Failed to extract palm score tensor")?;
        let boxes: Vec<f32> = boxes.iter().copied().collect();
        let scores: Vec<f32> = scores.iter().copied().collect();

        if scores.len() != self.anchors.len() {
            bail!(
                "palm model produced {} scores but {} anchors were generated",
                scores.len(),
                self.anchors.len()
            );
        }

        let palm = decode_best(&boxes, &scores, &self.anchors, self.config.input_size, min_score)
            .map(|raw| raw.to_frame(&letterbox));
        if let Some(ref palm) = palm {
            log::debug!(
                "palm detected (score={:.2}) at ({:.0},{:.0}) {:.0}x{:.0}",
                palm.score,
                palm.cx,
                palm.cy,
                palm.width,
                palm.height
            );
        }
        Ok(palm)
    }
}
