use anyhow::{Context, Result};
use opencv::{core::Mat, prelude::*};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;

use super::landmark::Hand;
use super::palm::{roi_from_palm, sigmoid};
use super::palm_detector::PalmDetector;
use super::preprocess::{preprocess_for_hand, PixelRange};
use super::roi::{remap_landmarks, roi_from_hand, CropRegion};
use crate::config::{HandConfig, PalmConfig};

/// 手のひら検出 + MediaPipe ハンドランドマーク (ONNX) による単一の手の検出器
///
/// 前フレームで手が見つかっていれば、そのランドマーク周辺のROIだけを
/// 推論する（追跡モード）。ROIが無いか追跡に失敗したら、手のひら検出を
/// `detection_confidence` で行い、そのBBoxから作ったROIでランドマークを推論する。
/// ランドマークの存在スコアは常に `tracking_confidence` で判定する。
pub struct HandDetector {
    session: Session,
    palm: PalmDetector,
    config: HandConfig,
    palm_config: PalmConfig,
    roi: Option<CropRegion>,
}

impl HandDetector {
    /// ONNXモデル（ランドマーク・手のひら）を読み込んで初期化
    pub fn new(config: &HandConfig, palm_config: &PalmConfig) -> Result<Self> {
        let session = Self::load_session(&config.model_path)?;
        let palm = PalmDetector::new(palm_config)?;
        Ok(Self {
            session,
            palm,
            config: config.clone(),
            palm_config: palm_config.clone(),
            roi: None,
        })
    }

    fn load_session<P: AsRef<Path>>(model_path: P) -> Result<Session> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path.as_ref())
            .with_context(|| format!("Failed to load hand landmark model {}", model_path.as_ref().display()))?;
        Ok(session)
    }

    /// 追跡中か
    pub fn is_tracking(&self) -> bool {
        self.roi.is_some()
    }

    /// 追跡状態を捨てる
    pub fn reset(&mut self) {
        self.roi = None;
    }

    /// フレーム（BGR, ミラー済み）から手を1つ検出
    pub fn detect(&mut self, frame: &Mat) -> Result<Option<Hand>> {
        if frame.empty() {
            return Ok(None);
        }
        let frame_w = frame.cols() as u32;
        let frame_h = frame.rows() as u32;

        if let Some(roi) = self.roi.take() {
            let hand = self.infer(frame, &roi)?;
            if let Some(hand) = hand.filter(|h| h.score >= self.config.tracking_confidence) {
                self.roi = roi_from_hand(&hand, frame_w, frame_h, self.config.roi_scale);
                return Ok(Some(hand));
            }
            log::debug!("hand tracking lost, falling back to palm detection");
        }

        let Some(palm) = self.palm.detect(frame, self.config.detection_confidence)? else {
            return Ok(None);
        };
        let Some(roi) = roi_from_palm(&palm, frame_w, frame_h, self.palm_config.roi_scale, self.palm_config.shift_y)
        else {
            return Ok(None);
        };

        let hand = self
            .infer(frame, &roi)?
            .filter(|h| h.score >= self.config.tracking_confidence);
        if let Some(ref hand) = hand {
            log::debug!(
                "hand detected (palm={:.2}, presence={:.2}), index tip=({:.3},{:.3})",
                palm.score,
                hand.score,
                hand.index_finger_tip().x,
                hand.index_finger_tip().y
            );
            self.roi = roi_from_hand(hand, frame_w, frame_h, self.config.roi_scale);
        }
        Ok(hand)
    }

    /// 指定領域を推論し、スコアに関わらず結果を返す
    fn infer(&mut self, frame: &Mat, region: &CropRegion) -> Result<Option<Hand>> {
        let frame_w = frame.cols() as u32;
        let frame_h = frame.rows() as u32;
        let crop = region.to_pixels(frame_w, frame_h);
        let (input, letterbox) = preprocess_for_hand(frame, &crop, self.config.input_size, PixelRange::Unit)?;

        let input_tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs![self.config.input_name.as_str() => input_tensor])
            .context("Hand landmark inference failed")?;

        // ランドマーク出力は [1, 63] (x, y, z) × 21、入力ピクセル単位
        let raw: ndarray::ArrayViewD<f32> = outputs[self.config.landmarks_output.as_str()]
            .try_extract_array()
            .context("Failed to extract landmark tensor")?;
        let raw: Vec<f32> = raw.iter().copied().collect();

        let score: ndarray::ArrayViewD<f32> = outputs[self.config.score_output.as_str()]
            .try_extract_array()
            .context("Failed to extract hand score tensor")?;
        let Some(&score) = score.iter().next() else {
            return Ok(None);
        };
        let score = if self.config.score_is_logit { sigmoid(score) } else { score };

        let Some(landmarks) = remap_landmarks(&raw, &letterbox, &crop, frame_w, frame_h) else {
            log::warn!("unexpected landmark output length {}", raw.len());
            return Ok(None);
        };

        Ok(Some(Hand::new(landmarks, score)))
    }
}
