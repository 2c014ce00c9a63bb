use anyhow::{ensure, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub paddle: PaddleConfig,
    #[serde(default)]
    pub obstacle: ObstacleConfig,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub smooth: SmoothConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub hand: HandConfig,
    #[serde(default)]
    pub palm: PalmConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WindowConfig {
    #[serde(default = "default_window_width")]
    pub width: usize,
    #[serde(default = "default_window_height")]
    pub height: usize,
    #[serde(default = "default_window_title")]
    pub title: String,
    /// カメラプレビューウィンドウのタイトル
    #[serde(default = "default_preview_title")]
    pub preview_title: String,
}

fn default_window_width() -> usize { 800 }
fn default_window_height() -> usize { 600 }
fn default_window_title() -> String { "Gesture-Based Game".to_string() }
fn default_preview_title() -> String { "Gesture Recognition".to_string() }

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
            title: default_window_title(),
            preview_title: default_preview_title(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaddleConfig {
    #[serde(default = "default_block_size")]
    pub width: f32,
    #[serde(default = "default_block_size")]
    pub height: f32,
    /// ウィンドウ下端からの余白（ピクセル）
    #[serde(default = "default_bottom_margin")]
    pub bottom_margin: f32,
}

fn default_block_size() -> f32 { 50.0 }
fn default_bottom_margin() -> f32 { 10.0 }

impl Default for PaddleConfig {
    fn default() -> Self {
        Self {
            width: default_block_size(),
            height: default_block_size(),
            bottom_margin: default_bottom_margin(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObstacleConfig {
    #[serde(default = "default_block_size")]
    pub width: f32,
    #[serde(default = "default_block_size")]
    pub height: f32,
    /// 落下速度（ピクセル/tick）
    #[serde(default = "default_obstacle_speed")]
    pub speed: f32,
}

fn default_obstacle_speed() -> f32 { 3.0 }

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            width: default_block_size(),
            height: default_block_size(),
            speed: default_obstacle_speed(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
}

fn default_target_fps() -> u32 { 60 }

impl Default for AppConfig {
    fn default() -> Self {
        Self { target_fps: default_target_fps() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SmoothConfig {
    /// 前回出力の重み（入力の重みは 1 - previous_weight）
    #[serde(default = "default_previous_weight")]
    pub previous_weight: f32,
}

fn default_previous_weight() -> f32 { 0.8 }

impl Default for SmoothConfig {
    fn default() -> Self {
        Self { previous_weight: default_previous_weight() }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CameraConfig {
    #[serde(default)]
    pub index: i32,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HandConfig {
    #[serde(default = "default_model_path")]
    pub model_path: String,
    /// 手のひら検出の採用閾値
    #[serde(default = "default_confidence")]
    pub detection_confidence: f32,
    /// ROI追跡時の採用閾値
    #[serde(default = "default_confidence")]
    pub tracking_confidence: f32,
    /// モデル入力の一辺（ピクセル）
    #[serde(default = "default_input_size")]
    pub input_size: i32,
    #[serde(default = "default_input_name")]
    pub input_name: String,
    #[serde(default = "default_landmarks_output")]
    pub landmarks_output: String,
    #[serde(default = "default_score_output")]
    pub score_output: String,
    /// スコア出力がロジットならシグモイドを通す
    #[serde(default = "default_score_is_logit")]
    pub score_is_logit: bool,
    /// 前フレームのランドマークBBoxに対するROI拡大率
    #[serde(default = "default_roi_scale")]
    pub roi_scale: f32,
}

fn default_model_path() -> String { "models/hand_landmark.onnx".to_string() }
fn default_confidence() -> f32 { 0.75 }
fn default_input_size() -> i32 { 224 }
fn default_input_name() -> String { "input_1".to_string() }
fn default_landmarks_output() -> String { "Identity".to_string() }
fn default_score_output() -> String { "Identity_1".to_string() }
fn default_score_is_logit() -> bool { true }
fn default_roi_scale() -> f32 { 2.0 }

impl Default for HandConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            detection_confidence: default_confidence(),
            tracking_confidence: default_confidence(),
            input_size: default_input_size(),
            input_name: default_input_name(),
            landmarks_output: default_landmarks_output(),
            score_output: default_score_output(),
            score_is_logit: default_score_is_logit(),
            roi_scale: default_roi_scale(),
        }
    }
}

/// 手のひら検出モデル（追跡していない時に手の位置を探す）
#[derive(Debug, Deserialize, Clone)]
pub struct PalmConfig {
    #[serde(default = "default_palm_model_path")]
    pub model_path: String,
    #[serde(default = "default_palm_input_size")]
    pub input_size: i32,
    #[serde(default = "default_palm_input_name")]
    pub input_name: String,
    #[serde(default = "default_palm_boxes_output")]
    pub boxes_output: String,
    #[serde(default = "default_palm_scores_output")]
    pub scores_output: String,
    /// SSD アンカーのストライド（レイヤー順）
    #[serde(default = "default_palm_strides")]
    pub strides: Vec<i32>,
    /// 入力を -1.0〜1.0 に正規化する（false なら 0.0〜1.0）
    #[serde(default = "default_palm_signed_input")]
    pub signed_input: bool,
    /// 手のひらBBoxの長辺に対するROI拡大率
    #[serde(default = "default_palm_roi_scale")]
    pub roi_scale: f32,
    /// ROI中心を指方向へずらす量（BBox高さ比）
    #[serde(default = "default_palm_shift_y")]
    pub shift_y: f32,
}

fn default_palm_model_path() -> String { "models/palm_detection.onnx".to_string() }
fn default_palm_input_size() -> i32 { 192 }
fn default_palm_input_name() -> String { "input".to_string() }
fn default_palm_boxes_output() -> String { "regressors".to_string() }
fn default_palm_scores_output() -> String { "classificators".to_string() }
fn default_palm_strides() -> Vec<i32> { vec![8, 16, 16, 16] }
fn default_palm_signed_input() -> bool { false }
fn default_palm_roi_scale() -> f32 { 2.6 }
fn default_palm_shift_y() -> f32 { 0.5 }

impl Default for PalmConfig {
    fn default() -> Self {
        Self {
            model_path: default_palm_model_path(),
            input_size: default_palm_input_size(),
            input_name: default_palm_input_name(),
            boxes_output: default_palm_boxes_output(),
            scores_output: default_palm_scores_output(),
            strides: default_palm_strides(),
            signed_input: default_palm_signed_input(),
            roi_scale: default_palm_roi_scale(),
            shift_y: default_palm_shift_y(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DebugConfig {
    /// 1秒ごとのFPSをinfoレベルで出す
    #[serde(default)]
    pub show_fps: bool,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// ファイルが無ければデフォルト、読めなければ警告してデフォルト
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("{} not found, using built-in defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("failed to load {}: {:#}; using built-in defaults", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let w = self.window.width as f32;
        let h = self.window.height as f32;
        ensure!(self.window.width > 0 && self.window.height > 0, "window size must be non-zero");
        ensure!(
            self.paddle.width > 0.0 && self.paddle.width <= w,
            "paddle width {} must be in (0, {}]",
            self.paddle.width,
            w
        );
        ensure!(
            self.paddle.height > 0.0 && self.paddle.height + self.paddle.bottom_margin <= h,
            "paddle does not fit vertically in a {}px window",
            h
        );
        ensure!(
            self.obstacle.width > 0.0 && self.obstacle.width <= w,
            "obstacle width {} must be in (0, {}]",
            self.obstacle.width,
            w
        );
        ensure!(self.obstacle.height > 0.0, "obstacle height must be positive");
        ensure!(self.obstacle.speed > 0.0, "obstacle speed must be positive");
        ensure!(self.app.target_fps > 0, "target_fps must be positive");
        ensure!(
            (0.0..=1.0).contains(&self.smooth.previous_weight),
            "smooth.previous_weight must be within [0, 1]"
        );
        ensure!(
            (0.0..=1.0).contains(&self.hand.detection_confidence)
                && (0.0..=1.0).contains(&self.hand.tracking_confidence),
            "hand confidences must be within [0, 1]"
        );
        ensure!(self.hand.input_size > 0, "hand.input_size must be positive");
        ensure!(self.hand.roi_scale >= 1.0, "hand.roi_scale must be at least 1.0");
        ensure!(self.palm.input_size > 0, "palm.input_size must be positive");
        ensure!(
            !self.palm.strides.is_empty() && self.palm.strides.iter().all(|&s| s > 0),
            "palm.strides must be a non-empty list of positive strides"
        );
        ensure!(self.palm.roi_scale >= 1.0, "palm.roi_scale must be at least 1.0");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_game_constants() {
        let config = Config::default();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.window.title, "Gesture-Based Game");
        assert_eq!(config.paddle.width, 50.0);
        assert_eq!(config.obstacle.speed, 3.0);
        assert_eq!(config.app.target_fps, 60);
        assert_eq!(config.smooth.previous_weight, 0.8);
        assert_eq!(config.hand.detection_confidence, 0.75);
        assert_eq!(config.hand.tracking_confidence, 0.75);
        assert_eq!(config.camera.index, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [obstacle]
            speed = 5.0

            [camera]
            index = 2
            width = 640
            "#,
        )
        .unwrap();
        assert_eq!(config.obstacle.speed, 5.0);
        assert_eq!(config.obstacle.width, 50.0);
        assert_eq!(config.camera.index, 2);
        assert_eq!(config.camera.width, Some(640));
        assert_eq!(config.camera.height, None);
        assert_eq!(config.window.height, 600);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.hand.model_path, "models/hand_landmark.onnx");
        assert_eq!(config.hand.input_size, 224);
        assert!(!config.debug.show_fps);
        assert_eq!(config.palm.model_path, "models/palm_detection.onnx");
        assert_eq!(config.palm.input_size, 192);
        assert_eq!(config.palm.strides, vec![8, 16, 16, 16]);
        assert_eq!(config.palm.roi_scale, 2.6);
    }

    #[test]
    fn test_validate_rejects_bad_palm_strides() {
        let mut config = Config::default();
        config.palm.strides = vec![8, 0];
        assert!(config.validate().is_err());
        config.palm.strides.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_paddle() {
        let mut config = Config::default();
        config.paddle.width = 900.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_weight() {
        let mut config = Config::default();
        config.smooth.previous_weight = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_fps() {
        let mut config = Config::default();
        config.app.target_fps = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default("does/not/exist.toml");
        assert_eq!(config.window.width, 800);
    }
}
