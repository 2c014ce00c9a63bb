/// MediaPipe Hands の 21 ランドマークインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum LandmarkIndex {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexFingerMcp = 5,
    IndexFingerPip = 6,
    IndexFingerDip = 7,
    IndexFingerTip = 8,
    MiddleFingerMcp = 9,
    MiddleFingerPip = 10,
    MiddleFingerDip = 11,
    MiddleFingerTip = 12,
    RingFingerMcp = 13,
    RingFingerPip = 14,
    RingFingerDip = 15,
    RingFingerTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl LandmarkIndex {
    pub const COUNT: usize = 21;
}

/// 単一ランドマーク
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    /// 正規化されたX座標 (0.0〜1.0)
    pub x: f32,
    /// 正規化されたY座標 (0.0〜1.0)
    pub y: f32,
    /// 手首基準の相対深度（Xと同じスケール）
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// ピクセル座標に変換
    pub fn to_pixel(&self, width: u32, height: u32) -> (i32, i32) {
        let px = (self.x * width as f32) as i32;
        let py = (self.y * height as f32) as i32;
        (px, py)
    }
}

/// 検出された1本の手
#[derive(Debug, Clone)]
pub struct Hand {
    pub landmarks: [Landmark; LandmarkIndex::COUNT],
    /// 手の存在スコア (0.0〜1.0)
    pub score: f32,
}

impl Hand {
    pub fn new(landmarks: [Landmark; LandmarkIndex::COUNT], score: f32) -> Self {
        Self { landmarks, score }
    }

    pub fn get(&self, index: LandmarkIndex) -> &Landmark {
        &self.landmarks[index as usize]
    }

    /// 人差し指の先端（ゲーム操作に使う唯一の点）
    pub fn index_finger_tip(&self) -> &Landmark {
        self.get(LandmarkIndex::IndexFingerTip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_finger_tip_id() {
        assert_eq!(LandmarkIndex::IndexFingerTip as usize, 8);
        assert_eq!(LandmarkIndex::PinkyTip as usize, LandmarkIndex::COUNT - 1);
    }

    #[test]
    fn test_hand_index_finger_tip() {
        let mut landmarks = [Landmark::default(); LandmarkIndex::COUNT];
        landmarks[8] = Landmark::new(0.25, 0.75, -0.1);
        let hand = Hand::new(landmarks, 0.9);
        assert_eq!(hand.index_finger_tip().x, 0.25);
        assert_eq!(hand.index_finger_tip().y, 0.75);
    }

    #[test]
    fn test_landmark_to_pixel() {
        let lm = Landmark::new(0.5, 0.25, 0.0);
        assert_eq!(lm.to_pixel(640, 480), (320, 120));
    }
}
