use crate::config::SmoothConfig;

/// 1次元の指数平滑化フィルタ
///
/// 出力 = prev * previous_weight + raw * (1 - previous_weight)
/// 手を見失ったら `reset` で前回値を捨て、次の入力は平滑化せずに通す。
#[derive(Debug, Clone)]
pub struct Smoother {
    previous_weight: f32,
    prev: Option<f32>,
}

impl Smoother {
    pub fn new(previous_weight: f32) -> Self {
        Self {
            previous_weight,
            prev: None,
        }
    }

    pub fn from_config(config: &SmoothConfig) -> Self {
        Self::new(config.previous_weight)
    }

    pub fn apply(&mut self, raw: f32) -> f32 {
        let output = match self.prev {
            Some(prev) => prev * self.previous_weight + raw * (1.0 - self.previous_weight),
            None => raw,
        };
        self.prev = Some(output);
        output
    }

    /// 検出結果を受け取り、無ければリセットする
    pub fn update(&mut self, raw: Option<f32>) -> Option<f32> {
        match raw {
            Some(x) => Some(self.apply(x)),
            None => {
                self.reset();
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.prev = None;
    }

    pub fn previous(&self) -> Option<f32> {
        self.prev
    }
}

impl Default for Smoother {
    fn default() -> Self {
        Self::from_config(&SmoothConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq_f32(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_first_sample_passthrough() {
        let mut s = Smoother::default();
        assert_eq!(s.apply(0.42), 0.42);
        assert_eq!(s.previous(), Some(0.42));
    }

    #[test]
    fn test_recurrence() {
        let mut s = Smoother::default();
        let inputs = [100.0, 200.0, 50.0, 400.0, 400.0];
        let mut expected = inputs[0];
        assert_eq!(s.apply(inputs[0]), expected);
        for &x in &inputs[1..] {
            expected = 0.8 * expected + 0.2 * x;
            assert!(approx_eq_f32(s.apply(x), expected, 1e-4));
        }
    }

    #[test]
    fn test_second_sample_weights() {
        let mut s = Smoother::default();
        s.apply(100.0);
        // 0.8 * 100 + 0.2 * 600 = 200
        assert!(approx_eq_f32(s.apply(600.0), 200.0, 1e-4));
    }

    #[test]
    fn test_gap_resets_to_raw() {
        let mut s = Smoother::default();
        s.update(Some(100.0));
        s.update(Some(600.0));
        assert_eq!(s.update(None), None);
        assert_eq!(s.previous(), None);
        // 途切れた後の最初の入力は平滑化されない
        assert_eq!(s.update(Some(700.0)), Some(700.0));
        assert!(approx_eq_f32(s.update(Some(200.0)).unwrap(), 600.0, 1e-4));
    }

    #[test]
    fn test_full_weight_holds_first_value() {
        let mut s = Smoother::new(1.0);
        s.apply(3.0);
        assert_eq!(s.apply(10.0), 3.0);
    }

    #[test]
    fn test_zero_weight_follows_input() {
        let mut s = Smoother::new(0.0);
        s.apply(3.0);
        assert_eq!(s.apply(10.0), 10.0);
    }
}
