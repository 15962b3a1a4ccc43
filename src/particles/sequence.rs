//! 关键帧序列
//!
//! 把归一化生命周期进度 `t ∈ [0, 1]` 映射为插值后的标量或颜色，
//! 用于推导粒子随时间变化的大小、透明度和颜色。

use glam::Vec3;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::{ParticleError, ParticleResult};

/// RGB 颜色（各分量 0-1）
pub type Color = Vec3;

/// 可插值的关键帧值
pub trait Interpolate: Copy + Default {
    fn interpolate(self, other: Self, alpha: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(self, other: Self, alpha: f32) -> Self {
        self + (other - self) * alpha
    }
}

impl Interpolate for Vec3 {
    /// 逐分量线性插值
    fn interpolate(self, other: Self, alpha: f32) -> Self {
        self.lerp(other, alpha)
    }
}

/// 关键帧
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint<T> {
    /// 时间点（0-1）
    pub time: f32,
    /// 值
    pub value: T,
    /// 包络宽度，随序列保存，求值时不使用
    #[serde(default)]
    pub envelope: f32,
}

impl<T> Keypoint<T> {
    pub fn new(time: f32, value: T) -> Self {
        Self {
            time,
            value,
            envelope: 0.0,
        }
    }

    pub fn with_envelope(mut self, envelope: f32) -> Self {
        self.envelope = envelope;
        self
    }
}

/// 在关键帧切片上求值
///
/// - `t <= 0` 返回首个关键帧的值，`t >= 1` 返回最后一个
/// - 否则找到 `current.time <= t < following.time` 的相邻对并线性插值
/// - 找不到相邻对（序列未排序等）时退回首个关键帧的值
///
/// 仅在切片为空时返回 `None`。
pub fn evaluate_keypoints<T: Interpolate>(keypoints: &[Keypoint<T>], t: f32) -> Option<T> {
    let first = keypoints.first()?;
    if t <= 0.0 {
        return Some(first.value);
    }
    if t >= 1.0 {
        return keypoints.last().map(|k| k.value);
    }

    for pair in keypoints.windows(2) {
        let (current, following) = (&pair[0], &pair[1]);
        if t >= current.time && t < following.time {
            let alpha = (t - current.time) / (following.time - current.time);
            return Some(current.value.interpolate(following.value, alpha));
        }
    }

    Some(first.value)
}

/// 关键帧序列
///
/// 构造时保证：至少两个关键帧，首帧时间为 0，末帧时间为 1，时间单调不减。
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence<T> {
    keypoints: Vec<Keypoint<T>>,
}

/// 标量序列
pub type NumberSequence = Sequence<f32>;
/// 颜色序列
pub type ColorSequence = Sequence<Color>;

impl<T: Interpolate> Sequence<T> {
    /// 从关键帧列表创建并校验
    pub fn new(keypoints: Vec<Keypoint<T>>) -> ParticleResult<Self> {
        validate_keypoints(&keypoints)?;
        Ok(Self { keypoints })
    }

    /// 恒定值序列
    pub fn constant(value: T) -> Self {
        Self::linear(value, value)
    }

    /// 从 `start` 线性变化到 `end`
    pub fn linear(start: T, end: T) -> Self {
        Self {
            keypoints: vec![Keypoint::new(0.0, start), Keypoint::new(1.0, end)],
        }
    }

    pub fn keypoints(&self) -> &[Keypoint<T>] {
        &self.keypoints
    }

    /// 在归一化进度 `t` 处求值
    pub fn evaluate(&self, t: f32) -> T {
        evaluate_keypoints(&self.keypoints, t).unwrap_or_default()
    }
}

fn validate_keypoints<T>(keypoints: &[Keypoint<T>]) -> ParticleResult<()> {
    let (Some(first), Some(last)) = (keypoints.first(), keypoints.last()) else {
        return Err(ParticleError::InvalidSequence(
            "sequence has no keypoints".to_string(),
        ));
    };
    if keypoints.len() < 2 {
        return Err(ParticleError::InvalidSequence(
            "sequence needs at least two keypoints".to_string(),
        ));
    }
    if first.time != 0.0 || last.time != 1.0 {
        return Err(ParticleError::InvalidSequence(format!(
            "sequence must start at time 0 and end at time 1, got {} and {}",
            first.time, last.time
        )));
    }
    for pair in keypoints.windows(2) {
        if !(pair[0].time <= pair[1].time) {
            return Err(ParticleError::InvalidSequence(format!(
                "keypoint times must be non-decreasing ({} then {})",
                pair[0].time, pair[1].time
            )));
        }
    }
    Ok(())
}

/// 求值标量序列
pub fn evaluate_number_sequence(sequence: &NumberSequence, t: f32) -> f32 {
    sequence.evaluate(t)
}

/// 求值颜色序列
pub fn evaluate_color_sequence(sequence: &ColorSequence, t: f32) -> Color {
    sequence.evaluate(t)
}

impl<T: Serialize> Serialize for Sequence<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.keypoints.serialize(serializer)
    }
}

/// 配置文件中的序列写法：单个值或关键帧列表
#[derive(Deserialize)]
#[serde(untagged)]
enum SequenceRepr<T> {
    Constant(T),
    Keypoints(Vec<Keypoint<T>>),
}

impl<'de, T> Deserialize<'de> for Sequence<T>
where
    T: Interpolate + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match SequenceRepr::<T>::deserialize(deserializer)? {
            SequenceRepr::Constant(value) => Ok(Self::constant(value)),
            SequenceRepr::Keypoints(keypoints) => {
                Self::new(keypoints).map_err(serde::de::Error::custom)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_midpoint() {
        let seq = NumberSequence::new(vec![Keypoint::new(0.0, 10.0), Keypoint::new(1.0, 0.0)])
            .unwrap();
        assert!((evaluate_number_sequence(&seq, 0.5) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_endpoints() {
        let seq = NumberSequence::new(vec![
            Keypoint::new(0.0, 8.0),
            Keypoint::new(0.65, 8.0),
            Keypoint::new(0.7, 0.0),
            Keypoint::new(1.0, 0.0),
        ])
        .unwrap();
        assert_eq!(seq.evaluate(0.0), 8.0);
        assert_eq!(seq.evaluate(1.0), 0.0);
        assert_eq!(seq.evaluate(-3.0), 8.0);
        assert_eq!(seq.evaluate(4.0), 0.0);
        assert!((seq.evaluate(0.675) - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_duplicate_time_takes_later_segment() {
        // 同一时间的两个关键帧形成阶跃
        let seq = NumberSequence::new(vec![
            Keypoint::new(0.0, 1.0),
            Keypoint::new(0.5, 1.0),
            Keypoint::new(0.5, 3.0),
            Keypoint::new(1.0, 3.0),
        ])
        .unwrap();
        assert_eq!(seq.evaluate(0.25), 1.0);
        assert_eq!(seq.evaluate(0.5), 3.0);
    }

    #[test]
    fn test_malformed_falls_back_to_first() {
        let keys = vec![
            Keypoint::new(0.0, 2.0),
            Keypoint::new(0.8, 6.0),
            Keypoint::new(0.3, 9.0),
        ];
        assert_eq!(evaluate_keypoints(&keys, 0.9), Some(2.0));
        assert_eq!(evaluate_keypoints::<f32>(&[], 0.5), None);
        assert_eq!(evaluate_keypoints(&keys, f32::NAN), Some(2.0));
    }

    #[test]
    fn test_color_interpolates_per_component() {
        let seq = ColorSequence::linear(Color::new(1.0, 0.0, 0.0), Color::new(0.0, 0.0, 1.0));
        let mid = evaluate_color_sequence(&seq, 0.5);
        assert!((mid - Color::new(0.5, 0.0, 0.5)).length() < 1e-6);
        assert_eq!(seq.evaluate(1.0), Color::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_validation() {
        assert!(NumberSequence::new(vec![]).is_err());
        assert!(NumberSequence::new(vec![Keypoint::new(0.0, 1.0)]).is_err());
        assert!(NumberSequence::new(vec![Keypoint::new(0.2, 1.0), Keypoint::new(1.0, 0.0)]).is_err());
        assert!(NumberSequence::new(vec![
            Keypoint::new(0.0, 1.0),
            Keypoint::new(0.6, 1.0),
            Keypoint::new(0.4, 1.0),
            Keypoint::new(1.0, 1.0),
        ])
        .is_err());
    }

    #[test]
    fn test_endpoints_must_be_zero_and_one() {
        let err = NumberSequence::new(vec![Keypoint::new(0.0, 1.0), Keypoint::new(0.9, 0.0)])
            .unwrap_err();
        assert!(matches!(err, ParticleError::InvalidSequence(_)));
        assert!(NumberSequence::new(vec![
            Keypoint::new(0.0, 1.0),
            Keypoint::new(1.5, 1.0),
            Keypoint::new(1.0, 0.0),
        ])
        .is_err());
        // 重复时间点合法
        assert!(NumberSequence::new(vec![
            Keypoint::new(0.0, 1.0),
            Keypoint::new(0.0, 2.0),
            Keypoint::new(1.0, 2.0),
        ])
        .is_ok());
    }

    #[test]
    fn test_envelope_kept_but_not_applied() {
        let plain = NumberSequence::linear(8.0, 0.0);
        let enveloped = NumberSequence::new(vec![
            Keypoint::new(0.0, 8.0).with_envelope(2.0),
            Keypoint::new(1.0, 0.0).with_envelope(2.0),
        ])
        .unwrap();
        assert_eq!(enveloped.keypoints()[0].envelope, 2.0);
        assert_eq!(enveloped.evaluate(0.25), plain.evaluate(0.25));

        let json = serde_json::to_string(&enveloped).unwrap();
        let parsed: NumberSequence = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, enveloped);
    }

    #[test]
    fn test_deserialize_constant_and_keypoints() {
        let constant: NumberSequence = serde_json::from_str("8.0").unwrap();
        assert_eq!(constant.evaluate(0.3), 8.0);

        let keyed: NumberSequence = serde_json::from_str(
            r#"[{"time": 0.0, "value": 5.0}, {"time": 1.0, "value": 0.0, "envelope": 0.5}]"#,
        )
        .unwrap();
        assert_eq!(keyed.keypoints()[1].envelope, 0.5);
        assert!((keyed.evaluate(0.2) - 4.0).abs() < 1e-6);

        let bad = serde_json::from_str::<NumberSequence>(r#"[{"time": 0.5, "value": 1.0}]"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_color_constant_from_array() {
        let seq: ColorSequence = serde_json::from_str("[1.0, 0.5, 0.0]").unwrap();
        assert_eq!(seq.evaluate(0.7), Color::new(1.0, 0.5, 0.0));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn keypoint_values() -> impl Strategy<Value = Vec<f32>> {
            prop::collection::vec(-1000.0f32..1000.0, 2..8)
        }

        proptest! {
            #[test]
            fn endpoints_match_first_and_last(values in keypoint_values()) {
                let last_index = values.len() - 1;
                let keypoints: Vec<_> = values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| Keypoint::new(i as f32 / last_index as f32, *v))
                    .collect();
                let seq = NumberSequence::new(keypoints).unwrap();
                prop_assert_eq!(seq.evaluate(0.0), values[0]);
                prop_assert_eq!(seq.evaluate(1.0), values[last_index]);
            }

            #[test]
            fn interior_values_stay_within_neighbours(
                start in -100.0f32..100.0,
                end in -100.0f32..100.0,
                t in 0.0f32..1.0,
            ) {
                let seq = NumberSequence::linear(start, end);
                let v = seq.evaluate(t);
                prop_assert!(v >= start.min(end) - 1e-3 && v <= start.max(end) + 1e-3);
            }
        }
    }
}
