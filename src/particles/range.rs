//! 固定值 / 随机区间

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::{ParticleError, ParticleResult};

/// 在 `[min, max]` 内均匀采样
///
/// `min > max` 返回 `InvalidRange`；`min == max` 直接返回 `min`，不消耗随机源。
/// 区间宽度不是有限值（含 NaN 边界）时返回 `InvalidConfig`。
pub fn random_in_range<R: Rng>(
    rng: &mut R,
    what: &'static str,
    min: f32,
    max: f32,
) -> ParticleResult<f32> {
    if min > max {
        return Err(ParticleError::InvalidRange { what, min, max });
    }
    if min == max {
        return Ok(min);
    }
    check_span(what, min, max)?;
    Ok(rng.gen_range(min..=max))
}

/// 采样区间的宽度必须是有限值
pub(crate) fn check_span(what: &'static str, min: f32, max: f32) -> ParticleResult<()> {
    if !(max - min).is_finite() {
        return Err(ParticleError::InvalidConfig(format!(
            "{what} range [{min}, {max}] is too wide to sample"
        )));
    }
    Ok(())
}

/// 固定值或随机区间
///
/// 序列化形式：`60.0` 或 `[25.0, 500.0]`。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueRange {
    /// 固定值
    Fixed(f32),
    /// 随机区间 `[min, max]`
    Range(f32, f32),
}

impl ValueRange {
    pub fn min_val(&self) -> f32 {
        match self {
            Self::Fixed(v) => *v,
            Self::Range(min, _) => *min,
        }
    }

    pub fn max_val(&self) -> f32 {
        match self {
            Self::Fixed(v) => *v,
            Self::Range(_, max) => *max,
        }
    }

    /// 检查区间合法性
    pub fn validate(&self, what: &'static str) -> ParticleResult<()> {
        let (min, max) = (self.min_val(), self.max_val());
        if !min.is_finite() || !max.is_finite() {
            return Err(ParticleError::InvalidConfig(format!(
                "{what} must be finite"
            )));
        }
        if min > max {
            return Err(ParticleError::InvalidRange { what, min, max });
        }
        check_span(what, min, max)
    }

    /// 采样一个值；固定值不消耗随机源
    pub fn sample<R: Rng>(&self, rng: &mut R, what: &'static str) -> ParticleResult<f32> {
        match self {
            Self::Fixed(v) => Ok(*v),
            Self::Range(min, max) => random_in_range(rng, what, *min, *max),
        }
    }
}

impl From<f32> for ValueRange {
    fn from(value: f32) -> Self {
        Self::Fixed(value)
    }
}

impl From<(f32, f32)> for ValueRange {
    fn from((min, max): (f32, f32)) -> Self {
        Self::Range(min, max)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    /// 任何取随机数的调用都会 panic
    pub(crate) struct NoRandom;

    impl RngCore for NoRandom {
        fn next_u32(&mut self) -> u32 {
            panic!("random source must not be used")
        }

        fn next_u64(&mut self) -> u64 {
            panic!("random source must not be used")
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {
            panic!("random source must not be used")
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            panic!("random source must not be used")
        }
    }

    #[test]
    fn test_equal_bounds_skip_randomness() {
        let value = random_in_range(&mut NoRandom, "speed", 5.0, 5.0).unwrap();
        assert_eq!(value, 5.0);
    }

    #[test]
    fn test_inverted_bounds_fail() {
        let err = random_in_range(&mut NoRandom, "lifetime", 3.0, 1.0).unwrap_err();
        assert_eq!(
            err,
            ParticleError::InvalidRange {
                what: "lifetime",
                min: 3.0,
                max: 1.0
            }
        );
    }

    #[test]
    fn test_samples_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = random_in_range(&mut rng, "speed", 25.0, 500.0).unwrap();
            assert!((25.0..=500.0).contains(&v));
        }
    }

    #[test]
    fn test_fixed_value_range() {
        let range = ValueRange::from(60.0f32);
        assert_eq!(range.sample(&mut NoRandom, "speed").unwrap(), 60.0);
        assert!(range.validate("speed").is_ok());
    }

    #[test]
    fn test_range_validation() {
        assert!(ValueRange::Range(-360.0, 360.0).validate("rotation").is_ok());
        assert!(matches!(
            ValueRange::Range(1.0, -1.0).validate("rotation"),
            Err(ParticleError::InvalidRange { .. })
        ));
        assert!(matches!(
            ValueRange::Fixed(f32::NAN).validate("speed"),
            Err(ParticleError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_overflowing_span_rejected() {
        let range = ValueRange::Range(-3.0e38, 3.0e38);
        assert!(matches!(
            range.validate("speed"),
            Err(ParticleError::InvalidConfig(_))
        ));

        let mut rng = StdRng::seed_from_u64(3);
        assert!(matches!(
            range.sample(&mut rng, "speed"),
            Err(ParticleError::InvalidConfig(_))
        ));
        assert!(random_in_range(&mut rng, "speed", f32::NAN, 1.0).is_err());
    }

    #[test]
    fn test_untagged_serde() {
        let fixed: ValueRange = serde_json::from_str("60.0").unwrap();
        assert_eq!(fixed, ValueRange::Fixed(60.0));
        let range: ValueRange = serde_json::from_str("[25.0, 500.0]").unwrap();
        assert_eq!(range, ValueRange::Range(25.0, 500.0));
    }
}
