use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::{ParticleError, ParticleResult};
use crate::impl_default;
use crate::particles::range::{check_span, ValueRange};
use crate::particles::sequence::{ColorSequence, NumberSequence};

/// 默认最大粒子数
pub const DEFAULT_MAX_PARTICLES: usize = 1000;

/// 粒子发射器配置
///
/// 所有字段都有默认值，配置文件中只需写出需要覆盖的字段。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// 每秒发射数量（0 = 只响应手动发射）
    pub rate: f32,
    /// 发射方向（度）
    pub angle: f32,
    /// 方向随机扩散角（度，围绕 `angle` 对称）
    pub spread: f32,
    /// 初始速率
    pub speed: ValueRange,
    /// 初始旋转（度）
    pub rotation: ValueRange,
    /// 旋转速度（度/秒）
    pub rotation_speed: f32,
    /// 寿命（秒）
    pub lifetime: ValueRange,
    /// 加速度
    pub acceleration: Vec2,
    /// 阻力系数（指数衰减）
    pub drag: f32,
    /// 大小随生命周期
    pub size: NumberSequence,
    /// 透明度随生命周期（0 = 不透明）
    pub transparency: NumberSequence,
    /// 颜色随生命周期
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorSequence>,
    /// 最大粒子数（槽位上限）
    pub max_particles: usize,
}

impl_default!(EmitterConfig {
    rate: 150.0,
    angle: 0.0,
    spread: 0.0,
    speed: ValueRange::Fixed(60.0),
    rotation: ValueRange::Range(-360.0, 360.0),
    rotation_speed: 48.0,
    lifetime: ValueRange::Range(1.0, 5.0),
    acceleration: Vec2::ZERO,
    drag: 0.0,
    size: NumberSequence::linear(5.0, 0.0),
    transparency: NumberSequence::constant(0.0),
    color: None,
    max_particles: DEFAULT_MAX_PARTICLES,
});

impl EmitterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置发射速率
    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    /// 设置发射方向和扩散角
    pub fn with_direction(mut self, angle: f32, spread: f32) -> Self {
        self.angle = angle;
        self.spread = spread;
        self
    }

    pub fn with_speed(mut self, speed: impl Into<ValueRange>) -> Self {
        self.speed = speed.into();
        self
    }

    pub fn with_rotation(mut self, rotation: impl Into<ValueRange>, rotation_speed: f32) -> Self {
        self.rotation = rotation.into();
        self.rotation_speed = rotation_speed;
        self
    }

    /// 设置寿命区间
    pub fn with_lifetime(mut self, min: f32, max: f32) -> Self {
        self.lifetime = ValueRange::Range(min, max);
        self
    }

    pub fn with_acceleration(mut self, acceleration: Vec2) -> Self {
        self.acceleration = acceleration;
        self
    }

    pub fn with_drag(mut self, drag: f32) -> Self {
        self.drag = drag;
        self
    }

    pub fn with_size(mut self, size: NumberSequence) -> Self {
        self.size = size;
        self
    }

    pub fn with_transparency(mut self, transparency: NumberSequence) -> Self {
        self.transparency = transparency;
        self
    }

    pub fn with_color(mut self, color: ColorSequence) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_max_particles(mut self, max_particles: usize) -> Self {
        self.max_particles = max_particles;
        self
    }

    /// 验证配置
    ///
    /// 逐帧路径上的区间采样依赖这里的检查，非法区间不会进入模拟。
    pub fn validate(&self) -> ParticleResult<()> {
        for (name, value) in [
            ("rate", self.rate),
            ("angle", self.angle),
            ("spread", self.spread),
            ("rotation_speed", self.rotation_speed),
            ("drag", self.drag),
            ("acceleration.x", self.acceleration.x),
            ("acceleration.y", self.acceleration.y),
        ] {
            if !value.is_finite() {
                return Err(ParticleError::InvalidConfig(format!(
                    "{name} must be finite"
                )));
            }
        }
        if self.rate < 0.0 {
            return Err(ParticleError::InvalidConfig(
                "rate must not be negative".to_string(),
            ));
        }
        if self.drag < 0.0 {
            return Err(ParticleError::InvalidConfig(
                "drag must not be negative".to_string(),
            ));
        }
        if self.spread < 0.0 {
            return Err(ParticleError::InvalidRange {
                what: "spread",
                min: -self.spread / 2.0,
                max: self.spread / 2.0,
            });
        }
        check_span("spread", -self.spread / 2.0, self.spread / 2.0)?;
        if self.max_particles == 0 {
            return Err(ParticleError::InvalidConfig(
                "max_particles must be at least 1".to_string(),
            ));
        }

        self.speed.validate("speed")?;
        self.rotation.validate("rotation")?;
        self.lifetime.validate("lifetime")?;
        if self.lifetime.min_val() <= 0.0 {
            return Err(ParticleError::InvalidConfig(
                "lifetime must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
