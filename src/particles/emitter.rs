//! 发射调度
//!
//! 用时间累加器把连续的发射速率转换为离散的发射事件。
//! 一帧跨越多个发射间隔时会在同一帧内补齐，帧时间抖动不影响总发射数。

use glam::Vec2;
use rand::Rng;

use super::pool::SpawnState;
use super::range::random_in_range;
use crate::config::EmitterConfig;
use crate::core::ParticleResult;

/// 累加器比较容差（秒），吸收浮点累计误差
const ACCUMULATOR_EPSILON: f64 = 1e-9;

/// 发射调度器
#[derive(Debug, Clone, Default)]
pub struct EmissionScheduler {
    accumulator: f64,
}

impl EmissionScheduler {
    pub fn new() -> Self {
        Self { accumulator: 0.0 }
    }

    /// 当前累计的未发射时间（秒）
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// 重置累加器
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// 推进 `dt` 秒，按 `rate` 每跨过一个发射间隔调用一次 `spawn`
    ///
    /// 返回本次触发的发射事件数。`rate <= 0` 时不做任何事。
    pub fn tick<F: FnMut()>(&mut self, dt: f32, rate: f32, mut spawn: F) -> u32 {
        if !(rate > 0.0) || !rate.is_finite() || !(dt > 0.0) {
            return 0;
        }

        self.accumulator += f64::from(dt);
        let interval = 1.0 / f64::from(rate);

        let mut events = 0;
        while self.accumulator + ACCUMULATOR_EPSILON >= interval {
            spawn();
            self.accumulator -= interval;
            events += 1;
        }
        self.accumulator = self.accumulator.max(0.0);
        events
    }

    /// 立即触发 `amount` 次发射，不经过累加器
    pub fn emit<F: FnMut()>(&mut self, amount: u32, mut spawn: F) -> u32 {
        for _ in 0..amount {
            spawn();
        }
        amount
    }
}

/// 采样一个新粒子的初始运动学状态
pub fn sample_spawn_state<R: Rng>(
    config: &EmitterConfig,
    rng: &mut R,
    origin: Vec2,
) -> ParticleResult<SpawnState> {
    let half_spread = config.spread / 2.0;
    let spread_offset = random_in_range(rng, "spread", -half_spread, half_spread)?;
    let final_angle = config.angle.to_radians() + spread_offset.to_radians();
    let direction = Vec2::new(final_angle.cos(), final_angle.sin());

    let lifetime = config.lifetime.sample(rng, "lifetime")?;
    let rotation = config.rotation.sample(rng, "rotation")?;
    let speed = config.speed.sample(rng, "speed")?;

    Ok(SpawnState {
        lifetime,
        rotation,
        position: origin,
        velocity: direction * speed,
        acceleration: config.acceleration,
    })
}
