//! 粒子物理积分
//!
//! 每帧推进存活粒子的年龄、速度（加速度 + 指数阻力）、位置和旋转。
//! 年龄达到寿命的粒子在当帧被标记死亡，且当帧不再积分。

use super::pool::{ParticlePool, SlotId};

/// 积分参数（来自发射器配置，对所有粒子相同）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsParams {
    /// 阻力系数
    pub drag: f32,
    /// 旋转速度（度/秒）
    pub rotation_speed: f32,
}

/// 推进一帧，返回本帧死亡的粒子数
pub fn advance(pool: &mut ParticlePool, params: PhysicsParams, dt: f32) -> usize {
    if !(dt >= 0.0) || !dt.is_finite() {
        tracing::warn!(target: "particles", "Ignoring physics step with invalid dt {}", dt);
        return 0;
    }

    // 阻力衰减对所有粒子相同，每帧只算一次
    let damping = if params.drag > 0.0 {
        Some((-params.drag * dt).exp())
    } else {
        None
    };

    let mut retired = 0;
    for index in 0..pool.len() {
        let slot = SlotId(index);
        let Some(particle) = pool.get_mut(slot) else {
            continue;
        };
        if !particle.is_alive() {
            continue;
        }

        particle.age += dt;
        if particle.age >= particle.lifetime {
            pool.mark_dead(slot);
            retired += 1;
            continue;
        }

        particle.velocity += particle.acceleration * dt;
        if let Some(damping) = damping {
            particle.velocity *= damping;
        }
        particle.position += particle.velocity * dt;
        particle.rotation += params.rotation_speed * dt;
    }
    retired
}
