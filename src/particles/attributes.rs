//! 粒子可见属性
//!
//! 把每个存活粒子的生命周期进度送入大小/透明度/颜色序列，
//! 生成交给渲染端的快照。死亡槽位不会出现在快照中。

use glam::Vec2;

use super::id::ParticleId;
use super::pool::{ParticlePool, ParticleSlot};
use super::sequence::Color;
use crate::config::EmitterConfig;

/// 大小序列的基准单位（宽、高）
pub const BASE_SIZE_UNIT: Vec2 = Vec2::ONE;

/// 单个粒子的渲染属性
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleAttributes {
    pub id: ParticleId,
    pub position: Vec2,
    /// 旋转角度（度）
    pub rotation: f32,
    pub size: Vec2,
    /// 透明度（0 = 不透明，1 = 完全透明）
    pub alpha: f32,
    /// 配置了颜色序列时的颜色
    pub color: Option<Color>,
}

/// 计算单个粒子的属性
pub fn resolve_particle(particle: &ParticleSlot, config: &EmitterConfig) -> ParticleAttributes {
    let progress = particle.progress();
    ParticleAttributes {
        id: particle.id().clone(),
        position: particle.position,
        rotation: particle.rotation,
        size: BASE_SIZE_UNIT * config.size.evaluate(progress),
        alpha: config.transparency.evaluate(progress),
        color: config.color.as_ref().map(|seq| seq.evaluate(progress)),
    }
}

/// 把所有存活粒子的属性写入 `out`（先清空）
pub fn resolve_snapshot_into(
    pool: &ParticlePool,
    config: &EmitterConfig,
    out: &mut Vec<ParticleAttributes>,
) {
    out.clear();
    out.reserve(pool.alive_count());
    out.extend(pool.iter_alive().map(|p| resolve_particle(p, config)));
}
