//! CPU 粒子系统模块
//!
//! 面向界面装饰效果（彩纸、火花、点击反馈）的轻量粒子模拟，
//! 完全在 CPU 上执行，渲染交给宿主。
//!
//! ## 架构设计
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    ParticleEngine                        │
//! ├─────────────────────────────────────────────────────────┤
//! │  1. Emission                                             │
//! │     - 时间累加器把发射速率转换为离散发射事件               │
//! │     - 从空闲槽位分配，池满时静默丢弃                       │
//! │     - 采样寿命、旋转、速度和方向                           │
//! │                                                          │
//! │  2. Simulation                                           │
//! │     - 年龄推进与死亡判定                                   │
//! │     - 加速度 + 指数阻力 + 半隐式欧拉积分                   │
//! │                                                          │
//! │  3. Attributes                                           │
//! │     - 大小/透明度/颜色随生命周期进度变化                   │
//! │     - 快照交给渲染函数或默认四边形                         │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 使用示例
//!
//! ```
//! use ui_particles::config::EmitterConfig;
//! use ui_particles::particles::ParticleEngine;
//!
//! let config = EmitterConfig::default().with_rate(20.0).with_lifetime(1.0, 2.0);
//! let mut engine = ParticleEngine::new(config).unwrap();
//!
//! // 每帧
//! engine.update(1.0 / 60.0);
//! for particle in engine.snapshot() {
//!     let _ = (particle.position, particle.size, particle.alpha);
//! }
//! ```

pub mod attributes;
pub mod emitter;
pub mod engine;
pub mod id;
pub mod physics;
pub mod pool;
pub mod range;
pub mod render;
pub mod sequence;
pub mod spawn;

pub use attributes::{resolve_particle, ParticleAttributes, BASE_SIZE_UNIT};
pub use emitter::{sample_spawn_state, EmissionScheduler};
pub use engine::{ParticleEngine, ParticleSystemStats};
pub use id::{IdGenerator, ParticleId, RandomIdGenerator, SequentialIdGenerator};
pub use physics::PhysicsParams;
pub use pool::{ParticlePool, ParticleSlot, SlotId, SpawnState};
pub use range::{random_in_range, ValueRange};
pub use render::{DefaultQuadRenderer, ParticleRenderer, QuadVisual};
pub use sequence::{
    evaluate_color_sequence, evaluate_number_sequence, Color, ColorSequence, Interpolate, Keypoint,
    NumberSequence, Sequence,
};
pub use spawn::{resolve_spawn_origin, Anchor};
