//! 粒子引擎
//!
//! 一个引擎实例拥有自己的对象池、发射累加器、配置、随机源和标识生成器。
//! 引擎是被动的：宿主每帧调用 [`ParticleEngine::advance_emission`] 与
//! [`ParticleEngine::advance_physics`]，在需要时调用 [`ParticleEngine::emit`]，
//! 然后读取 [`ParticleEngine::snapshot`]。

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::attributes::{resolve_snapshot_into, ParticleAttributes};
use super::emitter::{sample_spawn_state, EmissionScheduler};
use super::id::{IdGenerator, RandomIdGenerator};
use super::physics::{self, PhysicsParams};
use super::pool::ParticlePool;
use super::render::{DefaultQuadRenderer, ParticleRenderer, QuadVisual};
use super::spawn::{resolve_spawn_origin, Anchor};
use crate::config::EmitterConfig;
use crate::core::ParticleResult;

/// 粒子系统统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParticleSystemStats {
    /// 当前存活粒子数
    pub alive_count: usize,
    /// 槽位总数
    pub pool_size: usize,
    /// 总发射数
    pub total_emitted: u64,
    /// 最近一次发射调度中发射的数量
    pub frame_emitted: u32,
    /// 因容量已满被丢弃的发射
    pub dropped: u64,
}

/// 单次发射用到的引擎状态（与调度器分开借用）
struct SpawnContext<'a> {
    config: &'a EmitterConfig,
    pool: &'a mut ParticlePool,
    rng: &'a mut StdRng,
    ids: &'a mut dyn IdGenerator,
    anchor: Option<&'a Anchor>,
    canvas_size: Option<Vec2>,
    stats: &'a mut ParticleSystemStats,
}

impl SpawnContext<'_> {
    /// 发射一个粒子；容量已满时静默放弃
    fn spawn_one(&mut self) -> bool {
        if !self.pool.can_allocate() {
            self.stats.dropped += 1;
            tracing::trace!(target: "particles", "Pool at capacity, spawn skipped");
            return false;
        }

        let origin = resolve_spawn_origin(self.anchor, self.canvas_size);
        let state = match sample_spawn_state(self.config, self.rng, origin) {
            Ok(state) => state,
            Err(e) => {
                self.stats.dropped += 1;
                tracing::warn!(target: "particles", "Spawn skipped: {}", e);
                return false;
            }
        };

        match self.pool.spawn(self.ids, &state) {
            Some(_) => {
                self.stats.total_emitted += 1;
                true
            }
            None => {
                self.stats.dropped += 1;
                false
            }
        }
    }
}

/// 粒子引擎
pub struct ParticleEngine {
    config: EmitterConfig,
    pool: ParticlePool,
    scheduler: EmissionScheduler,
    rng: StdRng,
    ids: Box<dyn IdGenerator>,
    anchor: Option<Anchor>,
    canvas_size: Option<Vec2>,
    stats: ParticleSystemStats,
}

impl ParticleEngine {
    /// 创建引擎；配置不合法时返回错误
    pub fn new(config: EmitterConfig) -> ParticleResult<Self> {
        Self::build(config, StdRng::from_entropy(), Box::new(RandomIdGenerator::new()))
    }

    /// 使用固定随机种子创建引擎，模拟结果可复现
    pub fn with_seed(config: EmitterConfig, seed: u64) -> ParticleResult<Self> {
        Self::build(
            config,
            StdRng::seed_from_u64(seed),
            Box::new(RandomIdGenerator::with_seed(seed.wrapping_add(1))),
        )
    }

    fn build(
        config: EmitterConfig,
        rng: StdRng,
        ids: Box<dyn IdGenerator>,
    ) -> ParticleResult<Self> {
        config.validate()?;
        tracing::debug!(
            target: "particles",
            "Creating particle engine (rate {}/s, max {} particles)",
            config.rate,
            config.max_particles
        );
        Ok(Self {
            pool: ParticlePool::new(config.max_particles),
            config,
            scheduler: EmissionScheduler::new(),
            rng,
            ids,
            anchor: None,
            canvas_size: None,
            stats: ParticleSystemStats::default(),
        })
    }

    /// 替换标识生成器；已有槽位的标识不变
    pub fn with_id_generator(mut self, ids: Box<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// 在帧之间替换配置
    ///
    /// 存活粒子保持已采样的运动学状态；新的阻力、旋转速度和序列从下一帧生效。
    pub fn set_config(&mut self, config: EmitterConfig) -> ParticleResult<()> {
        config.validate()?;
        if config.max_particles != self.config.max_particles {
            self.pool.set_max_particles(config.max_particles);
        }
        tracing::debug!(
            target: "particles",
            "Emitter config replaced (rate {}/s, max {} particles)",
            config.rate,
            config.max_particles
        );
        self.config = config;
        Ok(())
    }

    pub fn anchor(&self) -> Option<&Anchor> {
        self.anchor.as_ref()
    }

    /// 设置锚点；`None` 表示在原点发射
    pub fn set_anchor(&mut self, anchor: Option<Anchor>) {
        self.anchor = anchor;
    }

    pub fn canvas_size(&self) -> Option<Vec2> {
        self.canvas_size
    }

    /// 设置画布尺寸；`None` 表示尚未布局
    pub fn set_canvas_size(&mut self, canvas_size: Option<Vec2>) {
        self.canvas_size = canvas_size;
    }

    fn spawn_context(&mut self) -> (&mut EmissionScheduler, SpawnContext<'_>) {
        (
            &mut self.scheduler,
            SpawnContext {
                config: &self.config,
                pool: &mut self.pool,
                rng: &mut self.rng,
                ids: self.ids.as_mut(),
                anchor: self.anchor.as_ref(),
                canvas_size: self.canvas_size,
                stats: &mut self.stats,
            },
        )
    }

    /// 按发射速率推进 `dt` 秒，返回实际发射的粒子数
    pub fn advance_emission(&mut self, dt: f32) -> u32 {
        let rate = self.config.rate;
        let max_particles = self.config.max_particles;
        let (scheduler, mut ctx) = self.spawn_context();

        let mut spawned = 0;
        let events = scheduler.tick(dt, rate, || {
            if ctx.spawn_one() {
                spawned += 1;
            }
        });
        if (events as usize) > max_particles {
            tracing::debug!(
                target: "particles",
                "Emission caught up {} events in one frame (dt {})",
                events,
                dt
            );
        }

        self.stats.frame_emitted = spawned;
        self.refresh_counts();
        spawned
    }

    /// 立即发射 `amount` 个粒子，返回实际发射数
    pub fn emit(&mut self, amount: u32) -> u32 {
        if amount == 0 {
            return 0;
        }
        let (scheduler, mut ctx) = self.spawn_context();
        let mut spawned = 0;
        scheduler.emit(amount, || {
            if ctx.spawn_one() {
                spawned += 1;
            }
        });
        self.refresh_counts();
        spawned
    }

    /// 发射一个粒子
    pub fn emit_one(&mut self) -> u32 {
        self.emit(1)
    }

    /// 物理推进 `dt` 秒，返回本帧死亡的粒子数
    pub fn advance_physics(&mut self, dt: f32) -> usize {
        let params = PhysicsParams {
            drag: self.config.drag,
            rotation_speed: self.config.rotation_speed,
        };
        let retired = physics::advance(&mut self.pool, params, dt);
        self.refresh_counts();
        retired
    }

    /// 推进一帧：先物理，后发射
    ///
    /// 新粒子在诞生帧的快照中年龄为 0，从下一帧开始老化。
    pub fn update(&mut self, dt: f32) {
        self.advance_physics(dt);
        self.advance_emission(dt);
    }

    /// 当前存活粒子的属性快照
    pub fn snapshot(&self) -> Vec<ParticleAttributes> {
        let mut out = Vec::new();
        self.snapshot_into(&mut out);
        out
    }

    /// 把快照写入已有缓冲区，避免每帧分配
    pub fn snapshot_into(&self, out: &mut Vec<ParticleAttributes>) {
        resolve_snapshot_into(&self.pool, &self.config, out);
    }

    /// 把每个存活粒子交给渲染函数
    pub fn render<R: ParticleRenderer + ?Sized>(&self, renderer: &mut R) {
        for particle in self.snapshot() {
            renderer.render_particle(&particle);
        }
    }

    /// 默认外观
    pub fn render_default(&self) -> Vec<QuadVisual> {
        let mut renderer = DefaultQuadRenderer::new();
        self.render(&mut renderer);
        renderer.quads
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn alive_count(&self) -> usize {
        self.pool.alive_count()
    }

    pub fn stats(&self) -> ParticleSystemStats {
        self.stats
    }

    /// 发射累加器中尚未消耗的时间
    pub fn accumulator(&self) -> f64 {
        self.scheduler.accumulator()
    }

    /// 杀死所有粒子并清零累加器；槽位和标识保留
    pub fn reset(&mut self) {
        self.pool.kill_all();
        self.scheduler.reset();
        self.stats.frame_emitted = 0;
        self.refresh_counts();
    }

    fn refresh_counts(&mut self) {
        self.stats.alive_count = self.pool.alive_count();
        self.stats.pool_size = self.pool.len();
    }
}
