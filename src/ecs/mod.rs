//! ECS 适配层
//!
//! 把 [`ParticleEngine`] 作为组件挂到实体上，由系统按
//! 物理 -> 发射 -> 突发 -> 快照 的顺序每帧驱动。

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::config::EmitterConfig;
use crate::core::ParticleResult;
use crate::particles::{Anchor, ParticleAttributes, ParticleEngine};

/// 帧时间资源
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct FrameTime {
    pub delta_seconds: f32,
    pub elapsed_seconds: f64,
}

impl FrameTime {
    pub fn new(delta_seconds: f32) -> Self {
        Self {
            delta_seconds,
            elapsed_seconds: 0.0,
        }
    }

    /// 进入下一帧
    pub fn advance(&mut self, delta_seconds: f32) {
        self.delta_seconds = delta_seconds;
        self.elapsed_seconds += f64::from(delta_seconds);
    }
}

/// 粒子发射器组件
#[derive(Component)]
pub struct ParticleEmitter(pub ParticleEngine);

impl ParticleEmitter {
    pub fn new(config: EmitterConfig) -> ParticleResult<Self> {
        ParticleEngine::new(config).map(Self)
    }

    pub fn engine(&self) -> &ParticleEngine {
        &self.0
    }

    pub fn engine_mut(&mut self) -> &mut ParticleEngine {
        &mut self.0
    }
}

/// 发射器所在画布的尺寸（`None` = 尚未布局）
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct EmitterCanvas(pub Option<Vec2>);

/// 发射器锚点
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct EmitterAnchor(pub Anchor);

/// 一次性突发发射请求，处理后移除
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmitBurst(pub u32);

/// 最近一帧的粒子属性快照
#[derive(Component, Clone, Debug, Default)]
pub struct ParticleSnapshot(pub Vec<ParticleAttributes>);

/// 同步画布和锚点（组件缺失即视为未设置），然后按速率发射
pub fn particle_emission_system(
    time: Res<FrameTime>,
    mut query: Query<(
        &mut ParticleEmitter,
        Option<&EmitterCanvas>,
        Option<&EmitterAnchor>,
    )>,
) {
    for (mut emitter, canvas, anchor) in query.iter_mut() {
        let engine = emitter.engine_mut();
        engine.set_canvas_size(canvas.and_then(|c| c.0));
        engine.set_anchor(anchor.map(|a| a.0));
        engine.advance_emission(time.delta_seconds);
    }
}

pub fn particle_burst_system(
    mut commands: Commands,
    mut query: Query<(Entity, &mut ParticleEmitter, &EmitBurst)>,
) {
    for (entity, mut emitter, burst) in query.iter_mut() {
        let spawned = emitter.engine_mut().emit(burst.0);
        tracing::trace!(
            target: "particles",
            "Burst on {:?}: requested {}, spawned {}",
            entity,
            burst.0,
            spawned
        );
        commands.entity(entity).remove::<EmitBurst>();
    }
}

pub fn particle_physics_system(time: Res<FrameTime>, mut query: Query<&mut ParticleEmitter>) {
    for mut emitter in query.iter_mut() {
        emitter.engine_mut().advance_physics(time.delta_seconds);
    }
}

/// 刷新快照组件；缺少组件的实体会被补上
pub fn particle_snapshot_system(
    mut commands: Commands,
    mut query: Query<(Entity, &ParticleEmitter, Option<&mut ParticleSnapshot>)>,
) {
    for (entity, emitter, snapshot) in query.iter_mut() {
        match snapshot {
            Some(mut snapshot) => emitter.engine().snapshot_into(&mut snapshot.0),
            None => {
                commands
                    .entity(entity)
                    .insert(ParticleSnapshot(emitter.engine().snapshot()));
            }
        }
    }
}

/// 注册粒子系统
pub fn add_particle_systems(schedule: &mut Schedule) {
    schedule.add_systems(
        (
            particle_physics_system,
            particle_emission_system,
            particle_burst_system,
            particle_snapshot_system,
        )
            .chain(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::ValueRange;

    fn world_with(config: EmitterConfig, dt: f32) -> (World, Schedule, Entity) {
        let mut world = World::new();
        world.insert_resource(FrameTime::new(dt));
        let entity = world
            .spawn(ParticleEmitter(ParticleEngine::with_seed(config, 3).unwrap()))
            .id();
        let mut schedule = Schedule::default();
        add_particle_systems(&mut schedule);
        (world, schedule, entity)
    }

    #[test]
    fn test_schedule_emits_and_snapshots() {
        let config = EmitterConfig::default().with_rate(10.0).with_lifetime(5.0, 5.0);
        let (mut world, mut schedule, entity) = world_with(config, 0.5);

        schedule.run(&mut world);
        assert_eq!(world.get::<ParticleEmitter>(entity).unwrap().engine().alive_count(), 5);
        assert_eq!(world.get::<ParticleSnapshot>(entity).unwrap().0.len(), 5);

        schedule.run(&mut world);
        assert_eq!(world.get::<ParticleSnapshot>(entity).unwrap().0.len(), 10);
    }

    #[test]
    fn test_burst_removed_after_use() {
        let config = EmitterConfig::default().with_rate(0.0).with_max_particles(20);
        let (mut world, mut schedule, entity) = world_with(config, 0.1);
        world.entity_mut(entity).insert(EmitBurst(50));

        schedule.run(&mut world);
        assert!(world.get::<EmitBurst>(entity).is_none());
        let emitter = world.get::<ParticleEmitter>(entity).unwrap();
        assert_eq!(emitter.engine().alive_count(), 20);
        assert_eq!(emitter.engine().stats().dropped, 30);

        schedule.run(&mut world);
        let emitter = world.get::<ParticleEmitter>(entity).unwrap();
        assert_eq!(emitter.engine().stats().total_emitted, 20);
    }

    #[test]
    fn test_canvas_and_anchor_synced() {
        let config = EmitterConfig::default()
            .with_rate(1.0)
            .with_speed(ValueRange::Fixed(0.0))
            .with_lifetime(10.0, 10.0);
        let (mut world, mut schedule, entity) = world_with(config, 1.0);
        world.entity_mut(entity).insert((
            EmitterCanvas(Some(Vec2::new(200.0, 100.0))),
            EmitterAnchor(Anchor::from_fraction(0.5, 0.5)),
        ));

        schedule.run(&mut world);
        let snapshot = world.get::<ParticleSnapshot>(entity).unwrap();
        assert_eq!(snapshot.0.len(), 1);
        assert_eq!(snapshot.0[0].position, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_removed_anchor_falls_back_to_origin() {
        let config = EmitterConfig::default()
            .with_rate(1.0)
            .with_speed(ValueRange::Fixed(0.0))
            .with_lifetime(10.0, 10.0);
        let (mut world, mut schedule, entity) = world_with(config, 1.0);
        world.entity_mut(entity).insert((
            EmitterCanvas(Some(Vec2::new(200.0, 100.0))),
            EmitterAnchor(Anchor::from_fraction(0.5, 0.5)),
        ));
        schedule.run(&mut world);

        world.entity_mut(entity).remove::<EmitterAnchor>();
        schedule.run(&mut world);

        let emitter = world.get::<ParticleEmitter>(entity).unwrap();
        assert!(emitter.engine().anchor().is_none());
        let positions: Vec<_> = world
            .get::<ParticleSnapshot>(entity)
            .unwrap()
            .0
            .iter()
            .map(|p| p.position)
            .collect();
        assert_eq!(positions.len(), 2);
        assert!(positions.contains(&Vec2::new(100.0, 50.0)));
        assert!(positions.contains(&Vec2::ZERO));
    }

    #[test]
    fn test_frame_time_advance() {
        let mut time = FrameTime::default();
        time.advance(0.25);
        time.advance(0.5);
        assert_eq!(time.delta_seconds, 0.5);
        assert_eq!(time.elapsed_seconds, 0.75);
    }
}
