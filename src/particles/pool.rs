//! 粒子对象池
//!
//! 槽位只增不减（不超过上限），死亡槽位通过空闲列表复用。
//! 槽位的标识在创建时分配，复用时保持不变，渲染端可以据此做身份比对。

use glam::Vec2;

use super::id::{IdGenerator, ParticleId};

// ============================================================================
// 槽位
// ============================================================================

/// 槽位句柄（槽位数组下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// 单个粒子的可变状态
#[derive(Debug, Clone)]
pub struct ParticleSlot {
    id: ParticleId,
    /// 自（重新）发射以来的秒数
    pub age: f32,
    /// 本次发射的寿命（秒）
    pub lifetime: f32,
    /// 旋转角度（度）
    pub rotation: f32,
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    alive: bool,
}

impl ParticleSlot {
    fn new(id: ParticleId) -> Self {
        Self {
            id,
            age: 0.0,
            lifetime: 0.0,
            rotation: 0.0,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            alive: false,
        }
    }

    pub fn id(&self) -> &ParticleId {
        &self.id
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// 生命周期进度，限制在 [0, 1]
    pub fn progress(&self) -> f32 {
        if self.lifetime <= 0.0 {
            return 1.0;
        }
        (self.age / self.lifetime).clamp(0.0, 1.0)
    }
}

/// 发射时采样得到的初始运动学状态
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnState {
    pub lifetime: f32,
    pub rotation: f32,
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
}

// ============================================================================
// 对象池
// ============================================================================

/// 粒子对象池
pub struct ParticlePool {
    slots: Vec<ParticleSlot>,
    /// 可复用的死亡槽位（栈顶优先）
    free: Vec<usize>,
    max_particles: usize,
    alive_count: usize,
}

impl ParticlePool {
    pub fn new(max_particles: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            max_particles,
            alive_count: 0,
        }
    }

    /// 取一个可用槽位并预留
    ///
    /// 优先复用死亡槽位；没有时在上限内追加新槽位；已满返回 `None`。
    /// 返回的槽位已计入存活，寿命为 0：没有调用 [`respawn`](Self::respawn)
    /// 的槽位会在下一次物理推进时死亡并回到空闲列表。
    pub fn allocate_or_reuse(&mut self, ids: &mut dyn IdGenerator) -> Option<SlotId> {
        if self.alive_count >= self.max_particles {
            return None;
        }
        let index = match self.free.pop() {
            Some(index) => index,
            None if self.slots.len() < self.max_particles => {
                self.slots.push(ParticleSlot::new(ids.next_id()));
                self.slots.len() - 1
            }
            None => return None,
        };
        self.reserve(index);
        Some(SlotId(index))
    }

    fn reserve(&mut self, index: usize) {
        let Some(particle) = self.slots.get_mut(index) else {
            return;
        };
        particle.age = 0.0;
        particle.lifetime = 0.0;
        particle.velocity = Vec2::ZERO;
        particle.acceleration = Vec2::ZERO;
        if !particle.alive {
            particle.alive = true;
            self.alive_count += 1;
        }
    }

    /// 用新的初始状态激活槽位；标识保持不变
    pub fn respawn(&mut self, slot: SlotId, state: &SpawnState) {
        let Some(particle) = self.slots.get_mut(slot.0) else {
            return;
        };
        particle.age = 0.0;
        particle.lifetime = state.lifetime;
        particle.rotation = state.rotation;
        particle.position = state.position;
        particle.velocity = state.velocity;
        particle.acceleration = state.acceleration;
        if !particle.alive {
            particle.alive = true;
            self.alive_count += 1;
        }
    }

    /// 分配并激活一个槽位
    pub fn spawn(&mut self, ids: &mut dyn IdGenerator, state: &SpawnState) -> Option<SlotId> {
        let slot = self.allocate_or_reuse(ids)?;
        self.respawn(slot, state);
        Some(slot)
    }

    /// 标记死亡；槽位保留，可被复用
    pub fn mark_dead(&mut self, slot: SlotId) {
        let Some(particle) = self.slots.get_mut(slot.0) else {
            return;
        };
        if !particle.alive {
            return;
        }
        particle.alive = false;
        self.alive_count -= 1;
        if slot.0 < self.max_particles {
            self.free.push(slot.0);
        }
    }

    /// 是否还能分配槽位
    pub fn can_allocate(&self) -> bool {
        self.alive_count < self.max_particles
            && (!self.free.is_empty() || self.slots.len() < self.max_particles)
    }

    pub fn get(&self, slot: SlotId) -> Option<&ParticleSlot> {
        self.slots.get(slot.0)
    }

    pub fn get_mut(&mut self, slot: SlotId) -> Option<&mut ParticleSlot> {
        self.slots.get_mut(slot.0)
    }

    /// 所有槽位（含死亡槽位）
    pub fn iter(&self) -> impl Iterator<Item = &ParticleSlot> {
        self.slots.iter()
    }

    /// 存活的粒子
    pub fn iter_alive(&self) -> impl Iterator<Item = &ParticleSlot> {
        self.slots.iter().filter(|p| p.alive)
    }

    /// 槽位总数
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    pub fn max_particles(&self) -> usize {
        self.max_particles
    }

    /// 调整上限
    ///
    /// 槽位不会被回收；上限以外的槽位不再参与复用，直到上限重新调高。
    pub fn set_max_particles(&mut self, max_particles: usize) {
        self.max_particles = max_particles;
        self.rebuild_free_list();
    }

    /// 杀死所有粒子，保留槽位及其标识
    pub fn kill_all(&mut self) {
        for particle in &mut self.slots {
            particle.alive = false;
        }
        self.alive_count = 0;
        self.rebuild_free_list();
    }

    fn rebuild_free_list(&mut self) {
        let max = self.max_particles;
        self.free = self
            .slots
            .iter()
            .enumerate()
            .rev()
            .filter(|(index, p)| !p.alive && *index < max)
            .map(|(index, _)| index)
            .collect();
    }
}
