//! 粒子标识

use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 粒子的稳定标识，供渲染端做身份比对
///
/// 克隆只增加引用计数，快照每帧复制标识不产生字符串分配。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(Arc<str>);

impl ParticleId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 标识生成器
pub trait IdGenerator: Send + Sync {
    fn next_id(&mut self) -> ParticleId;
}

/// 128 位随机十六进制标识
pub struct RandomIdGenerator {
    rng: StdRng,
}

impl RandomIdGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for RandomIdGenerator {
    fn next_id(&mut self) -> ParticleId {
        let bytes: [u8; 16] = self.rng.gen();
        ParticleId::new(hex::encode(bytes))
    }
}

/// 带前缀的递增标识
pub struct SequentialIdGenerator {
    prefix: String,
    next: u64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> ParticleId {
        let id = ParticleId::new(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}
