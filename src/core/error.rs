//! 统一错误处理模块
//!
//! 粒子引擎只有配置错误会向宿主传播；逐帧路径上的异常在本地降级处理。

use thiserror::Error;

/// 粒子引擎错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParticleError {
    /// 区间下界大于上界
    #[error("Invalid range for {what}: min {min} is greater than max {max}")]
    InvalidRange {
        what: &'static str,
        min: f32,
        max: f32,
    },

    /// 关键帧序列不合法（空序列、时间越界或未排序）
    #[error("Invalid keypoint sequence: {0}")]
    InvalidSequence(String),

    /// 其它配置错误
    #[error("Invalid emitter configuration: {0}")]
    InvalidConfig(String),
}

/// 粒子引擎结果类型别名
pub type ParticleResult<T> = Result<T, ParticleError>;
