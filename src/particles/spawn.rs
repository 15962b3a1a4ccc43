//! 发射点解析

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// 锚点：画布尺寸的比例 + 像素偏移
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Anchor {
    /// 相对画布尺寸的比例
    pub fraction: Vec2,
    /// 像素偏移
    pub offset: Vec2,
}

impl Anchor {
    pub fn new(fraction: Vec2, offset: Vec2) -> Self {
        Self { fraction, offset }
    }

    /// 仅按比例定位
    pub fn from_fraction(x: f32, y: f32) -> Self {
        Self {
            fraction: Vec2::new(x, y),
            offset: Vec2::ZERO,
        }
    }

    /// 仅按像素偏移定位
    pub fn from_offset(x: f32, y: f32) -> Self {
        Self {
            fraction: Vec2::ZERO,
            offset: Vec2::new(x, y),
        }
    }

    /// 在给定画布尺寸下的绝对位置
    pub fn resolve(&self, canvas_size: Vec2) -> Vec2 {
        canvas_size * self.fraction + self.offset
    }
}

/// 计算新粒子的发射原点
///
/// 没有锚点或画布尚未布局时返回零向量。
pub fn resolve_spawn_origin(anchor: Option<&Anchor>, canvas_size: Option<Vec2>) -> Vec2 {
    match (anchor, canvas_size) {
        (Some(anchor), Some(canvas)) => anchor.resolve(canvas),
        _ => Vec2::ZERO,
    }
}
