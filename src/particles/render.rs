//! 渲染适配接口
//!
//! 引擎不负责绘制，只把属性记录交给渲染函数。宿主可以提供自定义的
//! [`ParticleRenderer`]，记录会原样传入；否则使用 [`DefaultQuadRenderer`]
//! 生成朴素的四边形。

use glam::Vec2;

use super::attributes::ParticleAttributes;
use super::sequence::Color;

/// 逐粒子渲染函数
pub trait ParticleRenderer {
    fn render_particle(&mut self, particle: &ParticleAttributes);
}

impl<F> ParticleRenderer for F
where
    F: FnMut(&ParticleAttributes),
{
    fn render_particle(&mut self, particle: &ParticleAttributes) {
        self(particle)
    }
}

/// 默认粒子外观：白色（或序列颜色）的纯色四边形
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadVisual {
    pub position: Vec2,
    pub size: Vec2,
    /// 旋转角度（度）
    pub rotation: f32,
    pub color: Color,
    /// 背景透明度
    pub transparency: f32,
}

impl From<&ParticleAttributes> for QuadVisual {
    fn from(particle: &ParticleAttributes) -> Self {
        Self {
            position: particle.position,
            size: particle.size,
            rotation: particle.rotation,
            color: particle.color.unwrap_or(Color::ONE),
            transparency: particle.alpha,
        }
    }
}

/// 收集默认四边形的渲染器
#[derive(Debug, Default)]
pub struct DefaultQuadRenderer {
    pub quads: Vec<QuadVisual>,
}

impl DefaultQuadRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 清空上一帧的结果
    pub fn clear(&mut self) {
        self.quads.clear();
    }
}

impl ParticleRenderer for DefaultQuadRenderer {
    fn render_particle(&mut self, particle: &ParticleAttributes) {
        self.quads.push(QuadVisual::from(particle));
    }
}
