use glam::{Vec2, Vec3};

/// 光源类型
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightSourceType {
    #[default]
    Undefined = 0,
    Directional = 1,
    Point = 2,
    Spot = 3,
    Ambient = 4,
    Area = 5,
}

impl LightSourceType {
    pub fn from_u32(v: u32) -> Self {
        match v {
            1 => LightSourceType::Directional,
            2 => LightSourceType::Point,
            3 => LightSourceType::Spot,
            4 => LightSourceType::Ambient,
            5 => LightSourceType::Area,
            _ => LightSourceType::Undefined,
        }
    }
}

/// 场景中的光源。position/direction 位于对应节点的局部空间
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Light {
    /// 与场景图中同名节点对应
    pub name: String,
    pub light_type: LightSourceType,
    pub position: Vec3,
    pub direction: Vec3,
    pub up: Vec3,
    pub attenuation_constant: f32,
    pub attenuation_linear: f32,
    pub attenuation_quadratic: f32,
    pub color_diffuse: Vec3,
    pub color_specular: Vec3,
    pub color_ambient: Vec3,
    /// 聚光灯内锥角，弧度
    pub angle_inner_cone: f32,
    /// 聚光灯外锥角，弧度
    pub angle_outer_cone: f32,
    /// 面光源的尺寸
    pub size: Vec2,
}
