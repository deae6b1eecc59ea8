use std::ffi::c_char;

use glam::{Vec2, Vec3};

use crate::native::anim::AiAnimation;
use crate::native::material::AiMaterial;
use crate::native::mesh::AiMesh;
use crate::native::texture::AiTexture;
use crate::native::{AiMatrix4x4, AiString};

/// 节点元数据。本绑定不解析，只透传指针
#[repr(C)]
pub struct AiMetadata {
    _private: [u8; 0],
}

/// 场景图节点
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AiNode {
    pub name: AiString,
    pub transformation: AiMatrix4x4,
    pub parent: *mut AiNode,
    pub num_children: u32,
    pub children: *mut *mut AiNode,
    pub num_meshes: u32,
    /// 场景 mesh 数组的下标
    pub meshes: *mut u32,
    pub metadata: *mut AiMetadata,
}

/// 顶层场景结构
///
/// 由导入调用返回时整块内存归原生库所有；由托管侧 project 产生时
/// 归 marshal 引擎所有。两种来源的释放路径不能混用。
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AiScene {
    pub flags: u32,
    pub root_node: *mut AiNode,
    pub num_meshes: u32,
    pub meshes: *mut *mut AiMesh,
    pub num_materials: u32,
    pub materials: *mut *mut AiMaterial,
    pub num_animations: u32,
    pub animations: *mut *mut AiAnimation,
    pub num_textures: u32,
    pub textures: *mut *mut AiTexture,
    pub num_lights: u32,
    pub lights: *mut *mut AiLight,
    pub num_cameras: u32,
    pub cameras: *mut *mut AiCamera,
    pub metadata: *mut AiMetadata,
    /// 原生侧内部状态，托管侧永远置空且不触碰
    pub private_data: *mut c_char,
}

/// 光源。除名字外全部为内联字段，无嵌套分配
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AiLight {
    pub name: AiString,
    pub light_type: u32,
    pub position: Vec3,
    pub direction: Vec3,
    pub up: Vec3,
    pub attenuation_constant: f32,
    pub attenuation_linear: f32,
    pub attenuation_quadratic: f32,
    pub color_diffuse: Vec3,
    pub color_specular: Vec3,
    pub color_ambient: Vec3,
    pub angle_inner_cone: f32,
    pub angle_outer_cone: f32,
    pub size: Vec2,
}

/// 相机。全部为内联字段，无嵌套分配
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AiCamera {
    pub name: AiString,
    pub position: Vec3,
    pub up: Vec3,
    pub look_at: Vec3,
    pub horizontal_fov: f32,
    pub clip_plane_near: f32,
    pub clip_plane_far: f32,
    pub aspect: f32,
}
