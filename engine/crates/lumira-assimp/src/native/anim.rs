use lumira_scene::animation::{MeshKey, QuatKey, VectorKey};

use crate::native::AiString;

/// 单个节点的动画通道。关键帧数组与托管布局一致，可整块拷贝
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AiNodeAnim {
    pub node_name: AiString,
    pub num_position_keys: u32,
    pub position_keys: *mut VectorKey,
    pub num_rotation_keys: u32,
    pub rotation_keys: *mut QuatKey,
    pub num_scaling_keys: u32,
    pub scaling_keys: *mut VectorKey,
    pub pre_state: u32,
    pub post_state: u32,
}

/// 整 mesh 替换的动画通道
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AiMeshAnim {
    pub name: AiString,
    pub num_keys: u32,
    pub keys: *mut MeshKey,
}

/// Morph 关键帧：values/weights 是等长的平行数组
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AiMeshMorphKey {
    pub time: f64,
    pub values: *mut u32,
    pub weights: *mut f64,
    pub num_values_and_weights: u32,
}

/// Morph 动画通道
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AiMeshMorphAnim {
    pub name: AiString,
    pub num_keys: u32,
    pub keys: *mut AiMeshMorphKey,
}

/// 一段动画
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AiAnimation {
    pub name: AiString,
    pub duration: f64,
    pub ticks_per_second: f64,
    pub num_channels: u32,
    pub channels: *mut *mut AiNodeAnim,
    pub num_mesh_channels: u32,
    pub mesh_channels: *mut *mut AiMeshAnim,
    pub num_morph_mesh_channels: u32,
    pub morph_mesh_channels: *mut *mut AiMeshMorphAnim,
}
