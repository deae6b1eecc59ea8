use glam::{Vec3, Vec4};
use lumira_scene::mesh::{Aabb, VertexWeight};

use crate::native::scene::AiNode;
use crate::native::{AI_MAX_NUMBER_OF_COLOR_SETS, AI_MAX_NUMBER_OF_TEXTURECOORDS, AiMatrix4x4, AiString};

/// 单个面：索引数 + 索引数组
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AiFace {
    pub num_indices: u32,
    pub indices: *mut u32,
}

/// 骨骼。armature/node 指向场景图节点，由原生侧的后处理流程填充
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AiBone {
    pub name: AiString,
    pub num_weights: u32,
    pub armature: *mut AiNode,
    pub node: *mut AiNode,
    pub weights: *mut VertexWeight,
    pub offset_matrix: AiMatrix4x4,
}

/// Morph target 的属性流，与宿主 mesh 等长
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AiAnimMesh {
    pub name: AiString,
    pub vertices: *mut Vec3,
    pub normals: *mut Vec3,
    pub tangents: *mut Vec3,
    pub bitangents: *mut Vec3,
    pub colors: [*mut Vec4; AI_MAX_NUMBER_OF_COLOR_SETS],
    pub texture_coords: [*mut Vec3; AI_MAX_NUMBER_OF_TEXTURECOORDS],
    pub num_vertices: u32,
    pub weight: f32,
}

/// 网格。颜色/纹理坐标是定容指针数组，空通道为 null，位置不前移
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AiMesh {
    pub primitive_types: u32,
    pub num_vertices: u32,
    pub num_faces: u32,
    pub vertices: *mut Vec3,
    pub normals: *mut Vec3,
    pub tangents: *mut Vec3,
    pub bitangents: *mut Vec3,
    pub colors: [*mut Vec4; AI_MAX_NUMBER_OF_COLOR_SETS],
    pub texture_coords: [*mut Vec3; AI_MAX_NUMBER_OF_TEXTURECOORDS],
    pub num_uv_components: [u32; AI_MAX_NUMBER_OF_TEXTURECOORDS],
    pub faces: *mut AiFace,
    pub num_bones: u32,
    pub bones: *mut *mut AiBone,
    pub material_index: u32,
    pub name: AiString,
    pub num_anim_meshes: u32,
    pub anim_meshes: *mut *mut AiAnimMesh,
    pub method: u32,
    pub aabb: Aabb,
}
