use glam::{Vec3, Vec4};

/// 顶点颜色通道的最大数量，与原生库的编译期上限一致
pub const MAX_COLOR_SETS: usize = 8;
/// 纹理坐标通道的最大数量，与原生库的编译期上限一致
pub const MAX_TEXCOORD_SETS: usize = 8;

bitflags::bitflags! {
    /// 网格包含的图元类型
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PrimitiveTypes: u32 {
        const POINT = 0x1;
        const LINE = 0x2;
        const TRIANGLE = 0x4;
        const POLYGON = 0x8;
    }
}

/// Morph 动画的插值方式
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MorphMethod {
    #[default]
    Unknown = 0,
    VertexBlend = 1,
    MorphNormalized = 2,
    MorphRelative = 3,
}

impl MorphMethod {
    pub fn from_u32(v: u32) -> Self {
        match v {
            1 => MorphMethod::VertexBlend,
            2 => MorphMethod::MorphNormalized,
            3 => MorphMethod::MorphRelative,
            _ => MorphMethod::Unknown,
        }
    }
}

/// 一个面的顶点索引。三角化后恒为 3 个索引
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Face {
    pub indices: Vec<u32>,
}

/// 单个顶点受某根骨骼影响的权重。布局与原生结构一致，可整块拷贝
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VertexWeight {
    pub vertex_id: u32,
    pub weight: f32,
}

/// 骨骼：名称 + 顶点权重 + 绑定姿态下的偏移矩阵
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bone {
    pub name: String,
    pub weights: Vec<VertexWeight>,
    /// mesh 空间到骨骼空间的变换
    pub offset_matrix: glam::Mat4,
}

/// 轴对齐包围盒
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

/// Morph target：与宿主 mesh 顶点数相同的一组替换属性流
///
/// 空的属性流表示该 target 不替换对应属性。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimMesh {
    pub name: String,
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tangents: Vec<Vec3>,
    pub bitangents: Vec<Vec3>,
    pub colors: [Vec<Vec4>; MAX_COLOR_SETS],
    pub texture_coords: [Vec<Vec3>; MAX_TEXCOORD_SETS],
    pub weight: f32,
}

/// CPU 侧的网格数据
///
/// 颜色和纹理坐标是定容通道数组：通道按位置编号，空通道用空 Vec 表示，
/// 前面的通道为空时后面的通道不会前移。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub primitive_types: PrimitiveTypes,

    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tangents: Vec<Vec3>,
    pub bitangents: Vec<Vec3>,
    pub colors: [Vec<Vec4>; MAX_COLOR_SETS],
    pub texture_coords: [Vec<Vec3>; MAX_TEXCOORD_SETS],
    /// 每个纹理坐标通道实际使用的分量数 (1/2/3)
    pub uv_components: [u32; MAX_TEXCOORD_SETS],

    pub faces: Vec<Face>,
    pub bones: Vec<Bone>,
    pub anim_meshes: Vec<AnimMesh>,
    pub morph_method: MorphMethod,

    /// 对应场景材质数组的下标
    pub material_index: u32,
    pub aabb: Aabb,
}

// tools
impl Mesh {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// 通道是否有数据。通道编号是位置性的，不随空通道移动
    #[inline]
    pub fn has_color_channel(&self, channel: usize) -> bool {
        channel < MAX_COLOR_SETS && !self.colors[channel].is_empty()
    }

    #[inline]
    pub fn has_texcoord_channel(&self, channel: usize) -> bool {
        channel < MAX_TEXCOORD_SETS && !self.texture_coords[channel].is_empty()
    }
}
