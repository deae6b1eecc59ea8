use glam::Vec3;

/// 四元数，w 分量在前，与原生布局一致
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Quaternion {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self { w: 1.0, x: 0.0, y: 0.0, z: 0.0 }
    }
}

impl From<glam::Quat> for Quaternion {
    fn from(q: glam::Quat) -> Self {
        Self { w: q.w, x: q.x, y: q.y, z: q.z }
    }
}
impl From<Quaternion> for glam::Quat {
    fn from(q: Quaternion) -> Self {
        glam::Quat::from_xyzw(q.x, q.y, q.z, q.w)
    }
}

/// 平移/缩放关键帧。布局与原生结构一致，可整块拷贝
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VectorKey {
    pub time: f64,
    pub value: Vec3,
}

/// 旋转关键帧
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QuatKey {
    pub time: f64,
    pub value: Quaternion,
}

/// Mesh 切换关键帧：value 为 anim mesh 下标
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeshKey {
    pub time: f64,
    pub value: u32,
}

/// 关键帧区间之外的取值行为
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimBehaviour {
    #[default]
    Default = 0,
    Constant = 1,
    Linear = 2,
    Repeat = 3,
}

impl AnimBehaviour {
    pub fn from_u32(v: u32) -> Self {
        match v {
            1 => AnimBehaviour::Constant,
            2 => AnimBehaviour::Linear,
            3 => AnimBehaviour::Repeat,
            _ => AnimBehaviour::Default,
        }
    }
}

/// 单个节点的动画通道
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeAnim {
    /// 被驱动的节点名
    pub node_name: String,
    pub position_keys: Vec<VectorKey>,
    pub rotation_keys: Vec<QuatKey>,
    pub scaling_keys: Vec<VectorKey>,
    pub pre_state: AnimBehaviour,
    pub post_state: AnimBehaviour,
}

/// 整 mesh 替换的动画通道
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshAnim {
    pub name: String,
    pub keys: Vec<MeshKey>,
}

/// Morph 关键帧：values 与 weights 是平行数组，长度必须一致
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MorphKey {
    pub time: f64,
    /// morph target 下标
    pub values: Vec<u32>,
    /// 对应 target 的权重
    pub weights: Vec<f64>,
}

/// Morph 动画通道
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshMorphAnim {
    pub name: String,
    pub keys: Vec<MorphKey>,
}

/// 一段动画：若干节点通道 + mesh 通道 + morph 通道
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Animation {
    pub name: String,
    /// 时长，单位 tick
    pub duration: f64,
    /// 每秒 tick 数，0 表示未指定
    pub ticks_per_second: f64,
    pub channels: Vec<NodeAnim>,
    pub mesh_channels: Vec<MeshAnim>,
    pub morph_channels: Vec<MeshMorphAnim>,
}
