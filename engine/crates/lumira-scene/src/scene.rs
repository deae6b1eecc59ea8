use crate::animation::Animation;
use crate::camera::Camera;
use crate::light::Light;
use crate::material::Material;
use crate::mesh::Mesh;
use crate::texture::Texture;

bitflags::bitflags! {
    /// 场景的整体状态标记，由导入器写入
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SceneFlags: u32 {
        /// 导入不完整，部分数据缺失
        const INCOMPLETE = 0x1;
        const VALIDATED = 0x2;
        const VALIDATION_WARNING = 0x4;
        const NON_VERBOSE_FORMAT = 0x8;
        const TERRAIN = 0x10;
        const ALLOW_SHARED = 0x20;
    }
}

/// 场景图节点。变换为相对父节点的局部变换
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub name: String,
    pub transform: glam::Mat4,
    pub children: Vec<Node>,
    /// 引用场景 mesh 数组的下标
    pub mesh_indices: Vec<u32>,
}

/// CPU 侧的完整场景
///
/// 导入后所有数据均为深拷贝，不再引用任何原生内存。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub flags: SceneFlags,
    pub root: Option<Node>,
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
    pub animations: Vec<Animation>,
    pub textures: Vec<Texture>,
    pub lights: Vec<Light>,
    pub cameras: Vec<Camera>,
}

// tools
impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: glam::Mat4::IDENTITY,
            ..Default::default()
        }
    }

    /// 先序遍历，按名字查找节点
    pub fn find(&self, name: &str) -> Option<&Node> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }
}

// tools
impl Scene {
    #[inline]
    pub fn has_meshes(&self) -> bool {
        !self.meshes.is_empty()
    }
    #[inline]
    pub fn has_animations(&self) -> bool {
        !self.animations.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn find_node_by_name() {
        let mut root = Node::new("root");
        let mut arm = Node::new("arm");
        arm.children.push(Node::new("hand"));
        root.children.push(arm);

        assert!(root.find("hand").is_some());
        assert!(root.find("leg").is_none());
    }
}
