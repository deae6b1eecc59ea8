use std::ptr;

use lumira_scene::animation::Animation;
use lumira_scene::camera::Camera;
use lumira_scene::light::Light;
use lumira_scene::material::Material;
use lumira_scene::mesh::Mesh;
use lumira_scene::scene::{Node, Scene, SceneFlags};
use lumira_scene::texture::Texture;

use crate::marshal::{self, NativeMarshal};
use crate::mem;
use crate::native::{AiMatrix4x4, AiString};
use crate::native::scene::{AiNode, AiScene};

impl NativeMarshal for Node {
    type Raw = AiNode;

    /// parent 在这里保持空指针，由父节点的投影回填
    fn project_into(&self, raw: &mut AiNode) {
        raw.name = AiString::from_str(&self.name);
        raw.transformation = AiMatrix4x4::from(self.transform);
        raw.parent = ptr::null_mut();
        raw.num_meshes = self.mesh_indices.len() as u32;
        raw.meshes = mem::copy_slice_to_native(&self.mesh_indices);
        raw.num_children = self.children.len() as u32;
        raw.children = marshal::project_ptr_array(&self.children);
        // 子树投影完成后回填 parent
        let this = raw as *mut AiNode;
        for i in 0..self.children.len() {
            unsafe { (**raw.children.add(i)).parent = this };
        }
        raw.metadata = ptr::null_mut();
    }

    fn lift_from(&mut self, raw: &AiNode) {
        *self = Self::default();
        self.name = raw.name.to_string();
        self.transform = glam::Mat4::from(raw.transformation);
        unsafe {
            self.mesh_indices = mem::copy_slice_from_native(raw.meshes, raw.num_meshes as usize);
            self.children = marshal::lift_ptr_array(raw.children, raw.num_children);
        }
    }

    unsafe fn release(raw: *mut AiNode, free_top: bool) {
        if raw.is_null() {
            return;
        }
        let r = unsafe { &mut *raw };
        unsafe {
            marshal::release_ptr_array::<Node>(&mut r.children, &mut r.num_children);
            mem::free(r.meshes);
        }
        r.meshes = ptr::null_mut();
        r.num_meshes = 0;
        r.parent = ptr::null_mut();
        if free_top {
            unsafe { mem::free(raw) };
        }
    }
}

impl NativeMarshal for Scene {
    type Raw = AiScene;

    fn project_into(&self, raw: &mut AiScene) {
        raw.flags = self.flags.bits();
        raw.root_node = match &self.root {
            Some(root) => root.project(),
            None => ptr::null_mut(),
        };
        raw.num_meshes = self.meshes.len() as u32;
        raw.meshes = marshal::project_ptr_array(&self.meshes);
        raw.num_materials = self.materials.len() as u32;
        raw.materials = marshal::project_ptr_array(&self.materials);
        raw.num_animations = self.animations.len() as u32;
        raw.animations = marshal::project_ptr_array(&self.animations);
        raw.num_textures = self.textures.len() as u32;
        raw.textures = marshal::project_ptr_array(&self.textures);
        raw.num_lights = self.lights.len() as u32;
        raw.lights = marshal::project_ptr_array(&self.lights);
        raw.num_cameras = self.cameras.len() as u32;
        raw.cameras = marshal::project_ptr_array(&self.cameras);
        // 元数据与原生私有状态不在交换范围内
        raw.metadata = ptr::null_mut();
        raw.private_data = ptr::null_mut();
    }

    fn lift_from(&mut self, raw: &AiScene) {
        *self = Self::default();
        self.flags = SceneFlags::from_bits_retain(raw.flags);
        if !raw.root_node.is_null() {
            self.root = Some(Node::lift(unsafe { &*raw.root_node }));
        }
        unsafe {
            self.meshes = marshal::lift_ptr_array(raw.meshes, raw.num_meshes);
            self.materials = marshal::lift_ptr_array(raw.materials, raw.num_materials);
            self.animations = marshal::lift_ptr_array(raw.animations, raw.num_animations);
            self.textures = marshal::lift_ptr_array(raw.textures, raw.num_textures);
            self.lights = marshal::lift_ptr_array(raw.lights, raw.num_lights);
            self.cameras = marshal::lift_ptr_array(raw.cameras, raw.num_cameras);
        }
    }

    unsafe fn release(raw: *mut AiScene, free_top: bool) {
        if raw.is_null() {
            return;
        }
        let r = unsafe { &mut *raw };
        unsafe {
            Node::release(r.root_node, true);
            r.root_node = ptr::null_mut();
            marshal::release_ptr_array::<Mesh>(&mut r.meshes, &mut r.num_meshes);
            marshal::release_ptr_array::<Material>(&mut r.materials, &mut r.num_materials);
            marshal::release_ptr_array::<Animation>(&mut r.animations, &mut r.num_animations);
            marshal::release_ptr_array::<Texture>(&mut r.textures, &mut r.num_textures);
            marshal::release_ptr_array::<Light>(&mut r.lights, &mut r.num_lights);
            marshal::release_ptr_array::<Camera>(&mut r.cameras, &mut r.num_cameras);
        }
        if free_top {
            unsafe { mem::free(raw) };
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample_tree() -> Node {
        let mut root = Node::new("root");
        root.mesh_indices = vec![0];
        let mut torso = Node::new("torso");
        torso.transform = glam::Mat4::from_translation(glam::Vec3::Y);
        torso.children.push(Node::new("head"));
        root.children.push(torso);
        root.children.push(Node::new("legs"));
        root
    }

    #[test]
    fn node_tree_roundtrip() {
        let root = sample_tree();
        let raw = root.project();
        let back = Node::lift(unsafe { &*raw });
        assert_eq!(back, root);
        unsafe { Node::release(raw, true) };
    }

    #[test]
    fn projected_children_point_back_to_parent() {
        let raw = sample_tree().project();
        unsafe {
            assert!((*raw).parent.is_null());
            for i in 0..(*raw).num_children as usize {
                let child = *(*raw).children.add(i);
                assert_eq!((*child).parent, raw);
            }
            let torso = *(*raw).children;
            let head = *(*torso).children;
            assert_eq!((*head).parent, torso);
            Node::release(raw, true);
        }
    }

    #[test]
    fn scene_roundtrip() {
        let scene = Scene {
            flags: SceneFlags::INCOMPLETE | SceneFlags::VALIDATED,
            root: Some(sample_tree()),
            meshes: vec![Mesh { name: "quad".into(), ..Default::default() }],
            materials: vec![Material::default()],
            lights: vec![Light { name: "sun".into(), ..Default::default() }],
            cameras: vec![Camera::default()],
            ..Default::default()
        };
        let raw = scene.project();
        unsafe {
            assert!((*raw).metadata.is_null());
            assert!((*raw).private_data.is_null());
        }
        let back = Scene::lift(unsafe { &*raw });
        assert_eq!(back, scene);
        unsafe { Scene::release(raw, true) };
    }

    #[test]
    fn rootless_scene_projects_null_root() {
        let raw = Scene::default().project();
        unsafe {
            assert!((*raw).root_node.is_null());
            Scene::release(raw, true);
        }
    }
}
