use std::ptr;

use lumira_scene::mesh::{
    AnimMesh, Bone, Face, MAX_COLOR_SETS, MAX_TEXCOORD_SETS, Mesh, MorphMethod, PrimitiveTypes,
};

use crate::marshal::{self, NativeMarshal};
use crate::mem;
use crate::native::AiString;
use crate::native::mesh::{AiAnimMesh, AiBone, AiFace, AiMesh};

impl NativeMarshal for Bone {
    type Raw = AiBone;

    fn project_into(&self, raw: &mut AiBone) {
        raw.name = AiString::from_str(&self.name);
        raw.num_weights = self.weights.len() as u32;
        raw.weights = mem::copy_slice_to_native(&self.weights);
        // armature/node 指回场景图，由原生侧的后处理流程填充
        raw.armature = ptr::null_mut();
        raw.node = ptr::null_mut();
        raw.offset_matrix = self.offset_matrix.into();
    }

    fn lift_from(&mut self, raw: &AiBone) {
        *self = Self::default();
        self.name = raw.name.to_string();
        self.weights = unsafe { mem::copy_slice_from_native(raw.weights, raw.num_weights as usize) };
        self.offset_matrix = raw.offset_matrix.into();
    }

    unsafe fn release(raw: *mut AiBone, free_top: bool) {
        if raw.is_null() {
            return;
        }
        let r = unsafe { &mut *raw };
        unsafe { mem::free(r.weights) };
        r.weights = ptr::null_mut();
        r.num_weights = 0;
        if free_top {
            unsafe { mem::free(raw) };
        }
    }
}

impl NativeMarshal for AnimMesh {
    type Raw = AiAnimMesh;

    fn project_into(&self, raw: &mut AiAnimMesh) {
        let mut scratch = mem::ScratchBuffer::new();
        let n = self.vertices.len();
        raw.name = AiString::from_str(&self.name);
        raw.num_vertices = n as u32;
        raw.vertices = scratch.stage_to_native(&self.vertices);
        raw.normals = stage_vertex_stream(&mut scratch, &self.name, "normals", &self.normals, n);
        raw.tangents = stage_vertex_stream(&mut scratch, &self.name, "tangents", &self.tangents, n);
        raw.bitangents = stage_vertex_stream(&mut scratch, &self.name, "bitangents", &self.bitangents, n);
        for c in 0..MAX_COLOR_SETS {
            raw.colors[c] =
                stage_vertex_stream(&mut scratch, &self.name, &format!("colors[{c}]"), &self.colors[c], n);
        }
        for c in 0..MAX_TEXCOORD_SETS {
            raw.texture_coords[c] = stage_vertex_stream(
                &mut scratch,
                &self.name,
                &format!("texture_coords[{c}]"),
                &self.texture_coords[c],
                n,
            );
        }
        raw.weight = self.weight;
    }

    fn lift_from(&mut self, raw: &AiAnimMesh) {
        *self = Self::default();
        let n = raw.num_vertices as usize;
        self.name = raw.name.to_string();
        unsafe {
            self.vertices = mem::copy_slice_from_native(raw.vertices, n);
            self.normals = mem::copy_slice_from_native(raw.normals, n);
            self.tangents = mem::copy_slice_from_native(raw.tangents, n);
            self.bitangents = mem::copy_slice_from_native(raw.bitangents, n);
            for c in 0..MAX_COLOR_SETS {
                self.colors[c] = mem::copy_slice_from_native(raw.colors[c], n);
            }
            for c in 0..MAX_TEXCOORD_SETS {
                self.texture_coords[c] = mem::copy_slice_from_native(raw.texture_coords[c], n);
            }
        }
        self.weight = raw.weight;
    }

    unsafe fn release(raw: *mut AiAnimMesh, free_top: bool) {
        if raw.is_null() {
            return;
        }
        let r = unsafe { &mut *raw };
        unsafe {
            mem::free(r.vertices);
            mem::free(r.normals);
            mem::free(r.tangents);
            mem::free(r.bitangents);
        }
        r.vertices = ptr::null_mut();
        r.normals = ptr::null_mut();
        r.tangents = ptr::null_mut();
        r.bitangents = ptr::null_mut();
        for c in 0..MAX_COLOR_SETS {
            unsafe { mem::free(r.colors[c]) };
            r.colors[c] = ptr::null_mut();
        }
        for c in 0..MAX_TEXCOORD_SETS {
            unsafe { mem::free(r.texture_coords[c]) };
            r.texture_coords[c] = ptr::null_mut();
        }
        r.num_vertices = 0;
        if free_top {
            unsafe { mem::free(raw) };
        }
    }
}

impl NativeMarshal for Mesh {
    type Raw = AiMesh;

    fn project_into(&self, raw: &mut AiMesh) {
        let mut scratch = mem::ScratchBuffer::new();

        raw.primitive_types = self.primitive_types.bits();
        // 计数一律取投影瞬间的容器长度
        let n = self.vertices.len();
        raw.num_vertices = n as u32;
        raw.vertices = scratch.stage_to_native(&self.vertices);
        raw.normals = stage_vertex_stream(&mut scratch, &self.name, "normals", &self.normals, n);
        raw.tangents = stage_vertex_stream(&mut scratch, &self.name, "tangents", &self.tangents, n);
        raw.bitangents = stage_vertex_stream(&mut scratch, &self.name, "bitangents", &self.bitangents, n);
        for c in 0..MAX_COLOR_SETS {
            raw.colors[c] =
                stage_vertex_stream(&mut scratch, &self.name, &format!("colors[{c}]"), &self.colors[c], n);
        }
        for c in 0..MAX_TEXCOORD_SETS {
            raw.texture_coords[c] = stage_vertex_stream(
                &mut scratch,
                &self.name,
                &format!("texture_coords[{c}]"),
                &self.texture_coords[c],
                n,
            );
            raw.num_uv_components[c] = self.uv_components[c];
        }

        raw.num_faces = self.faces.len() as u32;
        raw.faces = project_faces(&self.faces);

        raw.num_bones = self.bones.len() as u32;
        raw.bones = marshal::project_ptr_array(&self.bones);

        raw.material_index = self.material_index;
        raw.name = AiString::from_str(&self.name);

        raw.num_anim_meshes = self.anim_meshes.len() as u32;
        raw.anim_meshes = marshal::project_ptr_array(&self.anim_meshes);

        raw.method = self.morph_method as u32;
        raw.aabb = self.aabb;
    }

    fn lift_from(&mut self, raw: &AiMesh) {
        *self = Self::default();
        let n = raw.num_vertices as usize;

        self.name = raw.name.to_string();
        self.primitive_types = PrimitiveTypes::from_bits_truncate(raw.primitive_types);
        unsafe {
            self.vertices = mem::copy_slice_from_native(raw.vertices, n);
            self.normals = mem::copy_slice_from_native(raw.normals, n);
            self.tangents = mem::copy_slice_from_native(raw.tangents, n);
            self.bitangents = mem::copy_slice_from_native(raw.bitangents, n);
            for c in 0..MAX_COLOR_SETS {
                self.colors[c] = mem::copy_slice_from_native(raw.colors[c], n);
            }
            for c in 0..MAX_TEXCOORD_SETS {
                self.texture_coords[c] = mem::copy_slice_from_native(raw.texture_coords[c], n);
                self.uv_components[c] = raw.num_uv_components[c];
            }
            self.faces = lift_faces(raw.faces, raw.num_faces);
            self.bones = marshal::lift_ptr_array(raw.bones, raw.num_bones);
            self.anim_meshes = marshal::lift_ptr_array(raw.anim_meshes, raw.num_anim_meshes);
        }
        self.morph_method = MorphMethod::from_u32(raw.method);
        self.material_index = raw.material_index;
        self.aabb = raw.aabb;
    }

    unsafe fn release(raw: *mut AiMesh, free_top: bool) {
        if raw.is_null() {
            return;
        }
        let r = unsafe { &mut *raw };
        unsafe {
            mem::free(r.vertices);
            mem::free(r.normals);
            mem::free(r.tangents);
            mem::free(r.bitangents);
        }
        r.vertices = ptr::null_mut();
        r.normals = ptr::null_mut();
        r.tangents = ptr::null_mut();
        r.bitangents = ptr::null_mut();
        for c in 0..MAX_COLOR_SETS {
            unsafe { mem::free(r.colors[c]) };
            r.colors[c] = ptr::null_mut();
        }
        for c in 0..MAX_TEXCOORD_SETS {
            unsafe { mem::free(r.texture_coords[c]) };
            r.texture_coords[c] = ptr::null_mut();
        }
        r.num_vertices = 0;

        unsafe {
            release_faces(&mut r.faces, &mut r.num_faces);
            marshal::release_ptr_array::<Bone>(&mut r.bones, &mut r.num_bones);
            marshal::release_ptr_array::<AnimMesh>(&mut r.anim_meshes, &mut r.num_anim_meshes);
        }
        if free_top {
            unsafe { mem::free(raw) };
        }
    }
}

/// 与顶点并行的属性流。长度与顶点数不一致的流整条降级为空指针，
/// 兄弟流与计数保持不变
fn stage_vertex_stream<T: Copy>(
    scratch: &mut mem::ScratchBuffer,
    owner: &str,
    stream: &str,
    data: &[T],
    num_vertices: usize,
) -> *mut T {
    if !data.is_empty() && data.len() != num_vertices {
        log::warn!(
            "mesh '{owner}' {stream}: {} elements vs {num_vertices} vertices, dropping the stream",
            data.len()
        );
        return ptr::null_mut();
    }
    scratch.stage_to_native(data)
}

/// 面是内嵌值数组，每个元素带自己的索引分配
fn project_faces(faces: &[Face]) -> *mut AiFace {
    if faces.is_empty() {
        return ptr::null_mut();
    }
    let arr = mem::alloc_bytes(faces.len() * size_of::<AiFace>()) as *mut AiFace;
    for (i, face) in faces.iter().enumerate() {
        unsafe {
            arr.add(i).write(AiFace {
                num_indices: face.indices.len() as u32,
                indices: mem::copy_slice_to_native(&face.indices),
            });
        }
    }
    arr
}

unsafe fn lift_faces(faces: *const AiFace, count: u32) -> Vec<Face> {
    if faces.is_null() {
        return Vec::new();
    }
    (0..count as usize)
        .map(|i| {
            let f = unsafe { &*faces.add(i) };
            Face {
                indices: unsafe { mem::copy_slice_from_native(f.indices, f.num_indices as usize) },
            }
        })
        .collect()
}

unsafe fn release_faces(faces: &mut *mut AiFace, count: &mut u32) {
    if !faces.is_null() {
        for i in 0..*count as usize {
            let f = unsafe { &mut *faces.add(i) };
            unsafe { mem::free(f.indices) };
            f.indices = ptr::null_mut();
            f.num_indices = 0;
        }
        unsafe { mem::free(*faces) };
        *faces = ptr::null_mut();
    }
    *count = 0;
}

#[cfg(test)]
mod test {
    use glam::{Vec3, Vec4};
    use lumira_scene::mesh::VertexWeight;

    use super::*;

    fn triangle_mesh() -> Mesh {
        Mesh {
            name: "tri".into(),
            primitive_types: PrimitiveTypes::TRIANGLE,
            vertices: vec![Vec3::X, Vec3::Y, Vec3::Z],
            normals: vec![Vec3::Z; 3],
            faces: vec![Face { indices: vec![0, 1, 2] }],
            material_index: 2,
            ..Default::default()
        }
    }

    #[test]
    fn mesh_roundtrip() {
        let mesh = triangle_mesh();
        let raw = mesh.project();
        let back = Mesh::lift(unsafe { &*raw });
        assert_eq!(back, mesh);
        unsafe { Mesh::release(raw, true) };
    }

    #[test]
    fn counts_track_container_length_at_project_time() {
        let mut mesh = triangle_mesh();
        let raw = mem::alloc_raw::<AiMesh>();
        mesh.project_into(unsafe { &mut *raw });
        assert_eq!(unsafe { (*raw).num_vertices }, 3);
        unsafe { Mesh::release(raw, false) };

        // 构造后又改过容器，计数必须反映调用时的长度
        mesh.vertices.push(Vec3::ONE);
        mesh.project_into(unsafe { &mut *raw });
        assert_eq!(unsafe { (*raw).num_vertices }, 4);
        unsafe { Mesh::release(raw, true) };
    }

    #[test]
    fn channel_position_is_stable() {
        let mut mesh = triangle_mesh();
        // 只填第 3 号颜色通道，lift 后仍然是第 3 号
        mesh.colors[3] = vec![Vec4::ONE; 3];

        let raw = mesh.project();
        let back = Mesh::lift(unsafe { &*raw });
        for c in 0..MAX_COLOR_SETS {
            assert_eq!(back.colors[c].is_empty(), c != 3, "channel {c}");
        }
        unsafe { Mesh::release(raw, true) };
    }

    #[test]
    fn zero_stream_shows_no_residue_from_sibling() {
        let mut mesh = triangle_mesh();
        mesh.vertices = vec![Vec3::splat(7.0); 3];
        mesh.normals = vec![Vec3::ZERO; 3];

        let raw = mesh.project();
        let back = Mesh::lift(unsafe { &*raw });
        assert!(back.normals.iter().all(|n| *n == Vec3::ZERO));
        unsafe { Mesh::release(raw, true) };
    }

    #[test]
    fn short_vertex_stream_degrades_to_null() {
        let mut mesh = triangle_mesh();
        // 3 个顶点只配了 1 条法线，该流降级为空，顶点流与计数不受影响
        mesh.normals = vec![Vec3::Z];
        mesh.colors[2] = vec![Vec4::ONE; 5];

        let raw = mesh.project();
        unsafe {
            assert_eq!((*raw).num_vertices, 3);
            assert!(!(*raw).vertices.is_null());
            assert!((*raw).normals.is_null());
            assert!((*raw).colors[2].is_null());
        }

        let back = Mesh::lift(unsafe { &*raw });
        assert_eq!(back.vertices, mesh.vertices);
        assert!(back.normals.is_empty());
        assert!(back.colors[2].is_empty());
        unsafe { Mesh::release(raw, true) };
    }

    #[test]
    fn anim_mesh_short_stream_degrades_to_null() {
        let anim = AnimMesh {
            name: "morph".into(),
            vertices: vec![Vec3::X, Vec3::Y, Vec3::Z],
            tangents: vec![Vec3::ONE; 2],
            weight: 0.5,
            ..Default::default()
        };
        let raw = anim.project();
        unsafe {
            assert_eq!((*raw).num_vertices, 3);
            assert!((*raw).tangents.is_null());
        }
        let back = AnimMesh::lift(unsafe { &*raw });
        assert_eq!(back.vertices, anim.vertices);
        assert!(back.tangents.is_empty());
        assert_eq!(back.weight, anim.weight);
        unsafe { AnimMesh::release(raw, true) };
    }

    #[test]
    fn empty_streams_project_to_null() {
        let mesh = Mesh { name: "empty".into(), ..Default::default() };
        let raw = mesh.project();
        unsafe {
            assert!((*raw).vertices.is_null());
            assert!((*raw).faces.is_null());
            assert_eq!((*raw).num_vertices, 0);
            Mesh::release(raw, true);
        }
    }

    #[test]
    fn release_twice_and_null_are_noops() {
        let mesh = triangle_mesh();
        let raw = mesh.project();
        unsafe {
            Mesh::release(raw, false);
            // 指针字段已清零，重复释放无副作用
            Mesh::release(raw, false);
            Mesh::release(raw, true);
            Mesh::release(ptr::null_mut(), true);
        }
    }

    #[test]
    fn bone_roundtrip() {
        let bone = Bone {
            name: "spine".into(),
            weights: vec![VertexWeight { vertex_id: 4, weight: 0.75 }],
            offset_matrix: glam::Mat4::from_translation(Vec3::Y),
        };
        let raw = bone.project();
        let back = Bone::lift(unsafe { &*raw });
        assert_eq!(back, bone);
        unsafe { Bone::release(raw, true) };
    }

    #[test]
    fn lift_clears_previous_contents() {
        let mesh = triangle_mesh();
        let raw = mesh.project();

        let mut target = Mesh { name: "stale".into(), vertices: vec![Vec3::ONE; 9], ..Default::default() };
        target.lift_from(unsafe { &*raw });
        assert_eq!(target, mesh);
        unsafe { Mesh::release(raw, true) };
    }
}
