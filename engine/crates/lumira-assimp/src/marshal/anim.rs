use std::ptr;

use lumira_scene::animation::{AnimBehaviour, Animation, MeshAnim, MeshMorphAnim, MorphKey, NodeAnim};

use crate::marshal::{self, NativeMarshal};
use crate::mem;
use crate::native::AiString;
use crate::native::anim::{AiAnimation, AiMeshAnim, AiMeshMorphAnim, AiMeshMorphKey, AiNodeAnim};

impl NativeMarshal for NodeAnim {
    type Raw = AiNodeAnim;

    fn project_into(&self, raw: &mut AiNodeAnim) {
        raw.node_name = AiString::from_str(&self.node_name);
        // 关键帧布局与原生一致，走整块拷贝路径
        raw.num_position_keys = self.position_keys.len() as u32;
        raw.position_keys = mem::copy_slice_to_native(&self.position_keys);
        raw.num_rotation_keys = self.rotation_keys.len() as u32;
        raw.rotation_keys = mem::copy_slice_to_native(&self.rotation_keys);
        raw.num_scaling_keys = self.scaling_keys.len() as u32;
        raw.scaling_keys = mem::copy_slice_to_native(&self.scaling_keys);
        raw.pre_state = self.pre_state as u32;
        raw.post_state = self.post_state as u32;
    }

    fn lift_from(&mut self, raw: &AiNodeAnim) {
        *self = Self::default();
        self.node_name = raw.node_name.to_string();
        unsafe {
            self.position_keys = mem::copy_slice_from_native(raw.position_keys, raw.num_position_keys as usize);
            self.rotation_keys = mem::copy_slice_from_native(raw.rotation_keys, raw.num_rotation_keys as usize);
            self.scaling_keys = mem::copy_slice_from_native(raw.scaling_keys, raw.num_scaling_keys as usize);
        }
        self.pre_state = AnimBehaviour::from_u32(raw.pre_state);
        self.post_state = AnimBehaviour::from_u32(raw.post_state);
    }

    unsafe fn release(raw: *mut AiNodeAnim, free_top: bool) {
        if raw.is_null() {
            return;
        }
        let r = unsafe { &mut *raw };
        unsafe {
            mem::free(r.position_keys);
            mem::free(r.rotation_keys);
            mem::free(r.scaling_keys);
        }
        r.position_keys = ptr::null_mut();
        r.rotation_keys = ptr::null_mut();
        r.scaling_keys = ptr::null_mut();
        r.num_position_keys = 0;
        r.num_rotation_keys = 0;
        r.num_scaling_keys = 0;
        if free_top {
            unsafe { mem::free(raw) };
        }
    }
}

impl NativeMarshal for MeshAnim {
    type Raw = AiMeshAnim;

    fn project_into(&self, raw: &mut AiMeshAnim) {
        raw.name = AiString::from_str(&self.name);
        raw.num_keys = self.keys.len() as u32;
        raw.keys = mem::copy_slice_to_native(&self.keys);
    }

    fn lift_from(&mut self, raw: &AiMeshAnim) {
        *self = Self::default();
        self.name = raw.name.to_string();
        self.keys = unsafe { mem::copy_slice_from_native(raw.keys, raw.num_keys as usize) };
    }

    unsafe fn release(raw: *mut AiMeshAnim, free_top: bool) {
        if raw.is_null() {
            return;
        }
        let r = unsafe { &mut *raw };
        unsafe { mem::free(r.keys) };
        r.keys = ptr::null_mut();
        r.num_keys = 0;
        if free_top {
            unsafe { mem::free(raw) };
        }
    }
}

impl NativeMarshal for MeshMorphAnim {
    type Raw = AiMeshMorphAnim;

    fn project_into(&self, raw: &mut AiMeshMorphAnim) {
        raw.name = AiString::from_str(&self.name);
        raw.num_keys = self.keys.len() as u32;
        raw.keys = project_morph_keys(&self.name, &self.keys);
    }

    fn lift_from(&mut self, raw: &AiMeshMorphAnim) {
        *self = Self::default();
        self.name = raw.name.to_string();
        if raw.keys.is_null() {
            return;
        }
        self.keys = (0..raw.num_keys as usize)
            .map(|i| {
                let k = unsafe { &*raw.keys.add(i) };
                let n = k.num_values_and_weights as usize;
                MorphKey {
                    time: k.time,
                    values: unsafe { mem::copy_slice_from_native(k.values, n) },
                    weights: unsafe { mem::copy_slice_from_native(k.weights, n) },
                }
            })
            .collect();
    }

    unsafe fn release(raw: *mut AiMeshMorphAnim, free_top: bool) {
        if raw.is_null() {
            return;
        }
        let r = unsafe { &mut *raw };
        if !r.keys.is_null() {
            for i in 0..r.num_keys as usize {
                let k = unsafe { &mut *r.keys.add(i) };
                unsafe {
                    mem::free(k.values);
                    mem::free(k.weights);
                }
                k.values = ptr::null_mut();
                k.weights = ptr::null_mut();
                k.num_values_and_weights = 0;
            }
            unsafe { mem::free(r.keys) };
            r.keys = ptr::null_mut();
        }
        r.num_keys = 0;
        if free_top {
            unsafe { mem::free(raw) };
        }
    }
}

/// morph 关键帧是内嵌值数组，values/weights 必须等长；
/// 不等长的关键帧整个系列降级为空（计数 0 + 空指针），其余字段保持不变
fn project_morph_keys(owner: &str, keys: &[MorphKey]) -> *mut AiMeshMorphKey {
    if keys.is_empty() {
        return ptr::null_mut();
    }
    let arr = mem::alloc_bytes(keys.len() * size_of::<AiMeshMorphKey>()) as *mut AiMeshMorphKey;
    for (i, key) in keys.iter().enumerate() {
        let dst = unsafe { &mut *arr.add(i) };
        dst.time = key.time;
        if key.values.len() != key.weights.len() {
            log::warn!(
                "morph channel '{owner}' key {i}: {} values vs {} weights, dropping the series",
                key.values.len(),
                key.weights.len()
            );
            dst.values = ptr::null_mut();
            dst.weights = ptr::null_mut();
            dst.num_values_and_weights = 0;
        } else {
            dst.num_values_and_weights = key.values.len() as u32;
            dst.values = mem::copy_slice_to_native(&key.values);
            dst.weights = mem::copy_slice_to_native(&key.weights);
        }
    }
    arr
}

impl NativeMarshal for Animation {
    type Raw = AiAnimation;

    fn project_into(&self, raw: &mut AiAnimation) {
        raw.name = AiString::from_str(&self.name);
        raw.duration = self.duration;
        raw.ticks_per_second = self.ticks_per_second;
        raw.num_channels = self.channels.len() as u32;
        raw.channels = marshal::project_ptr_array(&self.channels);
        raw.num_mesh_channels = self.mesh_channels.len() as u32;
        raw.mesh_channels = marshal::project_ptr_array(&self.mesh_channels);
        raw.num_morph_mesh_channels = self.morph_channels.len() as u32;
        raw.morph_mesh_channels = marshal::project_ptr_array(&self.morph_channels);
    }

    fn lift_from(&mut self, raw: &AiAnimation) {
        *self = Self::default();
        self.name = raw.name.to_string();
        self.duration = raw.duration;
        self.ticks_per_second = raw.ticks_per_second;
        unsafe {
            self.channels = marshal::lift_ptr_array(raw.channels, raw.num_channels);
            self.mesh_channels = marshal::lift_ptr_array(raw.mesh_channels, raw.num_mesh_channels);
            self.morph_channels = marshal::lift_ptr_array(raw.morph_mesh_channels, raw.num_morph_mesh_channels);
        }
    }

    unsafe fn release(raw: *mut AiAnimation, free_top: bool) {
        if raw.is_null() {
            return;
        }
        let r = unsafe { &mut *raw };
        unsafe {
            marshal::release_ptr_array::<NodeAnim>(&mut r.channels, &mut r.num_channels);
            marshal::release_ptr_array::<MeshAnim>(&mut r.mesh_channels, &mut r.num_mesh_channels);
            marshal::release_ptr_array::<MeshMorphAnim>(&mut r.morph_mesh_channels, &mut r.num_morph_mesh_channels);
        }
        if free_top {
            unsafe { mem::free(raw) };
        }
    }
}

#[cfg(test)]
mod test {
    use glam::Vec3;
    use lumira_scene::animation::{Quaternion, QuatKey, VectorKey};

    use super::*;

    #[test]
    fn node_anim_roundtrip() {
        let channel = NodeAnim {
            node_name: "pelvis".into(),
            position_keys: vec![
                VectorKey { time: 0.0, value: Vec3::ZERO },
                VectorKey { time: 1.0, value: Vec3::X },
            ],
            rotation_keys: vec![QuatKey { time: 0.0, value: Quaternion::default() }],
            scaling_keys: vec![VectorKey { time: 0.0, value: Vec3::ONE }],
            pre_state: AnimBehaviour::Constant,
            post_state: AnimBehaviour::Repeat,
        };
        let raw = channel.project();
        let back = NodeAnim::lift(unsafe { &*raw });
        assert_eq!(back, channel);
        unsafe { NodeAnim::release(raw, true) };
    }

    #[test]
    fn morph_animation_two_keys_two_pairs_roundtrip() {
        let anim = MeshMorphAnim {
            name: "smile".into(),
            keys: vec![
                MorphKey { time: 0.0, values: vec![0, 1], weights: vec![0.25, 0.75] },
                MorphKey { time: 0.5, values: vec![1, 2], weights: vec![0.5, 0.5] },
            ],
        };
        let raw = anim.project();
        let back = MeshMorphAnim::lift(unsafe { &*raw });

        assert_eq!(back.keys.len(), 2);
        for (got, want) in back.keys.iter().zip(&anim.keys) {
            assert_eq!(got.values.len(), 2);
            assert_eq!(got.weights.len(), 2);
            // target 下标按位相等，权重按浮点容差比较
            assert_eq!(got.values, want.values);
            for (a, b) in got.weights.iter().zip(&want.weights) {
                assert!((a - b).abs() < 1e-12);
            }
            assert_eq!(got.time, want.time);
        }
        unsafe { MeshMorphAnim::release(raw, true) };
    }

    #[test]
    fn mismatched_morph_series_degrades_to_empty() {
        let anim = MeshMorphAnim {
            name: "broken".into(),
            keys: vec![MorphKey { time: 2.0, values: vec![0, 1, 2], weights: vec![0.5, 0.5] }],
        };
        let raw = anim.project();
        unsafe {
            let key = &*(*raw).keys;
            assert_eq!(key.num_values_and_weights, 0);
            assert!(key.values.is_null());
            assert!(key.weights.is_null());
            // 兄弟字段不受影响
            assert_eq!(key.time, 2.0);
        }

        let back = MeshMorphAnim::lift(unsafe { &*raw });
        assert!(back.keys[0].values.is_empty());
        assert!(back.keys[0].weights.is_empty());
        assert_eq!(back.keys[0].time, 2.0);
        unsafe { MeshMorphAnim::release(raw, true) };
    }

    #[test]
    fn animation_roundtrip_with_all_channel_kinds() {
        let anim = Animation {
            name: "walk".into(),
            duration: 40.0,
            ticks_per_second: 24.0,
            channels: vec![NodeAnim { node_name: "hip".into(), ..Default::default() }],
            mesh_channels: vec![MeshAnim { name: "lod0".into(), ..Default::default() }],
            morph_channels: vec![MeshMorphAnim { name: "brow".into(), ..Default::default() }],
        };
        let raw = anim.project();
        let back = Animation::lift(unsafe { &*raw });
        assert_eq!(back, anim);
        unsafe { Animation::release(raw, true) };
    }

    #[test]
    fn release_null_animation_is_noop() {
        unsafe { Animation::release(ptr::null_mut(), true) };
    }
}
