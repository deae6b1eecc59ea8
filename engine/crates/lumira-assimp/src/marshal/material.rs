use std::ffi::c_char;
use std::ptr;

use lumira_scene::material::{Material, MaterialProperty, PropertyTypeInfo, TextureType};

use crate::marshal::{self, NativeMarshal};
use crate::mem;
use crate::native::AiString;
use crate::native::material::{AiMaterial, AiMaterialProperty};

impl NativeMarshal for MaterialProperty {
    type Raw = AiMaterialProperty;

    fn project_into(&self, raw: &mut AiMaterialProperty) {
        raw.key = AiString::from_str(&self.key);
        raw.semantic = self.semantic as u32;
        raw.index = self.index;
        raw.property_type = self.type_info as u32;
        raw.data_length = self.data.len() as u32;
        raw.data = mem::copy_slice_to_native(&self.data) as *mut c_char;
    }

    fn lift_from(&mut self, raw: &AiMaterialProperty) {
        *self = Self::default();
        self.key = raw.key.to_string();
        self.semantic = TextureType::from_u32(raw.semantic);
        self.index = raw.index;
        self.type_info = PropertyTypeInfo::from_u32(raw.property_type);
        self.data = unsafe { mem::copy_slice_from_native(raw.data as *const u8, raw.data_length as usize) };
    }

    unsafe fn release(raw: *mut AiMaterialProperty, free_top: bool) {
        if raw.is_null() {
            return;
        }
        let r = unsafe { &mut *raw };
        unsafe { mem::free(r.data) };
        r.data = ptr::null_mut();
        r.data_length = 0;
        if free_top {
            unsafe { mem::free(raw) };
        }
    }
}

impl NativeMarshal for Material {
    type Raw = AiMaterial;

    fn project_into(&self, raw: &mut AiMaterial) {
        raw.num_properties = self.properties.len() as u32;
        // 托管侧投影不预留富余容量
        raw.num_allocated = raw.num_properties;
        raw.properties = marshal::project_ptr_array(&self.properties);
    }

    fn lift_from(&mut self, raw: &AiMaterial) {
        *self = Self::default();
        self.properties = unsafe { marshal::lift_ptr_array(raw.properties, raw.num_properties) };
    }

    unsafe fn release(raw: *mut AiMaterial, free_top: bool) {
        if raw.is_null() {
            return;
        }
        let r = unsafe { &mut *raw };
        unsafe { marshal::release_ptr_array::<MaterialProperty>(&mut r.properties, &mut r.num_properties) };
        r.num_allocated = 0;
        if free_top {
            unsafe { mem::free(raw) };
        }
    }
}

#[cfg(test)]
mod test {
    use lumira_scene::material::material_keys;

    use super::*;

    fn float_prop(key: &str, v: f32) -> MaterialProperty {
        MaterialProperty {
            key: key.into(),
            semantic: TextureType::None,
            index: 0,
            type_info: PropertyTypeInfo::Float,
            data: v.to_le_bytes().to_vec(),
        }
    }

    #[test]
    fn material_roundtrip() {
        let mat = Material {
            properties: vec![
                float_prop(material_keys::SHININESS, 32.0),
                MaterialProperty {
                    key: material_keys::TEXTURE.into(),
                    semantic: TextureType::Diffuse,
                    index: 0,
                    type_info: PropertyTypeInfo::String,
                    data: b"albedo.png\0".to_vec(),
                },
            ],
        };
        let raw = mat.project();
        unsafe {
            assert_eq!((*raw).num_allocated, (*raw).num_properties);
        }
        let back = Material::lift(unsafe { &*raw });
        assert_eq!(back, mat);
        unsafe { Material::release(raw, true) };
    }

    #[test]
    fn empty_material_projects_to_null_properties() {
        let raw = Material::default().project();
        unsafe {
            assert!((*raw).properties.is_null());
            assert_eq!((*raw).num_properties, 0);
            Material::release(raw, true);
        }
    }

    #[test]
    fn property_with_empty_payload_keeps_null_data() {
        let prop = MaterialProperty {
            key: "$raw.custom".into(),
            ..Default::default()
        };
        let raw = prop.project();
        unsafe {
            assert!((*raw).data.is_null());
            assert_eq!((*raw).data_length, 0);
        }
        let back = MaterialProperty::lift(unsafe { &*raw });
        assert_eq!(back, prop);
        unsafe { MaterialProperty::release(raw, true) };
    }
}
