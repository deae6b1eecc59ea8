use lumira_scene::camera::Camera;
use lumira_scene::light::{Light, LightSourceType};

use crate::marshal::NativeMarshal;
use crate::native::AiString;
use crate::native::scene::{AiCamera, AiLight};

impl NativeMarshal for Light {
    type Raw = AiLight;
    const DIRECT: bool = true;

    fn project_into(&self, raw: &mut AiLight) {
        raw.name = AiString::from_str(&self.name);
        raw.light_type = self.light_type as u32;
        raw.position = self.position;
        raw.direction = self.direction;
        raw.up = self.up;
        raw.attenuation_constant = self.attenuation_constant;
        raw.attenuation_linear = self.attenuation_linear;
        raw.attenuation_quadratic = self.attenuation_quadratic;
        raw.color_diffuse = self.color_diffuse;
        raw.color_specular = self.color_specular;
        raw.color_ambient = self.color_ambient;
        raw.angle_inner_cone = self.angle_inner_cone;
        raw.angle_outer_cone = self.angle_outer_cone;
        raw.size = self.size;
    }

    fn lift_from(&mut self, raw: &AiLight) {
        *self = Self::default();
        self.name = raw.name.to_string();
        self.light_type = LightSourceType::from_u32(raw.light_type);
        self.position = raw.position;
        self.direction = raw.direction;
        self.up = raw.up;
        self.attenuation_constant = raw.attenuation_constant;
        self.attenuation_linear = raw.attenuation_linear;
        self.attenuation_quadratic = raw.attenuation_quadratic;
        self.color_diffuse = raw.color_diffuse;
        self.color_specular = raw.color_specular;
        self.color_ambient = raw.color_ambient;
        self.angle_inner_cone = raw.angle_inner_cone;
        self.angle_outer_cone = raw.angle_outer_cone;
        self.size = raw.size;
    }
}

impl NativeMarshal for Camera {
    type Raw = AiCamera;
    const DIRECT: bool = true;

    fn project_into(&self, raw: &mut AiCamera) {
        raw.name = AiString::from_str(&self.name);
        raw.position = self.position;
        raw.up = self.up;
        raw.look_at = self.look_at;
        raw.horizontal_fov = self.horizontal_fov;
        raw.clip_plane_near = self.clip_plane_near;
        raw.clip_plane_far = self.clip_plane_far;
        raw.aspect = self.aspect;
    }

    fn lift_from(&mut self, raw: &AiCamera) {
        *self = Self::default();
        self.name = raw.name.to_string();
        self.position = raw.position;
        self.up = raw.up;
        self.look_at = raw.look_at;
        self.horizontal_fov = raw.horizontal_fov;
        self.clip_plane_near = raw.clip_plane_near;
        self.clip_plane_far = raw.clip_plane_far;
        self.aspect = raw.aspect;
    }
}

#[cfg(test)]
mod test {
    use glam::{Vec2, Vec3};

    use super::*;

    #[test]
    fn spot_light_roundtrip() {
        let light = Light {
            name: "key_light".into(),
            light_type: LightSourceType::Spot,
            position: Vec3::new(0.0, 4.0, 0.0),
            direction: Vec3::NEG_Y,
            up: Vec3::Z,
            attenuation_constant: 1.0,
            attenuation_linear: 0.09,
            attenuation_quadratic: 0.032,
            color_diffuse: Vec3::ONE,
            color_specular: Vec3::ONE,
            color_ambient: Vec3::splat(0.1),
            angle_inner_cone: 0.4,
            angle_outer_cone: 0.6,
            size: Vec2::ZERO,
        };
        let raw = light.project();
        let back = Light::lift(unsafe { &*raw });
        assert_eq!(back, light);
        unsafe { Light::release(raw, true) };
    }

    #[test]
    fn camera_roundtrip() {
        let cam = Camera {
            name: "main_cam".into(),
            position: Vec3::new(1.0, 2.0, 3.0),
            aspect: 16.0 / 9.0,
            ..Default::default()
        };
        let raw = cam.project();
        let back = Camera::lift(unsafe { &*raw });
        assert_eq!(back, cam);
        unsafe { Camera::release(raw, true) };
    }

    #[test]
    fn unknown_light_type_lifts_to_undefined() {
        let raw = Light::default().project();
        unsafe {
            (*raw).light_type = 99;
            let back = Light::lift(&*raw);
            assert_eq!(back.light_type, LightSourceType::Undefined);
            Light::release(raw, true);
        }
    }
}
