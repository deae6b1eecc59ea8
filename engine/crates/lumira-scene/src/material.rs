/// 材质属性值的类型标记
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyTypeInfo {
    Float = 1,
    Double = 2,
    String = 3,
    Integer = 4,
    #[default]
    Buffer = 5,
}

/// 纹理的用途（对应材质属性的 semantic 字段）
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureType {
    #[default]
    None = 0,
    Diffuse = 1,
    Specular = 2,
    Ambient = 3,
    Emissive = 4,
    Height = 5,
    Normals = 6,
    Shininess = 7,
    Opacity = 8,
    Displacement = 9,
    Lightmap = 10,
    Reflection = 11,
    BaseColor = 12,
    NormalCamera = 13,
    EmissionColor = 14,
    Metalness = 15,
    DiffuseRoughness = 16,
    AmbientOcclusion = 17,
    Unknown = 18,
}

impl PropertyTypeInfo {
    pub fn from_u32(v: u32) -> Self {
        match v {
            1 => PropertyTypeInfo::Float,
            2 => PropertyTypeInfo::Double,
            3 => PropertyTypeInfo::String,
            4 => PropertyTypeInfo::Integer,
            _ => PropertyTypeInfo::Buffer,
        }
    }
}

impl TextureType {
    pub fn from_u32(v: u32) -> Self {
        match v {
            0 => TextureType::None,
            1 => TextureType::Diffuse,
            2 => TextureType::Specular,
            3 => TextureType::Ambient,
            4 => TextureType::Emissive,
            5 => TextureType::Height,
            6 => TextureType::Normals,
            7 => TextureType::Shininess,
            8 => TextureType::Opacity,
            9 => TextureType::Displacement,
            10 => TextureType::Lightmap,
            11 => TextureType::Reflection,
            12 => TextureType::BaseColor,
            13 => TextureType::NormalCamera,
            14 => TextureType::EmissionColor,
            15 => TextureType::Metalness,
            16 => TextureType::DiffuseRoughness,
            17 => TextureType::AmbientOcclusion,
            _ => TextureType::Unknown,
        }
    }
}

/// 纹理坐标的生成方式
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureMapping {
    #[default]
    Uv = 0,
    Sphere = 1,
    Cylinder = 2,
    Box = 3,
    Plane = 4,
    Other = 5,
}

/// 多层纹理的混合算子
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureOp {
    #[default]
    Multiply = 0,
    Add = 1,
    Subtract = 2,
    Divide = 3,
    SmoothAdd = 4,
    SignedAdd = 5,
}

/// 纹理坐标超出 [0, 1] 时的采样方式
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureMapMode {
    #[default]
    Wrap = 0,
    Clamp = 1,
    Mirror = 2,
    Decal = 3,
}

impl TextureMapping {
    pub fn from_u32(v: u32) -> Self {
        match v {
            1 => TextureMapping::Sphere,
            2 => TextureMapping::Cylinder,
            3 => TextureMapping::Box,
            4 => TextureMapping::Plane,
            5 => TextureMapping::Other,
            _ => TextureMapping::Uv,
        }
    }
}

impl TextureOp {
    pub fn from_u32(v: u32) -> Self {
        match v {
            1 => TextureOp::Add,
            2 => TextureOp::Subtract,
            3 => TextureOp::Divide,
            4 => TextureOp::SmoothAdd,
            5 => TextureOp::SignedAdd,
            _ => TextureOp::Multiply,
        }
    }
}

impl TextureMapMode {
    pub fn from_u32(v: u32) -> Self {
        match v {
            1 => TextureMapMode::Clamp,
            2 => TextureMapMode::Mirror,
            3 => TextureMapMode::Decal,
            _ => TextureMapMode::Wrap,
        }
    }
}

bitflags::bitflags! {
    /// 纹理采样的附加标记
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TextureFlags: u32 {
        const INVERT = 0x1;
        const USE_ALPHA = 0x2;
        const IGNORE_ALPHA = 0x4;
    }
}

/// 标准材质属性的 key 字符串
pub mod material_keys {
    pub const NAME: &str = "?mat.name";
    pub const TWO_SIDED: &str = "$mat.twosided";
    pub const SHADING_MODEL: &str = "$mat.shadingm";
    pub const OPACITY: &str = "$mat.opacity";
    pub const SHININESS: &str = "$mat.shininess";
    pub const SHININESS_STRENGTH: &str = "$mat.shinpercent";
    pub const REFLECTIVITY: &str = "$mat.reflectivity";
    pub const COLOR_DIFFUSE: &str = "$clr.diffuse";
    pub const COLOR_AMBIENT: &str = "$clr.ambient";
    pub const COLOR_SPECULAR: &str = "$clr.specular";
    pub const COLOR_EMISSIVE: &str = "$clr.emissive";
    pub const COLOR_TRANSPARENT: &str = "$clr.transparent";
    pub const COLOR_REFLECTIVE: &str = "$clr.reflective";
    pub const TEXTURE: &str = "$tex.file";
    pub const TEXTURE_MAPPING: &str = "$tex.mapping";
    pub const TEXTURE_UV_INDEX: &str = "$tex.uvwsrc";
    pub const TEXTURE_BLEND: &str = "$tex.blend";
    pub const TEXTURE_OP: &str = "$tex.op";
    pub const TEXTURE_MAP_MODE_U: &str = "$tex.mapmodeu";
    pub const TEXTURE_MAP_MODE_V: &str = "$tex.mapmodev";
    pub const TEXTURE_FLAGS: &str = "$tex.flags";
}

/// 单条材质属性：key + (semantic, index) 定位，值为原始字节
///
/// 非纹理属性的 semantic 恒为 [`TextureType::None`]、index 恒为 0。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialProperty {
    pub key: String,
    pub semantic: TextureType,
    pub index: u32,
    pub type_info: PropertyTypeInfo,
    pub data: Vec<u8>,
}

/// CPU 侧的材质：一组键值属性
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Material {
    pub properties: Vec<MaterialProperty>,
}

/// 一个纹理槽位的完整描述，由材质查询接口聚合返回
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextureSlot {
    /// 纹理路径，内嵌纹理形如 "*0"
    pub path: String,
    pub texture_type: TextureType,
    pub index: u32,
    pub mapping: TextureMapping,
    pub uv_index: u32,
    pub blend_factor: f32,
    pub operation: TextureOp,
    pub wrap_mode_u: TextureMapMode,
    pub wrap_mode_v: TextureMapMode,
    pub flags: TextureFlags,
}

// tools
impl Material {
    /// 按 (key, semantic, index) 查找属性
    pub fn find(&self, key: &str, semantic: TextureType, index: u32) -> Option<&MaterialProperty> {
        self.properties.iter().find(|p| p.key == key && p.semantic == semantic && p.index == index)
    }

    /// 指定用途的纹理层数
    pub fn texture_count(&self, texture_type: TextureType) -> usize {
        self.properties.iter().filter(|p| p.key == material_keys::TEXTURE && p.semantic == texture_type).count()
    }
}
