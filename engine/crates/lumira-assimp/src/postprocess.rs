bitflags::bitflags! {
    /// 导入后处理步骤，可按位组合后传给导入或 apply 接口
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PostProcessFlags: u32 {
        const CALC_TANGENT_SPACE = 0x1;
        const JOIN_IDENTICAL_VERTICES = 0x2;
        const MAKE_LEFT_HANDED = 0x4;
        const TRIANGULATE = 0x8;
        const REMOVE_COMPONENT = 0x10;
        const GEN_NORMALS = 0x20;
        const GEN_SMOOTH_NORMALS = 0x40;
        const SPLIT_LARGE_MESHES = 0x80;
        const PRE_TRANSFORM_VERTICES = 0x100;
        const LIMIT_BONE_WEIGHTS = 0x200;
        const VALIDATE_DATA_STRUCTURE = 0x400;
        const IMPROVE_CACHE_LOCALITY = 0x800;
        const REMOVE_REDUNDANT_MATERIALS = 0x1000;
        const FIX_INFACING_NORMALS = 0x2000;
        const SORT_BY_PRIMITIVE_TYPE = 0x8000;
        const FIND_DEGENERATES = 0x10000;
        const FIND_INVALID_DATA = 0x20000;
        const GEN_UV_COORDS = 0x40000;
        const TRANSFORM_UV_COORDS = 0x80000;
        const FIND_INSTANCES = 0x100000;
        const OPTIMIZE_MESHES = 0x200000;
        const OPTIMIZE_GRAPH = 0x400000;
        const FLIP_UVS = 0x800000;
        const FLIP_WINDING_ORDER = 0x1000000;
        const SPLIT_BY_BONE_COUNT = 0x2000000;
        const DEBONE = 0x4000000;
        const GLOBAL_SCALE = 0x8000000;
        const EMBED_TEXTURES = 0x10000000;
        const FORCE_GEN_NORMALS = 0x20000000;
        const DROP_NORMALS = 0x40000000;
        const GEN_BOUNDING_BOXES = 0x80000000;
    }
}

impl PostProcessFlags {
    /// 实时渲染常用的预设组合
    pub fn target_realtime_quality() -> Self {
        Self::CALC_TANGENT_SPACE
            | Self::GEN_SMOOTH_NORMALS
            | Self::JOIN_IDENTICAL_VERTICES
            | Self::IMPROVE_CACHE_LOCALITY
            | Self::LIMIT_BONE_WEIGHTS
            | Self::REMOVE_REDUNDANT_MATERIALS
            | Self::SPLIT_LARGE_MESHES
            | Self::TRIANGULATE
            | Self::GEN_UV_COORDS
            | Self::SORT_BY_PRIMITIVE_TYPE
            | Self::FIND_DEGENERATES
            | Self::FIND_INVALID_DATA
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn flags_map_to_native_bits() {
        assert_eq!(PostProcessFlags::TRIANGULATE.bits(), 0x8);
        assert_eq!(PostProcessFlags::GEN_BOUNDING_BOXES.bits(), 0x8000_0000);
        let combo = PostProcessFlags::TRIANGULATE | PostProcessFlags::FLIP_UVS;
        assert_eq!(combo.bits(), 0x8 | 0x80_0000);
    }
}
