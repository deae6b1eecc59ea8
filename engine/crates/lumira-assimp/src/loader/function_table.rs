//! 类型化的原生入口表
//!
//! 表字段与导出符号一一对应，整表由 [`FunctionTable::resolve`] 一次
//! 重建。缺失的入口保持 None，由上层决定是拒绝装载还是按入口报错。

use std::ffi::{c_char, c_int};

use glam::{Vec3, Vec4};
use lumira_scene::animation::Quaternion;

use crate::loader::PlatformLibrary;
use crate::native::io::{AiExportDataBlob, AiFileIO};
use crate::native::material::{AiMaterial, AiMaterialProperty};
use crate::native::scene::AiScene;
use crate::native::{AiBool, AiLogStream, AiMatrix4x4, AiPropertyStore, AiString};

macro_rules! function_table {
    (
        $( $field:ident : $sym:literal => fn($($arg:ty),* $(,)?) $(-> $ret:ty)?; )*
    ) => {
        /// 全部原生入口的函数指针，逐项可缺
        #[derive(Default)]
        pub struct FunctionTable {
            $( pub $field: Option<unsafe extern "C" fn($($arg),*) $(-> $ret)?>, )*
        }

        impl FunctionTable {
            /// 表覆盖的全部符号名
            pub const SYMBOLS: &'static [&'static str] = &[ $($sym),* ];

            /// 从已打开的库解析出完整的表。每个符号独立取址，
            /// 取不到的字段为 None
            pub fn resolve(lib: &PlatformLibrary) -> Self {
                Self {
                    $(
                        $field: lib.resolve($sym).map(|p| unsafe {
                            std::mem::transmute::<
                                *const (),
                                unsafe extern "C" fn($($arg),*) $(-> $ret)?,
                            >(p)
                        }),
                    )*
                }
            }

            /// 未解析成功的符号名
            pub fn missing(&self) -> Vec<&'static str> {
                let mut out = Vec::new();
                $( if self.$field.is_none() { out.push($sym); } )*
                out
            }
        }
    };
}

function_table! {
    // 导入 / 场景生命周期
    import_file: "aiImportFile" => fn(*const c_char, u32) -> *const AiScene;
    import_file_ex_with_properties: "aiImportFileExWithProperties" =>
        fn(*const c_char, u32, *mut AiFileIO, *const AiPropertyStore) -> *const AiScene;
    import_file_from_memory: "aiImportFileFromMemory" =>
        fn(*const c_char, u32, u32, *const c_char) -> *const AiScene;
    import_file_from_memory_with_properties: "aiImportFileFromMemoryWithProperties" =>
        fn(*const c_char, u32, u32, *const c_char, *const AiPropertyStore) -> *const AiScene;
    release_import: "aiReleaseImport" => fn(*const AiScene);
    apply_post_processing: "aiApplyPostProcessing" => fn(*const AiScene, u32) -> *const AiScene;
    copy_scene: "aiCopyScene" => fn(*const AiScene, *mut *mut AiScene);
    free_scene: "aiFreeScene" => fn(*const AiScene);

    // 导出
    export_scene: "aiExportScene" => fn(*const AiScene, *const c_char, *const c_char, u32) -> c_int;
    export_scene_ex: "aiExportSceneEx" =>
        fn(*const AiScene, *const c_char, *const c_char, *mut AiFileIO, u32) -> c_int;
    export_scene_to_blob: "aiExportSceneToBlob" =>
        fn(*const AiScene, *const c_char, u32) -> *const AiExportDataBlob;
    release_export_blob: "aiReleaseExportBlob" => fn(*const AiExportDataBlob);

    // 能力与诊断字符串
    is_extension_supported: "aiIsExtensionSupported" => fn(*const c_char) -> AiBool;
    get_extension_list: "aiGetExtensionList" => fn(*mut AiString);
    get_error_string: "aiGetErrorString" => fn() -> *const c_char;
    get_legal_string: "aiGetLegalString" => fn() -> *const c_char;
    get_version_major: "aiGetVersionMajor" => fn() -> u32;
    get_version_minor: "aiGetVersionMinor" => fn() -> u32;
    get_version_revision: "aiGetVersionRevision" => fn() -> u32;
    get_compile_flags: "aiGetCompileFlags" => fn() -> u32;

    // 日志
    enable_verbose_logging: "aiEnableVerboseLogging" => fn(AiBool);
    attach_log_stream: "aiAttachLogStream" => fn(*const AiLogStream);
    detach_log_stream: "aiDetachLogStream" => fn(*const AiLogStream) -> c_int;
    detach_all_log_streams: "aiDetachAllLogStreams" => fn();

    // 导入属性
    create_property_store: "aiCreatePropertyStore" => fn() -> *mut AiPropertyStore;
    release_property_store: "aiReleasePropertyStore" => fn(*mut AiPropertyStore);
    set_import_property_integer: "aiSetImportPropertyInteger" =>
        fn(*mut AiPropertyStore, *const c_char, c_int);
    set_import_property_float: "aiSetImportPropertyFloat" =>
        fn(*mut AiPropertyStore, *const c_char, f32);
    set_import_property_string: "aiSetImportPropertyString" =>
        fn(*mut AiPropertyStore, *const c_char, *const AiString);
    set_import_property_matrix: "aiSetImportPropertyMatrix" =>
        fn(*mut AiPropertyStore, *const c_char, *const AiMatrix4x4);

    // 材质查询
    get_material_property: "aiGetMaterialProperty" =>
        fn(*const AiMaterial, *const c_char, u32, u32, *mut *const AiMaterialProperty) -> c_int;
    get_material_float_array: "aiGetMaterialFloatArray" =>
        fn(*const AiMaterial, *const c_char, u32, u32, *mut f32, *mut u32) -> c_int;
    get_material_integer_array: "aiGetMaterialIntegerArray" =>
        fn(*const AiMaterial, *const c_char, u32, u32, *mut c_int, *mut u32) -> c_int;
    get_material_color: "aiGetMaterialColor" =>
        fn(*const AiMaterial, *const c_char, u32, u32, *mut Vec4) -> c_int;
    get_material_string: "aiGetMaterialString" =>
        fn(*const AiMaterial, *const c_char, u32, u32, *mut AiString) -> c_int;
    get_material_texture_count: "aiGetMaterialTextureCount" => fn(*const AiMaterial, u32) -> u32;
    get_material_texture: "aiGetMaterialTexture" =>
        fn(*const AiMaterial, u32, u32, *mut AiString, *mut u32, *mut u32,
           *mut f32, *mut u32, *mut u32, *mut u32) -> c_int;

    // 数学工具
    identity_matrix4: "aiIdentityMatrix4" => fn(*mut AiMatrix4x4);
    transpose_matrix4: "aiTransposeMatrix4" => fn(*mut AiMatrix4x4);
    multiply_matrix4: "aiMultiplyMatrix4" => fn(*mut AiMatrix4x4, *const AiMatrix4x4);
    transform_vec_by_matrix4: "aiTransformVecByMatrix4" => fn(*mut Vec3, *const AiMatrix4x4);
    decompose_matrix: "aiDecomposeMatrix" =>
        fn(*const AiMatrix4x4, *mut Vec3, *mut Quaternion, *mut Vec3);
}

#[cfg(test)]
mod test {
    use crate::loader::LoadPolicy;

    use super::*;

    #[test]
    fn unopened_library_resolves_to_empty_table() {
        let lib = PlatformLibrary::open("/nonexistent/libnope.so", LoadPolicy::Tolerant).unwrap();
        let table = FunctionTable::resolve(&lib);
        assert!(table.import_file.is_none());
        assert_eq!(table.missing().len(), FunctionTable::SYMBOLS.len());
    }

    #[test]
    fn symbol_list_has_no_duplicates() {
        use itertools::Itertools;
        let dupes: Vec<_> = FunctionTable::SYMBOLS.iter().duplicates().collect();
        assert!(dupes.is_empty(), "duplicated symbols: {dupes:?}");
    }
}
