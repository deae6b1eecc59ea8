//! 场景数据模型
//!
//! 定义与原生导入库交换的托管场景结构：场景图、网格、材质、动画、
//! 纹理、灯光、相机。纯数据，不包含任何原生内存。
//!
//! 其中一部分值类型（关键帧、顶点权重、纹素等）的内存布局与原生
//! 结构完全一致，marshal 层可以整块拷贝，不需要逐字段转换。

pub mod animation;
pub mod camera;
pub mod light;
pub mod material;
pub mod mesh;
pub mod scene;
pub mod texture;
