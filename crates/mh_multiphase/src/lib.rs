// crates/mh_multiphase/src/lib.rs

//! MariHydro 多相相系统
//!
//! Euler-Euler 多流体求解器中的相间耦合核心：
//!
//! - [`phase`]: 相模型与按能力划分的相注册表
//! - [`pair`]: 有序/无序相对键与相对缓存
//! - [`models`]: 曳力、传热、传质、表面张力、长宽比子模型及流型混合
//! - [`system`]: 相系统：子模型工厂、传递矩阵装配、曳力局部消元
//! - [`field`]: 最小几何场层、对角传递矩阵、按相索引的场表
//! - [`mesh`]: 网格接口与一维测试网格
//! - [`config`]: JSON 配置
//!
//! # 示例
//!
//! ```
//! use std::sync::Arc;
//! use mh_multiphase::prelude::*;
//!
//! let json = r#"{
//!     "phases": [
//!         { "name": "air", "rho": 1.2, "alpha": 0.1 },
//!         { "name": "water", "rho": 1000.0, "alpha": 0.9 }
//!     ],
//!     "blending": { "default": { "type": "none", "continuous_phase": "water" } },
//!     "drag": [ { "pair": "air in water", "type": "schiller_naumann" } ]
//! }"#;
//!
//! let system = PhaseSystem::from_json_str(Arc::new(LineMesh::unit(8)), json).unwrap();
//! let key = PhasePairKey::ordered("air", "water");
//! assert!(system.found_sub_model::<Drag>(&key));
//! assert!(!system.found_sub_model::<Drag>(&key.swapped()));
//! assert_eq!(system.phase_pairs().len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod field;
pub mod mesh;
pub mod models;
pub mod pair;
pub mod phase;
pub mod system;

pub use config::PhaseSystemConfig;
pub use error::{PhaseSystemError, PhaseSystemResult};
pub use pair::{make_key, PhasePair, PhasePairKey};
pub use phase::{PhaseModel, PhaseModelList};
pub use system::{EliminationReport, PhaseSystem};

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::config::{EliminationConfig, PhaseConfig, PhaseSystemConfig};
    pub use crate::error::{PhaseSystemError, PhaseSystemResult};
    pub use crate::field::{
        fill_fields, FvScalarMatrix, FvVectorMatrix, PhaseFieldList, SurfaceScalarField,
        VolScalarField, VolVectorField,
    };
    pub use crate::mesh::{FvMesh, LineMesh};
    pub use crate::models::{AspectRatio, Drag, HeatTransfer, MassTransfer, SurfaceTension};
    pub use crate::pair::{make_key, PhasePairKey};
    pub use crate::phase::{PhaseModel, PhaseModelList};
    pub use crate::system::{EliminationReport, PhaseSystem};
    pub use mh_foundation::{DimensionSet, PhaseIndex};
}
