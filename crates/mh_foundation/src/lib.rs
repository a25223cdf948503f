// crates/mh_foundation/src/lib.rs

//! MariHydro Foundation Layer
//!
//! 零依赖基础层（仅依赖 serde 和 thiserror），为多相求解核心提供基础抽象。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型与 `ensure!` / `require!` 宏
//! - [`index`]: 强类型索引（相索引等）
//! - [`dimension`]: 物理量纲集合
//! - [`tolerance`]: 数值容差配置
//!
//! # 示例
//!
//! ```
//! use mh_foundation::{
//!     dimension::DimensionSet,
//!     error::{MhError, MhResult},
//!     index::PhaseIndex,
//! };
//!
//! let idx = PhaseIndex::new(1);
//! assert_eq!(idx.get(), 1);
//!
//! let drag = DimensionSet::DENSITY / DimensionSet::TIME;
//! assert_eq!(drag.to_string(), "[1 -3 -1 0 0 0 0]");
//!
//! fn check(n: usize) -> MhResult<()> {
//!     MhError::check_size("phases", 2, n)
//! }
//! assert!(check(3).is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dimension;
pub mod error;
pub mod index;
pub mod tolerance;

// 重导出常用类型
pub use dimension::DimensionSet;
pub use error::{MhError, MhResult};
pub use index::{Idx, PhaseIndex};
pub use tolerance::CouplingTolerance;

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::dimension::DimensionSet;
    pub use crate::error::{MhError, MhResult};
    pub use crate::index::{Idx, PhaseIndex};
    pub use crate::tolerance::CouplingTolerance;
    pub use crate::{ensure, require};
}
