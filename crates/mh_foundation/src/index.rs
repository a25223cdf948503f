// crates/mh_foundation/src/index.rs

//! 强类型索引系统
//!
//! 使用泛型 `Idx<T>` 在编译期区分不同对象的索引，避免把单元编号当作相编号使用。
//! 相的组成在整个模拟期间固定，因此这里不需要代际验证。
//!
//! # 示例
//!
//! ```
//! use mh_foundation::index::PhaseIndex;
//!
//! let gas = PhaseIndex::new(0);
//! let liquid = PhaseIndex::new(1);
//! assert!(gas < liquid);
//! assert_eq!(liquid.get(), 1);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

// ============================================================================
// 标记类型 (Phantom Types)
// ============================================================================

/// 相索引标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhaseTag;

// ============================================================================
// 泛型索引类型
// ============================================================================

/// 泛型强类型索引
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Idx<T> {
    index: u32,
    #[serde(skip)]
    _marker: PhantomData<fn() -> T>,
}

// 手动实现 Copy 和 Clone，因为 PhantomData<T> 的 Copy 需要 T: Copy
impl<T> Copy for Idx<T> {}

impl<T> Clone for Idx<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Idx<T> {
    /// 创建新索引
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self {
            index: index as u32,
            _marker: PhantomData,
        }
    }

    /// 获取索引值（usize）
    #[inline]
    pub const fn get(self) -> usize {
        self.index as usize
    }
}

// ============================================================================
// Trait 实现
// ============================================================================

impl<T> PartialEq for Idx<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Idx<T> {}

impl<T> PartialOrd for Idx<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Idx<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index.cmp(&other.index)
    }
}

impl<T> Hash for Idx<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Idx<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Idx({})", self.index)
    }
}

impl<T> fmt::Display for Idx<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index)
    }
}

impl<T> From<usize> for Idx<T> {
    #[inline]
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl<T> From<Idx<T>> for usize {
    #[inline]
    fn from(idx: Idx<T>) -> usize {
        idx.get()
    }
}

// ============================================================================
// 类型别名
// ============================================================================

/// 相索引
pub type PhaseIndex = Idx<PhaseTag>;
