// crates/mh_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `MhError` 枚举和 `MhResult` 类型别名。
//!
//! 基础层只定义与具体物理无关的错误，相系统相关错误在 `mh_multiphase` 中扩展，
//! 并通过 `#[from]` 包装本类型。
//!
//! # 示例
//!
//! ```
//! use mh_foundation::error::{MhError, MhResult};
//!
//! fn read_config() -> MhResult<()> {
//!     Err(MhError::config("配置文件格式错误"))
//! }
//! assert!(read_config().is_err());
//! ```

use thiserror::Error;

/// 统一结果类型
pub type MhResult<T> = Result<T, MhError>;

/// MariHydro 错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MhError {
    // ========================================================================
    // 输入数据错误
    // ========================================================================
    /// 数据超出范围
    #[error("数据超出范围: {field}={value}, 期望范围=[{min}, {max}]")]
    OutOfRange {
        /// 字段名
        field: &'static str,
        /// 实际值
        value: f64,
        /// 最小允许值
        min: f64,
        /// 最大允许值
        max: f64,
    },

    /// 数组大小不匹配
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    /// 量纲不一致
    #[error("量纲不一致: {context} 左侧 {left}, 右侧 {right}")]
    DimensionMismatch {
        /// 发生位置
        context: String,
        /// 左操作数量纲
        left: String,
        /// 右操作数量纲
        right: String,
    },

    // ========================================================================
    // 配置错误
    // ========================================================================
    /// 配置错误
    #[error("配置错误: {message}")]
    Config {
        /// 具体错误信息
        message: String,
    },

    // ========================================================================
    // 查找
    // ========================================================================
    /// 资源未找到
    #[error("资源未找到: {resource}")]
    NotFound {
        /// 资源名称
        resource: String,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl MhError {
    /// 数据超出范围
    pub fn out_of_range(field: &'static str, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange {
            field,
            value,
            min,
            max,
        }
    }

    /// 数组大小不匹配
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 量纲不一致
    pub fn dimension_mismatch(
        context: impl Into<String>,
        left: impl ToString,
        right: impl ToString,
    ) -> Self {
        Self::DimensionMismatch {
            context: context.into(),
            left: left.to_string(),
            right: right.to_string(),
        }
    }

    /// 配置错误
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// 资源未找到
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }
}

// ========================================================================
// 验证辅助方法
// ========================================================================

impl MhError {
    /// 检查数组大小是否匹配
    #[inline]
    pub fn check_size(name: &'static str, expected: usize, actual: usize) -> MhResult<()> {
        if expected != actual {
            Err(Self::size_mismatch(name, expected, actual))
        } else {
            Ok(())
        }
    }

    /// 检查值是否在范围内
    #[inline]
    pub fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> MhResult<()> {
        if !(min..=max).contains(&value) {
            Err(Self::out_of_range(field, value, min, max))
        } else {
            Ok(())
        }
    }
}

// ========================================================================
// 宏
// ========================================================================

/// 条件不满足时提前返回错误
///
/// 错误表达式经 `Into` 转换，可用于任何包装了 `MhError` 的错误类型。
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return Err(::core::convert::Into::into($err));
        }
    };
}

/// 解包 `Option`，为 `None` 时提前返回错误
#[macro_export]
macro_rules! require {
    ($opt:expr, $err:expr $(,)?) => {
        match $opt {
            Some(value) => value,
            None => return Err(::core::convert::Into::into($err)),
        }
    };
}

// ========================================================================
// 测试
// ========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MhError::config("测试配置错误");
        assert!(err.to_string().contains("配置错误"));
    }

    #[test]
    fn test_check_size() {
        assert!(MhError::check_size("test", 10, 10).is_ok());
        assert!(MhError::check_size("test", 10, 5).is_err());
    }

    #[test]
    fn test_check_range() {
        assert!(MhError::check_range("alpha", 0.5, 0.0, 1.0).is_ok());
        assert!(MhError::check_range("alpha", -0.1, 0.0, 1.0).is_err());
        assert!(MhError::check_range("alpha", 1.1, 0.0, 1.0).is_err());
        assert!(MhError::check_range("alpha", f64::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let err = MhError::dimension_mismatch("alpha + U", "[0 0 0 0 0 0 0]", "[0 1 -1 0 0 0 0]");
        assert!(err.to_string().contains("alpha + U"));
    }

    #[test]
    fn test_ensure_macro() {
        fn check(value: i32) -> MhResult<()> {
            ensure!(value > 0, MhError::out_of_range("value", value as f64, 1.0, f64::MAX));
            Ok(())
        }

        assert!(check(1).is_ok());
        assert!(check(-1).is_err());
    }

    #[test]
    fn test_require_macro() {
        fn get_value(opt: Option<i32>) -> MhResult<i32> {
            let v = require!(opt, MhError::not_found("value"));
            Ok(v)
        }

        assert_eq!(get_value(Some(42)).unwrap(), 42);
        assert!(get_value(None).is_err());
    }
}
