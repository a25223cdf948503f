// crates/mh_multiphase/src/error.rs

//! 相系统错误类型
//!
//! 配置类错误在构造阶段即失败；`ModelNotFound` 表示运行期查询了未配置的子模型，
//! 属于调用方一致性错误。局部消元中的奇异并不是错误，见 [`crate::system::EliminationReport`]。

use mh_foundation::MhError;
use thiserror::Error;

/// 相系统结果类型
pub type PhaseSystemResult<T> = Result<T, PhaseSystemError>;

/// 相系统错误
#[derive(Error, Debug)]
pub enum PhaseSystemError {
    /// 通用配置错误
    #[error("配置错误: {message}")]
    Configuration {
        /// 错误说明
        message: String,
    },

    /// 引用了不存在的相
    #[error("未知的相: {name}")]
    UnknownPhase {
        /// 相名
        name: String,
    },

    /// 相名重复
    #[error("相名重复: {name}")]
    DuplicatePhase {
        /// 相名
        name: String,
    },

    /// 同一类别中相对重复配置
    #[error("{category} 中相对 {pair} 重复配置")]
    DuplicatePair {
        /// 子模型类别
        category: &'static str,
        /// 相对描述
        pair: String,
    },

    /// 相对描述无法解析
    #[error("无法解析相对描述 '{spec}': 期望 'A in B' 或 'A and B'")]
    InvalidPairSpec {
        /// 原始描述
        spec: String,
    },

    /// 模型需要有序相对（需明确分散相）
    #[error("{category} 模型 '{model}' 需要有序相对 ('A in B')，实际为 {pair}")]
    RequiresOrderedPair {
        /// 子模型类别
        category: &'static str,
        /// 模型类型名
        model: &'static str,
        /// 相对描述
        pair: String,
    },

    /// 运行期查询未配置的子模型
    #[error("未找到相对 {pair} 的 {category} 模型")]
    ModelNotFound {
        /// 子模型类别
        category: &'static str,
        /// 相对描述
        pair: String,
    },

    /// JSON 解析错误
    #[error("配置解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    /// 基础层错误
    #[error(transparent)]
    Foundation(#[from] MhError),
}

impl PhaseSystemError {
    /// 配置错误
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// 未知相
    pub fn unknown_phase(name: impl Into<String>) -> Self {
        Self::UnknownPhase { name: name.into() }
    }

    /// 是否为构造期配置错误
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. }
                | Self::UnknownPhase { .. }
                | Self::DuplicatePhase { .. }
                | Self::DuplicatePair { .. }
                | Self::InvalidPairSpec { .. }
                | Self::RequiresOrderedPair { .. }
                | Self::Parse(_)
                | Self::Foundation(MhError::OutOfRange { .. } | MhError::Config { .. })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PhaseSystemError::ModelNotFound {
            category: "drag",
            pair: "(gas and solid)".into(),
        };
        assert!(err.to_string().contains("gas and solid"));
        assert!(!err.is_configuration());
        assert!(PhaseSystemError::unknown_phase("oil").is_configuration());
    }

    #[test]
    fn test_from_foundation() {
        let err: PhaseSystemError = MhError::config("bad").into();
        assert!(matches!(err, PhaseSystemError::Foundation(_)));
        assert!(err.is_configuration());

        let err: PhaseSystemError = MhError::out_of_range("alpha", 1.5, 0.0, 1.0).into();
        assert!(err.is_configuration());

        let err: PhaseSystemError = MhError::not_found("rAU.gas").into();
        assert!(!err.is_configuration());
    }
}
