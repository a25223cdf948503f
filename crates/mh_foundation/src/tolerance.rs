// crates/mh_foundation/src/tolerance.rs

//! 数值容差配置
//!
//! 相间耦合求解中使用的阈值，统一通过参数注入，不使用全局状态。

use crate::ensure;
use crate::error::{MhError, MhResult};
use serde::{Deserialize, Serialize};

/// 相间耦合容差
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CouplingTolerance {
    /// 体积分数不超过该值的相视为当地不存在，其相间耦合置零
    #[serde(default = "default_alpha_threshold")]
    pub alpha_threshold: f64,
    /// 局部消元主元绝对值下限，低于该值视为奇异
    #[serde(default = "default_pivot_tolerance")]
    pub pivot_tolerance: f64,
}

fn default_alpha_threshold() -> f64 {
    1e-8
}

fn default_pivot_tolerance() -> f64 {
    1e-12
}

impl Default for CouplingTolerance {
    fn default() -> Self {
        Self {
            alpha_threshold: default_alpha_threshold(),
            pivot_tolerance: default_pivot_tolerance(),
        }
    }
}

impl CouplingTolerance {
    /// 校验阈值
    ///
    /// 两个阈值都必须位于 (0, 1]。
    pub fn validate(&self) -> MhResult<()> {
        ensure!(
            self.alpha_threshold > 0.0 && self.alpha_threshold <= 1.0,
            MhError::out_of_range("alpha_threshold", self.alpha_threshold, f64::MIN_POSITIVE, 1.0)
        );
        ensure!(
            self.pivot_tolerance > 0.0 && self.pivot_tolerance <= 1.0,
            MhError::out_of_range("pivot_tolerance", self.pivot_tolerance, f64::MIN_POSITIVE, 1.0)
        );
        Ok(())
    }

    /// 判断体积分数是否视为当地存在
    #[inline]
    pub fn is_present(&self, alpha: f64) -> bool {
        alpha > self.alpha_threshold
    }

    /// 判断主元是否可用
    #[inline]
    pub fn is_pivot_valid(&self, pivot: f64) -> bool {
        pivot.is_finite() && pivot.abs() >= self.pivot_tolerance
    }
}
