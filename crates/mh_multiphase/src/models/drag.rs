// crates/mh_multiphase/src/models/drag.rs

//! 曳力模型
//!
//! 给出相间动量交换系数 K [kg/m³/s]，相 i 受力为 `K·(U_j − U_i)`。
//!
//! 分散相模型的统一形式：
//!
//! ```text
//! K = max(α_d, α_res) · 0.75 · CdRe · ρ_c · ν_c / d²
//! ```

use super::{alpha_product, dispersed_alpha, Drag, ModelSpec};
use crate::config::DragModelConfig;
use crate::field::VolScalarField;
use crate::pair::PairView;
use mh_foundation::DimensionSet;
use std::fmt::Debug;
use std::sync::Arc;

/// 曳力系数量纲
pub const DRAG_COEFFICIENT_DIMENSIONS: DimensionSet = DimensionSet::new([1, -3, -1, 0, 0, 0, 0]);

/// 曳力模型 trait
pub trait DragModel: Send + Sync + Debug {
    /// 模型类型名
    fn type_name(&self) -> &'static str;

    /// 动量交换系数 K
    fn k(&self, pair: &PairView<'_>) -> VolScalarField;
}

// ============================================================
// 常系数
// ============================================================

/// 常系数曳力 K = k·α1·α2
#[derive(Debug, Clone, Copy)]
pub struct ConstantCoefficientDrag {
    /// 系数 [kg/m³/s]
    pub coefficient: f64,
}

impl DragModel for ConstantCoefficientDrag {
    fn type_name(&self) -> &'static str {
        "constant_coefficient"
    }

    fn k(&self, pair: &PairView<'_>) -> VolScalarField {
        let k = self.coefficient;
        alpha_product(pair).map(format!("K{}", pair.name()), DRAG_COEFFICIENT_DIMENSIONS, |a| k * a)
    }
}

// ============================================================
// 分散相模型
// ============================================================

/// K = α_d · 0.75 · CdRe · ρ_c · ν_c / d²
fn dispersed_k(pair: &PairView<'_>, cd_re: &VolScalarField) -> VolScalarField {
    let alpha_d = dispersed_alpha(pair);
    let c = pair.continuous();
    let nu = c.nu();
    let d = pair.dispersed().d();

    let values = (0..cd_re.len())
        .map(|i| alpha_d[i] * 0.75 * cd_re[i] * c.rho()[i] * nu[i] / (d * d))
        .collect();
    VolScalarField::from_values(format!("K{}", pair.name()), DRAG_COEFFICIENT_DIMENSIONS, values)
}

/// 单颗粒 Cd·Re
#[inline]
fn single_particle_cd_re(re: f64) -> f64 {
    if re < 1000.0 {
        24.0 * (1.0 + 0.15 * re.powf(0.687))
    } else {
        0.44 * re
    }
}

/// Schiller-Naumann (1933)
///
/// ```text
/// CdRe = 24(1 + 0.15 Re^0.687)   Re < 1000
///      = 0.44 Re                  Re ≥ 1000
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SchillerNaumann {
    /// 雷诺数下限
    pub residual_re: f64,
}

impl SchillerNaumann {
    /// Cd·Re
    pub fn cd_re(&self, pair: &PairView<'_>) -> VolScalarField {
        let res = self.residual_re;
        pair.re()
            .map("CdRe", DimensionSet::DIMLESS, |re| single_particle_cd_re(re.max(res)))
    }
}

impl DragModel for SchillerNaumann {
    fn type_name(&self) -> &'static str {
        "schiller_naumann"
    }

    fn k(&self, pair: &PairView<'_>) -> VolScalarField {
        dispersed_k(pair, &self.cd_re(pair))
    }
}

/// Wen-Yu (1966) 颗粒群修正
///
/// 以连续相体积分数 α_c 修正雷诺数，并乘以 α_c^-3.65 空隙率函数。
#[derive(Debug, Clone, Copy)]
pub struct WenYu {
    /// 雷诺数下限
    pub residual_re: f64,
}

impl WenYu {
    /// Cd·Re
    pub fn cd_re(&self, pair: &PairView<'_>) -> VolScalarField {
        let res = self.residual_re;
        let c = pair.continuous();
        let d = pair.dispersed();
        let re = pair.re();

        let values = (0..re.len())
            .map(|i| {
                let alpha_c = (1.0 - d.alpha()[i]).max(c.residual_alpha());
                let res_re = (alpha_c * re[i]).max(res);
                single_particle_cd_re(res_re)
                    * alpha_c.powf(-3.65)
                    * c.alpha()[i].max(c.residual_alpha())
            })
            .collect();
        VolScalarField::from_values("CdRe", DimensionSet::DIMLESS, values)
    }
}

impl DragModel for WenYu {
    fn type_name(&self) -> &'static str {
        "wen_yu"
    }

    fn k(&self, pair: &PairView<'_>) -> VolScalarField {
        dispersed_k(pair, &self.cd_re(pair))
    }
}

// ============================================================
// 构造
// ============================================================

impl ModelSpec for DragModelConfig {
    type Category = Drag;

    fn type_name(&self) -> &'static str {
        match self {
            Self::ConstantCoefficient { .. } => "constant_coefficient",
            Self::SchillerNaumann { .. } => "schiller_naumann",
            Self::WenYu { .. } => "wen_yu",
        }
    }

    fn requires_ordered(&self) -> bool {
        !matches!(self, Self::ConstantCoefficient { .. })
    }

    fn build(&self) -> Arc<dyn DragModel> {
        match *self {
            Self::ConstantCoefficient { coefficient } => Arc::new(ConstantCoefficientDrag { coefficient }),
            Self::SchillerNaumann { residual_re } => Arc::new(SchillerNaumann { residual_re }),
            Self::WenYu { residual_re } => Arc::new(WenYu { residual_re }),
        }
    }
}
