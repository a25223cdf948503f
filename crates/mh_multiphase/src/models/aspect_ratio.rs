// crates/mh_multiphase/src/models/aspect_ratio.rs

//! 气泡长宽比模型
//!
//! 长宽比 E 为短轴与长轴之比，球形时 E = 1。

use super::{AspectRatio, ModelSpec};
use crate::config::AspectRatioModelConfig;
use crate::field::VolScalarField;
use crate::pair::PairView;
use mh_foundation::DimensionSet;
use std::fmt::Debug;
use std::sync::Arc;

/// 长宽比模型 trait
pub trait AspectRatioModel: Send + Sync + Debug {
    /// 模型类型名
    fn type_name(&self) -> &'static str;

    /// 长宽比 E，`sigma` 为该相对的表面张力
    fn e(&self, pair: &PairView<'_>, sigma: &VolScalarField) -> VolScalarField;
}

/// 常数长宽比
#[derive(Debug, Clone, Copy)]
pub struct ConstantAspectRatio {
    /// E0
    pub e0: f64,
}

impl AspectRatioModel for ConstantAspectRatio {
    fn type_name(&self) -> &'static str {
        "constant"
    }

    fn e(&self, pair: &PairView<'_>, _sigma: &VolScalarField) -> VolScalarField {
        let e0 = self.e0;
        pair.phase1()
            .alpha()
            .map(format!("E{}", pair.name()), DimensionSet::DIMLESS, |_| e0)
    }
}

/// Wellek et al. (1966): E = 1 / (1 + 0.163·Eo^0.757)
#[derive(Debug, Clone, Copy, Default)]
pub struct Wellek;

impl AspectRatioModel for Wellek {
    fn type_name(&self) -> &'static str {
        "wellek"
    }

    fn e(&self, pair: &PairView<'_>, sigma: &VolScalarField) -> VolScalarField {
        pair.eo(sigma).map(format!("E{}", pair.name()), DimensionSet::DIMLESS, |eo| {
            1.0 / (1.0 + 0.163 * eo.powf(0.757))
        })
    }
}

impl ModelSpec for AspectRatioModelConfig {
    type Category = AspectRatio;

    fn type_name(&self) -> &'static str {
        match self {
            Self::Constant { .. } => "constant",
            Self::Wellek => "wellek",
        }
    }

    fn requires_ordered(&self) -> bool {
        matches!(self, Self::Wellek)
    }

    fn build(&self) -> Arc<dyn AspectRatioModel> {
        match *self {
            Self::Constant { e0 } => Arc::new(ConstantAspectRatio { e0 }),
            Self::Wellek => Arc::new(Wellek),
        }
    }
}
