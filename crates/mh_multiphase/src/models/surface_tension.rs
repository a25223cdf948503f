// crates/mh_multiphase/src/models/surface_tension.rs

//! 表面张力模型

use super::{ModelSpec, SurfaceTension};
use crate::config::SurfaceTensionModelConfig;
use crate::field::VolScalarField;
use crate::pair::PairView;
use mh_foundation::DimensionSet;
use std::fmt::Debug;
use std::sync::Arc;

/// 表面张力模型 trait
pub trait SurfaceTensionModel: Send + Sync + Debug {
    /// 模型类型名
    fn type_name(&self) -> &'static str;

    /// 表面张力系数 σ [N/m]
    fn sigma(&self, pair: &PairView<'_>) -> VolScalarField;
}

/// 常数表面张力
#[derive(Debug, Clone, Copy)]
pub struct ConstantSurfaceTension {
    /// σ [N/m]
    pub sigma: f64,
}

impl SurfaceTensionModel for ConstantSurfaceTension {
    fn type_name(&self) -> &'static str {
        "constant"
    }

    fn sigma(&self, pair: &PairView<'_>) -> VolScalarField {
        let sigma = self.sigma;
        pair.phase1().alpha().map(
            format!("sigma{}", pair.name()),
            DimensionSet::SURFACE_TENSION,
            |_| sigma,
        )
    }
}

impl ModelSpec for SurfaceTensionModelConfig {
    type Category = SurfaceTension;

    fn type_name(&self) -> &'static str {
        match self {
            Self::Constant { .. } => "constant",
        }
    }

    fn requires_ordered(&self) -> bool {
        false
    }

    fn build(&self) -> Arc<dyn SurfaceTensionModel> {
        match *self {
            Self::Constant { sigma } => Arc::new(ConstantSurfaceTension { sigma }),
        }
    }
}
