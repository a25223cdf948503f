// crates/mh_multiphase/src/models/heat_transfer.rs

//! 传热模型
//!
//! 给出体积换热系数 H [W/m³/K]，相 i 的换热源为 `H·(T_j − T_i)`。
//! 分散相模型 `H = 6·max(α_d, α_res)·κ_c·Nu/d²`。

use super::{alpha_product, dispersed_alpha, HeatTransfer, ModelSpec};
use crate::config::HeatTransferModelConfig;
use crate::field::VolScalarField;
use crate::pair::PairView;
use mh_foundation::DimensionSet;
use std::fmt::Debug;
use std::sync::Arc;

/// 体积换热系数量纲 [W/m³/K]
pub const HEAT_TRANSFER_COEFFICIENT_DIMENSIONS: DimensionSet =
    DimensionSet::new([1, -1, -3, -1, 0, 0, 0]);

/// 传热模型 trait
pub trait HeatTransferModel: Send + Sync + Debug {
    /// 模型类型名
    fn type_name(&self) -> &'static str;

    /// 体积换热系数 H
    fn k(&self, pair: &PairView<'_>) -> VolScalarField;
}

/// 6·α_d·κ_c·Nu/d²
fn nusselt_k(pair: &PairView<'_>, nu: impl Fn(usize) -> f64) -> VolScalarField {
    let alpha_d = dispersed_alpha(pair);
    let kappa = pair.continuous().kappa();
    let d = pair.dispersed().d();
    let values = (0..alpha_d.len())
        .map(|i| 6.0 * alpha_d[i] * kappa * nu(i) / (d * d))
        .collect();
    VolScalarField::from_values(
        format!("H{}", pair.name()),
        HEAT_TRANSFER_COEFFICIENT_DIMENSIONS,
        values,
    )
}

/// 常系数 H = h·α1·α2
#[derive(Debug, Clone, Copy)]
pub struct ConstantCoefficientHeatTransfer {
    /// 系数 [W/m³/K]
    pub coefficient: f64,
}

impl HeatTransferModel for ConstantCoefficientHeatTransfer {
    fn type_name(&self) -> &'static str {
        "constant_coefficient"
    }

    fn k(&self, pair: &PairView<'_>) -> VolScalarField {
        let h = self.coefficient;
        alpha_product(pair).map(
            format!("H{}", pair.name()),
            HEAT_TRANSFER_COEFFICIENT_DIMENSIONS,
            |a| h * a,
        )
    }
}

/// Ranz-Marshall (1952): Nu = 2 + 0.6·Re^0.5·Pr^(1/3)
#[derive(Debug, Clone, Copy, Default)]
pub struct RanzMarshall;

impl HeatTransferModel for RanzMarshall {
    fn type_name(&self) -> &'static str {
        "ranz_marshall"
    }

    fn k(&self, pair: &PairView<'_>) -> VolScalarField {
        let re = pair.re();
        let pr = pair.pr();
        nusselt_k(pair, |i| 2.0 + 0.6 * re[i].sqrt() * pr[i].cbrt())
    }
}

/// 球形颗粒内部导热极限：Nu = 10，即 H = 60·α_d·κ_c/d²
#[derive(Debug, Clone, Copy, Default)]
pub struct SphericalHeatTransfer;

impl HeatTransferModel for SphericalHeatTransfer {
    fn type_name(&self) -> &'static str {
        "spherical"
    }

    fn k(&self, pair: &PairView<'_>) -> VolScalarField {
        nusselt_k(pair, |_| 10.0)
    }
}

impl ModelSpec for HeatTransferModelConfig {
    type Category = HeatTransfer;

    fn type_name(&self) -> &'static str {
        match self {
            Self::ConstantCoefficient { .. } => "constant_coefficient",
            Self::RanzMarshall => "ranz_marshall",
            Self::Spherical => "spherical",
        }
    }

    fn requires_ordered(&self) -> bool {
        !matches!(self, Self::ConstantCoefficient { .. })
    }

    fn build(&self) -> Arc<dyn HeatTransferModel> {
        match *self {
            Self::ConstantCoefficient { coefficient } => {
                Arc::new(ConstantCoefficientHeatTransfer { coefficient })
            }
            Self::RanzMarshall => Arc::new(RanzMarshall),
            Self::Spherical => Arc::new(SphericalHeatTransfer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhaseConfig;
    use crate::mesh::LineMesh;
    use crate::phase::PhaseModelList;
    use glam::DVec3;
    use mh_foundation::PhaseIndex;

    fn phases() -> PhaseModelList {
        let mesh = LineMesh::unit(1);
        let mut gas = PhaseConfig::new("gas", 1.0, 0.2);
        gas.d = 2e-3;
        let mut liquid = PhaseConfig::new("liquid", 1000.0, 0.8);
        liquid.kappa = 0.6;
        PhaseModelList::from_config(&[gas, liquid], &mesh).unwrap()
    }

    #[test]
    fn test_ranz_marshall_at_rest_is_conduction_limit() {
        // 无滑移时 Nu = 2
        let list = phases();
        let view = PairView::new(&list[PhaseIndex::new(0)], &list[PhaseIndex::new(1)], true, DVec3::ZERO);
        let h = RanzMarshall.k(&view);
        let expected = 6.0 * 0.2 * 0.6 * 2.0 / 4e-6;
        assert!((h[0] - expected).abs() < 1e-6 * expected);
    }

    #[test]
    fn test_spherical_is_five_times_stagnant_ranz_marshall() {
        let list = phases();
        let view = PairView::new(&list[PhaseIndex::new(0)], &list[PhaseIndex::new(1)], true, DVec3::ZERO);
        let ratio = SphericalHeatTransfer.k(&view)[0] / RanzMarshall.k(&view)[0];
        assert!((ratio - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_is_symmetric() {
        let list = phases();
        let a = PairView::new(&list[PhaseIndex::new(0)], &list[PhaseIndex::new(1)], false, DVec3::ZERO);
        let b = PairView::new(&list[PhaseIndex::new(1)], &list[PhaseIndex::new(0)], false, DVec3::ZERO);
        let model = ConstantCoefficientHeatTransfer { coefficient: 100.0 };
        assert_eq!(model.k(&a)[0], model.k(&b)[0]);
    }
}
