// crates/mh_multiphase/src/models/mass_transfer.rs

//! 传质模型
//!
//! 给出体积传质系数 K [1/s]。扩散系数由 Lewis 数类比得到：
//! `D = κ_c / (Cp_c·ρ_c·Le)`，分散相模型 `K = 6·max(α_d, α_res)·D·Sh/d²`。

use super::{alpha_product, dispersed_alpha, MassTransfer, ModelSpec};
use crate::config::MassTransferModelConfig;
use crate::field::VolScalarField;
use crate::pair::PairView;
use mh_foundation::DimensionSet;
use std::fmt::Debug;
use std::sync::Arc;

/// 体积传质系数量纲 [1/s]
pub const MASS_TRANSFER_COEFFICIENT_DIMENSIONS: DimensionSet =
    DimensionSet::new([0, 0, -1, 0, 0, 0, 0]);

/// 传质模型 trait
pub trait MassTransferModel: Send + Sync + Debug {
    /// 模型类型名
    fn type_name(&self) -> &'static str;

    /// 体积传质系数 K
    fn k(&self, pair: &PairView<'_>) -> VolScalarField;
}

/// 6·α_d·D·Sh/d²
fn sherwood_k(pair: &PairView<'_>, lewis: f64, sh: impl Fn(usize, f64) -> f64) -> VolScalarField {
    let alpha_d = dispersed_alpha(pair);
    let c = pair.continuous();
    let d = pair.dispersed().d();
    let values = (0..alpha_d.len())
        .map(|i| {
            let diffusivity = c.kappa() / (c.cp() * c.rho()[i] * lewis);
            6.0 * alpha_d[i] * diffusivity * sh(i, diffusivity) / (d * d)
        })
        .collect();
    VolScalarField::from_values(
        format!("Km{}", pair.name()),
        MASS_TRANSFER_COEFFICIENT_DIMENSIONS,
        values,
    )
}

/// 常系数 K = k·α1·α2
#[derive(Debug, Clone, Copy)]
pub struct ConstantCoefficientMassTransfer {
    /// 系数 [1/s]
    pub coefficient: f64,
}

impl MassTransferModel for ConstantCoefficientMassTransfer {
    fn type_name(&self) -> &'static str {
        "constant_coefficient"
    }

    fn k(&self, pair: &PairView<'_>) -> VolScalarField {
        let k = self.coefficient;
        alpha_product(pair).map(
            format!("Km{}", pair.name()),
            MASS_TRANSFER_COEFFICIENT_DIMENSIONS,
            |a| k * a,
        )
    }
}

/// Frössling (1938): Sh = 2 + 0.552·Re^0.5·Sc^(1/3)
#[derive(Debug, Clone, Copy)]
pub struct Frossling {
    /// Lewis 数
    pub lewis: f64,
}

impl MassTransferModel for Frossling {
    fn type_name(&self) -> &'static str {
        "frossling"
    }

    fn k(&self, pair: &PairView<'_>) -> VolScalarField {
        let re = pair.re();
        let nu = pair.continuous().nu();
        sherwood_k(pair, self.lewis, |i, diffusivity| {
            let sc = nu[i] / diffusivity;
            2.0 + 0.552 * re[i].sqrt() * sc.cbrt()
        })
    }
}

/// 球形颗粒扩散极限：Sh = 10
#[derive(Debug, Clone, Copy)]
pub struct SphericalMassTransfer {
    /// Lewis 数
    pub lewis: f64,
}

impl MassTransferModel for SphericalMassTransfer {
    fn type_name(&self) -> &'static str {
        "spherical"
    }

    fn k(&self, pair: &PairView<'_>) -> VolScalarField {
        sherwood_k(pair, self.lewis, |_, _| 10.0)
    }
}

impl ModelSpec for MassTransferModelConfig {
    type Category = MassTransfer;

    fn type_name(&self) -> &'static str {
        match self {
            Self::ConstantCoefficient { .. } => "constant_coefficient",
            Self::Frossling { .. } => "frossling",
            Self::Spherical { .. } => "spherical",
        }
    }

    fn requires_ordered(&self) -> bool {
        !matches!(self, Self::ConstantCoefficient { .. })
    }

    fn build(&self) -> Arc<dyn MassTransferModel> {
        match *self {
            Self::ConstantCoefficient { coefficient } => {
                Arc::new(ConstantCoefficientMassTransfer { coefficient })
            }
            Self::Frossling { lewis } => Arc::new(Frossling { lewis }),
            Self::Spherical { lewis } => Arc::new(SphericalMassTransfer { lewis }),
        }
    }
}
