// crates/mh_multiphase/src/models/blended.rs

//! 流型混合子模型
//!
//! 一个无序相对 (phase1, phase2) 至多持有三个变体：
//!
//! - `model`: 无序（分层/过渡区）模型
//! - `model1_in2`: phase1 分散于 phase2
//! - `model2_in1`: phase2 分散于 phase1
//!
//! 求值：`m·(1 − f1 − f2) + m12·f1 + m21·f2`。只有对应变体存在时才计算 f1/f2，
//! 缺失变体的贡献为零。

use super::BlendingMethod;
use crate::field::VolScalarField;
use crate::pair::{PairView, PhasePairKey};
use crate::phase::PhaseModelList;
use glam::DVec3;
use mh_foundation::{DimensionSet, PhaseIndex};
use std::sync::Arc;

/// 混合子模型
#[derive(Debug)]
pub struct BlendedInterfacialModel<M: ?Sized> {
    key: PhasePairKey,
    phase1: PhaseIndex,
    phase2: PhaseIndex,
    model: Option<Arc<M>>,
    model1_in2: Option<Arc<M>>,
    model2_in1: Option<Arc<M>>,
    blending: Arc<dyn BlendingMethod>,
}

impl<M: ?Sized> BlendedInterfacialModel<M> {
    /// 创建混合模型
    ///
    /// `key` 为无序键，`phase1`/`phase2` 与键中名称顺序一致。
    pub fn new(
        key: PhasePairKey,
        phase1: PhaseIndex,
        phase2: PhaseIndex,
        model: Option<Arc<M>>,
        model1_in2: Option<Arc<M>>,
        model2_in1: Option<Arc<M>>,
        blending: Arc<dyn BlendingMethod>,
    ) -> Self {
        Self {
            key,
            phase1,
            phase2,
            model,
            model1_in2,
            model2_in1,
            blending,
        }
    }

    /// 无序键
    pub fn key(&self) -> &PhasePairKey {
        &self.key
    }

    /// 混合方法
    pub fn blending(&self) -> &dyn BlendingMethod {
        self.blending.as_ref()
    }

    /// 是否存在以 `dispersed` 为分散相的模型
    pub fn has_model_dispersed_in(&self, dispersed: PhaseIndex) -> bool {
        if dispersed == self.phase1 {
            self.model1_in2.is_some()
        } else if dispersed == self.phase2 {
            self.model2_in1.is_some()
        } else {
            false
        }
    }

    /// 已配置的变体数
    pub fn n_variants(&self) -> usize {
        [&self.model, &self.model1_in2, &self.model2_in1]
            .iter()
            .filter(|m| m.is_some())
            .count()
    }

    /// 按当前体积分数求值
    ///
    /// `eval` 在给定相对视图上求值单个变体。
    pub fn evaluate(
        &self,
        phases: &PhaseModelList,
        gravity: DVec3,
        dimensions: DimensionSet,
        eval: impl Fn(&M, &PairView<'_>) -> VolScalarField,
    ) -> VolScalarField {
        let p1 = &phases[self.phase1];
        let p2 = &phases[self.phase2];
        let n = p1.alpha().len();
        let mut result = vec![0.0; n];

        let f1 = self.model1_in2.as_ref().map(|_| self.blending.f1(p1, p2));
        let f2 = self.model2_in1.as_ref().map(|_| self.blending.f2(p1, p2));

        if let Some(m) = &self.model {
            let x = eval(m.as_ref(), &PairView::new(p1, p2, false, gravity));
            for (i, r) in result.iter_mut().enumerate() {
                let w1 = f1.as_ref().map_or(0.0, |f| f[i]);
                let w2 = f2.as_ref().map_or(0.0, |f| f[i]);
                *r += x[i] * (1.0 - w1 - w2);
            }
        }
        if let (Some(m), Some(f)) = (&self.model1_in2, &f1) {
            let x = eval(m.as_ref(), &PairView::new(p1, p2, true, gravity));
            for (i, r) in result.iter_mut().enumerate() {
                *r += x[i] * f[i];
            }
        }
        if let (Some(m), Some(f)) = (&self.model2_in1, &f2) {
            let x = eval(m.as_ref(), &PairView::new(p2, p1, true, gravity));
            for (i, r) in result.iter_mut().enumerate() {
                *r += x[i] * f[i];
            }
        }

        VolScalarField::from_values(format!("blended{}", self.key), dimensions, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhaseConfig;
    use crate::mesh::LineMesh;
    use crate::models::blending::{LinearBlending, NoBlending};
    use crate::models::drag::{ConstantCoefficientDrag, DragModel};
    use std::collections::BTreeMap;

    fn phases(alpha_gas: &[f64]) -> PhaseModelList {
        let mesh = LineMesh::unit(alpha_gas.len());
        let mut list = PhaseModelList::from_config(
            &[
                PhaseConfig::new("gas", 1.0, 0.0),
                PhaseConfig::new("liquid", 1000.0, 0.0),
            ],
            &mesh,
        )
        .unwrap();
        for (i, &a) in alpha_gas.iter().enumerate() {
            list.by_name_mut("gas").unwrap().alpha_mut()[i] = a;
            list.by_name_mut("liquid").unwrap().alpha_mut()[i] = 1.0 - a;
        }
        list
    }

    fn drag(k: f64) -> Option<Arc<dyn DragModel>> {
        Some(Arc::new(ConstantCoefficientDrag { coefficient: k }))
    }

    #[test]
    fn test_pure_variants_at_weight_limits() {
        let list = phases(&[0.5]);
        let blended: BlendedInterfacialModel<dyn DragModel> = BlendedInterfacialModel::new(
            PhasePairKey::unordered("gas", "liquid"),
            PhaseIndex::new(0),
            PhaseIndex::new(1),
            drag(1.0),
            drag(10.0),
            drag(100.0),
            Arc::new(NoBlending {
                continuous_phase: "liquid".into(),
            }),
        );
        assert_eq!(blended.n_variants(), 3);

        // f1 = 1, f2 = 0: 只取 gas-in-liquid
        let k = blended.evaluate(&list, DVec3::ZERO, DimensionSet::DIMLESS, |m, p| m.k(p));
        assert!((k[0] - 10.0 * 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_missing_dispersed_variant_uses_segregated_model() {
        let list = phases(&[0.5]);
        let blended: BlendedInterfacialModel<dyn DragModel> = BlendedInterfacialModel::new(
            PhasePairKey::unordered("gas", "liquid"),
            PhaseIndex::new(0),
            PhaseIndex::new(1),
            drag(4.0),
            None,
            None,
            Arc::new(NoBlending {
                continuous_phase: "liquid".into(),
            }),
        );
        let k = blended.evaluate(&list, DVec3::ZERO, DimensionSet::DIMLESS, |m, p| m.k(p));
        assert!((k[0] - 1.0).abs() < 1e-12);
        assert!(!blended.has_model_dispersed_in(PhaseIndex::new(0)));
    }

    #[test]
    fn test_linear_blend_is_monotonic() {
        let alphas: Vec<f64> = (0..11).map(|i| i as f64 / 10.0).collect();
        let list = phases(&alphas);
        let fully: BTreeMap<String, f64> = [("gas".to_string(), 0.7), ("liquid".to_string(), 0.7)].into();
        let partly: BTreeMap<String, f64> = [("gas".to_string(), 0.3), ("liquid".to_string(), 0.3)].into();
        let blended: BlendedInterfacialModel<dyn DragModel> = BlendedInterfacialModel::new(
            PhasePairKey::unordered("gas", "liquid"),
            PhaseIndex::new(0),
            PhaseIndex::new(1),
            drag(1.0),
            drag(5.0),
            None,
            Arc::new(LinearBlending::new(fully, partly).unwrap()),
        );

        // 除以 α1α2 得到纯系数混合
        let k = blended.evaluate(&list, DVec3::ZERO, DimensionSet::DIMLESS, |m, p| m.k(p));
        let coeffs: Vec<f64> = (1..10)
            .map(|i| k[i] / (alphas[i] * (1.0 - alphas[i])))
            .collect();
        // 气相分数增大，液相连续性减弱，系数从 5 单调降至 1
        assert!((coeffs[0] - 5.0).abs() < 1e-9);
        assert!((coeffs[8] - 1.0).abs() < 1e-9);
        for w in coeffs.windows(2) {
            assert!(w[1] <= w[0] + 1e-12);
        }
    }
}
