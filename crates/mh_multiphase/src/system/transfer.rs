// crates/mh_multiphase/src/system/transfer.rs

//! 相间传递装配
//!
//! 每次求解前由外层求解器调用，结果用后即弃。
//!
//! - 动量：运动相速度方程；局部消元禁用时曳力以 `Sp(K)` 与 `K·U_j` 进入矩阵
//! - 传热：非等温相温度方程，`H·(T_j − T_i)`
//! - 传质：各相连续方程的显式源 `±dmdt`
//!
//! 曳力的显式辅助量（`af_fs`、`kd_u_by_as` 等）均为正贡献，由调用方加到相应方程；
//! 局部消元启用时曳力由消元处理，这些量为零场。

use super::{PhaseSystem, DMDT_DIMENSIONS};
use crate::error::{PhaseSystemError, PhaseSystemResult};
use crate::field::{
    add_field, fill_fields, interpolate, FvScalarMatrix, FvVectorMatrix, PhaseFieldList,
    PhaseFieldTable, SurfaceScalarField, VolScalarField, VolVectorField,
};
use crate::models::drag::DRAG_COEFFICIENT_DIMENSIONS;
use crate::models::heat_transfer::HEAT_TRANSFER_COEFFICIENT_DIMENSIONS;
use crate::models::MassTransfer;
use crate::pair::PhasePairKey;
use mh_foundation::{DimensionSet, MhError};

/// 相名 → 速度方程传递矩阵
pub type MomentumTransferTable = PhaseFieldTable<FvVectorMatrix>;

/// 相名 → 标量方程传递矩阵
pub type ScalarTransferTable = PhaseFieldTable<FvScalarMatrix>;

impl PhaseSystem {
    // ========================================================
    // 动量
    // ========================================================

    fn empty_momentum_table(&self) -> MomentumTransferTable {
        let dims = DRAG_COEFFICIENT_DIMENSIONS * DimensionSet::VELOCITY;
        self.phases
            .moving_phases()
            .map(|phase| {
                (
                    phase.name().to_string(),
                    FvVectorMatrix::new(phase.u().name(), dims, self.mesh()),
                )
            })
            .collect()
    }

    /// 单元算法的动量传递矩阵
    ///
    /// 局部消元禁用时包含曳力隐式项。
    pub fn momentum_transfer(&self) -> MomentumTransferTable {
        let mut eqns = self.empty_momentum_table();
        if self.elimination.enabled {
            return eqns;
        }

        for (p, q, k) in self.drag_couplings() {
            for (i, j) in [(p, q), (q, p)] {
                let phase = &self.phases[i];
                if let Some(eqn) = eqns.get_mut(phase.name()) {
                    eqn.add_sp(&k);
                    eqn.add_su_scaled(&k, self.phases[j].u());
                }
            }
        }
        eqns
    }

    /// 面算法的动量传递矩阵
    ///
    /// 曳力不进入矩阵，由 [`PhaseSystem::af_fs`] 等面量处理。
    pub fn momentum_transfer_f(&self) -> MomentumTransferTable {
        self.empty_momentum_table()
    }

    /// 面隐式曳力系数 Σ_j interpolate(K_ij)
    pub fn af_fs(&self) -> PhaseFieldList<SurfaceScalarField> {
        let mesh = self.mesh();
        let mut af_fs = PhaseFieldList::new(self.phases.len());

        if !self.elimination.enabled {
            for (p, q, k) in self.drag_couplings() {
                let k_f = interpolate(&k, mesh);
                for i in [p, q] {
                    let phase = &self.phases[i];
                    if phase.is_moving() {
                        add_field(phase, "AFf", k_f.clone(), &mut af_fs);
                    }
                }
            }
        }

        fill_fields(&self.phases, mesh, "AFf", DRAG_COEFFICIENT_DIMENSIONS, &mut af_fs);
        af_fs
    }

    /// 显式曳力速度 Σ_j rAU_i·K_ij·U_j
    pub fn kd_u_by_as(
        &self,
        raus: &PhaseFieldList<VolScalarField>,
    ) -> PhaseSystemResult<PhaseFieldList<VolVectorField>> {
        let mesh = self.mesh();
        let mut kd_u_by_as = PhaseFieldList::new(self.phases.len());

        if !self.elimination.enabled {
            for (p, q, k) in self.drag_couplings() {
                for (i, j) in [(p, q), (q, p)] {
                    let phase = &self.phases[i];
                    if self.phases[i].is_stationary() {
                        continue;
                    }
                    let rau = self.require_coefficient(raus, i, "rAU")?;
                    MhError::check_size("rAU", k.len(), rau.len())?;
                    let u_j = self.phases[j].u();
                    let values = (0..k.len()).map(|c| u_j[c] * (rau[c] * k[c])).collect();
                    let field = VolVectorField::from_values("KdUByA", DimensionSet::VELOCITY, values);
                    add_field(phase, "KdUByA", field, &mut kd_u_by_as);
                }
            }
        }

        fill_fields(&self.phases, mesh, "KdUByA", DimensionSet::VELOCITY, &mut kd_u_by_as);
        Ok(kd_u_by_as)
    }

    /// 显式曳力通量 Σ_j interpolate(rAU_i·K_ij)·φ_j
    pub fn phi_kd_phis(
        &self,
        raus: &PhaseFieldList<VolScalarField>,
    ) -> PhaseSystemResult<PhaseFieldList<SurfaceScalarField>> {
        let mesh = self.mesh();
        let mut phi_kd_phis = PhaseFieldList::new(self.phases.len());

        if !self.elimination.enabled {
            for (p, q, k) in self.drag_couplings() {
                for (i, j) in [(p, q), (q, p)] {
                    if self.phases[i].is_stationary() {
                        continue;
                    }
                    let rau = self.require_coefficient(raus, i, "rAU")?;
                    MhError::check_size("rAU", k.len(), rau.len())?;
                    let c_f = interpolate(&k.scaled_by(rau), mesh);
                    let field = self.phases[j]
                        .phi()
                        .scaled_by(&c_f)
                        .map("phiKdPhi", DimensionSet::VOLUMETRIC_FLUX, |v| v);
                    add_field(&self.phases[i], "phiKdPhi", field, &mut phi_kd_phis);
                }
            }
        }

        fill_fields(
            &self.phases,
            mesh,
            "phiKdPhi",
            DimensionSet::VOLUMETRIC_FLUX,
            &mut phi_kd_phis,
        );
        Ok(phi_kd_phis)
    }

    /// 面系数形式的显式曳力通量 Σ_j rAUf_i·interpolate(K_ij)·φ_j
    pub fn phi_kd_phifs(
        &self,
        raufs: &PhaseFieldList<SurfaceScalarField>,
    ) -> PhaseSystemResult<PhaseFieldList<SurfaceScalarField>> {
        let mesh = self.mesh();
        let mut phi_kd_phifs = PhaseFieldList::new(self.phases.len());

        if !self.elimination.enabled {
            for (p, q, k) in self.drag_couplings() {
                let k_f = interpolate(&k, mesh);
                for (i, j) in [(p, q), (q, p)] {
                    if self.phases[i].is_stationary() {
                        continue;
                    }
                    let rauf = self.require_coefficient(raufs, i, "rAUf")?;
                    MhError::check_size("rAUf", k_f.len(), rauf.len())?;
                    let phi_j = self.phases[j].phi();
                    let values = (0..k_f.len()).map(|f| rauf[f] * k_f[f] * phi_j[f]).collect();
                    let field = SurfaceScalarField::from_values(
                        "phiKdPhif",
                        DimensionSet::VOLUMETRIC_FLUX,
                        values,
                    );
                    add_field(&self.phases[i], "phiKdPhif", field, &mut phi_kd_phifs);
                }
            }
        }

        fill_fields(
            &self.phases,
            mesh,
            "phiKdPhif",
            DimensionSet::VOLUMETRIC_FLUX,
            &mut phi_kd_phifs,
        );
        Ok(phi_kd_phifs)
    }

    // ========================================================
    // 传热
    // ========================================================

    /// 非等温相温度方程的传热矩阵
    pub fn heat_transfer(&self) -> ScalarTransferTable {
        let dims = HEAT_TRANSFER_COEFFICIENT_DIMENSIONS * DimensionSet::TEMPERATURE;
        let mut eqns: ScalarTransferTable = self
            .phases
            .anisothermal_phases()
            .map(|phase| {
                (
                    phase.name().to_string(),
                    FvScalarMatrix::new(phase.temperature().name(), dims, self.mesh()),
                )
            })
            .collect();

        for (key, h) in &self.heat_transfer_coeffs {
            let Some(pair) = self.pairs.get(key) else {
                continue;
            };
            for (i, j) in [(pair.phase1(), pair.phase2()), (pair.phase2(), pair.phase1())] {
                if let Some(eqn) = eqns.get_mut(self.phases[i].name()) {
                    eqn.add_sp(h);
                    eqn.add_su_scaled(h, self.phases[j].temperature());
                }
            }
        }
        eqns
    }

    // ========================================================
    // 传质
    // ========================================================

    /// 各相连续方程的传质源
    ///
    /// 相对的第一相得到 `+dmdt`，第二相得到 `−dmdt`。
    pub fn mass_transfer(&self) -> ScalarTransferTable {
        let mut eqns: ScalarTransferTable = self
            .phases
            .iter()
            .map(|phase| {
                (
                    phase.name().to_string(),
                    FvScalarMatrix::new(phase.alpha().name(), DMDT_DIMENSIONS, self.mesh()),
                )
            })
            .collect();

        for (key, dmdt) in &self.dmdts {
            if let Some(eqn) = eqns.get_mut(key.first()) {
                eqn.add_su(dmdt);
            }
            if let Some(eqn) = eqns.get_mut(key.second()) {
                eqn.add_su(&dmdt.map(dmdt.name(), DMDT_DIMENSIONS, |v| -v));
            }
        }
        eqns
    }

    /// 相对的质量交换率，正值表示由 `key.second()` 流向 `key.first()`
    ///
    /// 未配置传质的相对返回零场。
    pub fn dmdt(&self, key: &PhasePairKey) -> VolScalarField {
        let name = format!("dmdt{}", key);
        match self.dmdts.get_key_value(&key.unordered_key()) {
            Some((stored, dmdt)) if stored.first() == key.first() => dmdt.clone().named(name),
            Some((_, dmdt)) => dmdt.map(name, DMDT_DIMENSIONS, |v| -v),
            None => VolScalarField::zeros(name, DMDT_DIMENSIONS, self.mesh()),
        }
    }

    /// 各相净质量交换率
    pub fn dmdts(&self) -> PhaseFieldList<VolScalarField> {
        let mut dmdts = PhaseFieldList::new(self.phases.len());
        for (key, dmdt) in &self.dmdts {
            let (Ok(p1), Ok(p2)) = (self.phases.by_name(key.first()), self.phases.by_name(key.second()))
            else {
                continue;
            };
            add_field(p1, "dmdt", dmdt.clone(), &mut dmdts);
            add_field(p2, "dmdt", dmdt.map("dmdt", DMDT_DIMENSIONS, |v| -v), &mut dmdts);
        }
        fill_fields(&self.phases, self.mesh(), "dmdt", DMDT_DIMENSIONS, &mut dmdts);
        dmdts
    }

    /// 设置相对的质量交换率（符号相对 `key.first()`）
    ///
    /// 只能设置已配置传质模型的相对。
    pub fn set_dmdt(&mut self, key: &PhasePairKey, dmdt: VolScalarField) -> PhaseSystemResult<()> {
        MhError::check_size("dmdt", self.mesh.n_cells(), dmdt.len())?;
        let (stored, _) = self
            .dmdts
            .get_key_value(&key.unordered_key())
            .ok_or_else(|| PhaseSystemError::ModelNotFound {
                category: "mass_transfer",
                pair: key.to_string(),
            })?;
        let stored = stored.clone();
        let name = format!("dmdt{}", stored);
        let value = if stored.first() == key.first() {
            dmdt.map(name, DMDT_DIMENSIONS, |v| v)
        } else {
            dmdt.map(name, DMDT_DIMENSIONS, |v| -v)
        };
        log::debug!("设置 {} 的传质率, max |dmdt| = {:.4e}", stored, value.max_mag());
        self.dmdts.insert(stored, value);
        Ok(())
    }

    /// 传质系数
    pub fn mass_transfer_coefficient(&self, key: &PhasePairKey) -> PhaseSystemResult<VolScalarField> {
        let model = self.lookup_sub_model::<MassTransfer>(key)?;
        Ok(model.k(&self.pair_view(key)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::LineMesh;
    use serde_json::json;
    use std::sync::Arc;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol * b.abs().max(1.0)
    }

    fn system(elimination: bool) -> PhaseSystem {
        let config = json!({
            "phases": [
                { "name": "gas", "rho": 1.0, "alpha": 0.5, "velocity": [1.0, 0.0, 0.0],
                  "anisothermal": true, "temperature": 350.0 },
                { "name": "liquid", "rho": 1000.0, "alpha": 0.5, "anisothermal": true },
                { "name": "bed", "rho": 2500.0, "alpha": 0.0, "moving": false }
            ],
            "drag": [
                { "pair": "gas and liquid", "type": "constant_coefficient", "coefficient": 8.0 }
            ],
            "heat_transfer": [
                { "pair": "gas and liquid", "type": "constant_coefficient", "coefficient": 4.0 }
            ],
            "mass_transfer": [
                { "pair": "liquid and gas", "type": "constant_coefficient", "coefficient": 0.1 }
            ],
            "blending": { "default": { "type": "none", "continuous_phase": "liquid" } },
            "elimination": { "enabled": elimination }
        });
        PhaseSystem::from_json_str(Arc::new(LineMesh::unit(4)), &config.to_string()).unwrap()
    }

    fn raus(sys: &PhaseSystem, value: f64) -> PhaseFieldList<VolScalarField> {
        let mut list = PhaseFieldList::new(sys.phases().len());
        for phase in sys.phases().moving_phases() {
            list.set(
                phase.index(),
                VolScalarField::uniform("rAU", DRAG_COEFFICIENT_DIMENSIONS.inv(), sys.mesh(), value),
            );
        }
        list
    }

    #[test]
    fn test_momentum_transfer_drag_only_without_elimination() {
        let sys = system(true);
        let eqns = sys.momentum_transfer();
        assert_eq!(eqns.len(), 2);
        assert!(eqns["gas"].diag().iter().all(|&d| d == 0.0));

        let sys = system(false);
        let eqns = sys.momentum_transfer();
        assert!(!eqns.contains_key("bed"));
        // K = 8 × 0.25
        assert!(approx_eq(eqns["gas"].diag()[0], 2.0, 1e-12));
        assert!(approx_eq(eqns["liquid"].source()[0].x, 2.0, 1e-12));
        assert_eq!(eqns["gas"].source()[0].x, 0.0);

        let f_eqns = sys.momentum_transfer_f();
        assert!(f_eqns["gas"].diag().iter().all(|&d| d == 0.0));
    }

    #[test]
    fn test_explicit_drag_fields() {
        let sys = system(false);
        let af = sys.af_fs();
        assert_eq!(af.n_set(), 3);
        let gas = sys.phases().index_of("gas").unwrap();
        let bed = sys.phases().index_of("bed").unwrap();
        assert!(approx_eq(af.get(gas).unwrap()[2], 2.0, 1e-12));
        assert_eq!(af.get(bed).unwrap().max_mag(), 0.0);
        assert_eq!(af.get(bed).unwrap().name(), "AFf.bed");

        let raus = raus(&sys, 0.5);
        let liquid = sys.phases().index_of("liquid").unwrap();
        let kd_u = sys.kd_u_by_as(&raus).unwrap();
        assert!(approx_eq(kd_u.get(liquid).unwrap()[1].x, 0.5 * 2.0 * 1.0, 1e-12));
        assert_eq!(kd_u.get(gas).unwrap()[1].x, 0.0);

        let phi_kd = sys.phi_kd_phis(&raus).unwrap();
        // 内部面 φ_gas = 1
        assert!(approx_eq(phi_kd.get(liquid).unwrap()[2], 1.0, 1e-12));

        let mut raufs = PhaseFieldList::new(3);
        for phase in sys.phases().moving_phases() {
            raufs.set(phase.index(), interpolate(raus.get(phase.index()).unwrap(), sys.mesh()));
        }
        let phi_kd_f = sys.phi_kd_phifs(&raufs).unwrap();
        assert!(approx_eq(phi_kd_f.get(liquid).unwrap()[2], phi_kd.get(liquid).unwrap()[2], 1e-12));
    }

    #[test]
    fn test_explicit_drag_fields_zero_with_elimination() {
        let sys = system(true);
        let raus = raus(&sys, 0.5);
        let kd_u = sys.kd_u_by_as(&raus).unwrap();
        assert_eq!(kd_u.n_set(), 3);
        assert!(kd_u.iter().all(|(_, f)| f.max_mag() == 0.0));
        assert!(sys.af_fs().iter().all(|(_, f)| f.max_mag() == 0.0));
    }

    #[test]
    fn test_missing_rau_is_error() {
        let sys = system(false);
        let empty = PhaseFieldList::new(3);
        assert!(sys.kd_u_by_as(&empty).is_err());
    }

    #[test]
    fn test_heat_transfer_is_antisymmetric() {
        let sys = system(true);
        let eqns = sys.heat_transfer();
        let gas = sys.phase("gas").unwrap();
        let liquid = sys.phase("liquid").unwrap();
        let s_gas = eqns["gas"].evaluate(gas.temperature()).unwrap();
        let s_liquid = eqns["liquid"].evaluate(liquid.temperature()).unwrap();
        // H = 4 × 0.25, ΔT = 50
        assert!(approx_eq(s_gas[0], -50.0, 1e-12));
        for c in 0..4 {
            assert!((s_gas[c] + s_liquid[c]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_dmdt_sign_and_balance() {
        let mut sys = system(true);
        let key = PhasePairKey::unordered("liquid", "gas");
        assert_eq!(sys.dmdt(&key).max_mag(), 0.0);

        let evaporation = VolScalarField::uniform("dmdt", DMDT_DIMENSIONS, sys.mesh(), 0.3);
        sys.set_dmdt(&PhasePairKey::ordered("gas", "liquid"), evaporation).unwrap();

        assert!(approx_eq(sys.dmdt(&PhasePairKey::unordered("gas", "liquid"))[0], 0.3, 1e-14));
        assert!(approx_eq(sys.dmdt(&key)[0], -0.3, 1e-14));

        let dmdts = sys.dmdts();
        let total: f64 = dmdts.iter().map(|(_, f)| f[2]).sum();
        assert!(total.abs() < 1e-14);

        let eqns = sys.mass_transfer();
        assert!(approx_eq(eqns["gas"].source()[0], 0.3, 1e-14));
        assert!(approx_eq(eqns["liquid"].source()[0], -0.3, 1e-14));
        assert_eq!(eqns["bed"].source()[0], 0.0);
    }

    #[test]
    fn test_set_dmdt_on_unconfigured_pair_fails() {
        let mut sys = system(true);
        let field = VolScalarField::zeros("dmdt", DMDT_DIMENSIONS, sys.mesh());
        assert!(matches!(
            sys.set_dmdt(&PhasePairKey::unordered("gas", "bed"), field),
            Err(PhaseSystemError::ModelNotFound { .. })
        ));
    }

    #[test]
    fn test_mass_transfer_coefficient() {
        let sys = system(true);
        let k = sys
            .mass_transfer_coefficient(&PhasePairKey::unordered("gas", "liquid"))
            .unwrap();
        assert!(k.min() > 0.0);
        assert!(sys
            .mass_transfer_coefficient(&PhasePairKey::unordered("gas", "bed"))
            .is_err());
    }
}
