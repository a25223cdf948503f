// crates/mh_multiphase/src/phase/mod.rs

//! 相模型
//!
//! 每个相持有自己的体积分数、速度、密度、温度和面通量场，以及常物性参数。
//! 相对与子模型只借用相，不持有。

mod list;

pub use list::PhaseModelList;

use crate::config::PhaseConfig;
use crate::field::{flux, SurfaceScalarField, VolScalarField, VolVectorField};
use crate::mesh::FvMesh;
use glam::DVec3;
use mh_foundation::{DimensionSet, PhaseIndex};

/// 单相模型
#[derive(Debug, Clone)]
pub struct PhaseModel {
    name: String,
    index: PhaseIndex,

    moving: bool,
    anisothermal: bool,
    multi_component: bool,

    // 常物性
    mu: f64,
    d: f64,
    cp: f64,
    kappa: f64,
    residual_alpha: f64,

    // 场
    alpha: VolScalarField,
    u: VolVectorField,
    rho: VolScalarField,
    phi: SurfaceScalarField,
    t: VolScalarField,
}

impl PhaseModel {
    /// 由配置创建
    ///
    /// 静止相的速度和通量恒为零。
    pub fn from_config(index: PhaseIndex, config: &PhaseConfig, mesh: &dyn FvMesh) -> Self {
        let name = config.name.as_str();
        let velocity = if config.moving {
            DVec3::from_array(config.velocity)
        } else {
            DVec3::ZERO
        };

        let u = VolVectorField::uniform(format!("U.{}", name), DimensionSet::VELOCITY, mesh, velocity);
        let phi = flux(&u, mesh).named(format!("phi.{}", name));

        Self {
            name: config.name.clone(),
            index,
            moving: config.moving,
            anisothermal: config.anisothermal,
            multi_component: config.multi_component,
            mu: config.mu,
            d: config.d,
            cp: config.cp,
            kappa: config.kappa,
            residual_alpha: config.residual_alpha,
            alpha: VolScalarField::uniform(
                format!("alpha.{}", name),
                DimensionSet::DIMLESS,
                mesh,
                config.alpha,
            ),
            u,
            rho: VolScalarField::uniform(format!("rho.{}", name), DimensionSet::DENSITY, mesh, config.rho),
            phi,
            t: VolScalarField::uniform(
                format!("T.{}", name),
                DimensionSet::TEMPERATURE,
                mesh,
                config.temperature,
            ),
        }
    }

    // ========== 标识 ==========

    /// 相名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 相序号
    pub fn index(&self) -> PhaseIndex {
        self.index
    }

    /// 是否运动
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// 是否静止
    pub fn is_stationary(&self) -> bool {
        !self.moving
    }

    /// 是否求解温度
    pub fn is_anisothermal(&self) -> bool {
        self.anisothermal
    }

    /// 是否多组分
    pub fn is_multi_component(&self) -> bool {
        self.multi_component
    }

    // ========== 物性 ==========

    /// 动力粘度 [Pa·s]
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// 粒径 [m]
    pub fn d(&self) -> f64 {
        self.d
    }

    /// 比热容 [J/kg/K]
    pub fn cp(&self) -> f64 {
        self.cp
    }

    /// 导热系数 [W/m/K]
    pub fn kappa(&self) -> f64 {
        self.kappa
    }

    /// 残余体积分数
    pub fn residual_alpha(&self) -> f64 {
        self.residual_alpha
    }

    /// 运动粘度场 ν = μ/ρ
    pub fn nu(&self) -> VolScalarField {
        let mu = self.mu;
        self.rho.map(
            format!("nu.{}", self.name),
            DimensionSet::AREA / DimensionSet::TIME,
            |rho| mu / rho,
        )
    }

    // ========== 场 ==========

    /// 体积分数
    pub fn alpha(&self) -> &VolScalarField {
        &self.alpha
    }

    /// 可变体积分数
    pub fn alpha_mut(&mut self) -> &mut VolScalarField {
        &mut self.alpha
    }

    /// 速度
    pub fn u(&self) -> &VolVectorField {
        &self.u
    }

    /// 可变速度
    pub fn u_mut(&mut self) -> &mut VolVectorField {
        &mut self.u
    }

    /// 密度
    pub fn rho(&self) -> &VolScalarField {
        &self.rho
    }

    /// 可变密度
    pub fn rho_mut(&mut self) -> &mut VolScalarField {
        &mut self.rho
    }

    /// 面体积通量
    pub fn phi(&self) -> &SurfaceScalarField {
        &self.phi
    }

    /// 可变面体积通量
    pub fn phi_mut(&mut self) -> &mut SurfaceScalarField {
        &mut self.phi
    }

    /// 温度
    pub fn temperature(&self) -> &VolScalarField {
        &self.t
    }

    /// 可变温度
    pub fn temperature_mut(&mut self) -> &mut VolScalarField {
        &mut self.t
    }

    /// 由速度重算面通量；静止相置零
    pub fn correct_kinematics(&mut self, mesh: &dyn FvMesh) {
        if self.moving {
            self.phi = flux(&self.u, mesh).named(format!("phi.{}", self.name));
        } else {
            self.u.fill(DVec3::ZERO);
            self.phi.fill(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::LineMesh;

    #[test]
    fn test_from_config() {
        let mesh = LineMesh::unit(3);
        let mut cfg = PhaseConfig::new("water", 1000.0, 0.7);
        cfg.velocity = [1.0, 0.0, 0.0];
        let phase = PhaseModel::from_config(PhaseIndex::new(1), &cfg, &mesh);

        assert_eq!(phase.name(), "water");
        assert_eq!(phase.index().get(), 1);
        assert_eq!(phase.alpha().name(), "alpha.water");
        assert!((phase.alpha()[2] - 0.7).abs() < 1e-14);
        assert!((phase.phi()[1] - 1.0).abs() < 1e-14);
        assert!((phase.nu()[0] - 1e-6).abs() < 1e-18);
    }

    #[test]
    fn test_stationary_phase_has_no_velocity() {
        let mesh = LineMesh::unit(2);
        let mut cfg = PhaseConfig::new("bed", 2500.0, 0.5);
        cfg.moving = false;
        cfg.velocity = [3.0, 0.0, 0.0];
        let mut phase = PhaseModel::from_config(PhaseIndex::new(0), &cfg, &mesh);

        assert!(phase.is_stationary());
        assert_eq!(phase.u()[0], DVec3::ZERO);

        phase.u_mut()[0] = DVec3::X;
        phase.correct_kinematics(&mesh);
        assert_eq!(phase.u()[0], DVec3::ZERO);
        assert_eq!(phase.phi().max_mag(), 0.0);
    }
}
