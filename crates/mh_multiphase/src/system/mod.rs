// crates/mh_multiphase/src/system/mod.rs

//! 相系统
//!
//! [`PhaseSystem`] 持有相注册表、相对表、各类别子模型和混合方法，
//! 对外提供：
//!
//! - 子模型查询：按相对键，或按 (分散相, 连续相) 名称
//! - 相间传递矩阵装配（见 `transfer`）
//! - 曳力局部消元（见 `elimination`）
//!
//! # 调用顺序
//!
//! 构造时一次性生成相对与子模型；每个外层迭代调用 [`PhaseSystem::correct`]
//! 刷新混合系数，再由压力-速度耦合循环反复调用传递与消元接口。
//! 所有修改操作都取 `&mut self`，查询期间不可能修改注册表。

mod elimination;
mod factory;
mod transfer;

pub use elimination::{solve_local, EliminationReport};
pub use transfer::{MomentumTransferTable, ScalarTransferTable};

use crate::config::{EliminationConfig, PhaseSystemConfig};
use crate::error::{PhaseSystemError, PhaseSystemResult};
use crate::field::{interpolate, SurfaceScalarField, VolScalarField, VolVectorField};
use crate::mesh::FvMesh;
use crate::models::blending::build_blending_method;
use crate::models::{
    AspectRatio, BlendedCategory, BlendedInterfacialModel, BlendingMethod, Drag, HeatTransfer,
    MassTransfer, SubModelCategory, SubModels, SurfaceTension,
};
use crate::pair::{PairView, PhasePairKey, PhasePairTable};
use crate::phase::{PhaseModel, PhaseModelList};
use glam::DVec3;
use mh_foundation::DimensionSet;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 相间质量交换率量纲 [kg/m³/s]
pub const DMDT_DIMENSIONS: DimensionSet = DimensionSet::new([1, -3, -1, 0, 0, 0, 0]);

/// 相系统
pub struct PhaseSystem {
    mesh: Arc<dyn FvMesh>,
    phases: PhaseModelList,
    pairs: PhasePairTable,
    gravity: DVec3,

    /// 混合体积通量
    phi: SurfaceScalarField,

    blending_methods: HashMap<String, Arc<dyn BlendingMethod>>,
    models: SubModels,

    /// 混合曳力系数（无序键）
    kds: HashMap<PhasePairKey, VolScalarField>,
    /// 混合换热系数（无序键）
    heat_transfer_coeffs: HashMap<PhasePairKey, VolScalarField>,
    /// 质量交换率（无序键，正值表示由键的第二相流向第一相）
    dmdts: HashMap<PhasePairKey, VolScalarField>,

    elimination: EliminationConfig,
}

impl fmt::Debug for PhaseSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseSystem")
            .field("n_cells", &self.mesh.n_cells())
            .field("phases", &self.phases.names())
            .field("pairs", &self.pairs.iter().map(|p| p.name()).collect::<Vec<_>>())
            .field("elimination", &self.elimination)
            .finish_non_exhaustive()
    }
}

impl PhaseSystem {
    // ========================================================
    // 构造
    // ========================================================

    /// 由配置构造相系统
    pub fn new(mesh: Arc<dyn FvMesh>, config: &PhaseSystemConfig) -> PhaseSystemResult<Self> {
        config.validate()?;
        let phases = PhaseModelList::from_config(&config.phases, mesh.as_ref())?;

        let mut blending_methods = HashMap::with_capacity(config.blending.len());
        for (name, method) in &config.blending {
            for phase in method.referenced_phases() {
                if !phases.contains(phase) {
                    return Err(PhaseSystemError::unknown_phase(phase));
                }
            }
            blending_methods.insert(name.clone(), build_blending_method(method)?);
        }

        let phi = SurfaceScalarField::zeros("phi", DimensionSet::VOLUMETRIC_FLUX, mesh.as_ref());

        let mut system = Self {
            mesh,
            phases,
            pairs: PhasePairTable::new(),
            gravity: DVec3::from_array(config.gravity),
            phi,
            blending_methods,
            models: SubModels::default(),
            kds: HashMap::new(),
            heat_transfer_coeffs: HashMap::new(),
            dmdts: HashMap::new(),
            elimination: config.elimination,
        };

        system.generate_pairs_and_sub_models(&config.drag)?;
        system.generate_pairs_and_sub_models(&config.heat_transfer)?;
        system.generate_pairs_and_sub_models(&config.mass_transfer)?;
        system.generate_pairs_and_sub_models(&config.surface_tension)?;
        system.generate_pairs_and_sub_models(&config.aspect_ratio)?;

        system.generate_blended_models::<Drag>()?;
        system.generate_blended_models::<HeatTransfer>()?;

        let dmdt_keys: Vec<PhasePairKey> = system
            .models
            .table::<MassTransfer>()
            .keys()
            .map(|k| system.canonical_unordered_key(k))
            .collect();
        for key in dmdt_keys {
            let field = VolScalarField::zeros(format!("dmdt{}", key), DMDT_DIMENSIONS, system.mesh.as_ref());
            system.dmdts.entry(key).or_insert(field);
        }

        system.correct();

        log::info!(
            "相系统: {} 相 ({} 运动), {} 相对, 曳力 {} / 传热 {} / 传质 {} / 表面张力 {} / 长宽比 {}",
            system.phases.len(),
            system.phases.moving().len(),
            system.pairs.len(),
            system.models.count::<Drag>(),
            system.models.count::<HeatTransfer>(),
            system.models.count::<MassTransfer>(),
            system.models.count::<SurfaceTension>(),
            system.models.count::<AspectRatio>(),
        );
        Ok(system)
    }

    /// 从 JSON 字符串构造
    pub fn from_json_str(mesh: Arc<dyn FvMesh>, json: &str) -> PhaseSystemResult<Self> {
        let config = PhaseSystemConfig::from_json_str(json)?;
        Self::new(mesh, &config)
    }

    // ========================================================
    // 访问器
    // ========================================================

    /// 网格
    pub fn mesh(&self) -> &dyn FvMesh {
        self.mesh.as_ref()
    }

    /// 相注册表
    pub fn phases(&self) -> &PhaseModelList {
        &self.phases
    }

    /// 可变相注册表
    pub fn phases_mut(&mut self) -> &mut PhaseModelList {
        &mut self.phases
    }

    /// 按名称获取相
    pub fn phase(&self, name: &str) -> PhaseSystemResult<&PhaseModel> {
        self.phases.by_name(name)
    }

    /// 相对表
    pub fn phase_pairs(&self) -> &PhasePairTable {
        &self.pairs
    }

    /// 重力
    pub fn gravity(&self) -> DVec3 {
        self.gravity
    }

    /// 局部消元配置
    pub fn elimination(&self) -> &EliminationConfig {
        &self.elimination
    }

    /// 子模型表
    pub fn sub_models(&self) -> &SubModels {
        &self.models
    }

    /// 混合方法
    pub fn blending_method(&self, name: &str) -> Option<&dyn BlendingMethod> {
        self.blending_methods.get(name).map(|m| m.as_ref())
    }

    /// 相对的混合曳力系数
    pub fn kd(&self, key: &PhasePairKey) -> Option<&VolScalarField> {
        self.kds.get(&key.unordered_key())
    }

    /// 相对的混合换热系数
    pub fn heat_transfer_coefficient(&self, key: &PhasePairKey) -> Option<&VolScalarField> {
        self.heat_transfer_coeffs.get(&key.unordered_key())
    }

    // ========================================================
    // 子模型查询
    // ========================================================

    /// 是否存在该相对的子模型，不产生副作用
    pub fn found_sub_model<C: SubModelCategory>(&self, key: &PhasePairKey) -> bool {
        C::table(&self.models).contains_key(key)
    }

    /// 查询子模型，未配置时返回 `ModelNotFound`
    pub fn lookup_sub_model<C: SubModelCategory>(&self, key: &PhasePairKey) -> PhaseSystemResult<&C::Model> {
        C::table(&self.models)
            .get(key)
            .map(|m| m.as_ref())
            .ok_or_else(|| PhaseSystemError::ModelNotFound {
                category: C::NAME,
                pair: key.to_string(),
            })
    }

    /// 按 (分散相, 连续相) 查找：先有序键，再无序键
    pub fn found_sub_model_between<C: SubModelCategory>(&self, dispersed: &str, continuous: &str) -> bool {
        self.resolve_key::<C>(dispersed, continuous).is_some()
    }

    /// 按 (分散相, 连续相) 查询子模型
    pub fn lookup_sub_model_between<C: SubModelCategory>(
        &self,
        dispersed: &str,
        continuous: &str,
    ) -> PhaseSystemResult<&C::Model> {
        match self.resolve_key::<C>(dispersed, continuous) {
            Some(key) => self.lookup_sub_model::<C>(&key),
            None => Err(PhaseSystemError::ModelNotFound {
                category: C::NAME,
                pair: PhasePairKey::ordered(dispersed, continuous).to_string(),
            }),
        }
    }

    fn resolve_key<C: SubModelCategory>(&self, dispersed: &str, continuous: &str) -> Option<PhasePairKey> {
        let ordered = PhasePairKey::ordered(dispersed, continuous);
        if self.found_sub_model::<C>(&ordered) {
            return Some(ordered);
        }
        let unordered = PhasePairKey::unordered(dispersed, continuous);
        self.found_sub_model::<C>(&unordered).then_some(unordered)
    }

    /// 是否存在混合子模型（按无序键）
    pub fn found_blended_sub_model<C: BlendedCategory>(&self, key: &PhasePairKey) -> bool {
        C::blended_table(&self.models).contains_key(&key.unordered_key())
    }

    /// 查询混合子模型
    pub fn lookup_blended_sub_model<C: BlendedCategory>(
        &self,
        key: &PhasePairKey,
    ) -> PhaseSystemResult<&BlendedInterfacialModel<C::Model>> {
        C::blended_table(&self.models)
            .get(&key.unordered_key())
            .ok_or_else(|| PhaseSystemError::ModelNotFound {
                category: C::NAME,
                pair: key.unordered_key().to_string(),
            })
    }

    /// 按当前体积分数求值混合子模型
    pub fn evaluate_blended<C: BlendedCategory>(&self, key: &PhasePairKey) -> PhaseSystemResult<VolScalarField> {
        let model = self.lookup_blended_sub_model::<C>(key)?;
        Ok(model.evaluate(&self.phases, self.gravity, C::DIMENSIONS, |m, pair| {
            C::evaluate(m, pair)
        }))
    }

    /// 由键构造求值视图
    pub fn pair_view(&self, key: &PhasePairKey) -> PhaseSystemResult<PairView<'_>> {
        let p1 = self.phases.by_name(key.first())?;
        let p2 = self.phases.by_name(key.second())?;
        Ok(PairView::new(p1, p2, key.is_ordered(), self.gravity))
    }

    // ========================================================
    // 混合物性
    // ========================================================

    /// 混合密度 Σ α_i ρ_i
    pub fn rho(&self) -> VolScalarField {
        let mut rho = VolScalarField::zeros("rho", DimensionSet::DENSITY, self.mesh());
        for phase in self.phases.iter() {
            rho += &phase.rho().mul_field(phase.alpha()).named("rho");
        }
        rho
    }

    /// 混合速度 Σ α_i U_i
    pub fn u(&self) -> VolVectorField {
        let mut u = VolVectorField::zeros("U", DimensionSet::VELOCITY, self.mesh());
        for phase in self.phases.moving_phases() {
            u += &phase.u().scaled_by(phase.alpha()).named("U");
        }
        u
    }

    /// 混合体积通量
    pub fn phi(&self) -> &SurfaceScalarField {
        &self.phi
    }

    /// 计算混合体积通量 Σ α_f,i φ_i
    pub fn calc_phi(&self) -> SurfaceScalarField {
        let mesh = self.mesh();
        let mut phi = SurfaceScalarField::zeros("phi", DimensionSet::VOLUMETRIC_FLUX, mesh);
        for phase in self.phases.moving_phases() {
            let alpha_f = interpolate(phase.alpha(), mesh);
            phi += &phase.phi().scaled_by(&alpha_f).named("phi");
        }
        phi
    }

    /// 表面张力系数，未建模时为零
    pub fn sigma(&self, key: &PhasePairKey) -> PhaseSystemResult<VolScalarField> {
        let table = SurfaceTension::table(&self.models);
        let model = table.get(key).or_else(|| table.get(&key.unordered_key()));
        let view = self.pair_view(key)?;
        Ok(match model {
            Some(m) => m.sigma(&view),
            None => VolScalarField::zeros(
                format!("sigma{}", key),
                DimensionSet::SURFACE_TENSION,
                self.mesh(),
            ),
        })
    }

    /// 长宽比，未建模时为 1
    pub fn e(&self, key: &PhasePairKey) -> PhaseSystemResult<VolScalarField> {
        let view = self.pair_view(key)?;
        let table = AspectRatio::table(&self.models);
        match table.get(key).or_else(|| table.get(&key.unordered_key())) {
            Some(m) => Ok(m.e(&view, &self.sigma(key)?)),
            None => Ok(VolScalarField::uniform(
                format!("E{}", key),
                DimensionSet::DIMLESS,
                self.mesh(),
                1.0,
            )),
        }
    }

    // ========================================================
    // 修正
    // ========================================================

    /// 按当前相场重算混合系数与混合通量
    pub fn correct(&mut self) {
        self.kds = self.evaluate_blended_table::<Drag>();
        self.heat_transfer_coeffs = self.evaluate_blended_table::<HeatTransfer>();
        self.phi = self.calc_phi();
    }

    /// 由各相速度重算通量
    pub fn correct_kinematics(&mut self) {
        let mesh = Arc::clone(&self.mesh);
        for phase in self.phases.iter_mut() {
            phase.correct_kinematics(mesh.as_ref());
        }
        self.phi = self.calc_phi();
    }

    fn evaluate_blended_table<C: BlendedCategory>(&self) -> HashMap<PhasePairKey, VolScalarField> {
        C::blended_table(&self.models)
            .iter()
            .map(|(key, model)| {
                let k = model.evaluate(&self.phases, self.gravity, C::DIMENSIONS, |m, pair| {
                    C::evaluate(m, pair)
                });
                log::debug!("{} {}: max {:.4e}", C::NAME, key, k.max());
                (key.clone(), k.named(format!("{}{}", C::NAME, key)))
            })
            .collect()
    }

    /// 相对表中与 `key` 对应的无序键（保持相对表中的名称顺序）
    fn canonical_unordered_key(&self, key: &PhasePairKey) -> PhasePairKey {
        let unordered = key.unordered_key();
        self.pairs
            .get(&unordered)
            .map(|p| p.key().clone())
            .unwrap_or(unordered)
    }
}
