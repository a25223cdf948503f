// crates/mh_multiphase/src/pair/mod.rs

//! 相对
//!
//! [`PhasePair`] 只记录键和两相序号；派生量（相对速度、雷诺数等）通过借用相注册表的
//! [`PairView`] 在查询时计算。所有相对缓存在 [`PhasePairTable`] 中，同一键只创建一次。

mod key;

pub use key::{fnv1a, make_key, PhasePairKey};

use crate::error::PhaseSystemResult;
use crate::field::{VolScalarField, VolVectorField};
use crate::phase::{PhaseModel, PhaseModelList};
use glam::DVec3;
use mh_foundation::{DimensionSet, PhaseIndex};
use std::collections::HashMap;

// ============================================================
// 相对
// ============================================================

/// 相对
///
/// 有序相对中 `phase1` 为分散相、`phase2` 为连续相；无序相对按键中名称顺序。
#[derive(Debug, Clone, PartialEq)]
pub struct PhasePair {
    key: PhasePairKey,
    phase1: PhaseIndex,
    phase2: PhaseIndex,
}

impl PhasePair {
    /// 由键创建，两相必须已注册
    pub fn new(key: PhasePairKey, phases: &PhaseModelList) -> PhaseSystemResult<Self> {
        let phase1 = phases.index_of(key.first())?;
        let phase2 = phases.index_of(key.second())?;
        Ok(Self { key, phase1, phase2 })
    }

    /// 键
    pub fn key(&self) -> &PhasePairKey {
        &self.key
    }

    /// 显示名
    pub fn name(&self) -> String {
        self.key.to_string()
    }

    /// 是否有序
    pub fn is_ordered(&self) -> bool {
        self.key.is_ordered()
    }

    /// 第一相
    pub fn phase1(&self) -> PhaseIndex {
        self.phase1
    }

    /// 第二相
    pub fn phase2(&self) -> PhaseIndex {
        self.phase2
    }

    /// 分散相（仅有序相对）
    pub fn dispersed(&self) -> Option<PhaseIndex> {
        self.is_ordered().then_some(self.phase1)
    }

    /// 连续相（仅有序相对）
    pub fn continuous(&self) -> Option<PhaseIndex> {
        self.is_ordered().then_some(self.phase2)
    }

    /// 另一相
    pub fn other(&self, phase: PhaseIndex) -> Option<PhaseIndex> {
        if phase == self.phase1 {
            Some(self.phase2)
        } else if phase == self.phase2 {
            Some(self.phase1)
        } else {
            None
        }
    }

    /// 借用相注册表构造求值视图
    pub fn view<'a>(&self, phases: &'a PhaseModelList, gravity: DVec3) -> PairView<'a> {
        PairView::new(&phases[self.phase1], &phases[self.phase2], self.is_ordered(), gravity)
    }
}

// ============================================================
// 相对表
// ============================================================

/// 相对缓存表（保持插入顺序）
#[derive(Debug, Clone, Default)]
pub struct PhasePairTable {
    pairs: Vec<PhasePair>,
    index: HashMap<PhasePairKey, usize>,
}

impl PhasePairTable {
    /// 空表
    pub fn new() -> Self {
        Self::default()
    }

    /// 相对数
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// 是否存在
    pub fn contains(&self, key: &PhasePairKey) -> bool {
        self.index.contains_key(key)
    }

    /// 查找
    pub fn get(&self, key: &PhasePairKey) -> Option<&PhasePair> {
        self.index.get(key).map(|&i| &self.pairs[i])
    }

    /// 获取或创建相对
    ///
    /// 创建有序相对时同时确保对应无序相对存在。返回 `true` 表示新建。
    pub fn get_or_insert(
        &mut self,
        key: &PhasePairKey,
        phases: &PhaseModelList,
    ) -> PhaseSystemResult<bool> {
        if self.contains(key) {
            return Ok(false);
        }
        let pair = PhasePair::new(key.clone(), phases)?;
        if key.is_ordered() {
            self.get_or_insert(&key.unordered_key(), phases)?;
        }
        log::debug!("创建相对 {}", key);
        self.index.insert(key.clone(), self.pairs.len());
        self.pairs.push(pair);
        Ok(true)
    }

    /// 遍历（插入顺序）
    pub fn iter(&self) -> std::slice::Iter<'_, PhasePair> {
        self.pairs.iter()
    }

    /// 遍历无序相对
    pub fn unordered(&self) -> impl Iterator<Item = &PhasePair> {
        self.pairs.iter().filter(|p| !p.is_ordered())
    }
}

// ============================================================
// 求值视图
// ============================================================

/// 相对求值视图
///
/// 有序相对中 `dispersed()` 为 phase1，`continuous()` 为 phase2。
/// 无序相对只应使用对称量（相对速度、相对密度）。
#[derive(Debug, Clone, Copy)]
pub struct PairView<'a> {
    phase1: &'a PhaseModel,
    phase2: &'a PhaseModel,
    ordered: bool,
    gravity: DVec3,
}

impl<'a> PairView<'a> {
    /// 创建视图
    pub fn new(phase1: &'a PhaseModel, phase2: &'a PhaseModel, ordered: bool, gravity: DVec3) -> Self {
        Self {
            phase1,
            phase2,
            ordered,
            gravity,
        }
    }

    /// 第一相
    pub fn phase1(&self) -> &'a PhaseModel {
        self.phase1
    }

    /// 第二相
    pub fn phase2(&self) -> &'a PhaseModel {
        self.phase2
    }

    /// 分散相
    pub fn dispersed(&self) -> &'a PhaseModel {
        self.phase1
    }

    /// 连续相
    pub fn continuous(&self) -> &'a PhaseModel {
        self.phase2
    }

    /// 是否有序
    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    /// 重力
    pub fn gravity(&self) -> DVec3 {
        self.gravity
    }

    /// 显示名
    pub fn name(&self) -> String {
        PhasePairKey::new(self.phase1.name(), self.phase2.name(), self.ordered).to_string()
    }

    /// 单元数
    pub fn n_cells(&self) -> usize {
        self.phase1.alpha().len()
    }

    /// 相对速度 U1 − U2
    pub fn ur(&self) -> VolVectorField {
        self.phase1.u().zip_map(
            self.phase2.u(),
            format!("Ur{}", self.name()),
            DimensionSet::VELOCITY,
            |a, b| a - b,
        )
    }

    /// 相对速度模
    pub fn mag_ur(&self) -> VolScalarField {
        self.phase1.u().zip_map(
            self.phase2.u(),
            format!("magUr{}", self.name()),
            DimensionSet::VELOCITY,
            |a, b| (a - b).length(),
        )
    }

    /// 体积分数加权密度 α1ρ1 + α2ρ2
    pub fn rho(&self) -> VolScalarField {
        let values = (0..self.n_cells())
            .map(|i| {
                self.phase1.alpha()[i] * self.phase1.rho()[i]
                    + self.phase2.alpha()[i] * self.phase2.rho()[i]
            })
            .collect();
        VolScalarField::from_values(format!("rho{}", self.name()), DimensionSet::DENSITY, values)
    }

    /// 颗粒雷诺数 |Ur|·d_d/ν_c
    pub fn re(&self) -> VolScalarField {
        let d = self.dispersed().d();
        let nu = self.continuous().nu();
        self.mag_ur()
            .zip_map(&nu, format!("Re{}", self.name()), DimensionSet::DIMLESS, |u, nu| {
                u * d / nu
            })
    }

    /// 连续相普朗特数 ν_c·Cp_c·ρ_c/κ_c
    pub fn pr(&self) -> VolScalarField {
        let c = self.continuous();
        let (mu, cp, kappa) = (c.mu(), c.cp(), c.kappa());
        c.rho()
            .map(format!("Pr{}", self.name()), DimensionSet::DIMLESS, |_| mu * cp / kappa)
    }

    /// Eötvös 数 |g|·|Δρ|·d_d²/σ
    pub fn eo(&self, sigma: &VolScalarField) -> VolScalarField {
        let g = self.gravity.length();
        let d = self.dispersed().d();
        let values = (0..self.n_cells())
            .map(|i| {
                let drho = (self.phase1.rho()[i] - self.phase2.rho()[i]).abs();
                g * drho * d * d / sigma[i]
            })
            .collect();
        VolScalarField::from_values(format!("Eo{}", self.name()), DimensionSet::DIMLESS, values)
    }
}
