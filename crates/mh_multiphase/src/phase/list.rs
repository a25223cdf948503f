// crates/mh_multiphase/src/phase/list.rs

//! 相注册表
//!
//! 完整相列表加四个派生子列表（运动、静止、变温、多组分）。
//! 子列表只保存相序号并保持原有相对顺序，通过主列表修改的场在子列表中同样可见。
//! 相组成在构造后固定，不支持删除。

use super::PhaseModel;
use crate::config::PhaseConfig;
use crate::error::{PhaseSystemError, PhaseSystemResult};
use crate::mesh::FvMesh;
use mh_foundation::PhaseIndex;
use std::collections::HashMap;

/// 相注册表
#[derive(Debug, Clone)]
pub struct PhaseModelList {
    phases: Vec<PhaseModel>,
    name_index: HashMap<String, PhaseIndex>,

    moving: Vec<PhaseIndex>,
    stationary: Vec<PhaseIndex>,
    anisothermal: Vec<PhaseIndex>,
    multi_component: Vec<PhaseIndex>,
}

impl PhaseModelList {
    /// 由相配置构建
    pub fn from_config(configs: &[PhaseConfig], mesh: &dyn FvMesh) -> PhaseSystemResult<Self> {
        let phases = configs
            .iter()
            .enumerate()
            .map(|(i, cfg)| PhaseModel::from_config(PhaseIndex::new(i), cfg, mesh))
            .collect();
        Self::new(phases)
    }

    /// 由相模型构建，相序号必须等于其位置
    pub fn new(phases: Vec<PhaseModel>) -> PhaseSystemResult<Self> {
        let mut name_index = HashMap::with_capacity(phases.len());
        for (i, phase) in phases.iter().enumerate() {
            if phase.index().get() != i {
                return Err(PhaseSystemError::configuration(format!(
                    "相 {} 的序号 {} 与位置 {} 不一致",
                    phase.name(),
                    phase.index(),
                    i
                )));
            }
            if name_index.insert(phase.name().to_string(), phase.index()).is_some() {
                return Err(PhaseSystemError::DuplicatePhase {
                    name: phase.name().to_string(),
                });
            }
        }

        let select = |pred: fn(&PhaseModel) -> bool| -> Vec<PhaseIndex> {
            phases.iter().filter(|p| pred(p)).map(|p| p.index()).collect()
        };
        let moving = select(PhaseModel::is_moving);
        let stationary = select(PhaseModel::is_stationary);
        let anisothermal = select(PhaseModel::is_anisothermal);
        let multi_component = select(PhaseModel::is_multi_component);

        Ok(Self {
            phases,
            name_index,
            moving,
            stationary,
            anisothermal,
            multi_component,
        })
    }

    /// 相数
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// 遍历全部相
    pub fn iter(&self) -> std::slice::Iter<'_, PhaseModel> {
        self.phases.iter()
    }

    /// 可变遍历全部相
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, PhaseModel> {
        self.phases.iter_mut()
    }

    /// 按序号获取
    pub fn get(&self, index: PhaseIndex) -> Option<&PhaseModel> {
        self.phases.get(index.get())
    }

    /// 按序号获取可变引用
    pub fn get_mut(&mut self, index: PhaseIndex) -> Option<&mut PhaseModel> {
        self.phases.get_mut(index.get())
    }

    /// 相名对应的序号
    pub fn index_of(&self, name: &str) -> PhaseSystemResult<PhaseIndex> {
        self.name_index
            .get(name)
            .copied()
            .ok_or_else(|| PhaseSystemError::unknown_phase(name))
    }

    /// 是否存在该相
    pub fn contains(&self, name: &str) -> bool {
        self.name_index.contains_key(name)
    }

    /// 按名称获取
    pub fn by_name(&self, name: &str) -> PhaseSystemResult<&PhaseModel> {
        let index = self.index_of(name)?;
        Ok(&self.phases[index.get()])
    }

    /// 按名称获取可变引用
    pub fn by_name_mut(&mut self, name: &str) -> PhaseSystemResult<&mut PhaseModel> {
        let index = self.index_of(name)?;
        Ok(&mut self.phases[index.get()])
    }

    /// 全部相名（保持顺序）
    pub fn names(&self) -> Vec<&str> {
        self.phases.iter().map(|p| p.name()).collect()
    }

    // ========== 子列表 ==========

    /// 运动相序号
    pub fn moving(&self) -> &[PhaseIndex] {
        &self.moving
    }

    /// 静止相序号
    pub fn stationary(&self) -> &[PhaseIndex] {
        &self.stationary
    }

    /// 变温相序号
    pub fn anisothermal(&self) -> &[PhaseIndex] {
        &self.anisothermal
    }

    /// 多组分相序号
    pub fn multi_component(&self) -> &[PhaseIndex] {
        &self.multi_component
    }

    /// 遍历运动相
    pub fn moving_phases(&self) -> impl Iterator<Item = &PhaseModel> {
        self.moving.iter().map(move |i| &self.phases[i.get()])
    }

    /// 遍历静止相
    pub fn stationary_phases(&self) -> impl Iterator<Item = &PhaseModel> {
        self.stationary.iter().map(move |i| &self.phases[i.get()])
    }

    /// 遍历变温相
    pub fn anisothermal_phases(&self) -> impl Iterator<Item = &PhaseModel> {
        self.anisothermal.iter().map(move |i| &self.phases[i.get()])
    }

    /// 遍历多组分相
    pub fn multi_component_phases(&self) -> impl Iterator<Item = &PhaseModel> {
        self.multi_component.iter().map(move |i| &self.phases[i.get()])
    }
}

impl std::ops::Index<PhaseIndex> for PhaseModelList {
    type Output = PhaseModel;

    fn index(&self, index: PhaseIndex) -> &PhaseModel {
        &self.phases[index.get()]
    }
}

impl std::ops::IndexMut<PhaseIndex> for PhaseModelList {
    fn index_mut(&mut self, index: PhaseIndex) -> &mut PhaseModel {
        &mut self.phases[index.get()]
    }
}
