// crates/mh_multiphase/src/field/table.rs

//! 按相索引的稀疏场集合
//!
//! - [`PhaseFieldList`]: 按相序号索引，允许空位
//! - [`PhaseFieldTable`]: 按相名索引
//!
//! 相间传递只对存在子模型的相对产生贡献，装配结果天然稀疏。
//! [`fill_fields`] 为缺失的相补齐零场，使下游遍历全部相时无需特判。
//! 新建场命名为 `name.phase`。

use super::GeoField;
use crate::mesh::FvMesh;
use crate::phase::{PhaseModel, PhaseModelList};
use mh_foundation::{DimensionSet, PhaseIndex};
use std::collections::HashMap;

/// 按相名索引的场表
pub type PhaseFieldTable<F> = HashMap<String, F>;

/// 按相序号索引的稀疏场列表
#[derive(Debug, Clone)]
pub struct PhaseFieldList<F> {
    slots: Vec<Option<F>>,
}

impl<F> PhaseFieldList<F> {
    /// 创建 n 个空位的列表
    pub fn new(n_phases: usize) -> Self {
        Self {
            slots: (0..n_phases).map(|_| None).collect(),
        }
    }

    /// 槽位数
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// 是否无槽位
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// 该相是否已有场
    pub fn is_set(&self, phase: PhaseIndex) -> bool {
        matches!(self.slots.get(phase.get()), Some(Some(_)))
    }

    /// 已填充的槽位数
    pub fn n_set(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// 获取场
    pub fn get(&self, phase: PhaseIndex) -> Option<&F> {
        self.slots.get(phase.get()).and_then(|s| s.as_ref())
    }

    /// 获取可变场
    pub fn get_mut(&mut self, phase: PhaseIndex) -> Option<&mut F> {
        self.slots.get_mut(phase.get()).and_then(|s| s.as_mut())
    }

    /// 设置场，返回原有场
    pub fn set(&mut self, phase: PhaseIndex, field: F) -> Option<F> {
        let i = phase.get();
        if i >= self.slots.len() {
            self.slots.resize_with(i + 1, || None);
        }
        self.slots[i].replace(field)
    }

    /// 遍历已填充的 (相序号, 场)
    pub fn iter(&self) -> impl Iterator<Item = (PhaseIndex, &F)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|f| (PhaseIndex::new(i), f)))
    }

    /// 转为稠密列表（丢弃空位）
    ///
    /// 在 [`fill_fields`] 之后调用时长度等于相数。
    pub fn into_dense(self) -> Vec<F> {
        self.slots.into_iter().flatten().collect()
    }

    fn ensure_len(&mut self, n: usize) {
        if self.slots.len() < n {
            self.slots.resize_with(n, || None);
        }
    }
}

/// 为相名生成分组场名
pub fn group_name(name: &str, phase: &str) -> String {
    format!("{}.{}", name, phase)
}

/// 将场累加进列表，相应位置为空时以 `name.phase` 为名插入
pub fn add_field<F: GeoField>(phase: &PhaseModel, name: &str, field: F, list: &mut PhaseFieldList<F>) {
    match list.get_mut(phase.index()) {
        Some(existing) => existing.accumulate(&field),
        None => {
            list.set(phase.index(), field.with_name(&group_name(name, phase.name())));
        }
    }
}

/// 为列表中缺失的相补齐零场
///
/// 已有场保持不变；重复调用无副作用。
pub fn fill_fields<F: GeoField>(
    phases: &PhaseModelList,
    mesh: &dyn FvMesh,
    name: &str,
    dimensions: DimensionSet,
    list: &mut PhaseFieldList<F>,
) {
    list.ensure_len(phases.len());
    for phase in phases.iter() {
        if !list.is_set(phase.index()) {
            list.set(
                phase.index(),
                F::zeroed(&group_name(name, phase.name()), dimensions, mesh),
            );
        }
    }
}

/// 为表中缺失的相补齐零场
pub fn fill_field_table<F: GeoField>(
    phases: &PhaseModelList,
    mesh: &dyn FvMesh,
    name: &str,
    dimensions: DimensionSet,
    table: &mut PhaseFieldTable<F>,
) {
    for phase in phases.iter() {
        if !table.contains_key(phase.name()) {
            table.insert(
                phase.name().to_string(),
                F::zeroed(&group_name(name, phase.name()), dimensions, mesh),
            );
        }
    }
}
