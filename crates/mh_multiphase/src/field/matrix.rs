// crates/mh_multiphase/src/field/matrix.rs

//! 相间传递矩阵
//!
//! 每个单元上表示线性化源项 `S(ψ) = source − diag·ψ`：
//! `diag` 为隐式部分（进入线性系统对角），`source` 为显式部分。
//! 相间传递只产生单元内耦合，没有非对角项。

use super::{FieldValue, VolField, VolScalarField};
use crate::mesh::FvMesh;
use glam::DVec3;
use mh_foundation::{DimensionSet, MhError, MhResult};
use std::ops::AddAssign;

/// 对角型有限体积矩阵
#[derive(Debug, Clone, PartialEq)]
pub struct FvMatrix<T> {
    psi_name: String,
    dimensions: DimensionSet,
    diag: Vec<f64>,
    source: Vec<T>,
}

/// 标量方程矩阵（温度、质量）
pub type FvScalarMatrix = FvMatrix<f64>;
/// 矢量方程矩阵（速度）
pub type FvVectorMatrix = FvMatrix<DVec3>;

impl<T: FieldValue> FvMatrix<T> {
    /// 创建空矩阵
    ///
    /// `dimensions` 为源项 `S` 的量纲。
    pub fn new(psi_name: impl Into<String>, dimensions: DimensionSet, mesh: &dyn FvMesh) -> Self {
        let n = mesh.n_cells();
        Self {
            psi_name: psi_name.into(),
            dimensions,
            diag: vec![0.0; n],
            source: vec![T::ZERO; n],
        }
    }

    /// 求解变量名
    pub fn psi_name(&self) -> &str {
        &self.psi_name
    }

    /// 源项量纲
    pub fn dimensions(&self) -> DimensionSet {
        self.dimensions
    }

    /// 单元数
    pub fn n_cells(&self) -> usize {
        self.diag.len()
    }

    /// 隐式系数
    pub fn diag(&self) -> &[f64] {
        &self.diag
    }

    /// 显式源
    pub fn source(&self) -> &[T] {
        &self.source
    }

    /// 隐式汇项 `−coeff·ψ`
    pub fn add_sp(&mut self, coeff: &VolScalarField) {
        for (d, &c) in self.diag.iter_mut().zip(coeff.iter()) {
            *d += c;
        }
    }

    /// 显式源项
    pub fn add_su(&mut self, su: &VolField<T>) {
        for (s, &v) in self.source.iter_mut().zip(su.iter()) {
            *s += v;
        }
    }

    /// 显式源项 `coeff·value`
    pub fn add_su_scaled(&mut self, coeff: &VolScalarField, value: &VolField<T>) {
        for ((s, &k), &v) in self.source.iter_mut().zip(coeff.iter()).zip(value.iter()) {
            *s += v * k;
        }
    }

    /// 在给定 ψ 上求值 `S(ψ)`
    pub fn evaluate(&self, psi: &VolField<T>) -> MhResult<VolField<T>> {
        MhError::check_size("psi", self.n_cells(), psi.len())?;
        let values = self
            .source
            .iter()
            .zip(self.diag.iter())
            .zip(psi.iter())
            .map(|((&s, &d), &p)| s - p * d)
            .collect();
        Ok(VolField::from_values(
            format!("S({})", self.psi_name),
            self.dimensions,
            values,
        ))
    }

    /// 各单元贡献之和（体积加权）
    pub fn integrate(&self, psi: &VolField<T>, mesh: &dyn FvMesh) -> MhResult<T> {
        let s = self.evaluate(psi)?;
        Ok(s
            .iter()
            .enumerate()
            .fold(T::ZERO, |acc, (cell, &v)| acc + v * mesh.cell_volume(cell)))
    }
}

impl<T: FieldValue> AddAssign<&FvMatrix<T>> for FvMatrix<T> {
    fn add_assign(&mut self, rhs: &FvMatrix<T>) {
        debug_assert_eq!(self.psi_name, rhs.psi_name);
        for (a, &b) in self.diag.iter_mut().zip(rhs.diag.iter()) {
            *a += b;
        }
        for (a, &b) in self.source.iter_mut().zip(rhs.source.iter()) {
            *a += b;
        }
    }
}
