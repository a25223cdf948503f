// crates/mh_multiphase/src/field/mod.rs

//! 几何场
//!
//! 相系统需要的最小场层：带名称和量纲的单元场 / 面场，逐元素运算，
//! 以及单元到面的线性插值。离散算子和边界条件由外部网格/场层提供。
//!
//! # 类型
//!
//! - [`GeometricField<T, L>`]: `T` 为取值类型（`f64` 或 `DVec3`），`L` 为存储位置
//! - [`VolScalarField`] / [`VolVectorField`]: 单元中心场
//! - [`SurfaceScalarField`]: 面场（通量、面系数）
//!
//! # 示例
//!
//! ```
//! use mh_foundation::DimensionSet;
//! use mh_multiphase::field::{interpolate, VolScalarField};
//! use mh_multiphase::mesh::LineMesh;
//!
//! let mesh = LineMesh::unit(4);
//! let alpha = VolScalarField::uniform("alpha.gas", DimensionSet::DIMLESS, &mesh, 0.25);
//! let alpha_f = interpolate(&alpha, &mesh);
//! assert_eq!(alpha_f.len(), 5);
//! assert!((alpha_f[2] - 0.25).abs() < 1e-14);
//! ```

pub mod matrix;
pub mod table;

pub use matrix::{FvMatrix, FvScalarMatrix, FvVectorMatrix};
pub use table::{add_field, fill_field_table, fill_fields, PhaseFieldList, PhaseFieldTable};

use crate::mesh::FvMesh;
use glam::DVec3;
use mh_foundation::{DimensionSet, MhError, MhResult};
use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

// ============================================================
// 取值类型
// ============================================================

/// 场取值能力：零元、加减和标量缩放
pub trait FieldValue:
    Copy
    + Debug
    + PartialEq
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
    + AddAssign
    + SubAssign
{
    /// 零值
    const ZERO: Self;

    /// 模
    fn mag(self) -> f64;

    /// 是否全部分量有限
    fn is_finite(self) -> bool;
}

impl FieldValue for f64 {
    const ZERO: Self = 0.0;

    #[inline]
    fn mag(self) -> f64 {
        self.abs()
    }

    #[inline]
    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}

impl FieldValue for DVec3 {
    const ZERO: Self = DVec3::ZERO;

    #[inline]
    fn mag(self) -> f64 {
        self.length()
    }

    #[inline]
    fn is_finite(self) -> bool {
        DVec3::is_finite(self)
    }
}

// ============================================================
// 存储位置
// ============================================================

/// 场存储位置
pub trait Location: Send + Sync + 'static {
    /// 位置名称（日志用）
    const NAME: &'static str;

    /// 给定网格下的场长度
    fn size(mesh: &dyn FvMesh) -> usize;
}

/// 单元中心
#[derive(Debug, Clone, Copy)]
pub struct CellLocation;

/// 面中心
#[derive(Debug, Clone, Copy)]
pub struct FaceLocation;

impl Location for CellLocation {
    const NAME: &'static str = "cell";

    fn size(mesh: &dyn FvMesh) -> usize {
        mesh.n_cells()
    }
}

impl Location for FaceLocation {
    const NAME: &'static str = "face";

    fn size(mesh: &dyn FvMesh) -> usize {
        mesh.n_faces()
    }
}

// ============================================================
// 几何场
// ============================================================

/// 带名称和量纲的几何场
#[derive(Debug)]
pub struct GeometricField<T, L> {
    name: String,
    dimensions: DimensionSet,
    values: Vec<T>,
    _location: PhantomData<L>,
}

/// 单元场
pub type VolField<T> = GeometricField<T, CellLocation>;
/// 面场
pub type SurfaceField<T> = GeometricField<T, FaceLocation>;
/// 单元标量场
pub type VolScalarField = VolField<f64>;
/// 单元矢量场
pub type VolVectorField = VolField<DVec3>;
/// 面标量场
pub type SurfaceScalarField = SurfaceField<f64>;

impl<T: Clone, L> Clone for GeometricField<T, L> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            dimensions: self.dimensions,
            values: self.values.clone(),
            _location: PhantomData,
        }
    }
}

impl<T: PartialEq, L> PartialEq for GeometricField<T, L> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.dimensions == other.dimensions && self.values == other.values
    }
}

impl<T: FieldValue, L: Location> GeometricField<T, L> {
    /// 由已有数据创建
    pub fn from_values(name: impl Into<String>, dimensions: DimensionSet, values: Vec<T>) -> Self {
        Self {
            name: name.into(),
            dimensions,
            values,
            _location: PhantomData,
        }
    }

    /// 创建均匀场
    pub fn uniform(
        name: impl Into<String>,
        dimensions: DimensionSet,
        mesh: &dyn FvMesh,
        value: T,
    ) -> Self {
        Self::from_values(name, dimensions, vec![value; L::size(mesh)])
    }

    /// 创建零场
    pub fn zeros(name: impl Into<String>, dimensions: DimensionSet, mesh: &dyn FvMesh) -> Self {
        Self::uniform(name, dimensions, mesh, T::ZERO)
    }

    /// 场名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 重命名（返回自身，便于链式构造）
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 量纲
    pub fn dimensions(&self) -> DimensionSet {
        self.dimensions
    }

    /// 场长度
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 只读数据
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    /// 可变数据
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// 迭代器
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }

    /// 全部取值设为 value
    pub fn fill(&mut self, value: T) {
        self.values.iter_mut().for_each(|v| *v = value);
    }

    /// 逐元素映射到新场
    pub fn map<U: FieldValue>(
        &self,
        name: impl Into<String>,
        dimensions: DimensionSet,
        f: impl Fn(T) -> U,
    ) -> GeometricField<U, L> {
        GeometricField::from_values(name, dimensions, self.values.iter().map(|&v| f(v)).collect())
    }

    /// 与另一场逐元素组合
    pub fn zip_map<U: FieldValue, V: FieldValue>(
        &self,
        other: &GeometricField<U, L>,
        name: impl Into<String>,
        dimensions: DimensionSet,
        f: impl Fn(T, U) -> V,
    ) -> GeometricField<V, L> {
        debug_assert_eq!(self.len(), other.len());
        GeometricField::from_values(
            name,
            dimensions,
            self.values
                .iter()
                .zip(other.values.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        )
    }

    /// 乘以标量场
    pub fn scaled_by(&self, s: &GeometricField<f64, L>) -> Self {
        self.zip_map(
            s,
            format!("({}*{})", s.name, self.name),
            s.dimensions * self.dimensions,
            |v, k| v * k,
        )
    }

    /// 检查与另一场的尺寸和量纲是否一致
    pub fn check_compatible<U>(&self, other: &GeometricField<U, L>, context: &str) -> MhResult<()> {
        MhError::check_size("field", self.values.len(), other.values.len())?;
        if self.dimensions != other.dimensions {
            return Err(MhError::dimension_mismatch(
                context,
                self.dimensions,
                other.dimensions,
            ));
        }
        Ok(())
    }

    /// 最小模
    pub fn min_mag(&self) -> f64 {
        self.values.iter().map(|v| v.mag()).fold(f64::INFINITY, f64::min)
    }

    /// 最大模
    pub fn max_mag(&self) -> f64 {
        self.values.iter().map(|v| v.mag()).fold(0.0, f64::max)
    }
}

impl<L: Location> GeometricField<f64, L> {
    /// 最小值
    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// 最大值
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// 逐元素 max(self, floor)
    pub fn max_with(&self, floor: f64) -> Self {
        self.map(format!("max({},{})", self.name, floor), self.dimensions, |v| v.max(floor))
    }

    /// 乘以另一标量场
    pub fn mul_field(&self, other: &Self) -> Self {
        self.scaled_by(other)
    }
}

impl<T, L> Index<usize> for GeometricField<T, L> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.values[i]
    }
}

impl<T, L> IndexMut<usize> for GeometricField<T, L> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.values[i]
    }
}

impl<T: FieldValue, L: Location> AddAssign<&GeometricField<T, L>> for GeometricField<T, L> {
    fn add_assign(&mut self, rhs: &GeometricField<T, L>) {
        debug_assert_eq!(self.dimensions, rhs.dimensions, "{} += {}", self.name, rhs.name);
        for (a, &b) in self.values.iter_mut().zip(rhs.values.iter()) {
            *a += b;
        }
    }
}

impl<T: FieldValue, L: Location> SubAssign<&GeometricField<T, L>> for GeometricField<T, L> {
    fn sub_assign(&mut self, rhs: &GeometricField<T, L>) {
        debug_assert_eq!(self.dimensions, rhs.dimensions, "{} -= {}", self.name, rhs.name);
        for (a, &b) in self.values.iter_mut().zip(rhs.values.iter()) {
            *a -= b;
        }
    }
}

impl<T: FieldValue, L: Location> MulAssign<f64> for GeometricField<T, L> {
    fn mul_assign(&mut self, rhs: f64) {
        for a in self.values.iter_mut() {
            *a = *a * rhs;
        }
    }
}

// ============================================================
// 零场构造能力
// ============================================================

/// 可按名称、量纲和网格零构造的场
///
/// `fill_fields` 等泛型表操作只依赖此能力。
pub trait GeoField: Sized {
    /// 零场
    fn zeroed(name: &str, dimensions: DimensionSet, mesh: &dyn FvMesh) -> Self;

    /// 场名
    fn field_name(&self) -> &str;

    /// 量纲
    fn field_dimensions(&self) -> DimensionSet;

    /// 重命名
    fn with_name(self, name: &str) -> Self;

    /// 累加同位置同量纲的场
    fn accumulate(&mut self, other: &Self);
}

impl<T: FieldValue, L: Location> GeoField for GeometricField<T, L> {
    fn zeroed(name: &str, dimensions: DimensionSet, mesh: &dyn FvMesh) -> Self {
        Self::zeros(name, dimensions, mesh)
    }

    fn field_name(&self) -> &str {
        self.name()
    }

    fn field_dimensions(&self) -> DimensionSet {
        self.dimensions()
    }

    fn with_name(self, name: &str) -> Self {
        self.named(name)
    }

    fn accumulate(&mut self, other: &Self) {
        *self += other;
    }
}

// ============================================================
// 插值与通量
// ============================================================

/// 单元场线性插值到面，边界面取 owner 值
pub fn interpolate<T: FieldValue>(vf: &VolField<T>, mesh: &dyn FvMesh) -> SurfaceField<T> {
    let values = (0..mesh.n_faces())
        .map(|face| {
            let own = vf[mesh.face_owner(face)];
            match mesh.face_neighbour(face) {
                Some(nei) => {
                    let w = mesh.face_weight(face);
                    own * w + vf[nei] * (1.0 - w)
                }
                None => own,
            }
        })
        .collect();
    SurfaceField::from_values(format!("interpolate({})", vf.name()), vf.dimensions(), values)
}

/// 速度场的面体积通量 φ = U_f · Sf
pub fn flux(u: &VolVectorField, mesh: &dyn FvMesh) -> SurfaceScalarField {
    let u_f = interpolate(u, mesh);
    let values = (0..mesh.n_faces())
        .map(|face| u_f[face].dot(mesh.face_area(face)))
        .collect();
    SurfaceScalarField::from_values(
        format!("flux({})", u.name()),
        u.dimensions() * DimensionSet::AREA,
        values,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::LineMesh;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_uniform_and_zeros() {
        let mesh = LineMesh::unit(3);
        let z = VolVectorField::zeros("U", DimensionSet::VELOCITY, &mesh);
        assert_eq!(z.len(), 3);
        assert!(z.iter().all(|v| *v == DVec3::ZERO));

        let s = SurfaceScalarField::uniform("phi", DimensionSet::VOLUMETRIC_FLUX, &mesh, 2.0);
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn test_interpolate_linear_profile() {
        let mesh = LineMesh::unit(4);
        let vf = VolScalarField::from_values("x", DimensionSet::DIMLESS, vec![0.0, 1.0, 2.0, 3.0]);
        let sf = interpolate(&vf, &mesh);
        assert!(approx_eq(sf[0], 0.0));
        assert!(approx_eq(sf[1], 0.5));
        assert!(approx_eq(sf[2], 1.5));
        assert!(approx_eq(sf[3], 2.5));
        assert!(approx_eq(sf[4], 3.0));
    }

    #[test]
    fn test_flux_of_uniform_velocity() {
        let mesh = LineMesh::new(2, 1.0, 2.0);
        let u = VolVectorField::uniform("U", DimensionSet::VELOCITY, &mesh, DVec3::new(0.5, 1.0, 0.0));
        let phi = flux(&u, &mesh);
        assert!(approx_eq(phi[1], 1.0));
        assert!(approx_eq(phi[2], 1.0));
        assert!(approx_eq(phi[0], -1.0));
        assert_eq!(phi.dimensions(), DimensionSet::VOLUMETRIC_FLUX);
    }

    #[test]
    fn test_scaled_by_combines_dimensions() {
        let mesh = LineMesh::unit(2);
        let alpha = VolScalarField::uniform("alpha", DimensionSet::DIMLESS, &mesh, 0.5);
        let u = VolVectorField::uniform("U", DimensionSet::VELOCITY, &mesh, DVec3::X);
        let au = u.scaled_by(&alpha);
        assert_eq!(au.dimensions(), DimensionSet::VELOCITY);
        assert!(approx_eq(au[1].x, 0.5));
    }

    #[test]
    fn test_check_compatible() {
        let mesh = LineMesh::unit(2);
        let a = VolScalarField::zeros("a", DimensionSet::DIMLESS, &mesh);
        let b = VolScalarField::zeros("b", DimensionSet::DENSITY, &mesh);
        assert!(a.check_compatible(&a, "a+a").is_ok());
        assert!(a.check_compatible(&b, "a+b").is_err());
    }

    #[test]
    fn test_min_max() {
        let f = VolScalarField::from_values("f", DimensionSet::DIMLESS, vec![-1.0, 3.0, 2.0]);
        assert!(approx_eq(f.min(), -1.0));
        assert!(approx_eq(f.max(), 3.0));
        assert!(approx_eq(f.min_mag(), 1.0));
        assert!(approx_eq(f.max_with(0.0)[0], 0.0));
    }
}
