//! 物理量纲系统
//!
//! `DimensionSet` 记录七个 SI 基本量纲（质量、长度、时间、温度、物质的量、电流、发光强度）
//! 的指数，随场一起携带，用于零场构造和场运算的一致性检查。
//!
//! # 用法
//!
//! ```
//! use mh_foundation::dimension::DimensionSet;
//!
//! // 曳力系数 K 的量纲: kg/m³/s
//! let k = DimensionSet::DENSITY / DimensionSet::TIME;
//! // rAU·K 无量纲
//! let r_au = DimensionSet::TIME / DimensionSet::DENSITY;
//! assert!((k * r_au).is_dimensionless());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Div, Mul};

/// 基本量纲个数
pub const N_BASE_DIMENSIONS: usize = 7;

/// 量纲集合（各 SI 基本量纲的指数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DimensionSet {
    exponents: [i8; N_BASE_DIMENSIONS],
}

impl DimensionSet {
    /// 无量纲
    pub const DIMLESS: Self = Self::new([0, 0, 0, 0, 0, 0, 0]);
    /// 质量 [kg]
    pub const MASS: Self = Self::new([1, 0, 0, 0, 0, 0, 0]);
    /// 长度 [m]
    pub const LENGTH: Self = Self::new([0, 1, 0, 0, 0, 0, 0]);
    /// 时间 [s]
    pub const TIME: Self = Self::new([0, 0, 1, 0, 0, 0, 0]);
    /// 温度 [K]
    pub const TEMPERATURE: Self = Self::new([0, 0, 0, 1, 0, 0, 0]);
    /// 物质的量 [mol]
    pub const MOLES: Self = Self::new([0, 0, 0, 0, 1, 0, 0]);

    /// 面积 [m²]
    pub const AREA: Self = Self::new([0, 2, 0, 0, 0, 0, 0]);
    /// 体积 [m³]
    pub const VOLUME: Self = Self::new([0, 3, 0, 0, 0, 0, 0]);
    /// 速度 [m/s]
    pub const VELOCITY: Self = Self::new([0, 1, -1, 0, 0, 0, 0]);
    /// 加速度 [m/s²]
    pub const ACCELERATION: Self = Self::new([0, 1, -2, 0, 0, 0, 0]);
    /// 体积通量 [m³/s]
    pub const VOLUMETRIC_FLUX: Self = Self::new([0, 3, -1, 0, 0, 0, 0]);
    /// 密度 [kg/m³]
    pub const DENSITY: Self = Self::new([1, -3, 0, 0, 0, 0, 0]);
    /// 动力粘度 [kg/m/s]
    pub const DYNAMIC_VISCOSITY: Self = Self::new([1, -1, -1, 0, 0, 0, 0]);
    /// 表面张力 [kg/s²]
    pub const SURFACE_TENSION: Self = Self::new([1, 0, -2, 0, 0, 0, 0]);
    /// 导热系数 [kg·m/s³/K]
    pub const THERMAL_CONDUCTIVITY: Self = Self::new([1, 1, -3, -1, 0, 0, 0]);
    /// 比热容 [m²/s²/K]
    pub const SPECIFIC_HEAT: Self = Self::new([0, 2, -2, -1, 0, 0, 0]);

    /// 由指数数组创建
    pub const fn new(exponents: [i8; N_BASE_DIMENSIONS]) -> Self {
        Self { exponents }
    }

    /// 指数数组
    pub const fn exponents(&self) -> [i8; N_BASE_DIMENSIONS] {
        self.exponents
    }

    /// 是否无量纲
    pub fn is_dimensionless(&self) -> bool {
        self.exponents.iter().all(|&e| e == 0)
    }

    /// 整数次幂
    pub fn powi(self, n: i8) -> Self {
        let mut exponents = self.exponents;
        for e in exponents.iter_mut() {
            *e *= n;
        }
        Self { exponents }
    }

    /// 倒数量纲
    pub fn inv(self) -> Self {
        self.powi(-1)
    }
}

impl Mul for DimensionSet {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut exponents = self.exponents;
        for (e, r) in exponents.iter_mut().zip(rhs.exponents) {
            *e += r;
        }
        Self { exponents }
    }
}

impl Div for DimensionSet {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        self * rhs.inv()
    }
}

impl fmt::Display for DimensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, e) in self.exponents.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", e)?;
        }
        write!(f, "]")
    }
}
