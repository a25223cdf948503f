// crates/mh_multiphase/src/config.rs

//! 相系统配置
//!
//! JSON 结构：
//!
//! ```json
//! {
//!   "phases": [
//!     { "name": "gas", "rho": 1.2, "d": 3e-3, "alpha": 0.1 },
//!     { "name": "liquid", "rho": 1000.0, "mu": 1e-3, "alpha": 0.9 }
//!   ],
//!   "blending": { "default": { "type": "none", "continuous_phase": "liquid" } },
//!   "drag": [ { "pair": "gas in liquid", "type": "schiller_naumann" } ],
//!   "elimination": { "enabled": true }
//! }
//! ```
//!
//! 每个类别是 `{ "pair": ..., "type": ..., 参数... }` 列表，`type` 选择模型变体。

use mh_foundation::{CouplingTolerance, MhError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{PhaseSystemError, PhaseSystemResult};

// ============================================================
// 顶层配置
// ============================================================

/// 相系统配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseSystemConfig {
    /// 相列表（顺序即相序号）
    pub phases: Vec<PhaseConfig>,

    /// 重力加速度 [m/s²]
    #[serde(default = "default_gravity")]
    pub gravity: [f64; 3],

    /// 混合方法：类别名（或 `default`）→ 方法
    #[serde(default)]
    pub blending: BTreeMap<String, BlendingMethodConfig>,

    /// 曳力模型
    #[serde(default)]
    pub drag: Vec<ModelEntry<DragModelConfig>>,

    /// 传热模型
    #[serde(default)]
    pub heat_transfer: Vec<ModelEntry<HeatTransferModelConfig>>,

    /// 传质模型
    #[serde(default)]
    pub mass_transfer: Vec<ModelEntry<MassTransferModelConfig>>,

    /// 表面张力模型
    #[serde(default)]
    pub surface_tension: Vec<ModelEntry<SurfaceTensionModelConfig>>,

    /// 长宽比模型
    #[serde(default)]
    pub aspect_ratio: Vec<ModelEntry<AspectRatioModelConfig>>,

    /// 局部消元
    #[serde(default)]
    pub elimination: EliminationConfig,
}

fn default_gravity() -> [f64; 3] {
    [0.0, 0.0, -9.81]
}

impl PhaseSystemConfig {
    /// 从 JSON 字符串解析并校验
    pub fn from_json_str(json: &str) -> PhaseSystemResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件加载
    pub fn from_file(path: &Path) -> PhaseSystemResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            PhaseSystemError::configuration(format!("无法读取 {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    /// 校验数值范围
    ///
    /// 相名唯一性与相对引用在构造相系统时检查。
    pub fn validate(&self) -> PhaseSystemResult<()> {
        if self.phases.is_empty() {
            return Err(PhaseSystemError::configuration("至少需要一个相"));
        }
        for phase in &self.phases {
            phase.validate()?;
        }
        self.elimination.tolerance.validate()?;
        Ok(())
    }
}

// ============================================================
// 相配置
// ============================================================

/// 单相配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseConfig {
    /// 相名
    pub name: String,

    /// 是否运动（否则为静止相，如固定床）
    #[serde(default = "default_true")]
    pub moving: bool,

    /// 是否求解温度
    #[serde(default)]
    pub anisothermal: bool,

    /// 是否多组分
    #[serde(default)]
    pub multi_component: bool,

    /// 密度 [kg/m³]
    pub rho: f64,

    /// 动力粘度 [Pa·s]
    #[serde(default = "default_mu")]
    pub mu: f64,

    /// 分散相粒径 [m]
    #[serde(default = "default_diameter")]
    pub d: f64,

    /// 比热容 [J/kg/K]
    #[serde(default = "default_cp")]
    pub cp: f64,

    /// 导热系数 [W/m/K]
    #[serde(default = "default_kappa")]
    pub kappa: f64,

    /// 残余体积分数
    #[serde(default = "default_residual_alpha")]
    pub residual_alpha: f64,

    /// 初始体积分数
    #[serde(default)]
    pub alpha: f64,

    /// 初始速度 [m/s]
    #[serde(default)]
    pub velocity: [f64; 3],

    /// 初始温度 [K]
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

fn default_true() -> bool {
    true
}
fn default_mu() -> f64 {
    1e-3
}
fn default_diameter() -> f64 {
    1e-3
}
fn default_cp() -> f64 {
    4181.0
}
fn default_kappa() -> f64 {
    0.6
}
fn default_residual_alpha() -> f64 {
    1e-6
}
fn default_temperature() -> f64 {
    300.0
}

impl PhaseConfig {
    /// 以默认物性创建
    pub fn new(name: impl Into<String>, rho: f64, alpha: f64) -> Self {
        Self {
            name: name.into(),
            moving: true,
            anisothermal: false,
            multi_component: false,
            rho,
            mu: default_mu(),
            d: default_diameter(),
            cp: default_cp(),
            kappa: default_kappa(),
            residual_alpha: default_residual_alpha(),
            alpha,
            velocity: [0.0; 3],
            temperature: default_temperature(),
        }
    }

    fn validate(&self) -> PhaseSystemResult<()> {
        if self.name.trim().is_empty() {
            return Err(PhaseSystemError::configuration("相名不能为空"));
        }
        MhError::check_range("alpha", self.alpha, 0.0, 1.0)?;
        MhError::check_range("residual_alpha", self.residual_alpha, 0.0, 1.0)?;
        for (field, value) in [
            ("rho", self.rho),
            ("mu", self.mu),
            ("d", self.d),
            ("cp", self.cp),
            ("kappa", self.kappa),
            ("temperature", self.temperature),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(PhaseSystemError::configuration(format!(
                    "相 {} 的 {} 必须为正: {}",
                    self.name, field, value
                )));
            }
        }
        Ok(())
    }
}

// ============================================================
// 子模型配置
// ============================================================

/// 一条子模型配置：相对描述 + 模型参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEntry<M> {
    /// 相对描述，`"A in B"` 或 `"A and B"`
    pub pair: String,
    /// 模型
    #[serde(flatten)]
    pub model: M,
}

impl<M> ModelEntry<M> {
    /// 创建配置条目
    pub fn new(pair: impl Into<String>, model: M) -> Self {
        Self {
            pair: pair.into(),
            model,
        }
    }
}

/// 曳力模型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DragModelConfig {
    /// K = k·α1·α2
    ConstantCoefficient {
        /// 系数 [kg/m³/s]
        coefficient: f64,
    },
    /// Schiller-Naumann 单颗粒阻力
    SchillerNaumann {
        /// 雷诺数下限
        #[serde(default = "default_residual_re")]
        residual_re: f64,
    },
    /// Wen-Yu 颗粒群阻力
    WenYu {
        /// 雷诺数下限
        #[serde(default = "default_residual_re")]
        residual_re: f64,
    },
}

fn default_residual_re() -> f64 {
    1e-3
}

/// 传热模型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HeatTransferModelConfig {
    /// H = h·α1·α2
    ConstantCoefficient {
        /// 系数 [W/m³/K]
        coefficient: f64,
    },
    /// Ranz-Marshall 关联式
    RanzMarshall,
    /// 球形颗粒导热极限 Nu = 10
    Spherical,
}

/// 传质模型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MassTransferModelConfig {
    /// K = k·α1·α2
    ConstantCoefficient {
        /// 系数 [1/s]
        coefficient: f64,
    },
    /// Frössling 关联式
    Frossling {
        /// Lewis 数
        #[serde(default = "default_lewis")]
        lewis: f64,
    },
    /// 球形颗粒扩散极限 Sh = 10
    Spherical {
        /// Lewis 数
        #[serde(default = "default_lewis")]
        lewis: f64,
    },
}

fn default_lewis() -> f64 {
    1.0
}

/// 表面张力模型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurfaceTensionModelConfig {
    /// 常数表面张力
    Constant {
        /// σ [N/m]
        sigma: f64,
    },
}

/// 长宽比模型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AspectRatioModelConfig {
    /// 常数长宽比
    Constant {
        /// E0
        e0: f64,
    },
    /// Wellek 关联式
    Wellek,
}

/// 混合方法
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlendingMethodConfig {
    /// 不混合：指定连续相
    #[serde(rename = "none")]
    NoBlending {
        /// 连续相名
        continuous_phase: String,
    },
    /// 体积分数线性过渡
    Linear {
        /// 完全连续的最小体积分数（按相名）
        min_fully_continuous_alpha: BTreeMap<String, f64>,
        /// 部分连续的最小体积分数（按相名）
        min_partly_continuous_alpha: BTreeMap<String, f64>,
    },
    /// 双曲正切过渡
    Hyperbolic {
        /// 过渡区宽度
        transition_alpha_scale: f64,
        /// 最大分散体积分数（按相名）
        max_dispersed_alpha: BTreeMap<String, f64>,
    },
}

impl BlendingMethodConfig {
    /// 参数中引用的相名
    pub fn referenced_phases(&self) -> Vec<&str> {
        match self {
            Self::NoBlending { continuous_phase } => vec![continuous_phase.as_str()],
            Self::Linear {
                min_fully_continuous_alpha,
                min_partly_continuous_alpha,
            } => min_fully_continuous_alpha
                .keys()
                .chain(min_partly_continuous_alpha.keys())
                .map(String::as_str)
                .collect(),
            Self::Hyperbolic {
                max_dispersed_alpha,
                ..
            } => max_dispersed_alpha.keys().map(String::as_str).collect(),
        }
    }
}

// ============================================================
// 局部消元配置
// ============================================================

/// 局部消元配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EliminationConfig {
    /// 是否启用（禁用时曳力作为矩阵隐式项）
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 存在阈值与主元容差
    #[serde(flatten)]
    pub tolerance: CouplingTolerance,
}

impl Default for EliminationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tolerance: CouplingTolerance::default(),
        }
    }
}
