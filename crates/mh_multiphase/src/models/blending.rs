// crates/mh_multiphase/src/models/blending.rs

//! 流型混合方法
//!
//! 对一个无序相对 (phase1, phase2)：
//!
//! - `f1`: "phase1 分散于 phase2" 模型的权重
//! - `f2`: "phase2 分散于 phase1" 模型的权重
//!
//! 混合值为 `m·(1 − f1 − f2) + m12·f1 + m21·f2`，见 [`super::BlendedInterfacialModel`]。
//! 权重依赖当前体积分数场，每次查询时重新计算。

use crate::config::BlendingMethodConfig;
use crate::error::{PhaseSystemError, PhaseSystemResult};
use crate::field::VolScalarField;
use crate::phase::PhaseModel;
use mh_foundation::DimensionSet;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::sync::Arc;

/// 回退混合方法名
pub const DEFAULT_BLENDING: &str = "default";

/// 混合方法 trait
pub trait BlendingMethod: Send + Sync + Debug {
    /// 方法类型名
    fn type_name(&self) -> &'static str;

    /// phase1 分散于 phase2 的权重
    fn f1(&self, phase1: &PhaseModel, phase2: &PhaseModel) -> VolScalarField;

    /// phase2 分散于 phase1 的权重
    fn f2(&self, phase1: &PhaseModel, phase2: &PhaseModel) -> VolScalarField;

    /// 检查该方法能否用于给定相对
    fn validate(&self, _phase1: &str, _phase2: &str) -> PhaseSystemResult<()> {
        Ok(())
    }
}

fn weight_field(phase: &PhaseModel, f: impl Fn(usize) -> f64) -> VolScalarField {
    let values = (0..phase.alpha().len()).map(f).collect();
    VolScalarField::from_values("f", DimensionSet::DIMLESS, values)
}

// ============================================================
// none
// ============================================================

/// 不混合：由指定的连续相决定取哪个分散模型
#[derive(Debug, Clone)]
pub struct NoBlending {
    /// 连续相名
    pub continuous_phase: String,
}

impl BlendingMethod for NoBlending {
    fn type_name(&self) -> &'static str {
        "none"
    }

    fn f1(&self, phase1: &PhaseModel, phase2: &PhaseModel) -> VolScalarField {
        let w = if phase2.name() == self.continuous_phase { 1.0 } else { 0.0 };
        weight_field(phase1, |_| w)
    }

    fn f2(&self, phase1: &PhaseModel, _phase2: &PhaseModel) -> VolScalarField {
        let w = if phase1.name() == self.continuous_phase { 1.0 } else { 0.0 };
        weight_field(phase1, |_| w)
    }
}

// ============================================================
// linear
// ============================================================

/// 线性过渡
///
/// 连续相 c 的体积分数从 `min_partly_continuous_alpha[c]` 增至
/// `min_fully_continuous_alpha[c]` 时，分散模型权重由 0 线性增至 1。
#[derive(Debug, Clone)]
pub struct LinearBlending {
    min_fully_continuous_alpha: BTreeMap<String, f64>,
    min_partly_continuous_alpha: BTreeMap<String, f64>,
}

impl LinearBlending {
    /// 创建，检查每个相 `partly ≤ fully`
    pub fn new(
        min_fully_continuous_alpha: BTreeMap<String, f64>,
        min_partly_continuous_alpha: BTreeMap<String, f64>,
    ) -> PhaseSystemResult<Self> {
        for (phase, &full) in &min_fully_continuous_alpha {
            let part = min_partly_continuous_alpha.get(phase).copied().ok_or_else(|| {
                PhaseSystemError::configuration(format!(
                    "linear 混合缺少相 {} 的 min_partly_continuous_alpha",
                    phase
                ))
            })?;
            if !(0.0..=1.0).contains(&full) || !(0.0..=1.0).contains(&part) || part > full {
                return Err(PhaseSystemError::configuration(format!(
                    "linear 混合参数无效: 相 {} partly={} fully={}",
                    phase, part, full
                )));
            }
        }
        Ok(Self {
            min_fully_continuous_alpha,
            min_partly_continuous_alpha,
        })
    }

    fn limits(&self, phase: &str) -> (f64, f64) {
        (
            self.min_partly_continuous_alpha.get(phase).copied().unwrap_or(0.0),
            self.min_fully_continuous_alpha.get(phase).copied().unwrap_or(0.0),
        )
    }

    fn ramp(continuous: &PhaseModel, part: f64, full: f64) -> VolScalarField {
        let width = full - part;
        weight_field(continuous, |i| {
            let a = continuous.alpha()[i];
            if width <= 0.0 {
                // 阶跃
                if a >= full {
                    1.0
                } else {
                    0.0
                }
            } else {
                ((a - part) / width).clamp(0.0, 1.0)
            }
        })
    }
}

impl BlendingMethod for LinearBlending {
    fn type_name(&self) -> &'static str {
        "linear"
    }

    fn f1(&self, _phase1: &PhaseModel, phase2: &PhaseModel) -> VolScalarField {
        let (part, full) = self.limits(phase2.name());
        Self::ramp(phase2, part, full)
    }

    fn f2(&self, phase1: &PhaseModel, _phase2: &PhaseModel) -> VolScalarField {
        let (part, full) = self.limits(phase1.name());
        Self::ramp(phase1, part, full)
    }

    fn validate(&self, phase1: &str, phase2: &str) -> PhaseSystemResult<()> {
        for phase in [phase1, phase2] {
            if !self.min_fully_continuous_alpha.contains_key(phase) {
                return Err(PhaseSystemError::configuration(format!(
                    "linear 混合缺少相 {} 的 min_fully_continuous_alpha",
                    phase
                )));
            }
        }
        Ok(())
    }
}

// ============================================================
// hyperbolic
// ============================================================

/// 双曲正切过渡
///
/// `f1 = (1 + tanh(4/s·(α2 − α_max,d[phase1])))/2`
#[derive(Debug, Clone)]
pub struct HyperbolicBlending {
    transition_alpha_scale: f64,
    max_dispersed_alpha: BTreeMap<String, f64>,
}

impl HyperbolicBlending {
    /// 创建，要求过渡宽度为正
    pub fn new(
        transition_alpha_scale: f64,
        max_dispersed_alpha: BTreeMap<String, f64>,
    ) -> PhaseSystemResult<Self> {
        if !(transition_alpha_scale > 0.0 && transition_alpha_scale.is_finite()) {
            return Err(PhaseSystemError::configuration(format!(
                "hyperbolic 混合 transition_alpha_scale 必须为正: {}",
                transition_alpha_scale
            )));
        }
        Ok(Self {
            transition_alpha_scale,
            max_dispersed_alpha,
        })
    }

    fn weight(&self, continuous: &PhaseModel, dispersed: &PhaseModel) -> VolScalarField {
        let max_d = self
            .max_dispersed_alpha
            .get(dispersed.name())
            .copied()
            .unwrap_or(0.5);
        let scale = 4.0 / self.transition_alpha_scale;
        weight_field(continuous, |i| {
            0.5 * (1.0 + (scale * (continuous.alpha()[i] - max_d)).tanh())
        })
    }
}

impl BlendingMethod for HyperbolicBlending {
    fn type_name(&self) -> &'static str {
        "hyperbolic"
    }

    fn f1(&self, phase1: &PhaseModel, phase2: &PhaseModel) -> VolScalarField {
        self.weight(phase2, phase1)
    }

    fn f2(&self, phase1: &PhaseModel, phase2: &PhaseModel) -> VolScalarField {
        self.weight(phase1, phase2)
    }

    fn validate(&self, phase1: &str, phase2: &str) -> PhaseSystemResult<()> {
        for phase in [phase1, phase2] {
            if !self.max_dispersed_alpha.contains_key(phase) {
                return Err(PhaseSystemError::configuration(format!(
                    "hyperbolic 混合缺少相 {} 的 max_dispersed_alpha",
                    phase
                )));
            }
        }
        Ok(())
    }
}

// ============================================================
// 构造与查找
// ============================================================

/// 由配置构造混合方法
pub fn build_blending_method(config: &BlendingMethodConfig) -> PhaseSystemResult<Arc<dyn BlendingMethod>> {
    Ok(match config {
        BlendingMethodConfig::NoBlending { continuous_phase } => Arc::new(NoBlending {
            continuous_phase: continuous_phase.clone(),
        }),
        BlendingMethodConfig::Linear {
            min_fully_continuous_alpha,
            min_partly_continuous_alpha,
        } => Arc::new(LinearBlending::new(
            min_fully_continuous_alpha.clone(),
            min_partly_continuous_alpha.clone(),
        )?),
        BlendingMethodConfig::Hyperbolic {
            transition_alpha_scale,
            max_dispersed_alpha,
        } => Arc::new(HyperbolicBlending::new(
            *transition_alpha_scale,
            max_dispersed_alpha.clone(),
        )?),
    })
}

/// 按类别名查找混合方法，回退到 `default`
pub fn lookup_blending_method(
    methods: &HashMap<String, Arc<dyn BlendingMethod>>,
    category: &str,
) -> PhaseSystemResult<Arc<dyn BlendingMethod>> {
    methods
        .get(category)
        .or_else(|| methods.get(DEFAULT_BLENDING))
        .cloned()
        .ok_or_else(|| {
            PhaseSystemError::configuration(format!(
                "{} 需要混合方法，但既没有 '{}' 也没有 '{}' 条目",
                category, category, DEFAULT_BLENDING
            ))
        })
}
