// crates/mh_multiphase/src/models/mod.rs

//! 相间子模型
//!
//! 每个物理类别是一个能力 trait，变体集合封闭，由配置中的 `type` 标签选择：
//!
//! | 类别 | trait | 变体 |
//! |------|-------|------|
//! | 曳力 | [`DragModel`] | constant_coefficient, schiller_naumann, wen_yu |
//! | 传热 | [`HeatTransferModel`] | constant_coefficient, ranz_marshall, spherical |
//! | 传质 | [`MassTransferModel`] | constant_coefficient, frossling, spherical |
//! | 表面张力 | [`SurfaceTensionModel`] | constant |
//! | 长宽比 | [`AspectRatioModel`] | constant, wellek |
//!
//! 模型实例以 `Arc<dyn Trait>` 存放在按相对键索引的 [`SubModelTable`] 中。
//! 类别标记类型（[`Drag`]、[`HeatTransfer`] 等）实现 [`SubModelCategory`]，
//! 使相系统的查询接口可以按类别泛型化。

pub mod aspect_ratio;
pub mod blended;
pub mod blending;
pub mod drag;
pub mod heat_transfer;
pub mod mass_transfer;
pub mod surface_tension;

pub use aspect_ratio::AspectRatioModel;
pub use blended::BlendedInterfacialModel;
pub use blending::BlendingMethod;
pub use drag::DragModel;
pub use heat_transfer::HeatTransferModel;
pub use mass_transfer::MassTransferModel;
pub use surface_tension::SurfaceTensionModel;

use crate::field::VolScalarField;
use crate::pair::{PairView, PhasePairKey};
use mh_foundation::DimensionSet;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

// ============================================================
// 表
// ============================================================

/// 相对键 → 模型
pub type SubModelTable<M> = HashMap<PhasePairKey, Arc<M>>;

/// 无序相对键 → 混合模型
pub type BlendedTable<M> = HashMap<PhasePairKey, BlendedInterfacialModel<M>>;

/// 全部类别的子模型表
#[derive(Debug, Default)]
pub struct SubModels {
    drag: SubModelTable<dyn DragModel>,
    heat_transfer: SubModelTable<dyn HeatTransferModel>,
    mass_transfer: SubModelTable<dyn MassTransferModel>,
    surface_tension: SubModelTable<dyn SurfaceTensionModel>,
    aspect_ratio: SubModelTable<dyn AspectRatioModel>,

    blended_drag: BlendedTable<dyn DragModel>,
    blended_heat_transfer: BlendedTable<dyn HeatTransferModel>,
}

impl SubModels {
    /// 某类别的模型表
    pub fn table<C: SubModelCategory>(&self) -> &SubModelTable<C::Model> {
        C::table(self)
    }

    /// 某类别的模型数
    pub fn count<C: SubModelCategory>(&self) -> usize {
        C::table(self).len()
    }

    /// 某混合类别的混合模型表
    pub fn blended<C: BlendedCategory>(&self) -> &BlendedTable<C::Model> {
        C::blended_table(self)
    }
}

// ============================================================
// 类别
// ============================================================

/// 子模型类别
pub trait SubModelCategory: 'static {
    /// 模型 trait 对象类型
    type Model: ?Sized + Send + Sync + Debug;

    /// 类别名（也是混合方法的查找名）
    const NAME: &'static str;

    /// 只读表
    fn table(models: &SubModels) -> &SubModelTable<Self::Model>;

    /// 可变表
    fn table_mut(models: &mut SubModels) -> &mut SubModelTable<Self::Model>;
}

/// 支持流型混合的类别
pub trait BlendedCategory: SubModelCategory {
    /// 混合系数量纲
    const DIMENSIONS: DimensionSet;

    /// 只读混合表
    fn blended_table(models: &SubModels) -> &BlendedTable<Self::Model>;

    /// 可变混合表
    fn blended_table_mut(models: &mut SubModels) -> &mut BlendedTable<Self::Model>;

    /// 在相对视图上求值模型系数
    fn evaluate(model: &Self::Model, pair: &PairView<'_>) -> VolScalarField;
}

/// 由配置构造模型
///
/// 配置枚举的每个变体对应一个构造分支。
pub trait ModelSpec {
    /// 所属类别
    type Category: SubModelCategory;

    /// 变体标签
    fn type_name(&self) -> &'static str;

    /// 是否需要有序相对（分散相已定义）
    fn requires_ordered(&self) -> bool;

    /// 构造模型
    fn build(&self) -> Arc<<Self::Category as SubModelCategory>::Model>;
}

macro_rules! category {
    ($(#[$doc:meta])* $marker:ident, $model:ident, $name:literal, $field:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy)]
        pub struct $marker;

        impl SubModelCategory for $marker {
            type Model = dyn $model;
            const NAME: &'static str = $name;

            fn table(models: &SubModels) -> &SubModelTable<Self::Model> {
                &models.$field
            }

            fn table_mut(models: &mut SubModels) -> &mut SubModelTable<Self::Model> {
                &mut models.$field
            }
        }
    };
}

category!(
    /// 曳力
    Drag, DragModel, "drag", drag
);
category!(
    /// 传热
    HeatTransfer, HeatTransferModel, "heat_transfer", heat_transfer
);
category!(
    /// 传质
    MassTransfer, MassTransferModel, "mass_transfer", mass_transfer
);
category!(
    /// 表面张力
    SurfaceTension, SurfaceTensionModel, "surface_tension", surface_tension
);
category!(
    /// 长宽比
    AspectRatio, AspectRatioModel, "aspect_ratio", aspect_ratio
);

impl BlendedCategory for Drag {
    const DIMENSIONS: DimensionSet = drag::DRAG_COEFFICIENT_DIMENSIONS;

    fn blended_table(models: &SubModels) -> &BlendedTable<Self::Model> {
        &models.blended_drag
    }

    fn blended_table_mut(models: &mut SubModels) -> &mut BlendedTable<Self::Model> {
        &mut models.blended_drag
    }

    fn evaluate(model: &Self::Model, pair: &PairView<'_>) -> VolScalarField {
        model.k(pair)
    }
}

impl BlendedCategory for HeatTransfer {
    const DIMENSIONS: DimensionSet = heat_transfer::HEAT_TRANSFER_COEFFICIENT_DIMENSIONS;

    fn blended_table(models: &SubModels) -> &BlendedTable<Self::Model> {
        &models.blended_heat_transfer
    }

    fn blended_table_mut(models: &mut SubModels) -> &mut BlendedTable<Self::Model> {
        &mut models.blended_heat_transfer
    }

    fn evaluate(model: &Self::Model, pair: &PairView<'_>) -> VolScalarField {
        model.k(pair)
    }
}

// ============================================================
// 公共工具
// ============================================================

/// 分散相有效体积分数 max(α_d, α_res)
pub(crate) fn dispersed_alpha(pair: &PairView<'_>) -> VolScalarField {
    let d = pair.dispersed();
    d.alpha().max_with(d.residual_alpha())
}

/// α1·α2
pub(crate) fn alpha_product(pair: &PairView<'_>) -> VolScalarField {
    pair.phase1().alpha().mul_field(pair.phase2().alpha())
}
