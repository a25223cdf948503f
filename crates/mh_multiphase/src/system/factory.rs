// crates/mh_multiphase/src/system/factory.rs

//! 子模型工厂
//!
//! 构造期按类别遍历配置表：解析相对描述，在共享相对表中获取或创建相对，
//! 按 `type` 标签构造模型并登记。混合类别再为每个无序相对组装混合模型。

use super::PhaseSystem;
use crate::config::ModelEntry;
use crate::error::{PhaseSystemError, PhaseSystemResult};
use crate::models::blending::lookup_blending_method;
use crate::models::{BlendedCategory, BlendedInterfacialModel, ModelSpec, SubModelCategory};
use crate::pair::PhasePairKey;

impl PhaseSystem {
    /// 生成相对并登记一个类别的子模型
    pub(super) fn generate_pairs_and_sub_models<S: ModelSpec>(
        &mut self,
        entries: &[ModelEntry<S>],
    ) -> PhaseSystemResult<()> {
        let category = <S::Category as SubModelCategory>::NAME;

        for entry in entries {
            let key = PhasePairKey::parse(&entry.pair)?;
            if S::requires_ordered(&entry.model) && !key.is_ordered() {
                return Err(PhaseSystemError::RequiresOrderedPair {
                    category,
                    model: S::type_name(&entry.model),
                    pair: key.to_string(),
                });
            }

            self.pairs.get_or_insert(&key, &self.phases)?;

            let table = <S::Category as SubModelCategory>::table_mut(&mut self.models);
            if table.contains_key(&key) {
                return Err(PhaseSystemError::DuplicatePair {
                    category,
                    pair: key.to_string(),
                });
            }
            log::debug!("{} {}: {}", category, key, S::type_name(&entry.model));
            table.insert(key, entry.model.build());
        }
        Ok(())
    }

    /// 为每个无序相对组装混合模型
    pub(super) fn generate_blended_models<C: BlendedCategory>(&mut self) -> PhaseSystemResult<()> {
        let mut blended = Vec::new();

        for pair in self.pairs.unordered() {
            let key = pair.key();
            let key1_in2 = PhasePairKey::ordered(key.first(), key.second());
            let key2_in1 = PhasePairKey::ordered(key.second(), key.first());

            let table = C::table(&self.models);
            let model = table.get(key).cloned();
            let model1_in2 = table.get(&key1_in2).cloned();
            let model2_in1 = table.get(&key2_in1).cloned();
            if model.is_none() && model1_in2.is_none() && model2_in1.is_none() {
                continue;
            }

            let blending = lookup_blending_method(&self.blending_methods, C::NAME)?;
            blending.validate(key.first(), key.second())?;

            blended.push(BlendedInterfacialModel::new(
                key.clone(),
                pair.phase1(),
                pair.phase2(),
                model,
                model1_in2,
                model2_in1,
                blending,
            ));
        }

        let table = C::blended_table_mut(&mut self.models);
        for model in blended {
            table.insert(model.key().clone(), model);
        }
        Ok(())
    }
}
