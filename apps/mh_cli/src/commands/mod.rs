// apps/mh_cli/src/commands/mod.rs

//! 子命令

pub mod eliminate;
pub mod info;
pub mod validate;

use anyhow::{Context, Result};
use mh_multiphase::mesh::LineMesh;
use mh_multiphase::{PhaseSystem, PhaseSystemConfig};
use std::path::Path;
use std::sync::Arc;

/// 读取配置文件
pub fn load_config(path: &Path) -> Result<PhaseSystemConfig> {
    PhaseSystemConfig::from_file(path)
        .with_context(|| format!("无法加载配置文件: {}", path.display()))
}

/// 在一维网格上构造相系统
pub fn build_system(config: &PhaseSystemConfig, cells: usize) -> Result<PhaseSystem> {
    let mesh = Arc::new(LineMesh::unit(cells));
    PhaseSystem::new(mesh, config).context("相系统构造失败")
}
