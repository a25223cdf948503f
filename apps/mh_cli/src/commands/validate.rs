// apps/mh_cli/src/commands/validate.rs

//! 配置验证命令
//!
//! 解析配置并完整构造一次相系统：相名、相对描述、模型与相对方向、
//! 混合方法的错误都会在构造时报告。

use anyhow::{bail, Result};
use clap::Args;
use mh_multiphase::{PhaseSystemConfig, PhaseSystemError};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: PathBuf,

    /// 严格模式（警告也视为错误）
    #[arg(long)]
    pub strict: bool,
}

/// 验证结果
#[derive(Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn is_ok(&self, strict: bool) -> bool {
        self.errors.is_empty() && (!strict || self.warnings.is_empty())
    }
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== MariHydro 相系统配置验证 ===");
    println!("检查配置文件: {}", args.config.display());

    let mut result = ValidationResult::default();
    match PhaseSystemConfig::from_file(&args.config) {
        Ok(config) => {
            check_physics(&config, &mut result);
            match super::build_system(&config, 1) {
                Ok(system) => println!(
                    "  ✓ 相系统构造成功: {} 相, {} 相对",
                    system.phases().len(),
                    system.phase_pairs().len()
                ),
                Err(e) => result.add_error(describe(&e)),
            }
        }
        Err(e) => result.add_error(format!("配置解析失败: {}", e)),
    }

    print_validation_result(&result, args.strict)
}

/// 只影响物理合理性、不阻止构造的检查
fn check_physics(config: &PhaseSystemConfig, result: &mut ValidationResult) {
    let total_alpha: f64 = config.phases.iter().map(|p| p.alpha).sum();
    if (total_alpha - 1.0).abs() > 1e-6 {
        result.add_warning(format!("初始体积分数之和为 {:.6}，不等于 1", total_alpha));
    }

    if config.phases.iter().all(|p| !p.moving) {
        result.add_warning("没有运动相");
    }

    let g = config.gravity;
    let g_mag = (g[0] * g[0] + g[1] * g[1] + g[2] * g[2]).sqrt();
    if (g_mag - 9.81).abs() > 1.0 {
        result.add_warning(format!("重力加速度 {:.3} 偏离地球标准值较大", g_mag));
    }

    if !config.elimination.enabled && !config.drag.is_empty() {
        result.add_warning("局部消元已禁用，曳力将作为隐式矩阵项处理");
    }
}

/// 展开错误链
fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<PhaseSystemError>() {
        Some(e) if e.is_configuration() => format!("配置错误: {}", e),
        Some(e) => e.to_string(),
        None => format!("{:#}", err),
    }
}

fn print_validation_result(result: &ValidationResult, strict: bool) -> Result<()> {
    println!("\n=== 验证结果 ===");

    if !result.errors.is_empty() {
        println!("\n错误 ({}):", result.errors.len());
        for err in &result.errors {
            error!("  ✗ {}", err);
            println!("  ✗ {}", err);
        }
    }

    if !result.warnings.is_empty() {
        println!("\n警告 ({}):", result.warnings.len());
        for warning in &result.warnings {
            warn!("  ⚠ {}", warning);
            println!("  ⚠ {}", warning);
        }
    }

    if result.is_ok(strict) {
        println!("\n✓ 验证通过");
        Ok(())
    } else {
        println!("\n✗ 验证失败");
        bail!(
            "验证失败：发现 {} 个错误，{} 个警告",
            result.errors.len(),
            result.warnings.len()
        )
    }
}
