// apps/mh_cli/src/commands/info.rs

//! 信息显示命令
//!
//! 显示相划分、相对、各类别子模型和混合系数概况。

use anyhow::Result;
use clap::Args;
use mh_multiphase::field::VolScalarField;
use mh_multiphase::models::blending::DEFAULT_BLENDING;
use mh_multiphase::models::{
    AspectRatio, Drag, HeatTransfer, MassTransfer, SubModelCategory, SurfaceTension,
};
use mh_multiphase::PhaseSystem;
use std::path::PathBuf;
use tracing::info;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: PathBuf,

    /// 网格单元数量
    #[arg(long, default_value = "10")]
    pub cells: usize,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== MariHydro 相系统信息 ===");

    let config = super::load_config(&args.config)?;
    let system = super::build_system(&config, args.cells)?;

    print_phases(&system);
    println!();
    print_pairs(&system);
    println!();
    print_models::<Drag>(&system, |m| m.type_name());
    print_models::<HeatTransfer>(&system, |m| m.type_name());
    print_models::<MassTransfer>(&system, |m| m.type_name());
    print_models::<SurfaceTension>(&system, |m| m.type_name());
    print_models::<AspectRatio>(&system, |m| m.type_name());

    let elimination = system.elimination();
    println!("\n=== 局部消元 ===");
    println!("启用: {}", elimination.enabled);
    println!("存在阈值: {:e}", elimination.tolerance.alpha_threshold);
    println!("主元容差: {:e}", elimination.tolerance.pivot_tolerance);

    Ok(())
}

fn print_phases(system: &PhaseSystem) {
    let phases = system.phases();
    println!("=== 相 ({}) ===", phases.len());
    for phase in phases.iter() {
        let mut flags = vec![if phase.is_moving() { "moving" } else { "stationary" }];
        if phase.is_anisothermal() {
            flags.push("anisothermal");
        }
        if phase.is_multi_component() {
            flags.push("multi_component");
        }
        println!(
            "  {:<12} alpha={:.4} rho={:.3} d={:e} [{}]",
            phase.name(),
            phase.alpha()[0],
            phase.rho()[0],
            phase.d(),
            flags.join(", ")
        );
    }

    let names = |list: &[mh_foundation::PhaseIndex]| -> String {
        list.iter()
            .map(|&i| phases[i].name())
            .collect::<Vec<_>>()
            .join(", ")
    };
    println!("运动相: [{}]", names(phases.moving()));
    println!("静止相: [{}]", names(phases.stationary()));
    println!("非等温相: [{}]", names(phases.anisothermal()));
}

fn print_pairs(system: &PhaseSystem) {
    println!("=== 相对 ({}) ===", system.phase_pairs().len());
    for pair in system.phase_pairs().iter() {
        let range = |label: &str, field: Option<&VolScalarField>| {
            field
                .filter(|_| !pair.is_ordered())
                .map(|f| format!(" {}∈[{:.4e}, {:.4e}]", label, f.min(), f.max()))
                .unwrap_or_default()
        };
        let kd = range("Kd", system.kd(pair.key()));
        let h = range("H", system.heat_transfer_coefficient(pair.key()));
        println!("  {}{}{}", pair.name(), kd, h);
    }
}

fn print_models<C: SubModelCategory>(
    system: &PhaseSystem,
    type_name: impl Fn(&C::Model) -> &'static str,
) {
    let table = system.sub_models().table::<C>();
    if table.is_empty() {
        return;
    }
    let blending = system
        .blending_method(C::NAME)
        .or_else(|| system.blending_method(DEFAULT_BLENDING))
        .map(|m| format!(", 混合方法 {}", m.type_name()))
        .unwrap_or_default();
    println!("=== {} ({}{}) ===", C::NAME, table.len(), blending);
    for pair in system.phase_pairs().iter() {
        if let Some(model) = table.get(pair.key()) {
            println!("  {:<24} {}", pair.name(), type_name(model.as_ref()));
        }
    }
}
