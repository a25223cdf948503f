// apps/mh_cli/src/commands/eliminate.rs

//! 局部消元试算
//!
//! 以均匀的动量对角倒数 rAU 对初始速度场执行一次局部消元，
//! 输出消元前后的相速度与诊断信息。

use anyhow::{ensure, Result};
use clap::Args;
use mh_foundation::DimensionSet;
use mh_multiphase::field::{interpolate, PhaseFieldList, SurfaceScalarField, VolScalarField};
use mh_multiphase::models::drag::DRAG_COEFFICIENT_DIMENSIONS;
use mh_multiphase::PhaseSystem;
use std::path::PathBuf;
use tracing::{info, warn};

/// 消元试算参数
#[derive(Args)]
pub struct EliminateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: PathBuf,

    /// 网格单元数量
    #[arg(long, default_value = "10")]
    pub cells: usize,

    /// 动量方程对角倒数 rAU
    #[arg(long, default_value = "1e-3")]
    pub rau: f64,

    /// 使用面形式
    #[arg(long)]
    pub face: bool,
}

/// 执行消元试算
pub fn execute(args: EliminateArgs) -> Result<()> {
    ensure!(args.rau > 0.0 && args.rau.is_finite(), "rAU 必须为正: {}", args.rau);
    info!("=== MariHydro 局部消元试算 ===");

    let config = super::load_config(&args.config)?;
    let mut system = super::build_system(&config, args.cells)?;
    if !system.elimination().enabled {
        warn!("配置中局部消元已禁用，结果与输入相同");
    }

    println!("消元前:");
    print_velocities(&system);

    let raus = uniform_raus(&system, args.rau);
    let report = if args.face {
        let mut raufs: PhaseFieldList<SurfaceScalarField> = PhaseFieldList::new(raus.len());
        for (index, rau) in raus.iter() {
            raufs.set(index, interpolate(rau, system.mesh()));
        }
        system.partial_elimination_f(&raufs)?
    } else {
        system.partial_elimination(&raus)?
    };

    println!("\n消元后:");
    print_velocities(&system);

    println!("\n=== 诊断 ===");
    println!("位置数: {}", report.n_locations);
    println!("奇异位置: {}", report.n_degenerate);
    if report.min_determinant.is_finite() {
        println!("最小行列式: {:.6e}", report.min_determinant);
    }
    let phi = system.phi();
    println!("混合通量 max |phi|: {:.6e} ({})", phi.max_mag(), phi.dimensions());

    Ok(())
}

fn uniform_raus(system: &PhaseSystem, rau: f64) -> PhaseFieldList<VolScalarField> {
    let mut raus = PhaseFieldList::new(system.phases().len());
    let dims: DimensionSet = DRAG_COEFFICIENT_DIMENSIONS.inv();
    for phase in system.phases().moving_phases() {
        raus.set(
            phase.index(),
            VolScalarField::uniform(format!("rAU.{}", phase.name()), dims, system.mesh(), rau),
        );
    }
    raus
}

fn print_velocities(system: &PhaseSystem) {
    for phase in system.phases().moving_phases() {
        let u = phase.u()[0];
        let phi = phase.phi();
        println!(
            "  {:<12} U[0]=({:.6}, {:.6}, {:.6})  phi[1]={:.6e}",
            phase.name(),
            u.x,
            u.y,
            u.z,
            if phi.len() > 1 { phi[1] } else { phi[0] }
        );
    }
}
