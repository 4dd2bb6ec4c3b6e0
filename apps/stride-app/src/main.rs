//! Stride locomotion preview CLI.
//!
//! Provides two modes of operation:
//! - `preview`: Plan a crawl for a URDF robot and print the previewed motion
//! - `info`: Print the floating-base model read from a URDF

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use nalgebra::{Vector3, Vector6};
use stride_preview::{
    MultiPhasePreviewControl, PreviewConfig, PreviewControl, PreviewError, PreviewLocomotion,
    PreviewState,
};
use stride_rbd::{FloatingBaseSystem, LZ, WholeBodyState};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Reduced-order locomotion preview for legged robots.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Preview a crawl gait from a standing pose.
    Preview {
        /// Robot description.
        #[arg(short, long)]
        urdf: PathBuf,

        /// TOML preview configuration. Defaults are used when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of stance phases. Each phase swings one foot.
        #[arg(short, long, default_value_t = 4)]
        phases: usize,

        /// Duration of each phase in seconds.
        #[arg(short, long, default_value_t = 0.25)]
        duration: f64,

        /// Forward step length in meters.
        #[arg(short, long, default_value_t = 0.1)]
        step: f64,
    },

    /// Print the floating-base model.
    Info {
        /// Robot description.
        #[arg(short, long)]
        urdf: PathBuf,
    },
}

// ---------------------------------------------------------------------------
// Planning helpers
// ---------------------------------------------------------------------------

/// Zero joint angles with the base raised until the lowest foot touches the
/// ground. The weight is shared equally by all feet.
fn standing_state(system: &FloatingBaseSystem) -> Result<WholeBodyState, PreviewError> {
    let mut state = WholeBodyState::new(system.joint_dof());
    let feet = system.contact_positions(&state.joint_pos)?;
    state.base_pos[LZ] = -feet.values().map(|pos| pos.z).fold(0.0, f64::min);

    #[allow(clippy::cast_precision_loss)]
    let load = if feet.is_empty() {
        0.0
    } else {
        system.total_mass() * system.gravity().norm() / feet.len() as f64
    };
    for name in feet.keys() {
        let mut wrench = Vector6::zeros();
        wrench[LZ] = load;
        state.contact_eff.insert(name.clone(), wrench);
        state.contact_vel.insert(name.clone(), Vector3::zeros());
        state.contact_acc.insert(name.clone(), Vector3::zeros());
    }
    state.contact_pos = feet;
    Ok(state)
}

/// One stance phase per foot in end-effector order, each moving the swing
/// foot forward by `step` and the CoP by an equal share of it.
#[allow(clippy::cast_precision_loss)]
fn crawl_plan(
    state: &PreviewState,
    feet: &[String],
    phases: usize,
    duration: f64,
    step: f64,
) -> MultiPhasePreviewControl {
    let mut targets = state.foot_pos.clone();
    let length = state.com_pos.z - state.cop.z;
    let share = if feet.is_empty() {
        0.0
    } else {
        step / feet.len() as f64
    };

    let mut plan = MultiPhasePreviewControl::new();
    for k in 0..phases {
        let mut control = PreviewControl::new(duration)
            .with_terminal_cop(state.cop.x + share * (k + 1) as f64, state.cop.y)
            .with_terminal_length(length);
        if !feet.is_empty() {
            let foot = &feet[k % feet.len()];
            if let Some(target) = targets.get_mut(foot) {
                target.x += step;
                control = control.with_foot_target(foot.as_str(), *target);
            }
        }
        plan.push_stance(control);
    }
    plan
}

// ---------------------------------------------------------------------------
// Mode implementations
// ---------------------------------------------------------------------------

fn run_preview(
    urdf: &Path,
    config: Option<&Path>,
    phases: usize,
    duration: f64,
    step: f64,
) -> Result<(), PreviewError> {
    let config = match config {
        Some(path) => PreviewConfig::from_file(path)?,
        None => PreviewConfig::default(),
    };

    let mut controller = PreviewLocomotion::new(config);
    controller.reset_from_urdf_file(urdf)?;
    let feet = controller
        .system()
        .ok_or(PreviewError::ModelNotLoaded)?
        .end_effector_names()
        .to_vec();
    let standing = standing_state(controller.system().ok_or(PreviewError::ModelNotLoaded)?)?;

    let (state, system_com) = controller.from_whole_body_state(&standing)?;
    let plan = crawl_plan(&state, &feet, phases, duration, step);
    info!(
        phases = plan.len(),
        duration = plan.total_duration(),
        "Previewing crawl"
    );

    let preview = controller.multi_phase_preview(&state, &plan, &system_com)?;
    let whole_body = controller.to_whole_body_trajectory(&preview, &standing, &system_com)?;

    println!("samples: {}", preview.len());
    if let (Some(last), Some(full)) = (preview.last(), whole_body.last()) {
        println!("final time: {:.3} s", last.time);
        println!(
            "final CoM:  ({:.4}, {:.4}, {:.4})",
            last.com_pos.x, last.com_pos.y, last.com_pos.z
        );
        let base = full.base_translation();
        println!("final base: ({:.4}, {:.4}, {:.4})", base.x, base.y, base.z);
        for foot in &feet {
            if let Some(pos) = last.foot_pos.get(foot) {
                println!("  {foot:<16} ({:.4}, {:.4}, {:.4})", pos.x, pos.y, pos.z);
            }
        }
    }
    Ok(())
}

fn run_info(urdf: &Path) -> Result<(), PreviewError> {
    let system = FloatingBaseSystem::from_urdf_file(urdf)?;
    let com = system.floating_base_com();

    println!("robot:  {}", system.name());
    println!("mass:   {:.3} kg", system.total_mass());
    println!("dof:    {}", system.joint_dof());
    println!("base CoM: ({:.4}, {:.4}, {:.4})", com.x, com.y, com.z);
    println!();
    println!("joints:");
    for name in system.joint_names() {
        println!("  {name}");
    }
    println!("end effectors:");
    for name in system.end_effector_names() {
        println!("  {name}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Preview {
            urdf,
            config,
            phases,
            duration,
            step,
        } => run_preview(&urdf, config.as_deref(), phases, duration, step),
        Commands::Info { urdf } => run_info(&urdf),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
