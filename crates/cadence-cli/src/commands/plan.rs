//! Day planning from a request file.

use std::path::PathBuf;

use clap::Args;

use cadence_core::energy::render_ascii_chart;
use cadence_core::{BlockKind, DayPlan, PlanRequest, Planner, PlannerConfig};

#[derive(Args)]
pub struct PlanArgs {
    /// Request file (`.json` for JSON, TOML otherwise)
    pub file: PathBuf,
    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
    /// Also draw the energy and fatigue curves
    #[arg(long)]
    pub curves: bool,
    /// Accept the first scheduling run even when overloaded
    #[arg(long)]
    pub no_rebalance: bool,
}

pub fn run(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = PlannerConfig::load()?;
    let request = PlanRequest::from_path(&args.file)?;

    let mut planner = Planner::new(&config);
    if args.no_rebalance {
        planner = planner.without_rebalance();
    }
    let plan = planner.plan(&request.tasks, &request.context)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&request, &plan);
        if args.curves {
            print!("{}", render_ascii_chart("Energy", &plan.schedule.energy_curve));
            print!("{}", render_ascii_chart("Fatigue", &plan.schedule.fatigue_curve));
        }
    }
    Ok(())
}

pub fn print_example() -> Result<(), Box<dyn std::error::Error>> {
    print!("{}", PlanRequest::example_toml());
    Ok(())
}

fn print_plan(request: &PlanRequest, plan: &DayPlan) {
    let ctx = &request.context;
    println!(
        "Plan for {} (sleep {}h, stress {}/5, {:?} chronotype)",
        ctx.window(),
        ctx.sleep_hours,
        ctx.stress_level,
        ctx.chronotype
    );
    println!();

    if plan.schedule.blocks.is_empty() {
        println!("  (nothing scheduled)");
    }
    for block in &plan.schedule.blocks {
        let marker = match block.kind {
            BlockKind::Task => " ",
            BlockKind::Break => "~",
        };
        println!(
            "{marker} {}  {:<32} load {:>4.1}  energy {:.2}  fatigue {:.2}",
            block.span(),
            block.title,
            block.cognitive_load,
            block.energy_at_start,
            block.fatigue_at_start
        );
        println!("                 {}", block.explanation);
    }

    if !plan.schedule.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &plan.schedule.warnings {
            println!("  - {warning}");
        }
    }
    if plan.is_overloaded() {
        println!("\nOverloaded: not every task fits in the available time.");
    }
    if plan.rebalance_attempts > 0 {
        println!("Rebalanced {} time(s).", plan.rebalance_attempts);
    }

    let game = &plan.gamification;
    println!(
        "\nXP {} | Level {} | Deep streak {}",
        game.xp, game.level, game.streak
    );
    if let Some(missing) = game.xp_to_next_level() {
        println!("{missing} xp to the next level");
    }
    if !game.badges.is_empty() {
        let names: Vec<&str> = game.badges.iter().map(|b| b.name()).collect();
        println!("Badges: {}", names.join(", "));
    }
}
