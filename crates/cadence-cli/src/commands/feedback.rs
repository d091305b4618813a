use clap::Subcommand;
use cadence_core::{PlannerConfig, WorkloadFeedback};

#[derive(Subcommand)]
pub enum FeedbackAction {
    /// Rate a completed block and recalibrate fatigue coefficients
    Record {
        /// Index of the block in the plan
        #[arg(long)]
        block: usize,
        /// Mental demand (1-7)
        #[arg(long)]
        mental: u8,
        /// Effort (1-7)
        #[arg(long)]
        effort: u8,
    },
    /// Show feedback history and the coefficients it drives
    Show,
}

pub fn run(action: FeedbackAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        FeedbackAction::Record {
            block,
            mental,
            effort,
        } => {
            let config = PlannerConfig::load()?;
            let next = config.record_feedback(WorkloadFeedback::new(block, mental, effort))?;
            next.save()?;
            println!("recorded feedback ({} entries)", next.feedback.len());
            let recalibrated = next.fatigue_consec_weight != config.fatigue_consec_weight
                || next.fatigue_total_weight != config.fatigue_total_weight
                || next.fatigue_force_break != config.fatigue_force_break;
            if recalibrated {
                println!("recalibrated:");
                print_coefficients(&next);
            }
        }
        FeedbackAction::Show => {
            let config = PlannerConfig::load()?;
            if config.feedback.is_empty() {
                println!("no feedback recorded");
            }
            for (i, fb) in config.feedback.iter().enumerate() {
                println!(
                    "{:>3}. block {:<3} mental demand {}  effort {}",
                    i + 1,
                    fb.block_index,
                    fb.mental_demand,
                    fb.effort
                );
            }
            print_coefficients(&config);
        }
    }
    Ok(())
}

fn print_coefficients(config: &PlannerConfig) {
    println!("fatigue_consec_weight = {:.3}", config.fatigue_consec_weight);
    println!("fatigue_total_weight = {:.3}", config.fatigue_total_weight);
    println!("fatigue_force_break = {:.3}", config.fatigue_force_break);
}
