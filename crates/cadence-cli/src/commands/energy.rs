//! Baseline energy preview for a hypothetical day.

use chrono::{Local, Timelike};
use clap::Args;

use cadence_core::energy::curve::peak;
use cadence_core::energy::{self, baseline_curve, render_ascii_chart};
use cadence_core::{Chronotype, ClockTime, PlannerConfig, UserContext};

#[derive(Args)]
pub struct EnergyArgs {
    /// Window start (HH:MM)
    #[arg(long, default_value = "08:00")]
    pub from: ClockTime,
    /// Window end (HH:MM)
    #[arg(long, default_value = "22:00")]
    pub to: ClockTime,
    /// Hours slept last night
    #[arg(long, default_value_t = 8.0)]
    pub sleep: f64,
    /// Stress level (1-5)
    #[arg(long, default_value_t = 2)]
    pub stress: u8,
    /// early, normal or late
    #[arg(long, default_value = "normal")]
    pub chronotype: Chronotype,
    /// Lectures or meetings today
    #[arg(long, default_value_t = 0)]
    pub lectures: u32,
}

pub fn run(args: EnergyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = PlannerConfig::load()?;
    let context = UserContext {
        sleep_hours: args.sleep,
        stress_level: args.stress,
        chronotype: args.chronotype,
        lectures_today: args.lectures,
        available_from: args.from,
        available_to: args.to,
        breaks_at: Vec::new(),
    };
    context.validate()?;

    let curve = baseline_curve(&context, &config);
    print!("{}", render_ascii_chart("Baseline energy", &curve));

    if let Some(top) = peak(&curve) {
        println!("\nPeak: {} ({:.0}%)", top.time, top.value * 100.0);
    }

    let now = Local::now();
    let now = ClockTime::from_hm(now.hour(), now.minute());
    if context.window().contains(now) {
        let current = energy::energy(
            now.hour_f64(),
            context.sleep_hours,
            context.stress_level,
            context.lectures_today,
            0.0,
            context.chronotype,
            &config,
        );
        println!("Now ({now}): {:.0}%", current * 100.0);
    }
    Ok(())
}
