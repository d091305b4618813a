use clap::Subcommand;
use cadence_core::PlannerConfig;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a coefficient
    Get {
        /// Coefficient name (e.g. "quantum_min", "fatigue_force_break")
        key: String,
    },
    /// Set a coefficient
    Set {
        /// Coefficient name
        key: String,
        /// New value
        value: String,
    },
    /// List all coefficients
    List {
        /// Print the whole config, feedback included, as JSON
        #[arg(long)]
        json: bool,
    },
    /// Reset config to defaults, dropping feedback history
    Reset,
    /// Print the config file location
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = PlannerConfig::load()?;
            let value = config
                .get(&key)
                .filter(|_| key != "feedback")
                .ok_or_else(|| format!("unknown key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = PlannerConfig::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("ok");
        }
        ConfigAction::List { json } => {
            let config = PlannerConfig::load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                for (key, value) in config.entries() {
                    println!("{key} = {value}");
                }
            }
        }
        ConfigAction::Reset => {
            PlannerConfig::default().save()?;
            println!("config reset to defaults");
        }
        ConfigAction::Path => {
            println!("{}", PlannerConfig::path()?.display());
        }
    }
    Ok(())
}
