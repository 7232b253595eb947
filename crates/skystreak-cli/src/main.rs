use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod commands;

#[derive(Parser)]
#[command(name = "skystreak-cli", version, about = "Skystreak CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record today's check-in
    Checkin,
    /// Show streak status and milestone progress
    Status,
    /// Predict tomorrow's weather
    Predict {
        /// Condition category, e.g. "sunny" or "Regen"
        category: String,
        /// Lower bound of the expected temperature, °C
        min: i32,
        /// Upper bound of the expected temperature, °C
        max: i32,
    },
    /// Verify yesterday's prediction against observed weather
    Verify {
        /// Observed condition description
        description: String,
        /// Observed temperature, °C
        temp: f64,
    },
    /// Feed an observed weather reading into the achievement counters
    Weather {
        /// Condition description, e.g. "Leichter Regen"
        description: String,
        /// Temperature, °C
        temp: f64,
        /// Country of the observation
        country: String,
    },
    /// List achievements
    Achievements,
    /// Prediction game statistics
    Stats,
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Checkin => commands::streak::check_in(),
        Commands::Status => commands::streak::status(),
        Commands::Predict { category, min, max } => commands::predict::predict(&category, min, max),
        Commands::Verify { description, temp } => commands::predict::verify(&description, temp),
        Commands::Weather {
            description,
            temp,
            country,
        } => commands::weather::report(&description, temp, &country),
        Commands::Achievements => commands::achievements::list(),
        Commands::Stats => commands::stats::show(),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
