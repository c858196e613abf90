use std::fmt;

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Scenario {
    Hotel,
    Parking,
    Race,
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Scenario::Hotel => "hotel",
            Scenario::Parking => "parking",
            Scenario::Race => "race",
        })
    }
}

#[derive(Debug, Parser)]
#[clap(name = "reservations", version)]
pub struct Cli {
    /// Which demo scenarios to run (comma-separated)
    #[clap(
        long,
        value_enum,
        value_delimiter = ',',
        default_values_t = [Scenario::Hotel, Scenario::Parking]
    )]
    pub scenarios: Vec<Scenario>,

    /// Claimants racing for one spot in the race scenario
    #[clap(long, default_value = "4")]
    pub claimants: usize,
}
