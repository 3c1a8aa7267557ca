//! Clever CLI - Command-line tool for a Clever EV charging account
//!
//! Signs in by email, shows consumption and charger readouts, and sends
//! flex, preheat and boost commands to the bound home charger.

mod commands;
mod config;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clever_client::ClientConfig;
use clever_coordinator::Readout;
use clever_core::DepartureTime;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::commands::login::ChargePointChoice;
use crate::commands::{Account, BoostMode, Toggle};
use crate::config::AccountConfig;
use crate::output::{OutputContext, OutputFormat};

#[derive(Parser)]
#[command(name = "clever-cli")]
#[command(author, version, about = "Clever EV charging CLI")]
#[command(propagate_version = true)]
struct Cli {
    /// Account configuration file
    #[arg(short, long, env = "CLEVER_CONFIG")]
    config: Option<PathBuf>,

    /// Backend URL, overrides the configuration file
    #[arg(long, env = "CLEVER_BASE_URL")]
    base_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    output: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with the emailed confirmation link and save the credentials
    Login {
        /// Account email address
        email: String,

        /// Charge box to bind instead of the first installation
        #[arg(long)]
        box_id: Option<String>,

        /// Connector of the charge box
        #[arg(long, default_value = "1")]
        connector: u32,

        /// Monthly subscription fee in DKK
        #[arg(long, default_value = "0")]
        subscription_fee: f64,
    },

    /// Refresh the API key from the saved user secret
    Reauth,

    /// Show the customer profile
    Profile,

    /// List installed charge points
    Installations,

    /// Show consumption and charger readouts
    Status {
        /// Readout key(s) to show, e.g. kwh_this_month
        #[arg(value_name = "READOUT")]
        readouts: Vec<Readout>,
    },

    /// Keep refreshing and print readouts as they change
    Watch {
        /// Readout key(s) to show
        #[arg(value_name = "READOUT")]
        readouts: Vec<Readout>,
    },

    /// Enable or disable flex charging
    Flex {
        #[command(subcommand)]
        action: FlexAction,
    },

    /// Change the planned departure of flex charging
    Departure {
        /// Time of day as HH:MM
        time: DepartureTime,
    },

    /// Change the energy wanted by departure
    Range {
        /// Energy in kWh
        kwh: u32,
    },

    /// Switch climate preheat
    Preheat {
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Bypass smart charging
    Boost {
        #[arg(value_enum)]
        mode: BoostMode,
    },
}

#[derive(Subcommand)]
enum FlexAction {
    /// Enable with a full schedule
    Enable {
        /// Phases to charge on (1-3)
        #[arg(long, default_value = "3")]
        phases: u8,

        /// Departure time as HH:MM
        #[arg(long)]
        departure: String,

        /// Energy wanted by departure, in kWh
        #[arg(long)]
        range: u32,
    },

    /// Disable
    Disable,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let ctx = OutputContext::new(cli.output, cli.no_color, cli.quiet);

    if let Err(e) = run(cli, &ctx).await {
        ctx.error(&format!("Error: {:#}", e));
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli, ctx: &OutputContext) -> Result<()> {
    if let Commands::Login {
        email,
        box_id,
        connector,
        subscription_fee,
    } = &cli.command
    {
        let client_config = match &cli.base_url {
            Some(url) => ClientConfig::with_base_url(url),
            None => ClientConfig::default(),
        };
        let choice = ChargePointChoice {
            box_id: box_id.clone(),
            connector_id: *connector,
        };
        return commands::login(
            client_config,
            email,
            choice,
            *subscription_fee,
            cli.config.as_deref(),
            ctx,
        )
        .await;
    }

    let mut config = AccountConfig::load(cli.config.as_deref())?;
    if let Some(url) = &cli.base_url {
        config.client.base_url = url.clone();
    }
    let account = Account::open(config, cli.config.clone())?;

    match cli.command {
        Commands::Login { .. } => Ok(()),
        Commands::Reauth => commands::reauth(&account, ctx).await,
        Commands::Profile => commands::profile(&account, ctx).await,
        Commands::Installations => commands::installations(&account, ctx).await,
        Commands::Status { readouts } => commands::status(&account, &readouts, ctx).await,
        Commands::Watch { readouts } => commands::watch(&account, &readouts, ctx).await,
        Commands::Flex { action } => match action {
            FlexAction::Enable {
                phases,
                departure,
                range,
            } => {
                commands::flex(&account, true, Some(phases), Some(&departure), Some(range), ctx)
                    .await
            }
            FlexAction::Disable => commands::flex(&account, false, None, None, None, ctx).await,
        },
        Commands::Departure { time } => commands::departure(&account, time, ctx).await,
        Commands::Range { kwh } => commands::range(&account, kwh, ctx).await,
        Commands::Preheat { state } => commands::preheat(&account, state, ctx).await,
        Commands::Boost { mode } => commands::boost(&account, mode, ctx).await,
    }
}
