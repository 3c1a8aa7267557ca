//! Output formatting for clever-cli (table, json)

use std::time::Duration;

use clap::ValueEnum;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tabled::{Table, Tabled};

use clever_coordinator::{CoordinatorSnapshot, Readout, ReadoutSource};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Context for output rendering
pub struct OutputContext {
    pub format: OutputFormat,
    pub quiet: bool,
}

impl OutputContext {
    pub fn new(format: OutputFormat, no_color: bool, quiet: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format, quiet }
    }

    /// Print a success message (unless in quiet mode)
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg.green());
        }
    }

    /// Print an info message (unless in quiet mode)
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg);
        }
    }

    pub fn warn(&self, msg: &str) {
        eprintln!("{}", msg.yellow());
    }

    pub fn error(&self, msg: &str) {
        eprintln!("{}", msg.red());
    }

    /// Print rows in the configured format
    pub fn print<T: Tabled + Serialize>(&self, data: &[T]) {
        match self.format {
            OutputFormat::Table => {
                if data.is_empty() {
                    if !self.quiet {
                        println!("No data");
                    }
                } else {
                    println!("{}", Table::new(data));
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(data).unwrap_or_else(|_| "[]".to_string())
                );
            }
        }
    }

    /// Print key-value pairs
    pub fn print_kv(&self, pairs: &[(&str, String)]) {
        match self.format {
            OutputFormat::Table => {
                for (key, value) in pairs {
                    println!("{}: {}", key.bold(), value);
                }
            }
            OutputFormat::Json => {
                let map: serde_json::Map<String, serde_json::Value> = pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.clone())))
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&map).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
    }

    /// Print the selected readouts of a snapshot, with a staleness notice
    pub fn print_readouts<S: ReadoutSource>(
        &self,
        snapshot: &CoordinatorSnapshot<S>,
        readouts: &[Readout],
    ) {
        if snapshot.stale {
            let reason = snapshot
                .last_error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_default();
            self.warn(&format!("Data is stale: {}", reason));
        }
        self.info(&format!(
            "Updated {}",
            snapshot
                .updated_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
        ));
        self.print(&readout_rows(snapshot.data.as_ref(), readouts));
    }

    /// Spinner for a wait the user should see, hidden for scripted output
    pub fn spinner(&self, msg: &str) -> Option<ProgressBar> {
        if self.quiet || self.format == OutputFormat::Json {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

// =============================================================================
// Display types for various commands
// =============================================================================

/// One readout for status and watch
#[derive(Debug, Tabled, Serialize)]
pub struct ReadoutRow {
    #[tabled(rename = "Readout")]
    pub key: &'static str,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub fn readout_rows<S: ReadoutSource + ?Sized>(source: &S, readouts: &[Readout]) -> Vec<ReadoutRow> {
    readouts
        .iter()
        .map(|r| ReadoutRow {
            key: r.key(),
            value: r.value(source).to_string(),
        })
        .collect()
}

/// Installation display for installations command
#[derive(Debug, Tabled, Serialize)]
pub struct InstallationRow {
    #[tabled(rename = "Installation")]
    pub installation_id: String,
    #[tabled(rename = "Charge box")]
    pub box_id: String,
    #[tabled(rename = "Connector")]
    pub connector_id: u32,
    #[tabled(rename = "Smart charging")]
    pub smart_charging: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use clever_coordinator::SubscriptionSnapshot;
    use clever_core::{ConsumptionAggregate, EnergySurcharge};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_readout_rows() {
        let snapshot = SubscriptionSnapshot {
            consumption: ConsumptionAggregate {
                kwh_this_month: 12.5,
                kwh_this_month_for_box: None,
                last_charge: DateTime::parse_from_rfc3339("2024-03-28T23:30:00+01:00").unwrap(),
            },
            surcharge: EnergySurcharge {
                start_date: "2024-03-01".to_string(),
                end_date: "2024-03-31".to_string(),
                price_dkk_per_kwh: 0.85,
            },
            subscription_fee: 99.0,
        };

        let rows = readout_rows(&snapshot, Readout::SUBSCRIPTION);
        let values: Vec<(&str, &str)> = rows.iter().map(|r| (r.key, r.value.as_str())).collect();
        assert_eq!(
            values,
            vec![
                ("kwh_this_month", "12.50 kWh"),
                ("last_charge", "2024-03-28 23:30:00 +01:00"),
                ("energy_surcharge", "0.8500 DKK/kWh"),
                ("subscription_fee", "99.00 DKK"),
            ]
        );
    }
}
