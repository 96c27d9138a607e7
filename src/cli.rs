use std::fs;

use serde::Serialize;
use tracing::error;

use crate::attacks::{mug_report, user_attacks_report};
use crate::config::AppConfig;
use crate::rewards::{calculate_war_rewards, RewardSettings};
use crate::server;
use crate::torn::{HttpTransport, TornApi};

const USAGE: &str = "usage: warpay <serve|rewards|attacks|mugs>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Rewards,
    Attacks,
    Mugs,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("rewards") => Some(Command::Rewards),
        Some("attacks") => Some(Command::Attacks),
        Some("mugs") => Some(Command::Mugs),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    run_with_config(args, &AppConfig::from_env())
}

pub fn run_with_config(args: &[String], config: &AppConfig) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("{USAGE}");
        return 2;
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("failed to start runtime: {err}");
            return 1;
        }
    };

    match command {
        Command::Serve => runtime.block_on(handle_serve(config)),
        Command::Rewards => runtime.block_on(handle_rewards(args, config)),
        Command::Attacks => runtime.block_on(handle_attacks(args, config)),
        Command::Mugs => runtime.block_on(handle_mugs(args, config)),
    }
}

async fn handle_serve(config: &AppConfig) -> i32 {
    match server::run_server(&config.bind_addr, &config.api_base).await {
        Ok(()) => 0,
        Err(err) => {
            error!(error = %err, "server error");
            eprintln!("server error: {err}");
            1
        }
    }
}

async fn handle_rewards(args: &[String], config: &AppConfig) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: warpay rewards <settings.json>");
        return 2;
    };
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("failed to read settings '{path}': {err}");
            return 1;
        }
    };
    let settings = match RewardSettings::from_json(&raw) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("invalid settings: {err}");
            return 2;
        }
    };

    let api = client(config, &settings.api_key);
    match calculate_war_rewards(&api, &settings).await {
        Ok(Some(summary)) => print_json(&summary),
        Ok(None) => {
            println!("no concluded ranked war found");
            0
        }
        Err(err) => {
            error!(error = %err, "reward calculation failed");
            eprintln!("reward calculation failed: {err}");
            1
        }
    }
}

async fn handle_attacks(args: &[String], config: &AppConfig) -> i32 {
    let Some(api_key) = config.api_key.as_deref() else {
        eprintln!("usage: TORN_API_KEY=<key> warpay attacks <count> [min_respect]");
        return 2;
    };
    let count = parse_count_arg(args.get(2), 100);
    let min_respect = args.get(3).and_then(|raw| raw.trim().parse::<f64>().ok());

    match user_attacks_report(&client(config, api_key), count, min_respect).await {
        Ok(report) => print_json(&report),
        Err(err) => {
            error!(error = %err, "attack report failed");
            eprintln!("attack report failed: {err}");
            1
        }
    }
}

async fn handle_mugs(args: &[String], config: &AppConfig) -> i32 {
    let Some(api_key) = config.api_key.as_deref() else {
        eprintln!("usage: TORN_API_KEY=<key> warpay mugs <count>");
        return 2;
    };
    let count = parse_count_arg(args.get(2), 100);

    match mug_report(&client(config, api_key), count).await {
        Ok(report) => print_json(&report),
        Err(err) => {
            error!(error = %err, "mug report failed");
            eprintln!("mug report failed: {err}");
            1
        }
    }
}

fn client(config: &AppConfig, api_key: &str) -> TornApi {
    TornApi::with_transport(HttpTransport::new(), api_key, config.api_base.clone())
}

fn print_json<S: Serialize>(payload: &S) -> i32 {
    match serde_json::to_string_pretty(payload) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize output: {err}");
            1
        }
    }
}

fn parse_count_arg(raw: Option<&String>, default: usize) -> usize {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|count| *count > 0)
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid count '{value}', defaulting to {default}");
            }
            default
        })
}
