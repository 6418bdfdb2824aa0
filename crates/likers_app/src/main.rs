mod cli;
mod config;

use std::process::ExitCode;

use anyhow::Context;
use campaign_logging::{campaign_error, campaign_info, LogDestination};
use clap::Parser;
use likers_core::SessionState;
use likers_engine::{AgentClient, Campaign, RpcDevice, RpcInteraction};
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cli::Cli;
use crate::config::AppConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let destination = match cli.log_file.clone() {
        Some(path) => LogDestination::Both(path),
        None => LogDestination::Terminal,
    };
    campaign_logging::initialize(destination, level);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            campaign_error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let targets = cli.targets.or_else(|| config.targets_file.clone());

    let agent = AgentClient::new(&config.agent_settings(cli.device))
        .context("failed to set up the device agent client")?;
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut session = SessionState::new(config.limits.clone());
    if let Some(username) = &config.username {
        session = session.with_username(username.clone());
    }

    let mut campaign = Campaign::new(
        Box::new(RpcDevice::new(agent.clone())),
        Box::new(RpcInteraction::new(agent)),
        session,
        rng,
        config.campaign_settings(),
    );

    // Source errors are logged by the campaign itself.
    let Ok(report) = campaign.run(targets.as_deref()) else {
        return Ok(ExitCode::FAILURE);
    };

    for target in &report.targets {
        campaign_info!("{} -> {} (recoveries: {})", target.target, target.outcome, target.recoveries);
    }
    if let Some(detail) = &report.limit_detail {
        campaign_info!("Stopped on session limits: {}", detail);
    }
    Ok(ExitCode::SUCCESS)
}
