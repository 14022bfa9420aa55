use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use env_logger::Builder;
use log::LevelFilter;
use solana_client::rpc_client::RpcClient;
use solana_pubkey::Pubkey;

use solana_security_auditor::monitor::{LogMonitor, MonitorNotice, PollingEventSource};
use solana_security_auditor::simulator::SimulatorConfig;
use solana_security_auditor::{analyze_program_history, run_attack_scenario};

// Simple CLI without clap
#[tokio::main]
async fn main() -> Result<()> {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Info)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && (args[1] == "--version" || args[1] == "-v") {
        println!("Solana Security Auditor v{}", solana_security_auditor::VERSION);
        return Ok(());
    }

    if args.len() < 2 {
        println!("Solana Security Auditor v{}", solana_security_auditor::VERSION);
        println!("\nUsage:");
        println!(
            "  {} <PROGRAM_ID> [--scenario NAME] [--mode MODE] [--cluster URL]",
            args[0]
        );
        println!("  {} <PROGRAM_ID> --monitor [SECS] [--cluster URL]", args[0]);
        println!("  {} <PROGRAM_ID> --history [N] [--cluster URL]", args[0]);
        println!("  {} --version", args[0]);
        println!("\nOptions:");
        println!("  --scenario, -s NAME  Attack scenario: unauthorized_admin, overflow,");
        println!("                       reentrancy, double_spending (default: all)");
        println!("  --mode, -m MODE      dry-run | log-only | simulate (default: dry-run)");
        println!("  --cluster, -c URL    Use the specified RPC URL (default: devnet)");
        println!("  --monitor [SECS]     Monitor the program live for SECS seconds (default: 60)");
        println!("  --history [N]        Summarize the last N transactions (default: 25)");
        println!("  --version, -v        Show version information");
        return Ok(());
    }

    let program_id = Pubkey::from_str(&args[1])?;

    let mut scenario: Option<String> = None;
    let mut mode = "dry-run".to_string();
    let mut cluster = "https://api.devnet.solana.com".to_string();
    let mut monitor_secs: Option<u64> = None;
    let mut history_limit: Option<usize> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--scenario" | "-s" => {
                if i + 1 < args.len() {
                    scenario = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    println!("Error: Missing value for --scenario");
                    return Ok(());
                }
            }
            "--mode" | "-m" => {
                if i + 1 < args.len() {
                    mode = args[i + 1].clone();
                    i += 2;
                } else {
                    println!("Error: Missing value for --mode");
                    return Ok(());
                }
            }
            "--cluster" | "-c" => {
                if i + 1 < args.len() {
                    cluster = args[i + 1].clone();
                    i += 2;
                } else {
                    println!("Error: Missing value for --cluster");
                    return Ok(());
                }
            }
            "--monitor" => {
                monitor_secs = Some(60);
                if i + 1 < args.len() {
                    if let Ok(secs) = args[i + 1].parse() {
                        monitor_secs = Some(secs);
                        i += 1;
                    }
                }
                i += 1;
            }
            "--history" => {
                history_limit = Some(25);
                if i + 1 < args.len() {
                    if let Ok(limit) = args[i + 1].parse() {
                        history_limit = Some(limit);
                        i += 1;
                    }
                }
                i += 1;
            }
            _ => {
                println!("Unknown argument: {}", args[i]);
                i += 1;
            }
        }
    }

    if let Some(limit) = history_limit {
        println!("Analyzing the last {} transaction(s) of {}", limit, program_id);
        let analysis = analyze_program_history(&cluster, &program_id, limit).await?;
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    if let Some(secs) = monitor_secs {
        return monitor_program(&cluster, &program_id, secs).await;
    }

    let config = match mode.as_str() {
        "dry-run" => SimulatorConfig::default(),
        "log-only" => SimulatorConfig {
            dry_run: false,
            log_only: true,
            ..SimulatorConfig::default()
        },
        "simulate" => SimulatorConfig {
            dry_run: false,
            log_only: false,
            ..SimulatorConfig::default()
        },
        other => {
            println!("Unknown mode: {} (expected dry-run, log-only, or simulate)", other);
            return Ok(());
        }
    };

    let scenarios: Vec<String> = match scenario {
        Some(name) => vec![name],
        None => ["unauthorized_admin", "overflow", "reentrancy", "double_spending"]
            .iter()
            .map(|name| name.to_string())
            .collect(),
    };

    println!("Auditing program: {}", program_id);
    for name in scenarios {
        let result = run_attack_scenario(&program_id, &cluster, &name, config.clone()).await?;
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}

/// Monitor a program live, printing alerts until the deadline passes.
async fn monitor_program(cluster: &str, program_id: &Pubkey, secs: u64) -> Result<()> {
    println!("Monitoring {} for {} second(s)...", program_id, secs);

    let client = Arc::new(RpcClient::new(cluster.to_string()));
    let source = PollingEventSource::new(client);
    let (mut monitor, mut notices) = LogMonitor::new(source);

    monitor.start(&[*program_id])?;
    let shutdown = monitor.shutdown_handle();

    let printer = tokio::spawn(async move {
        while let Some(notice) = notices.recv().await {
            match notice {
                MonitorNotice::Alert(alert) => {
                    if let Ok(rendered) = serde_json::to_string_pretty(&alert) {
                        println!("{}", rendered);
                    }
                }
                MonitorNotice::StatsUpdate(stats) | MonitorNotice::MonitoringStopped(stats) => {
                    println!(
                        "events: {}, suspicious: {}, alerts: {}",
                        stats.total_events, stats.suspicious_events, stats.alerts_generated
                    );
                }
                MonitorNotice::AlertLogged(_) => {}
            }
        }
    });

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(secs)).await;
        shutdown.shutdown();
    });

    monitor.run().await;
    // Dropping the monitor closes the notice channel, letting the printer drain.
    drop(monitor);
    printer.await?;

    Ok(())
}
