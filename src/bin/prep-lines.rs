//! Interactive kitchen simulation.
//!
//! Reads operator commands from stdin (`p <line>`, `r <line>`,
//! `a <ingredient> <delta>`, `s`, `q`) and prints the kitchen table every few
//! seconds. Ctrl-C or `q` shuts everything down.

use std::io::BufRead;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use crossbeam_channel::{bounded, never, select, tick, Receiver};
use tracing::{info, warn};

use prep_lines::config::KitchenConfig;
use prep_lines::core::{AppResult, Controller, EventSink, InMemoryEventSink, KitchenError};
use prep_lines::runtime::{Kitchen, OperatorCommand};
use prep_lines::util::init_tracing;

const DISPLAY_INTERVAL: Duration = Duration::from_secs(2);

fn spawn_stdin_reader() -> AppResult<Receiver<String>> {
    let (tx, rx) = bounded(16);
    thread::Builder::new()
        .name("operator-input".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })
        .context("failed to spawn stdin reader")?;
    Ok(rx)
}

fn spawn_signal_listener(controller: Controller) -> AppResult<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build signal runtime")?;
    thread::Builder::new()
        .name("signal".into())
        .spawn(move || {
            if let Err(e) = rt.block_on(tokio::signal::ctrl_c()) {
                warn!(error = %e, "cannot listen for ctrl-c");
                return;
            }
            info!("ctrl-c received");
            controller.request_shutdown();
        })
        .context("failed to spawn signal listener")?;
    Ok(())
}

fn main() -> AppResult<()> {
    init_tracing();

    let cfg = KitchenConfig::from_env().map_err(KitchenError::InvalidConfig)?;
    let sink = (cfg.journal_capacity > 0).then(|| InMemoryEventSink::new(cfg.journal_capacity));
    let journal = sink
        .clone()
        .map(|sink| Box::new(sink) as Box<dyn EventSink>);
    info!(
        workers = cfg.worker_count,
        queue_capacity = cfg.queue_capacity,
        ingredients = cfg.ingredients.len(),
        policy = ?cfg.policy,
        "starting kitchen"
    );

    let kitchen = Kitchen::from_config(&cfg, journal)?;
    let controller = kitchen.controller().clone();
    spawn_signal_listener(controller.clone())?;

    let commands = spawn_stdin_reader()?;
    let closed_input = never();
    let mut input_open = true;
    let ticker = tick(DISPLAY_INTERVAL);
    println!("commands: p <line> | r <line> | a <ingredient> <delta> | s | q");

    while kitchen.system().is_running() {
        let input = if input_open { &commands } else { &closed_input };
        select! {
            recv(input) -> msg => match msg {
                Ok(line) if line.trim().is_empty() => {}
                Ok(line) => match OperatorCommand::parse(&line) {
                    Ok(cmd) => println!("{}", cmd.apply(&controller)),
                    Err(e) => {
                        warn!(error = %e, "rejected operator input");
                        println!("error: {e}");
                    }
                },
                Err(_) => {
                    info!("stdin closed, running until ctrl-c");
                    input_open = false;
                }
            },
            recv(ticker) -> _ => println!("{}", kitchen.system().snapshot()),
        }
    }

    let report = kitchen.shutdown();
    println!("{}", report.snapshot);
    if let Some(generated) = report.orders_generated {
        println!("orders generated: {generated}");
    }
    println!("orders completed: {}", report.snapshot.total_processed());
    if let Some(sink) = sink {
        println!("journal entries kept: {}", sink.events().len());
    }
    Ok(())
}
