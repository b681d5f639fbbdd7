//! DRAM Scheduler CLI.
//!
//! The main executable for the scheduler model. It loads a TOML
//! configuration, feeds a workload trace (JSON file or a built-in synthetic
//! stream) into the controller, runs the cycle loop, and prints statistics.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use dram_scheduler::common::AddressMapper;
use dram_scheduler::config::Config;
use dram_scheduler::core::Controller;
use dram_scheduler::sim::trace;
use dram_scheduler::sim::TraceEntry;

/// Command-line arguments for the DRAM scheduler model.
#[derive(Parser, Debug)]
#[command(author, version, about = "Cycle-accurate DRAM scheduler model")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "configs/default.toml")]
    config: String,

    /// JSON workload trace; a synthetic stream is used when omitted.
    #[arg(short, long)]
    trace: Option<PathBuf>,

    /// Number of synthetic requests when no trace is given.
    #[arg(long, default_value_t = 1000)]
    requests: u64,

    /// Extra cycles to run once all queues have drained.
    #[arg(long, default_value_t = 200)]
    drain_cycles: u64,
}

/// Entry point: configuration, workload, cycle loop, report.
fn main() {
    let args = Args::parse();
    let config_content = std::fs::read_to_string(&args.config).unwrap_or_else(|e| {
        eprintln!("failed to read config {}: {e}", args.config);
        process::exit(1);
    });
    let config: Config = toml::from_str(&config_content).unwrap_or_else(|e| {
        eprintln!("failed to parse config {}: {e}", args.config);
        process::exit(1);
    });

    let mut controller = Controller::new(&config).unwrap_or_else(|e| {
        eprintln!("invalid configuration: {e}");
        process::exit(1);
    });

    let entries: Vec<TraceEntry> = match &args.trace {
        Some(path) => trace::load(path).unwrap_or_else(|e| {
            eprintln!("failed to load trace {}: {e}", path.display());
            process::exit(1);
        }),
        None => trace::synthetic(args.requests),
    };

    println!("Scheduler Configuration");
    println!("-----------------------");
    println!("Geometry:");
    println!("  Banks x Ranks:      {} x {}", config.geom.nbanks, config.geom.nranks);
    println!("  Row/Col bits:       {} / {}", config.geom.rowbits, config.geom.colbits);
    println!("Timing:");
    println!(
        "  tRP/tRCD/tRAS/tRC:  {}/{}/{}/{}",
        config.timing.t_rp, config.timing.t_rcd, config.timing.t_ras, config.timing.t_rc
    );
    println!(
        "  tWR/tWTR/tCCD/tRRD: {}/{}/{}/{}",
        config.timing.t_wr, config.timing.t_wtr, config.timing.t_ccd, config.timing.t_rrd
    );
    println!(
        "  tREFI/tRFC/tFAW:    {}/{}/{}",
        config.timing.t_refi, config.timing.t_rfc, config.timing.t_faw
    );
    println!("Controller:");
    println!("  Queue depth:        {}", config.controller.cmd_buffer_depth);
    println!(
        "  Read/Write budget:  {}/{}",
        config.controller.read_time, config.controller.write_time
    );
    println!("  Refresh:            {}", config.controller.with_refresh);
    println!("  Auto-precharge:     {}", config.controller.with_auto_precharge);
    println!("Workload:             {} requests", entries.len());
    println!();

    let mapper = AddressMapper::new(&config);
    let trace_commands = config.general.trace_commands;

    // Submission retries on backpressure: a full bank queue holds the
    // request until a later cycle, like a stalled ready/valid handshake.
    let mut pending = entries.into_iter().peekable();
    let mut held: Option<TraceEntry> = None;
    let mut drained_at: Option<u64> = None;

    loop {
        let cycle = controller.cycle();
        if let Some(entry) = held.take() {
            if controller.submit(mapper.request(entry.addr, entry.write)).is_err() {
                held = Some(entry);
            }
        }
        while held.is_none() {
            match pending.peek() {
                Some(entry) if entry.cycle <= cycle => {
                    let entry = *entry;
                    let _ = pending.next();
                    if controller.submit(mapper.request(entry.addr, entry.write)).is_err() {
                        held = Some(entry);
                        break;
                    }
                }
                _ => break,
            }
        }

        let out = controller.step();
        if trace_commands && !out.is_bubble() {
            println!("[{:>8}] {:?}", out.cycle, out.commands);
        }

        let drained = held.is_none() && pending.peek().is_none() && controller.is_idle();
        if drained {
            let at = *drained_at.get_or_insert(out.cycle);
            if out.cycle >= at + args.drain_cycles {
                break;
            }
        } else {
            drained_at = None;
        }
    }

    controller.stats.report();
}
