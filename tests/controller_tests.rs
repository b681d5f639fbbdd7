//! Integration tests for the full controller: end-to-end command
//! sequences, turnaround, refresh coordination, and cross-bank timings.

use dram_scheduler::common::{ChipSelect, Command, CommandKind, Request, SubmitError};
use dram_scheduler::config::{
    Config, ControllerConfig, GeneralConfig, GeomConfig, PhyConfig, TimingConfig,
};
use dram_scheduler::core::{Controller, CycleOutput, Mode};

/// Creates the baseline test configuration (tRP=3, tRCD=2, single phase).
fn create_test_config() -> Config {
    Config {
        general: GeneralConfig {
            trace_commands: false,
        },
        geom: GeomConfig {
            nbanks: 4,
            nranks: 1,
            rowbits: 14,
            colbits: 10,
        },
        timing: TimingConfig {
            t_rp: 3,
            t_rcd: 2,
            t_wr: 2,
            t_wtr: 2,
            t_refi: 64,
            t_rfc: 4,
            t_faw: 0,
            t_ccd: 0,
            t_rrd: 0,
            t_rc: 0,
            t_ras: 2,
        },
        phy: PhyConfig {
            nphases: 1,
            cwl: 1,
            read_latency: 1,
            rdphase: 0,
            wrphase: 0,
            rdcmdphase: 0,
            wrcmdphase: 0,
        },
        controller: ControllerConfig {
            cmd_buffer_depth: 8,
            read_time: 8,
            write_time: 4,
            with_refresh: false,
            with_auto_precharge: false,
        },
    }
}

fn read(bank: u32, row: u32, col: u32) -> Request {
    Request {
        bank,
        row,
        col,
        is_write: false,
    }
}

fn write(bank: u32, row: u32, col: u32) -> Request {
    Request {
        bank,
        row,
        col,
        is_write: true,
    }
}

/// Runs `cycles` steps and returns every cycle's output.
fn run(controller: &mut Controller, cycles: u64) -> Vec<CycleOutput> {
    (0..cycles).map(|_| controller.step()).collect()
}

/// Flattens outputs into (cycle, command) pairs.
fn issued(outputs: &[CycleOutput]) -> Vec<(u64, Command)> {
    outputs
        .iter()
        .flat_map(|out| out.commands.iter().map(|&cmd| (out.cycle, cmd)))
        .collect()
}

/// Tests the canonical single-write walk: ACTIVATE at cycle 0, tRCD wait,
/// WRITE at cycle 3 (one read-to-write turnaround cycle included).
#[test]
fn test_single_write_timeline() {
    let config = create_test_config();
    let mut controller = Controller::new(&config).unwrap();
    controller.submit(write(0, 5, 0)).unwrap();

    let outputs = run(&mut controller, 10);
    let commands = issued(&outputs);

    assert_eq!(commands[0].0, 0);
    assert_eq!(commands[0].1.kind, CommandKind::Activate);
    assert_eq!(commands[0].1.address, 5);

    assert_eq!(commands[1].0, 3);
    assert_eq!(commands[1].1.kind, CommandKind::Write);
    assert_eq!(controller.stats.writes_completed, 1);
}

/// Tests that a read followed by a write to the same row does not
/// re-activate: the row stays open across the direction turnaround.
#[test]
fn test_same_row_turnaround_keeps_row_open() {
    let config = create_test_config();
    let mut controller = Controller::new(&config).unwrap();
    controller.submit(read(0, 5, 0)).unwrap();
    controller.submit(write(0, 5, 1)).unwrap();

    let outputs = run(&mut controller, 12);
    let kinds: Vec<CommandKind> = issued(&outputs).iter().map(|(_, c)| c.kind).collect();

    assert_eq!(
        kinds,
        vec![CommandKind::Activate, CommandKind::Read, CommandKind::Write]
    );
    assert_eq!(controller.stats.activates, 1);
    assert_eq!(controller.stats.row_hits, 2);
}

/// Tests completion reporting: handles come back once each, in submission
/// order for a single bank.
#[test]
fn test_completion_order() {
    let config = create_test_config();
    let mut controller = Controller::new(&config).unwrap();
    let ids = vec![
        controller.submit(read(0, 5, 0)).unwrap(),
        controller.submit(read(0, 5, 1)).unwrap(),
        controller.submit(read(0, 5, 2)).unwrap(),
    ];

    let outputs = run(&mut controller, 10);
    let completed: Vec<_> = outputs
        .iter()
        .flat_map(|out| out.completed.iter().copied())
        .collect();

    assert_eq!(completed, ids);
    assert_eq!(controller.stats.reads_completed, 3);
}

/// Tests anti-starvation: with reads and writes both continuously
/// available and read_time=8, the controller turns to writes after at most
/// eight read cycles even though reads remain pending.
#[test]
fn test_anti_starvation_turnaround() {
    let mut config = create_test_config();
    config.phy.read_latency = 2;
    let mut controller = Controller::new(&config).unwrap();
    for col in 0..8 {
        controller.submit(read(0, 5, col)).unwrap();
        controller.submit(write(1, 7, col)).unwrap();
    }

    let outputs = run(&mut controller, 40);
    let commands = issued(&outputs);

    let first_write = commands
        .iter()
        .find(|(_, c)| c.kind == CommandKind::Write)
        .expect("writes must not starve");
    assert!(first_write.0 <= 10, "write held off until {}", first_write.0);

    // Reads were still pending when the mode switched.
    let reads_before: Vec<_> = commands
        .iter()
        .filter(|(cycle, c)| c.kind == CommandKind::Read && *cycle < first_write.0)
        .collect();
    assert!(reads_before.len() < 8);
    assert!(!reads_before.is_empty());

    // Both classes drain completely.
    assert_eq!(controller.stats.reads_completed, 8);
    assert_eq!(controller.stats.writes_completed, 8);

    // And the direction comes back: some read issues after the writes.
    assert!(commands
        .iter()
        .any(|(cycle, c)| c.kind == CommandKind::Read && *cycle > first_write.0));
}

/// Tests round-robin fairness across banks: once every bank streams reads,
/// four consecutive data grants hit four distinct banks.
#[test]
fn test_round_robin_across_banks() {
    let config = create_test_config();
    let mut controller = Controller::new(&config).unwrap();
    for bank in 0..4 {
        for col in 0..8 {
            controller.submit(read(bank, 5, col)).unwrap();
        }
    }

    let outputs = run(&mut controller, 10);
    let reads: Vec<(u64, u32)> = issued(&outputs)
        .iter()
        .filter(|(_, c)| c.kind == CommandKind::Read)
        .map(|(cycle, c)| (*cycle, c.bank))
        .collect();

    // Cycles 6..=9: all four banks are streaming; expect one grant each.
    let mut window: Vec<u32> = reads
        .iter()
        .filter(|(cycle, _)| (6..10).contains(cycle))
        .map(|(_, bank)| *bank)
        .collect();
    window.sort_unstable();
    assert_eq!(window, vec![0, 1, 2, 3]);
}

/// Tests tRC spacing: back-to-back activates to the same bank sit exactly
/// tRC apart even when the precharge path would allow an earlier one.
#[test]
fn test_trc_spacing_between_activates() {
    let mut config = create_test_config();
    config.timing.t_rc = 10;
    let mut controller = Controller::new(&config).unwrap();
    controller.submit(read(0, 5, 0)).unwrap();
    controller.submit(read(0, 9, 0)).unwrap();

    let outputs = run(&mut controller, 20);
    let activates: Vec<u64> = issued(&outputs)
        .iter()
        .filter(|(_, c)| c.kind == CommandKind::Activate)
        .map(|(cycle, _)| *cycle)
        .collect();

    assert_eq!(activates.len(), 2);
    assert_eq!(activates[1] - activates[0], 10);
}

/// Tests the four-activate window: with tFAW=8 and eight banks wanting to
/// open rows, the fifth activate waits for the first to age out.
#[test]
fn test_tfaw_limits_activates() {
    let mut config = create_test_config();
    config.geom.nbanks = 8;
    config.timing.t_faw = 8;
    let mut controller = Controller::new(&config).unwrap();
    for bank in 0..8 {
        controller.submit(read(bank, 5, 0)).unwrap();
    }

    let outputs = run(&mut controller, 20);
    let activates: Vec<u64> = issued(&outputs)
        .iter()
        .filter(|(_, c)| c.kind == CommandKind::Activate)
        .map(|(cycle, _)| *cycle)
        .collect();

    assert_eq!(activates, vec![0, 1, 2, 3, 8, 9, 10, 11]);
}

/// Tests the idle refresh cadence: with tREFI=64, a 150-cycle idle run
/// completes exactly two refresh sequences, and nothing else issues.
#[test]
fn test_idle_refresh_cadence() {
    let mut config = create_test_config();
    config.controller.with_refresh = true;
    let mut controller = Controller::new(&config).unwrap();

    let outputs = run(&mut controller, 150);
    assert_eq!(controller.stats.refreshes, 2);

    for (_, cmd) in issued(&outputs) {
        assert!(
            matches!(cmd.kind, CommandKind::Precharge | CommandKind::Refresh),
            "unexpected {:?} on an idle run",
            cmd.kind
        );
    }

    // Refresh-path commands select all ranks on phase 0.
    let refresh_phases: Vec<_> = outputs
        .iter()
        .filter(|out| !out.phases[0].is_nop())
        .map(|out| out.phases[0])
        .collect();
    assert!(!refresh_phases.is_empty());
    assert!(refresh_phases.iter().all(|p| p.cs == ChipSelect::All));
}

/// Tests the refresh rendezvous: from the PRECHARGE-ALL to the REFRESH
/// command, no bank traffic issues at all, and it resumes afterwards.
#[test]
fn test_refresh_gates_traffic() {
    let mut config = create_test_config();
    config.controller.with_refresh = true;
    config.timing.t_refi = 30;
    let mut controller = Controller::new(&config).unwrap();

    let mut outputs = Vec::new();
    for cycle in 0..120u64 {
        // Keep two banks streaming reads.
        for bank in 0..2 {
            let _ = controller.submit(read(bank, 5, (cycle % 16) as u32));
        }
        outputs.push(controller.step());
    }

    let commands = issued(&outputs);
    let refresh_cycles: Vec<u64> = commands
        .iter()
        .filter(|(_, c)| c.kind == CommandKind::Refresh)
        .map(|(cycle, _)| *cycle)
        .collect();
    assert!(!refresh_cycles.is_empty());

    for &r in &refresh_cycles {
        let p = r - config.timing.t_rp;
        // PRECHARGE-ALL opens the sequence.
        let at_p: Vec<_> = commands.iter().filter(|(c, _)| *c == p).collect();
        assert_eq!(at_p.len(), 1);
        assert_eq!(at_p[0].1.kind, CommandKind::Precharge);
        assert_ne!(at_p[0].1.address & (1 << 10), 0);

        // Total silence between precharge-all and the refresh itself.
        assert!(commands
            .iter()
            .all(|(c, _)| !(*c > p && *c < r)));

        // Traffic resumes after the sequence.
        assert!(commands
            .iter()
            .any(|(c, cmd)| *c > r && cmd.kind == CommandKind::Read));
    }
}

/// Tests submission backpressure and bank-range checking.
#[test]
fn test_submit_errors() {
    let mut config = create_test_config();
    config.controller.cmd_buffer_depth = 2;
    let mut controller = Controller::new(&config).unwrap();

    assert!(controller.submit(read(0, 1, 0)).is_ok());
    assert!(controller.submit(read(0, 2, 0)).is_ok());
    assert_eq!(
        controller.submit(read(0, 3, 0)),
        Err(SubmitError::QueueFull { bank: 0 })
    );
    assert_eq!(
        controller.submit(read(9, 0, 0)),
        Err(SubmitError::BankOutOfRange { bank: 9, nbanks: 4 })
    );

    // Backpressure clears once the bank drains.
    let _ = run(&mut controller, 20);
    assert!(controller.submit(read(0, 3, 0)).is_ok());
}

/// Tests that the controller starts in read mode and reports cycles.
#[test]
fn test_initial_state() {
    let config = create_test_config();
    let mut controller = Controller::new(&config).unwrap();
    assert_eq!(controller.mode(), Mode::Read);
    assert_eq!(controller.cycle(), 0);
    assert!(controller.is_idle());

    let out = controller.step();
    assert!(out.is_bubble());
    assert_eq!(controller.cycle(), 1);
}
