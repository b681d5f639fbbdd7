//! Configuration system for geometry, timing, PHY, and controller settings.
//!
//! Loads and parses TOML configuration files to customize the scheduler for
//! different DRAM geometries and speed grades. Every timing parameter is a
//! direct cycle count; timing fields documented as optional use `0` to mean
//! "unconstrained" (the constraint tracker is then always ready).

use serde::Deserialize;

use crate::common::ConfigError;

const DEFAULT_NBANKS: u32 = 8;
const DEFAULT_NRANKS: u32 = 1;
const DEFAULT_ROWBITS: u32 = 14;
const DEFAULT_COLBITS: u32 = 10;
const DEFAULT_CMD_BUFFER_DEPTH: usize = 8;
const DEFAULT_READ_TIME: u64 = 32;
const DEFAULT_WRITE_TIME: u64 = 16;

/// Top-level scheduler configuration.
///
/// Sections mirror the constructor-parameter groups of the modeled
/// controller: geometry, timing, PHY phase layout, and controller policy.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// General simulation options.
    #[serde(default)]
    pub general: GeneralConfig,
    /// DRAM geometry (banks, ranks, row/column widths).
    #[serde(default)]
    pub geom: GeomConfig,
    /// DRAM timing parameters, in controller cycles.
    pub timing: TimingConfig,
    /// PHY phase layout and latencies.
    #[serde(default)]
    pub phy: PhyConfig,
    /// Controller arbitration policy.
    #[serde(default)]
    pub controller: ControllerConfig,
}

/// General simulation options.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GeneralConfig {
    /// Print every non-NOP cycle while simulating.
    #[serde(default)]
    pub trace_commands: bool,
}

/// DRAM geometry parameters.
#[derive(Clone, Debug, Deserialize)]
pub struct GeomConfig {
    /// Banks per rank (power of two).
    #[serde(default = "default_nbanks")]
    pub nbanks: u32,
    /// Number of ranks (power of two).
    #[serde(default = "default_nranks")]
    pub nranks: u32,
    /// Row address width in bits.
    #[serde(default = "default_rowbits")]
    pub rowbits: u32,
    /// Column address width in bits.
    #[serde(default = "default_colbits")]
    pub colbits: u32,
}

impl GeomConfig {
    /// Bank-address width for one rank.
    pub fn bankbits(&self) -> u32 {
        self.nbanks.trailing_zeros()
    }

    /// Rank-select width (0 for a single rank).
    pub fn rankbits(&self) -> u32 {
        self.nranks.trailing_zeros()
    }

    /// Total number of bank machines (all ranks).
    pub fn total_banks(&self) -> u32 {
        self.nbanks * self.nranks
    }
}

impl Default for GeomConfig {
    fn default() -> Self {
        Self {
            nbanks: DEFAULT_NBANKS,
            nranks: DEFAULT_NRANKS,
            rowbits: DEFAULT_ROWBITS,
            colbits: DEFAULT_COLBITS,
        }
    }
}

/// DRAM timing parameters, in controller cycles.
///
/// `t_rc`, `t_rrd`, `t_faw`, and `t_ccd` accept `0` meaning the constraint
/// is not enforced.
#[derive(Clone, Debug, Deserialize)]
pub struct TimingConfig {
    /// Precharge-to-activate delay.
    pub t_rp: u64,
    /// Activate-to-column (row-to-column) delay.
    pub t_rcd: u64,
    /// Write recovery time (last write data to precharge).
    pub t_wr: u64,
    /// Write-to-read turnaround.
    pub t_wtr: u64,
    /// Average periodic refresh interval.
    pub t_refi: u64,
    /// Refresh cycle time (refresh to next command).
    pub t_rfc: u64,
    /// Four-activate window (0 = unconstrained).
    #[serde(default)]
    pub t_faw: u64,
    /// Column-to-column delay (0 = unconstrained).
    #[serde(default)]
    pub t_ccd: u64,
    /// Activate-to-activate delay, different banks (0 = unconstrained).
    #[serde(default)]
    pub t_rrd: u64,
    /// Activate-to-activate delay, same bank (0 = unconstrained).
    #[serde(default)]
    pub t_rc: u64,
    /// Activate-to-precharge delay.
    pub t_ras: u64,
}

/// PHY phase layout and latencies.
///
/// The scheduler issues one decision per controller cycle, spread over
/// `nphases` DFI-like phase slots. Column commands land on
/// `rdphase`/`wrphase`, row commands on `rdcmdphase`/`wrcmdphase`.
#[derive(Clone, Debug, Deserialize)]
pub struct PhyConfig {
    /// Output phases per controller cycle.
    #[serde(default = "default_nphases")]
    pub nphases: u32,
    /// CAS write latency in DRAM cycles.
    #[serde(default = "default_cwl")]
    pub cwl: u64,
    /// Read latency in controller cycles (sets the read-to-write bubble).
    #[serde(default = "default_read_latency")]
    pub read_latency: u64,
    /// Phase carrying READ column commands.
    #[serde(default)]
    pub rdphase: u32,
    /// Phase carrying WRITE column commands.
    #[serde(default)]
    pub wrphase: u32,
    /// Phase carrying row commands while reading.
    #[serde(default)]
    pub rdcmdphase: u32,
    /// Phase carrying row commands while writing.
    #[serde(default)]
    pub wrcmdphase: u32,
}

impl Default for PhyConfig {
    fn default() -> Self {
        Self {
            nphases: 1,
            cwl: default_cwl(),
            read_latency: default_read_latency(),
            rdphase: 0,
            wrphase: 0,
            rdcmdphase: 0,
            wrcmdphase: 0,
        }
    }
}

/// Controller arbitration policy.
#[derive(Clone, Debug, Deserialize)]
pub struct ControllerConfig {
    /// Per-bank request queue depth.
    #[serde(default = "default_cmd_buffer_depth")]
    pub cmd_buffer_depth: usize,
    /// Anti-starvation budget for the read mode, in cycles (0 = unlimited).
    #[serde(default = "default_read_time")]
    pub read_time: u64,
    /// Anti-starvation budget for the write mode, in cycles (0 = unlimited).
    #[serde(default = "default_write_time")]
    pub write_time: u64,
    /// Enable the periodic refresh sequencer.
    #[serde(default = "default_true")]
    pub with_refresh: bool,
    /// Enable lookahead auto-precharge on column commands.
    #[serde(default = "default_true")]
    pub with_auto_precharge: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            cmd_buffer_depth: DEFAULT_CMD_BUFFER_DEPTH,
            read_time: DEFAULT_READ_TIME,
            write_time: DEFAULT_WRITE_TIME,
            with_refresh: true,
            with_auto_precharge: true,
        }
    }
}

impl Config {
    /// Checks internal consistency of the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when geometry fields are not powers of two,
    /// required timings are zero, phase indices exceed `nphases`, or a field
    /// is wider than the trackers support.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.geom.nbanks.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                field: "geom.nbanks",
                value: u64::from(self.geom.nbanks),
            });
        }
        if !self.geom.nranks.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                field: "geom.nranks",
                value: u64::from(self.geom.nranks),
            });
        }
        for (field, value) in [
            ("geom.rowbits", u64::from(self.geom.rowbits)),
            ("geom.colbits", u64::from(self.geom.colbits)),
            ("timing.t_rp", self.timing.t_rp),
            ("timing.t_rcd", self.timing.t_rcd),
            ("phy.nphases", u64::from(self.phy.nphases)),
            ("phy.read_latency", self.phy.read_latency),
            ("controller.cmd_buffer_depth", self.controller.cmd_buffer_depth as u64),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroField { field });
            }
        }
        // Width limits of the trackers and address masks: the tFAW window is
        // a 64-bit shift register, row/column masks are built in u32.
        for (field, value, max) in [
            ("timing.t_faw", self.timing.t_faw, 63),
            ("geom.rowbits", u64::from(self.geom.rowbits), 31),
            ("geom.colbits", u64::from(self.geom.colbits), 31),
        ] {
            if value > max {
                return Err(ConfigError::FieldTooLarge { field, value, max });
            }
        }
        if self.controller.with_refresh {
            for (field, value) in [
                ("timing.t_refi", self.timing.t_refi),
                ("timing.t_rfc", self.timing.t_rfc),
            ] {
                if value == 0 {
                    return Err(ConfigError::MissingTiming {
                        field,
                        required_by: "with_refresh",
                    });
                }
            }
        }
        if self.controller.with_auto_precharge {
            for (field, value) in [
                ("timing.t_ras", self.timing.t_ras),
                ("timing.t_rp", self.timing.t_rp),
            ] {
                if value == 0 {
                    return Err(ConfigError::MissingTiming {
                        field,
                        required_by: "with_auto_precharge",
                    });
                }
            }
        }
        for (field, value) in [
            ("phy.rdphase", self.phy.rdphase),
            ("phy.wrphase", self.phy.wrphase),
            ("phy.rdcmdphase", self.phy.rdcmdphase),
            ("phy.wrcmdphase", self.phy.wrcmdphase),
        ] {
            if value >= self.phy.nphases {
                return Err(ConfigError::PhaseOutOfRange {
                    field,
                    value: u64::from(value),
                    nphases: u64::from(self.phy.nphases),
                });
            }
        }
        Ok(())
    }

    /// Write latency in controller cycles: `ceil(cwl / nphases)`.
    pub fn write_latency(&self) -> u64 {
        self.phy.cwl.div_ceil(u64::from(self.phy.nphases))
    }

    /// Write-to-precharge interval: write latency + tWR + tCCD.
    ///
    /// tCCD is included because write recovery starts once the burst
    /// transfer is complete.
    pub fn write_to_precharge(&self) -> u64 {
        self.write_latency() + self.timing.t_wr + self.timing.t_ccd
    }

    /// Write-to-read interval: tWTR + write latency + tCCD.
    pub fn write_to_read(&self) -> u64 {
        self.timing.t_wtr + self.write_latency() + self.timing.t_ccd
    }
}

fn default_nbanks() -> u32 {
    DEFAULT_NBANKS
}

fn default_nranks() -> u32 {
    DEFAULT_NRANKS
}

fn default_rowbits() -> u32 {
    DEFAULT_ROWBITS
}

fn default_colbits() -> u32 {
    DEFAULT_COLBITS
}

fn default_nphases() -> u32 {
    1
}

fn default_cwl() -> u64 {
    5
}

fn default_read_latency() -> u64 {
    5
}

fn default_cmd_buffer_depth() -> usize {
    DEFAULT_CMD_BUFFER_DEPTH
}

fn default_read_time() -> u64 {
    DEFAULT_READ_TIME
}

fn default_write_time() -> u64 {
    DEFAULT_WRITE_TIME
}

fn default_true() -> bool {
    true
}
