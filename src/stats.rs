//! Simulation statistics collection and reporting.
//!
//! Tracks scheduling behavior over a run: command mix, row buffer locality,
//! turnaround frequency, and bubble cycles.

/// Scheduling statistics accumulated by the controller.
#[derive(Clone, Debug, Default)]
pub struct SchedStats {
    /// Simulated cycles.
    pub cycles: u64,
    /// Requests accepted by `submit`.
    pub requests_submitted: u64,
    /// Read requests whose data phase completed.
    pub reads_completed: u64,
    /// Write requests whose data phase completed.
    pub writes_completed: u64,
    /// ACTIVATE commands issued.
    pub activates: u64,
    /// Explicit PRECHARGE commands issued.
    pub precharges: u64,
    /// Column commands that carried the auto-precharge flag.
    pub auto_precharges: u64,
    /// AUTO-REFRESH commands issued.
    pub refreshes: u64,
    /// Column commands that hit the open row.
    pub row_hits: u64,
    /// Head requests that missed the open row (forcing a close).
    pub row_misses: u64,
    /// READ → WRITE mode turnarounds.
    pub read_to_write_switches: u64,
    /// WRITE → READ mode turnarounds.
    pub write_to_read_switches: u64,
    /// Cycles where no command issued.
    pub bubble_cycles: u64,
}

impl SchedStats {
    /// Completed requests of both directions.
    pub fn completed(&self) -> u64 {
        self.reads_completed + self.writes_completed
    }

    /// Row buffer hit rate over all column commands, in percent.
    pub fn row_hit_rate(&self) -> f64 {
        let total = self.row_hits + self.row_misses;
        if total == 0 {
            0.0
        } else {
            (self.row_hits as f64 / total as f64) * 100.0
        }
    }

    /// Prints the end-of-run report.
    pub fn report(&self) {
        println!("==========================================================");
        println!("SCHEDULER STATISTICS");
        println!("----------------------------------------------------------");
        println!("  cycles                 {}", self.cycles);
        println!("  requests.submitted     {}", self.requests_submitted);
        println!("  requests.completed     {}", self.completed());
        println!("    reads                {}", self.reads_completed);
        println!("    writes               {}", self.writes_completed);
        println!("----------------------------------------------------------");
        println!("COMMAND MIX");
        println!("  cmd.activate           {}", self.activates);
        println!("  cmd.precharge          {}", self.precharges);
        println!("  cmd.auto_precharge     {}", self.auto_precharges);
        println!("  cmd.refresh            {}", self.refreshes);
        println!("----------------------------------------------------------");
        println!("ROW BUFFER");
        println!("  row.hits               {}", self.row_hits);
        println!("  row.misses             {}", self.row_misses);
        println!("  row.hit_rate           {:.2}%", self.row_hit_rate());
        println!("----------------------------------------------------------");
        println!("TURNAROUND");
        println!("  turn.read_to_write     {}", self.read_to_write_switches);
        println!("  turn.write_to_read     {}", self.write_to_read_switches);
        let bubble_rate = if self.cycles > 0 {
            (self.bubble_cycles as f64 / self.cycles as f64) * 100.0
        } else {
            0.0
        };
        println!(
            "  bubbles                {} ({:.2}%)",
            self.bubble_cycles, bubble_rate
        );
        println!("==========================================================");
    }
}
