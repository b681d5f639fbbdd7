//! Linear address to (bank, row, col) mapping.
//!
//! The scheduler itself works on requests that already name a bank, row and
//! column. Front ends usually have only a flat address, so this module
//! provides the ROW_BANK_COL split: the column occupies the low bits, the
//! bank (including rank bits) the middle, and the row the high bits.

use crate::common::Request;
use crate::config::Config;

/// Splits flat linear addresses into DRAM coordinates.
#[derive(Clone, Copy, Debug)]
pub struct AddressMapper {
    colbits: u32,
    bankbits: u32,
    rowmask: u32,
}

impl AddressMapper {
    /// Builds a mapper from the configured geometry.
    ///
    /// Rank-select bits are folded into the bank field, so with `nranks > 1`
    /// consecutive bank indices first walk the banks of rank 0, then rank 1.
    pub fn new(config: &Config) -> Self {
        Self {
            colbits: config.geom.colbits,
            bankbits: config.geom.bankbits() + config.geom.rankbits(),
            rowmask: (1u32 << config.geom.rowbits) - 1,
        }
    }

    /// Extracts the column address.
    pub fn col(&self, addr: u64) -> u32 {
        (addr as u32) & ((1 << self.colbits) - 1)
    }

    /// Extracts the global bank index.
    pub fn bank(&self, addr: u64) -> u32 {
        ((addr >> self.colbits) as u32) & ((1 << self.bankbits) - 1)
    }

    /// Extracts the row address.
    pub fn row(&self, addr: u64) -> u32 {
        ((addr >> (self.colbits + self.bankbits)) as u32) & self.rowmask
    }

    /// Builds a scheduler request from a flat address.
    pub fn request(&self, addr: u64, is_write: bool) -> Request {
        Request {
            bank: self.bank(addr),
            row: self.row(addr),
            col: self.col(addr),
            is_write,
        }
    }
}
