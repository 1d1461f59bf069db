//! Expected-transaction builders shared by the protocol tests.
//!
//! Each helper returns the exact SPI transaction stream one RAP operation
//! puts on the bus, so sequence tests read as the protocol steps they check.

use embedded_hal_mock::eh1::digital;
use embedded_hal_mock::eh1::spi::Transaction;

use crate::defs::{FILLER, READ_MASK, WRITE_MASK};

/// RAP read of `response.len()` registers starting at `reg`.
pub(crate) fn rap_read(reg: u8, response: Vec<u8>) -> Vec<Transaction<u8>> {
  let fillers = vec![FILLER; response.len()];
  vec![
    Transaction::transfer_in_place(vec![READ_MASK | reg, FILLER, FILLER], vec![0x00, 0x00, 0x00]),
    Transaction::transfer_in_place(fillers, response),
    Transaction::flush(),
  ]
}

/// RAP write of one byte to `reg`.
pub(crate) fn rap_write(reg: u8, value: u8) -> Vec<Transaction<u8>> {
  vec![
    Transaction::transfer_in_place(vec![WRITE_MASK | reg, value], vec![0x00, 0x00]),
    Transaction::flush(),
  ]
}

/// Chip-select assert/deassert pairs for `count` RAP operations.
pub(crate) fn cs_brackets(count: usize) -> Vec<digital::Transaction> {
  let mut out = Vec::with_capacity(count * 2);
  for _ in 0..count {
    out.push(digital::Transaction::set(digital::State::Low));
    out.push(digital::Transaction::set(digital::State::High));
  }
  out
}
