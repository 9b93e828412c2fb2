// SPDX-FileCopyrightText: 2022 Google LLC
//
// SPDX-License-Identifier: Apache-2.0
/*! Register blocks.

Peripherals are reached through a [`RegisterBlock`]: a bounded window of
32-bit registers addressed by byte offset. Drivers are generic over the
block so the same code runs against

 - [`MmioRegion`], volatile accesses to a memory mapped device, and
 - [`SimRegisters`], plain memory that records every access, for tests and
   host-side simulation.
*/

use core::cell::{Cell, RefCell};

use heapless::Vec;
use ufmt::derive::uDebug;

/// Number of accesses a [`SimRegisters`] remembers before it stops recording.
pub const SIM_LOG_CAPACITY: usize = 256;

/// A bounded window of 32-bit registers.
///
/// Offsets are in bytes and must address a whole word inside the block.
/// Implementations panic on offsets that do not.
pub trait RegisterBlock {
    /// Size of the block in bytes.
    fn size(&self) -> usize;

    /// Read the register at byte offset `offset`.
    fn read(&self, offset: usize) -> u32;

    /// Overwrite the register at byte offset `offset` with `value`.
    fn write(&mut self, offset: usize, value: u32);
}

/// Convert a byte offset into a word index, panicking when `offset` does not
/// address an aligned word within `size` bytes.
pub(crate) fn word_index(offset: usize, size: usize) -> usize {
    assert!(
        offset % 4 == 0,
        "register offset {:#x} is not word aligned",
        offset
    );
    assert!(
        offset.checked_add(4).is_some_and(|end| end <= size),
        "register offset {:#x} lies outside a block of {:#x} bytes",
        offset,
        size
    );
    offset >> 2
}

/// `MmioRegion` is a view onto memory mapped device registers.
#[derive(Clone)]
pub struct MmioRegion {
    base: *mut u32,
    size: usize,
}

impl MmioRegion {
    /// Create a new [`MmioRegion`] given a base address and size in bytes.
    ///
    /// # Safety
    ///
    /// `base` MUST be a valid, word aligned pointer backed by `size` bytes of
    /// memory mapped registers for as long as the region is used. A wrong
    /// base address is a platform configuration error that cannot be
    /// detected here.
    pub const unsafe fn new(base: *mut u32, size: usize) -> MmioRegion {
        MmioRegion { base, size }
    }
}

impl RegisterBlock for MmioRegion {
    fn size(&self) -> usize {
        self.size
    }

    fn read(&self, offset: usize) -> u32 {
        let index = word_index(offset, self.size);
        unsafe { self.base.add(index).read_volatile() }
    }

    fn write(&mut self, offset: usize, value: u32) {
        let index = word_index(offset, self.size);
        unsafe { self.base.add(index).write_volatile(value) }
    }
}

/// A single access observed by [`SimRegisters`].
#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Access {
    Read { offset: usize, value: u32 },
    Write { offset: usize, value: u32 },
}

impl Access {
    pub fn offset(&self) -> usize {
        match *self {
            Access::Read { offset, .. } | Access::Write { offset, .. } => offset,
        }
    }
}

/// An in-memory register block of `WORDS` registers.
///
/// Registers behave like plain memory: a read returns the last value
/// written. Every access through [`RegisterBlock`] is appended to a log of
/// at most [`SIM_LOG_CAPACITY`] entries; once the log is full further
/// accesses still take effect but are no longer recorded and
/// [`SimRegisters::overflowed`] reports `true`.
pub struct SimRegisters<const WORDS: usize> {
    words: [u32; WORDS],
    log: RefCell<Vec<Access, SIM_LOG_CAPACITY>>,
    overflowed: Cell<bool>,
}

impl<const WORDS: usize> SimRegisters<WORDS> {
    /// All registers zeroed, empty log.
    pub const fn new() -> Self {
        SimRegisters {
            words: [0; WORDS],
            log: RefCell::new(Vec::new()),
            overflowed: Cell::new(false),
        }
    }

    /// Set a register without recording an access.
    pub fn preset(&mut self, offset: usize, value: u32) {
        self.words[word_index(offset, WORDS * 4)] = value;
    }

    /// Inspect a register without recording an access.
    pub fn peek(&self, offset: usize) -> u32 {
        self.words[word_index(offset, WORDS * 4)]
    }

    /// Copy of the recorded accesses, oldest first.
    pub fn accesses(&self) -> Vec<Access, SIM_LOG_CAPACITY> {
        self.log.borrow().clone()
    }

    /// Low bytes of every recorded write to `offset`, in order.
    pub fn written_bytes(&self, offset: usize) -> Vec<u8, SIM_LOG_CAPACITY> {
        self.log
            .borrow()
            .iter()
            .filter_map(|access| match *access {
                Access::Write { offset: o, value } if o == offset => Some(value as u8),
                _ => None,
            })
            .collect()
    }

    pub fn overflowed(&self) -> bool {
        self.overflowed.get()
    }

    pub fn clear_log(&mut self) {
        self.log.get_mut().clear();
        self.overflowed.set(false);
    }

    fn record(&self, access: Access) {
        if self.log.borrow_mut().push(access).is_err() {
            self.overflowed.set(true);
        }
    }
}

impl<const WORDS: usize> Default for SimRegisters<WORDS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const WORDS: usize> RegisterBlock for SimRegisters<WORDS> {
    fn size(&self) -> usize {
        WORDS * 4
    }

    fn read(&self, offset: usize) -> u32 {
        let value = self.words[word_index(offset, WORDS * 4)];
        self.record(Access::Read { offset, value });
        value
    }

    fn write(&mut self, offset: usize, value: u32) {
        self.words[word_index(offset, WORDS * 4)] = value;
        self.record(Access::Write { offset, value });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_return_last_write() {
        let mut regs = SimRegisters::<4>::new();
        regs.write(0x8, 0xdead_beef);
        assert_eq!(regs.read(0x8), 0xdead_beef);
        assert_eq!(regs.read(0x4), 0);
    }

    #[test]
    fn accesses_are_logged_in_order() {
        let mut regs = SimRegisters::<4>::new();
        regs.preset(0x0, 7);
        let _ = regs.read(0x0);
        regs.write(0xc, 1);

        let log = regs.accesses();
        assert_eq!(
            log.as_slice(),
            &[
                Access::Read {
                    offset: 0x0,
                    value: 7
                },
                Access::Write {
                    offset: 0xc,
                    value: 1
                },
            ]
        );
        assert_eq!(log[1].offset(), 0xc);
    }

    #[test]
    fn preset_and_peek_are_not_logged() {
        let mut regs = SimRegisters::<2>::new();
        regs.preset(0x4, 3);
        assert_eq!(regs.peek(0x4), 3);
        assert!(regs.accesses().is_empty());
    }

    #[test]
    fn written_bytes_filters_by_offset() {
        let mut regs = SimRegisters::<2>::new();
        regs.write(0x0, b'h' as u32);
        regs.write(0x4, 0xff);
        regs.write(0x0, b'i' as u32);
        assert_eq!(regs.written_bytes(0x0).as_slice(), b"hi");
    }

    #[test]
    fn log_overflow_is_reported() {
        let mut regs = SimRegisters::<1>::new();
        for i in 0..SIM_LOG_CAPACITY as u32 {
            regs.write(0x0, i);
        }
        assert!(!regs.overflowed());
        regs.write(0x0, 0x1234);
        assert!(regs.overflowed());
        assert_eq!(regs.peek(0x0), 0x1234);

        regs.clear_log();
        assert!(!regs.overflowed());
        assert!(regs.accesses().is_empty());
    }

    #[test]
    #[should_panic = "not word aligned"]
    fn misaligned_offset_panics() {
        let regs = SimRegisters::<4>::new();
        let _ = regs.read(0x2);
    }

    #[test]
    #[should_panic = "outside a block"]
    fn out_of_range_offset_panics() {
        let mut regs = SimRegisters::<2>::new();
        regs.write(0x8, 0);
    }

    #[test]
    fn mmio_region_accesses_backing_memory() {
        let mut backing = [0u32; 4];
        let mut region = unsafe { MmioRegion::new(backing.as_mut_ptr(), 16) };
        region.write(0x8, 0x1);
        assert_eq!(region.read(0x8), 0x1);
        assert_eq!(region.size(), 16);
        assert_eq!(backing[2], 0x1);
    }
}
