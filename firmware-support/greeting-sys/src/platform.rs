// SPDX-FileCopyrightText: 2022 Google LLC
//
// SPDX-License-Identifier: Apache-2.0
//! Platform descriptions.
//!
//! Addresses and bit masks are carried in plain `const` values and handed to
//! the drivers, so the same firmware logic runs against different memory
//! maps or a simulator.

use core::fmt;

use ufmt::derive::uDebug;

/// Register offsets and bit masks of a SiFive style UART.
#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub struct UartConfig {
    /// Transmit data register. Writing queues a byte; reading reports
    /// whether the FIFO is full.
    pub txdata: usize,
    /// Receive data register.
    pub rxdata: usize,
    /// Transmit control register.
    pub txctrl: usize,
    /// Receive control register.
    pub rxctrl: usize,
    /// Baud rate divisor.
    pub div: usize,
    /// Value written to `txctrl` to enable the transmitter.
    pub txen: u32,
    /// Value written to `rxctrl` to enable the receiver.
    pub rxen: u32,
    /// Bit of `txdata` set while the transmit FIFO is full.
    pub tx_full: u32,
    /// Bit of `rxdata` set while the receive FIFO is empty.
    pub rx_empty: u32,
}

impl UartConfig {
    pub const SIFIVE: UartConfig = UartConfig {
        txdata: 0x00,
        rxdata: 0x04,
        txctrl: 0x08,
        rxctrl: 0x0c,
        div: 0x18,
        txen: 0x1,
        rxen: 0x1,
        tx_full: 1 << 31,
        rx_empty: 1 << 31,
    };

    /// Bytes spanned by the SiFive register file, `txdata` through `div`.
    pub const SIFIVE_SIZE: usize = 0x1c;

    /// Check that every register lies word aligned inside a block of
    /// `block_size` bytes.
    pub fn validate(&self, block_size: usize) -> Result<(), LayoutError> {
        for offset in [self.txdata, self.rxdata, self.txctrl, self.rxctrl, self.div] {
            if offset % 4 != 0 {
                return Err(LayoutError::Misaligned { offset });
            }
            if offset.checked_add(4).map_or(true, |end| end > block_size) {
                return Err(LayoutError::OutOfRange { offset, block_size });
            }
        }
        Ok(())
    }
}

/// A register layout that does not fit the block it is applied to.
#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub enum LayoutError {
    Misaligned { offset: usize },
    OutOfRange { offset: usize, block_size: usize },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::Misaligned { offset } => {
                write!(f, "register offset {offset:#x} is not word aligned")
            }
            LayoutError::OutOfRange { offset, block_size } => write!(
                f,
                "register offset {offset:#x} lies outside a block of {block_size:#x} bytes"
            ),
        }
    }
}

/// Where the peripherals of a board live.
#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Platform {
    pub uart0_base: usize,
    pub uart: UartConfig,
}

impl Platform {
    /// SiFive Freedom E300 family: UART0 at `0x1001_3000`.
    pub const FREEDOM_E300: Platform = Platform {
        uart0_base: 0x1001_3000,
        uart: UartConfig::SIFIVE,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sifive_layout_fits_its_register_file() {
        assert_eq!(UartConfig::SIFIVE.validate(UartConfig::SIFIVE_SIZE), Ok(()));
    }

    #[test]
    fn sifive_txctrl_and_enable_bit() {
        let uart = Platform::FREEDOM_E300.uart;
        assert_eq!(uart.txctrl, 0x08);
        assert_eq!(uart.txen, 0x1);
    }

    #[test]
    fn layout_larger_than_block_is_rejected() {
        assert_eq!(
            UartConfig::SIFIVE.validate(0x10),
            Err(LayoutError::OutOfRange {
                offset: 0x18,
                block_size: 0x10
            })
        );
    }

    #[test]
    fn misaligned_register_is_rejected() {
        let config = UartConfig {
            txctrl: 0x09,
            ..UartConfig::SIFIVE
        };
        assert_eq!(
            config.validate(UartConfig::SIFIVE_SIZE),
            Err(LayoutError::Misaligned { offset: 0x09 })
        );
    }

    #[test]
    fn layout_error_display() {
        let err = LayoutError::OutOfRange {
            offset: 0x18,
            block_size: 0x10,
        };
        assert_eq!(
            err.to_string(),
            "register offset 0x18 lies outside a block of 0x10 bytes"
        );
    }
}
