// SPDX-FileCopyrightText: 2022 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

pub mod log;

use ufmt::derive::uDebug;

use crate::mmio::RegisterBlock;
use crate::platform::{LayoutError, UartConfig};

#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub struct UartStatus {
    pub receive_fifo_empty: bool,
    pub transmit_fifo_full: bool,
}

#[derive(uDebug, Debug, PartialEq, Eq)]
pub struct TransmitFifoFull;
#[derive(uDebug, Debug, PartialEq, Eq)]
pub struct ReceiveFifoEmpty;

/// `Uart` drives a SiFive style universal asynchronous receiver-transmitter.
///
/// Nothing arbitrates between harts: when several harts drive the same UART
/// their control writes and output bytes interleave in no particular order.
#[derive(Clone)]
pub struct Uart<R> {
    regs: R,
    config: UartConfig,
}

impl<R: RegisterBlock> Uart<R> {
    /// Create a new [`Uart`] over `regs` with the register layout `config`.
    ///
    /// Fails when a register of `config` does not fit inside `regs`.
    pub fn new(regs: R, config: UartConfig) -> Result<Uart<R>, LayoutError> {
        config.validate(regs.size())?;
        Ok(Uart { regs, config })
    }

    pub fn regs(&self) -> &R {
        &self.regs
    }

    pub fn into_regs(self) -> R {
        self.regs
    }

    /// Enable the transmitter. The control register is overwritten as a
    /// whole with the enable value; no other bits survive.
    pub fn enable_tx(&mut self) {
        self.regs.write(self.config.txctrl, self.config.txen);
    }

    /// Enable the receiver, overwriting the whole control register.
    pub fn enable_rx(&mut self) {
        self.regs.write(self.config.rxctrl, self.config.rxen);
    }

    /// Program the baud rate divisor.
    pub fn set_divisor(&mut self, div: u32) {
        self.regs.write(self.config.div, div);
    }

    /// Transmit FIFO status. Only inspects `txdata`; reading `rxdata` would
    /// pop a byte from the receive FIFO.
    fn transmit_fifo_full(&self) -> bool {
        self.regs.read(self.config.txdata) & self.config.tx_full != 0
    }

    /// UART status register output.
    ///
    /// Reading the receive status consumes a pending byte on real hardware,
    /// so prefer [`Uart::try_receive`] when data is expected.
    pub fn read_status(&self) -> UartStatus {
        let rx = self.regs.read(self.config.rxdata);
        UartStatus {
            receive_fifo_empty: rx & self.config.rx_empty != 0,
            transmit_fifo_full: self.transmit_fifo_full(),
        }
    }

    /// The `receive` function attempts to receive data from the UART. If no
    /// data is available, it keeps looping until data is available.
    pub fn receive(&self) -> u8 {
        loop {
            if let Ok(val) = self.try_receive() {
                return val;
            }
        }
    }

    /// The `try_receive` function attempts to receive data from the UART. If no
    /// data is available, it returns an error.
    pub fn try_receive(&self) -> Result<u8, ReceiveFifoEmpty> {
        let rx = self.regs.read(self.config.rxdata);
        if rx & self.config.rx_empty != 0 {
            Err(ReceiveFifoEmpty)
        } else {
            Ok(rx as u8)
        }
    }

    /// The `send` function sends the given data to the UART. If the UART is
    /// unable to accept the data, it keeps looping until it can send the data.
    pub fn send(&mut self, data: u8) {
        loop {
            if let Ok(()) = self.try_send(data) {
                return;
            }
        }
    }

    /// The `try_send` function attempts to send the given data to the UART. If
    /// the UART is unable to accept the data, it returns an error.
    pub fn try_send(&mut self, data: u8) -> Result<(), TransmitFifoFull> {
        if self.transmit_fifo_full() {
            Err(TransmitFifoFull)
        } else {
            self.regs.write(self.config.txdata, data as u32);
            Ok(())
        }
    }
}

impl<R: RegisterBlock> ufmt::uWrite for Uart<R> {
    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for b in s.bytes() {
            self.send(b);
        }
        Ok(())
    }

    type Error = ();
}

impl<R: RegisterBlock> core::fmt::Write for Uart<R> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for b in s.bytes() {
            self.send(b);
        }
        Ok(())
    }
}
