// SPDX-FileCopyrightText: 2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0
use crate::mmio::MmioRegion;
use crate::uart::Uart;

// `log::Record` arguments only format through core::fmt, not ufmt.
use core::fmt::Write;
use log::LevelFilter;

/// The `log` sink of the firmware, writing through a UART.
///
/// Point it at a UART with [`UartLogger::set_logger`], then hand it to
/// `log::set_logger_racy`.
///
/// # Safety
/// Only sound with a single thread of execution. `UartLogger` claims `Send`
/// and `Sync` while the `Uart` inside it is neither.
pub static mut LOGGER: UartLogger = UartLogger {
    uart: None,
    display_level: LevelFilter::Trace,
    display_source: LevelFilter::Trace,
};

/// Formats `log` records onto a UART. Use the [`LOGGER`] instance rather
/// than building another one.
pub struct UartLogger {
    uart: Option<Uart<MmioRegion>>,
    /// Records at or above this severity are prefixed with their level.
    pub display_level: LevelFilter,
    /// Records at or above this severity are prefixed with `file:line`.
    pub display_source: LevelFilter,
}

impl UartLogger {
    /// Route log output to `uart`.
    ///
    /// # Safety
    /// Stores a non-`Sync` value in a `static mut`; callers must guarantee
    /// that only one hart logs.
    pub unsafe fn set_logger(&mut self, uart: Uart<MmioRegion>) {
        self.uart = Some(uart);
    }
}

/// Write `record` as one line to `w`, prefixed according to the display
/// thresholds.
pub fn write_record<W: Write>(
    w: &mut W,
    record: &log::Record,
    display_level: LevelFilter,
    display_source: LevelFilter,
) -> core::fmt::Result {
    if record.level() <= display_level {
        write!(w, "{} | ", record.level())?;
    }
    if record.level() <= display_source {
        write!(
            w,
            "{}:{} - ",
            record.file().unwrap_or("?"),
            record.line().unwrap_or(0)
        )?;
    }
    writeln!(w, "{}", record.args())
}

impl log::Log for UartLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    #[allow(static_mut_refs)]
    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            unsafe {
                match &mut LOGGER.uart {
                    Some(l) => {
                        let _ = write_record(l, record, self.display_level, self.display_source);
                    }
                    None => panic!("Logger not set"),
                }
            }
        }
    }

    fn flush(&self) {}
}

unsafe impl core::marker::Send for UartLogger {}
unsafe impl core::marker::Sync for UartLogger {}
