#![no_std]
#![cfg_attr(not(test), no_main)]
// SPDX-FileCopyrightText: 2022 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use greeting_sys::greeting::hello;
use greeting_sys::hart::Mhartid;
use greeting_sys::mmio::MmioRegion;
use greeting_sys::platform::{Platform, UartConfig};
use greeting_sys::uart::log::LOGGER;
use greeting_sys::uart::Uart;
use log::{debug, LevelFilter};

#[cfg(not(test))]
use riscv_rt::entry;

const PLATFORM: Platform = Platform::FREEDOM_E300;

// riscv-rt parks every hart but hart 0 before `main`, so only one greeting is
// printed per boot.
#[allow(static_mut_refs)]
#[cfg_attr(not(test), entry)]
fn main() -> ! {
    let regs = unsafe {
        MmioRegion::new(PLATFORM.uart0_base as *mut u32, UartConfig::SIFIVE_SIZE)
    };
    let Ok(mut uart) = Uart::new(regs, PLATFORM.uart) else {
        park()
    };

    unsafe {
        LOGGER.set_logger(uart.clone());
        LOGGER.display_source = LevelFilter::Warn;
        log::set_logger_racy(&LOGGER).ok();
        log::set_max_level_racy(LevelFilter::Info);
    }

    let status = hello(&mut uart, &mut Mhartid, &[]);
    debug!("hello returned {}", status);

    park()
}

fn park() -> ! {
    loop {
        unsafe { riscv::asm::wfi() };
    }
}

#[panic_handler]
fn panic_handler(_info: &core::panic::PanicInfo) -> ! {
    park()
}
