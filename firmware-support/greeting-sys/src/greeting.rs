// SPDX-FileCopyrightText: 2022 Google LLC
//
// SPDX-License-Identifier: Apache-2.0
/*! The hart greeting.

[`hello`] enables the UART transmitter, reads the identifier of the hart it
runs on and prints

```text
Hello world from core <c>!!!\r\n
```

where `<c>` is the single byte `'0' + hart_id`. Only harts 0 through 9 come
out as digits; hart 10 prints `:`, hart 17 prints `A` and so on. The sum is
taken on a byte, so identifiers wrap every 256.

Every hart may run [`hello`] on the same UART. Nothing serialises them, so
their control writes and greetings interleave arbitrarily.
*/

use log::{debug, trace};
use ufmt::uwrite;

use crate::hart::HartId;
use crate::mmio::RegisterBlock;
use crate::uart::Uart;

/// Status returned by [`hello`].
pub const EXIT_SUCCESS: i32 = 0;

/// The byte printed for `hart_id`: `'0' + hart_id`, computed on a byte.
///
/// The byte goes to the UART as is, so harts past 79 print a single
/// non-ASCII byte rather than an encoded character.
pub fn core_byte(hart_id: usize) -> u8 {
    b'0'.wrapping_add(hart_id as u8)
}

/// Greet from the current hart.
///
/// `args` is accepted for the sake of the entry point contract and ignored.
/// Output errors are not inspected; the status is always [`EXIT_SUCCESS`].
pub fn hello<R, H>(uart: &mut Uart<R>, harts: &mut H, _args: &[&str]) -> i32
where
    R: RegisterBlock,
    H: HartId,
{
    uart.enable_tx();
    trace!("transmitter enabled");

    let hart_id = harts.hart_id();
    debug!("greeting from hart {}", hart_id);

    let _ = uwrite!(uart, "Hello world from core ");
    uart.send(core_byte(hart_id));
    let _ = uwrite!(uart, "!!!\r\n");
    EXIT_SUCCESS
}
