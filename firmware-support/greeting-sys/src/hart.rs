// SPDX-FileCopyrightText: 2022 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use riscv::register::mhartid;

/// Source of the identifier of the hardware thread running the code.
pub trait HartId {
    fn hart_id(&mut self) -> usize;
}

/// Reads the `mhartid` CSR. Requires machine mode.
#[derive(Copy, Clone, Default)]
pub struct Mhartid;

impl HartId for Mhartid {
    fn hart_id(&mut self) -> usize {
        mhartid::read()
    }
}

/// Always reports the same hart, for tests and simulation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FixedHart(pub usize);

impl HartId for FixedHart {
    fn hart_id(&mut self) -> usize {
        self.0
    }
}
