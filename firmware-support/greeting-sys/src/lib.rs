// SPDX-FileCopyrightText: 2022 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), no_std)]

pub mod greeting;
pub mod hart;
pub mod mmio;
pub mod platform;
pub mod uart;
