// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod batch;
pub mod classifier;
pub mod config;
pub mod logging;
pub mod metadata;
pub mod pipeline;
pub mod robots;
pub mod storage;
pub mod topics;
