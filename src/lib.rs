// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Single-page SEO crawler: robots.txt gate, metadata extraction, topic
//! classification and keyword extraction behind one [`Pipeline`] entry point.

pub mod app;
pub mod models;
pub mod services;

pub use models::config::FetchConfig;
pub use models::crawler::CrawlResult;
pub use services::pipeline::Pipeline;
