// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod api;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod errors;
pub mod network;
pub mod persistence;
pub mod scoring;
pub mod server;
pub mod telemetry;
pub mod worker;
