// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod github;
pub mod oracle;

pub use github::GithubProofSource;
pub use oracle::{BoundedOracle, ChainOracle, DistributionReader, IdaReader};
