pub mod bugs;
pub mod docgen;
pub mod metrics;
pub mod review;
