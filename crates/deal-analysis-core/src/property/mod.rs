pub mod analysis;
pub mod defaults;
pub mod expenses;
pub mod financing;
pub mod income;
pub mod inputs;
pub mod metrics;
