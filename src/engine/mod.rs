mod executor;

pub use executor::GraphExecutor;
