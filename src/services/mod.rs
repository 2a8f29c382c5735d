pub mod data_fetcher;
pub mod fallback_store;
pub mod form_aggregator;
pub mod goal_model;
pub mod predictor;
pub mod provider;
pub mod rating_estimator;
pub mod simulator;

pub use data_fetcher::*;
pub use fallback_store::*;
pub use form_aggregator::*;
pub use goal_model::*;
pub use predictor::*;
pub use provider::*;
pub use rating_estimator::*;
pub use simulator::*;
