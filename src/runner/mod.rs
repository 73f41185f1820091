//! @ai:module:intent Prediction runs against text-generation services
//! @ai:module:layer infrastructure
//! @ai:module:public_api GeneratorTrait, HttpGenerator, MockGenerator, PredictionExecutor

pub mod client;
pub mod executor;

pub use client::{GeneratorTrait, HttpGenerator, MockGenerator};
pub use executor::{render_input, PredictionExecutor, PredictionSummary};
