//! `ecocrop-agronomy` — crop/soil domain model and deterministic advisory math.
//!
//! Everything in this crate is a pure function of its inputs: no RNG, no
//! clock, no I/O. The API layer owns transport; `ecocrop-advisor` owns the
//! free-text diagnosis path.

pub mod crop;
pub mod irrigation;
pub mod reading;
pub mod recommend;
pub mod soil;

pub use crop::Crop;
pub use irrigation::{IrrigationAction, IrrigationAdvice, irrigation_advice};
pub use reading::FieldReading;
pub use recommend::{CropScore, rank_crops, recommend_by_soil};
pub use soil::SoilType;
