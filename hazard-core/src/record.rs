//! Types and traits for recording values emitted by environments and evaluators.
//!
//! # Core Components
//!
//! * [`Record`] - A container for key-value pairs of various data types
//! * [`RecordValue`] - The types of values that can be stored
//! * [`Recorder`] - Writes records to some destination
//! * [`BufferedRecorder`] - Keeps records in memory
//!
//! # Basic Usage
//!
//! ```rust
//! use hazard_core::record::{Record, RecordValue};
//!
//! let step = 1;
//! let hazard_distances = vec![3f32, 4.5, 7.0];
//! let reward = -1f32;
//!
//! let mut record = Record::empty();
//! record.insert("step", RecordValue::Scalar(step as f32));
//! record.insert("reward", RecordValue::Scalar(reward));
//! record.insert("hazard_distances", RecordValue::Array1(hazard_distances));
//! assert_eq!(record.get_scalar("reward").unwrap(), -1.0);
//! ```
mod base;
mod buffered_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use recorder::Recorder;
