//! Time-series textual codecs for tsprompt.
//!
//! Turns a window of timestamped readings into one of nine textual shapes
//! and turns a model's reply back into numbers:
//!
//! ```
//! use tsprompt_codec::{format_timeseries, parse_timeseries};
//! use tsprompt_core::{TimeseriesPoint, TsFormat, TsType};
//!
//! let window = vec![
//!     TimeseriesPoint::new("2016-07-01", 1.0),
//!     TimeseriesPoint::new("2016-07-02", 2.0),
//! ];
//! let text = format_timeseries(&window, TsFormat::Csv, TsType::Numeric);
//! assert_eq!(text, "Date,Value\n2016-07-01,1.0\n2016-07-02,2.0");
//! assert_eq!(parse_timeseries(&text, TsFormat::Csv, TsType::Numeric).unwrap(), vec![1.0, 2.0]);
//! ```
//!
//! Every function here is pure and safe to call from any thread.

pub mod formats;
pub mod roundtrip;
pub mod value;

pub use formats::{Direction, TimeseriesCodec, codec};
pub use roundtrip::{ParsedSeries, SeriesCodec, format_timeseries, parse_timeseries};
pub use value::{EncodedPoint, EncodedValue, RawPoint, decode, encode, render_value};
