//! Domain types for sigwatch

pub mod candle;
pub mod instrument;
pub mod signal;

pub use candle::{closes, is_chronological, Candle};
pub use instrument::{Instrument, InstrumentClass};
pub use signal::{Direction, Signal};
