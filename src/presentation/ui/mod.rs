pub mod display;

pub use display::{CheckoutState, OutputFormat, ResultFormatter};
