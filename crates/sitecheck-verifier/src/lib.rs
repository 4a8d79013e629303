pub mod batch;
pub mod error;
pub mod extract;
pub mod matcher;
pub mod normalize;
pub mod probe;
mod retry;

pub use batch::BatchScheduler;
pub use error::VerifierError;
pub use extract::TextExtractor;
pub use matcher::{AiMatcher, FactMatcher, FactReport, TextMatcher};
pub use probe::ProtocolProbe;
