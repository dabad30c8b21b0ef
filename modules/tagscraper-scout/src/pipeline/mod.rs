pub mod channel;
pub mod orchestrator;

pub use channel::{ChannelProcessor, ChannelReport, KeyOutcome, KeyReport};
pub use orchestrator::{Orchestrator, RunReport};
