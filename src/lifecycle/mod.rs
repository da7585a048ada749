//! Process lifecycle: signal handling and the assistant loop thread

mod shutdown;
mod worker;

pub use shutdown::ShutdownSignal;
pub use worker::AssistantWorker;
