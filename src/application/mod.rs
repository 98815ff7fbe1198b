pub mod scan_loop;
pub mod shutdown;

pub use scan_loop::{LoopState, ScanError, ScanLoopConfig, ScanOrchestrator};
pub use shutdown::ShutdownSignal;
