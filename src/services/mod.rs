pub mod orchestrator;
pub mod profiler;

pub use orchestrator::DirectoryOrchestrator;
pub use profiler::FileProfiler;
