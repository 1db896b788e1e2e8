pub mod event_loop;
pub mod io;
pub mod machine;
pub mod orchestrator;
pub mod runner;
pub mod state;

pub use orchestrator::Session;
