mod cli;
mod context;
mod definition;
mod executor;
mod init;
mod monitor;
mod progress;
mod run;
mod shutdown;
mod types;

pub mod prelude {
    pub use crate::cli::ScenarioCli;
    pub use crate::context::{AgentContext, RunnerContext, UserValuesConstraint};
    pub use crate::definition::{HookResult, ScenarioDefinitionBuilder};
    pub use crate::init::init;
    pub use crate::run::run;
    pub use crate::types::GustResult;
    pub use gust_instruments::{OperationRecord, Reporter};
}
