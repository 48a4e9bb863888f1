pub mod backend;
pub mod invoker;
pub mod outcome;
pub mod programs;
pub mod record;
pub mod scripted;

pub use backend::ComputeBackend;
pub use invoker::ProcessInvoker;
pub use outcome::{FailureCause, InvocationOutcome};
pub use programs::{Computation, ComputationKind};
pub use record::decode_record;
pub use scripted::ScriptedBackend;
