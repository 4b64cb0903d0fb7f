pub mod process_runner;

pub use process_runner::{
    display_command, ProcessError, ProcessOutput, ProcessRunner, SystemProcessRunner,
};

#[cfg(test)]
pub use process_runner::MockProcessRunner;
