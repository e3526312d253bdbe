use crate::{Engine, EngineError, InitMode, RunOutcome};
use log::debug;
use rand::RngExt;
use std::path::PathBuf;

/// A user action forwarded from the control panel.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Regenerate (or resize) the random point set.
    Generate { dimension: usize, count: usize },
    Load { path: PathBuf },
    Initialize { k: usize, mode: InitMode },
    Step,
    StepBack,
    RunThrough,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    Ran(RunOutcome),
}

impl<R: RngExt> Engine<R> {
    pub fn apply(&mut self, command: Command) -> Result<CommandOutcome, EngineError> {
        debug!("applying {command:?}");
        match command {
            Command::Generate { dimension, count } => {
                self.generate(dimension, count)?;
            }
            Command::Load { path } => {
                self.load_from_file(path)?;
            }
            Command::Initialize { k, mode } => {
                self.initialize(k, mode)?;
            }
            Command::Step => {
                self.step()?;
            }
            Command::StepBack => {
                self.step_back()?;
            }
            Command::RunThrough => return self.run_through().map(CommandOutcome::Ran),
        }
        Ok(CommandOutcome::Applied)
    }
}
