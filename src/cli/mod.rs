// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Parses flags, installs logging, and hands the run to Layer 2.
//
// Order matters: the output directory has to exist before the
// log file inside it can be opened, so logging is installed
// between TrainUseCase::prepare and TrainUseCase::execute.

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::TrainArgs;

use crate::application::train_use_case::TrainUseCase;

#[derive(Parser, Debug)]
#[command(
    name = "imp-arg-trainer",
    version,
    about = "Train and cross-validate the implicit argument binary classifier."
)]
pub struct Cli {
    #[command(flatten)]
    pub args: TrainArgs,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let use_case = TrainUseCase::new(self.args.into());

        let layout = use_case.prepare()?;
        use_case.log_config(&layout).init()?;

        tracing::info!("Output directory: '{}'", layout.path_prefix().display());
        use_case.execute(&layout)?;
        Ok(())
    }
}
