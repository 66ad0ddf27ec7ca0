//! `folio draft` command implementation.

use std::path::PathBuf;

use clap::Args;

use super::content::{ContentArgs, read_surface};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the draft command.
#[derive(Args)]
pub(crate) struct DraftArgs {
    /// Page name.
    page: String,

    /// Edit surface JSON file.
    #[arg(short, long)]
    surface: PathBuf,

    #[command(flatten)]
    content: ContentArgs,
}

impl DraftArgs {
    /// Print the working content after folding in the surface. Nothing is persisted.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let surface = read_surface(&self.surface)?;
        let controller = self.content.controller()?;

        let mut session = controller.load_page_content(&self.page)?;
        let warnings = controller.save_draft(&mut session, &surface);
        output.merge_warnings(&warnings);

        output.data(&serde_json::to_string_pretty(session.working())?);
        Ok(())
    }
}
