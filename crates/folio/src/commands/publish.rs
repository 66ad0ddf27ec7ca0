//! `folio publish` command implementation.

use std::path::PathBuf;

use clap::Args;

use super::content::{ContentArgs, read_surface};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the publish command.
#[derive(Args)]
pub(crate) struct PublishArgs {
    /// Page name.
    page: String,

    /// Edit surface JSON file.
    #[arg(short, long)]
    surface: PathBuf,

    #[command(flatten)]
    content: ContentArgs,
}

impl PublishArgs {
    /// Publish the surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be read, the page was published
    /// by someone else in the meantime, or the write fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let surface = read_surface(&self.surface)?;
        let controller = self.content.controller()?;

        let mut session = controller.load_page_content(&self.page)?;
        let outcome = controller.publish(&mut session, &self.page, &surface)?;

        output.merge_warnings(&outcome.warnings);
        match &outcome.page.revision {
            Some(revision) => output.success(&format!("Published '{}' ({revision})", self.page)),
            None => output.success(&format!("Published '{}'", self.page)),
        }
        Ok(())
    }
}
