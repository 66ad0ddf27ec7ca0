//! `folio show` command implementation.

use clap::Args;

use super::content::ContentArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the show command.
#[derive(Args)]
pub(crate) struct ShowArgs {
    /// Page name.
    page: String,

    #[command(flatten)]
    content: ContentArgs,
}

impl ShowArgs {
    /// Print the page's document, or its default template if never written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let controller = self.content.controller()?;
        let session = controller.load_page_content(&self.page)?;

        match &session.base().revision {
            Some(revision) => output.info(&format!("Revision: {revision}")),
            None => output.warning("Page has not been published; showing default content"),
        }
        output.data(&serde_json::to_string_pretty(&session.base().document)?);
        Ok(())
    }
}
