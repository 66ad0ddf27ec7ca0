//! CLI command implementations.

mod content;
pub(crate) mod draft;
pub(crate) mod publish;
pub(crate) mod serve;
pub(crate) mod show;

pub(crate) use draft::DraftArgs;
pub(crate) use publish::PublishArgs;
pub(crate) use serve::ServeArgs;
pub(crate) use show::ShowArgs;
