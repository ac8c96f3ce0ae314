use std::path::PathBuf;

use courier_chat::ChatRuntime;

/// Shared context injected into teloxide's dispatcher.
#[derive(Clone)]
pub struct AdapterContext {
    pub runtime: ChatRuntime,
    /// Where downloaded media lands. Files are keyed by a unix timestamp
    /// and accumulate for the life of the deployment (no cleanup policy).
    pub data_dir: PathBuf,
}
