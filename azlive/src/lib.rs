// AzLive
//
// Provisions a live-streaming session against Azure Media Services and
// tears it down again: live event + recording output + playback URLs.

pub mod config;
pub mod logging;
pub mod manifest;
pub mod session;

pub use config::{load_config, Config};
pub use session::{run_session, SessionError, SessionHandles};
