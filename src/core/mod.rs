pub mod diagnostics;
pub mod features;
pub mod hardware;
pub mod vendor;
