mod identity;
mod request;
mod rules;
mod session;
mod snapshot;
mod status;

pub use identity::*;
pub use request::*;
pub use rules::*;
pub use session::*;
pub use snapshot::*;
pub use status::*;
