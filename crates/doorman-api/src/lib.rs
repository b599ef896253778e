// doorman-api: Async client for the MyQ device API and the session that drives it

pub mod door;
pub mod error;
pub mod myq;
pub mod session;
pub mod transport;

pub use door::{DoorState, TargetState};
pub use error::Error;
pub use myq::{Credentials, MyQClient};
pub use session::DeviceSession;
pub use transport::{TlsMode, TransportConfig};
