//! A clock whose "now" comes from a remote time API instead of the local
//! system clock, optionally localized to a given IP address.
//!
//! ```no_run
//! use ipclock::IpClock;
//!
//! let clock = IpClock::new(Some("8.8.8.8".to_string()));
//! match clock.now() {
//!     Ok(now) => println!("{} ({})", now.to_rfc3339(), now.timezone()),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

pub mod args;
pub mod clock;
pub mod error;
pub mod ip_clock;
pub mod parser;
pub mod request_url;
pub mod timestamp;
pub mod transport;

pub use clock::{Clock, FixedClock};
pub use error::{InvalidResponse, IpClockError, TransportError};
pub use ip_clock::{IpClock, IpClockBuilder, DEFAULT_API_URL};
pub use parser::{DefaultResponseParser, RawResponse, ResponseParser, TimeApiIoParser};
pub use timestamp::Timestamp;
pub use transport::{HttpResponse, HttpTransport, UreqTransport};
