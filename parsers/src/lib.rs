//! Show-command output parsers for network devices.
//!
//! Each parser turns the free-form text a device prints for one show command
//! into a nested [`Value`](showparse_core::Value) tree and validates it
//! against the parser's [`Schema`](showparse_core::Schema) before handing it
//! back.
//!
//! # Main entry points
//!
//! - [`ShowParser::parse`] : parse captured output.
//! - [`ShowParser::execute`] : run the command through a [`Device`] and parse
//!   what comes back.
//! - [`XmlDecoder`] / [`ModelDecoder`] : alternate front ends for parsers
//!   that also read the XML or structured model rendering.
//! - [`batch::parse_batch`] : parse many captures on a thread pool.
//!
//! Text decoders are rule tables run by the line-scan engine in [`engine`];
//! the concrete IOS-XE parsers live in [`iosxe`].
//!
//! # Example
//!
//! ```
//! use showparse_core::Value;
//! use showparse_parsers::ShowParser;
//! use showparse_parsers::iosxe::dot1x::ShowDot1xAllDetail;
//!
//! let output = "\
//! Sysauthcontrol                 Enabled
//! Dot1x Protocol Version               3
//!
//! Dot1x Info for GigabitEthernet1/0/9
//! -----------------------------------
//! PAE                       = AUTHENTICATOR
//! PortControl               = AUTO
//! ";
//!
//! let value = ShowDot1xAllDetail.parse(output)?;
//! assert_eq!(value.get_path(&["system_auth_control"]), Some(&Value::from(true)));
//! assert_eq!(
//!     value.get_path(&["interfaces", "GigabitEthernet1/0/9", "port_control"]),
//!     Some(&Value::from("auto"))
//! );
//! # Ok::<(), showparse_parsers::ParseError>(())
//! ```

pub mod batch;
mod command;
pub mod config;
pub mod decoders;
pub mod device;
pub mod engine;
mod error;
pub mod iosxe;
mod parser;
pub mod util;

pub use command::CommandTemplate;
pub use device::{Device, DeviceError, ProcessDevice, StaticDevice};
pub use error::{ParseError, Result};
pub use parser::{ModelDecoder, ShowParser, XmlDecoder};
