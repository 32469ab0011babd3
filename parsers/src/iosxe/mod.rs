//! Parsers for Cisco IOS-XE show commands.

pub mod dot1x;
mod parameter_map;
mod vrf;

pub use parameter_map::ShowParameterMapTypeSubscriberAttributeToService;
pub use vrf::ShowVrfDetail;
