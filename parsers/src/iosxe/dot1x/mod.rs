//! IEEE 802.1X port authentication show commands.

mod detail;
mod statistics;
mod summary;

pub use detail::{ShowDot1x, ShowDot1xAllDetail};
pub use statistics::{ShowDot1xAllStatistics, ShowDot1xInterfaceStatistics, ShowDot1xStatistics};
pub use summary::{ShowDot1xAllCount, ShowDot1xAllSummary};
