mod poller;
mod status;

pub use poller::{start, LoadState, PollHandle};
pub use status::{fill_percentage, OccupancyStatus, StatusColor};
