use crate::Timestamp;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Input rejected at the [`Series`](crate::Series) boundary.
///
/// Indicator warm-up is never an error: values that need more history
/// than is available are `None`.
#[derive(Error, PartialEq, Eq, Clone, Copy, Debug)]
pub enum Error {
    #[error("series is empty")]
    EmptySeries,

    #[error(
        "bar {index} is out of order: open_time {current} does not follow {previous}"
    )]
    NotChronological {
        index: usize,
        previous: Timestamp,
        current: Timestamp,
    },

    #[error("bar {index} has a non-finite {field}")]
    NonFinite { index: usize, field: &'static str },
}
