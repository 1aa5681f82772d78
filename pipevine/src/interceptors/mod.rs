//! Stage decorators: retry and side-effect injection.

mod observe;
mod retry;

pub use observe::{including, try_including, Including, TryIncluding};
pub use retry::{retrying, Attempts, Retry};
