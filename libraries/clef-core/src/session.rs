//! Audio session identity

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a platform audio session
///
/// The platform hands these out as audio streams come and go. Clef never
/// interprets the value; it only keys effect chains by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub i32);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
