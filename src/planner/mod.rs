//! Query planners for proximity and text searches.

mod nearby;
mod text;

pub use nearby::{find_nearby, NearbyParams};
pub use text::{search_by_text, TextSearchParams};
