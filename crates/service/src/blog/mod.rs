//! Public blog listing.
//!
//! Posts are fetched once per cache lifetime; category filter, search and the
//! sidebar widgets are all computed locally from that one feed.

pub mod card;
pub mod listing;
pub mod sidebar;

pub use card::PostCard;
pub use listing::{fetch_feed, BlogListing, BlogListingView, BlogQuery, CategoryOption, ALL_CATEGORY};
pub use sidebar::{Sidebar, SidebarPost, TagCount};
