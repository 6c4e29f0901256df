pub mod cache;
pub mod directory;
pub mod error;
pub mod harvest;
pub mod normalize;
pub mod places;
mod rate_limit;
pub mod types;

pub use cache::ScrapeCache;
pub use directory::AtmDirectoryClient;
pub use error::ScraperError;
pub use harvest::harvest_candidates;
pub use normalize::{atm_from_listing, candidate_from_place, classify_business, BusinessClass};
pub use places::PlacesClient;
pub use types::{PlaceResult, PlacesSearchResponse, RawAtmListing};
