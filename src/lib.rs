//! Interactive scatter chart of venomous snakes, plotting venom toxicity
//! (LD50) against venom yield.
//!
//! The library holds everything that is independent of the window: the
//! dataset loader, the filter registry, the coordinate mapper, the
//! declutter rule and the [`Session`] that ties them together. The binary
//! only draws what a session hands it.

pub mod config;
pub mod declutter;
pub mod error;
pub mod filter;
pub mod logging;
pub mod mapper;
pub mod model;
pub mod repository;
pub mod session;
pub mod util;

pub use config::ChartConfig;
pub use declutter::{ProximityGrid, neighbors_within};
pub use error::{Error, Result};
pub use filter::{
    Clause, ClauseKey, Combinator, CombinedPredicate, EmptyOrPolicy, FilterClause, FilterRegistry,
};
pub use mapper::{CoordinateMapper, Domain, Domains};
pub use model::{Axis, Item, ItemId, SizeTier, ViewPoint};
pub use repository::ItemRepository;
pub use session::{Command, Emphasis, Outcome, Session};
