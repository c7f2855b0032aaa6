pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
mod markup;
pub mod page;

pub use cart::{CartLineItem, CartRenderer, CartStore, CartSummary, LineId};
pub use catalog::{Catalog, ProductCard, ProductRecord, Section};
pub use config::AppConfig;
pub use error::Error;
pub use filter::{is_visible, project, FilterCriteria, PriceBucket};
pub use page::{Event, SilentListener, Storefront, StorefrontListener};
