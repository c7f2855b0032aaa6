pub mod render;
pub mod store;

pub use render::{CartAction, CartRenderer, CartRow, CartTargets, CartView, DisplayTarget};
pub use store::{CartLineItem, CartStore, CartSummary, LineId};
