pub mod chat;
pub mod market;

pub use chat::{ChatMessage, ChatRole};
pub use market::{CompanyProfile, MarketMovers, Mover, PricePoint, Quote, StockOverview};
