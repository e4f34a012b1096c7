//! # Matching Engine
//!
//! A price-time priority limit order book: [`OrderBook`] is the single entry point —
//! [`OrderBook::add`], [`OrderBook::cancel`], and [`OrderBook::replace`] are the whole
//! external interface. Everything else here (the simulator, persistence, metrics, viz)
//! is a collaborator that drives the book through that interface, not a dependency of it.
//!
//! ## Example
//!
//! ```rust
//! use matching_engine::{Order, OrderBook, OrderId, OrderType, Side, TimeInForce};
//! use rust_decimal::Decimal;
//!
//! let mut book = OrderBook::new(Decimal::new(1, 2), true);
//! let resting = Order::new(
//!     OrderId(1), Side::Sell, Decimal::from(10), Some(Decimal::from(100)),
//!     OrderType::Limit, TimeInForce::Gtc,
//! ).unwrap();
//! book.add(resting);
//!
//! let taker = Order::new(
//!     OrderId(2), Side::Buy, Decimal::from(5), Some(Decimal::from(100)),
//!     OrderType::Limit, TimeInForce::Gtc,
//! ).unwrap();
//! let trades = book.add(taker);
//! assert_eq!(trades.len(), 1);
//! ```

pub mod error;
pub mod generator;
pub mod level;
pub mod metrics;
pub mod order_book;
pub mod order_index;
pub mod persistence;
pub mod side_book;
pub mod types;
pub mod viz;

pub use error::EngineError;
pub use order_book::OrderBook;
pub use types::{Order, OrderId, OrderType, Side, TimeInForce, Trade};
