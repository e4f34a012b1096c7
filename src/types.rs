//! Order and trade value types (charter data models, §3).
//!
//! [`Order`] validates its own construction invariants; everything past that boundary
//! assumes a well-formed order (§7: "the engine never sees invalid orders").

use crate::error::EngineError;
use rust_decimal::Decimal;

/// Unique order identifier, supplied by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct OrderId(pub u64);

/// Book side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// LIMIT carries a price; MARKET does not (and is effectively IOC, see [`Order::new`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OrderType {
    Limit,
    Market,
}

/// Good-Til-Cancel, Immediate-Or-Cancel, Fill-Or-Kill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TimeInForce {
    Gtc,
    Ioc,
    Fok,
}

/// A client intent (on construction) or a resting order (once it has an `id` in the book).
///
/// `ts` is assigned by [`crate::order_book::OrderBook::add`] and is meaningless before that —
/// it is not client-supplied, see §3.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub side: Side,
    pub qty: Decimal,
    pub price: Option<Decimal>,
    pub order_type: OrderType,
    pub tif: TimeInForce,
    pub ts: u64,
    pub remaining: Decimal,
}

impl Order {
    /// Validates construction invariants (§3): `qty > 0`; LIMIT requires a positive price;
    /// MARKET must have no price. `remaining` starts equal to `qty`; `ts` starts at 0 and is
    /// overwritten by the book on `add`.
    pub fn new(
        id: OrderId,
        side: Side,
        qty: Decimal,
        price: Option<Decimal>,
        order_type: OrderType,
        tif: TimeInForce,
    ) -> Result<Self, EngineError> {
        if qty <= Decimal::ZERO {
            return Err(EngineError::NonPositiveQuantity);
        }
        match (order_type, price) {
            (OrderType::Limit, None) => return Err(EngineError::LimitRequiresPrice),
            (OrderType::Market, Some(_)) => return Err(EngineError::MarketRequiresNoPrice),
            (OrderType::Limit, Some(p)) if p <= Decimal::ZERO => {
                return Err(EngineError::NonPositivePrice)
            }
            _ => {}
        }
        Ok(Self {
            id,
            side,
            qty,
            price,
            order_type,
            tif,
            ts: 0,
            remaining: qty,
        })
    }

    /// `remaining > 0`.
    pub fn is_active(&self) -> bool {
        self.remaining > Decimal::ZERO
    }
}

/// One execution between a resting maker and an incoming (or replacing) taker.
///
/// `price` is always the maker's resting price (§3); `ts` is the sequence number assigned
/// when the trade was generated, strictly greater than the enclosing event's own `ts`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Trade {
    pub maker_id: OrderId,
    pub taker_id: OrderId,
    pub price: Decimal,
    pub qty: Decimal,
    pub ts: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn rejects_non_positive_qty() {
        let err = Order::new(OrderId(1), Side::Buy, dec(0), Some(dec(10)), OrderType::Limit, TimeInForce::Gtc)
            .unwrap_err();
        assert_eq!(err, EngineError::NonPositiveQuantity);
    }

    #[test]
    fn rejects_limit_without_price() {
        let err = Order::new(OrderId(1), Side::Buy, dec(10), None, OrderType::Limit, TimeInForce::Gtc)
            .unwrap_err();
        assert_eq!(err, EngineError::LimitRequiresPrice);
    }

    #[test]
    fn rejects_market_with_price() {
        let err = Order::new(OrderId(1), Side::Buy, dec(10), Some(dec(10)), OrderType::Market, TimeInForce::Gtc)
            .unwrap_err();
        assert_eq!(err, EngineError::MarketRequiresNoPrice);
    }

    #[test]
    fn rejects_non_positive_price() {
        let err = Order::new(OrderId(1), Side::Buy, dec(10), Some(dec(0)), OrderType::Limit, TimeInForce::Gtc)
            .unwrap_err();
        assert_eq!(err, EngineError::NonPositivePrice);
    }

    #[test]
    fn defaults_remaining_to_qty() {
        let o = Order::new(OrderId(1), Side::Buy, dec(10), Some(dec(5)), OrderType::Limit, TimeInForce::Gtc).unwrap();
        assert_eq!(o.remaining, dec(10));
        assert!(o.is_active());
    }

    #[test]
    fn opposite_side() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }
}
