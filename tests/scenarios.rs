//! The six concrete scenarios from the charter's testable-properties section, run against
//! a tick-quantized book (`tick_size = 0.01`) with literal decimal prices, as specified.

use matching_engine::{Order, OrderBook, OrderId, OrderType, Side, TimeInForce};
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn book() -> OrderBook {
    OrderBook::new(dec("0.01"), true)
}

fn limit(id: u64, side: Side, qty: &str, price: &str, tif: TimeInForce) -> Order {
    Order::new(OrderId(id), side, dec(qty), Some(dec(price)), OrderType::Limit, tif).unwrap()
}

fn market(id: u64, side: Side, qty: &str) -> Order {
    Order::new(OrderId(id), side, dec(qty), None, OrderType::Market, TimeInForce::Ioc).unwrap()
}

#[test]
fn scenario_1_partial_limit_fill() {
    let mut ob = book();
    ob.add(limit(1, Side::Sell, "100", "10.00", TimeInForce::Gtc));
    let trades = ob.add(limit(2, Side::Buy, "50", "12.00", TimeInForce::Gtc));

    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].maker_id, OrderId(1));
    assert_eq!(trades[0].taker_id, OrderId(2));
    assert_eq!(trades[0].price, dec("10.00"));
    assert_eq!(trades[0].qty, dec("50"));
    assert_eq!(ob.best_ask(), Some(dec("10.00")));
    assert_eq!(ob.depth_at_price(Side::Sell, dec("10.00")), dec("50"));
    assert_eq!(ob.best_bid(), None);
}

#[test]
fn scenario_2_market_sweep() {
    let mut ob = book();
    ob.add(limit(1, Side::Sell, "30", "10.00", TimeInForce::Gtc));
    ob.add(limit(2, Side::Sell, "30", "10.01", TimeInForce::Gtc));
    let trades = ob.add(market(3, Side::Buy, "20"));

    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].maker_id, OrderId(1));
    assert_eq!(trades[0].taker_id, OrderId(3));
    assert_eq!(trades[0].price, dec("10.00"));
    assert_eq!(trades[0].qty, dec("20"));
    assert_eq!(ob.depth_at_price(Side::Sell, dec("10.00")), dec("10"));
    assert_eq!(ob.depth_at_price(Side::Sell, dec("10.01")), dec("30"));
}

#[test]
fn scenario_3_cancel() {
    let mut ob = book();
    ob.add(limit(1, Side::Buy, "40", "9.90", TimeInForce::Gtc));
    ob.add(limit(2, Side::Buy, "60", "9.90", TimeInForce::Gtc));

    assert_eq!(ob.cancel(OrderId(1)), dec("40"));
    assert_eq!(ob.depth_at_price(Side::Buy, dec("9.90")), dec("60"));
    assert_eq!(ob.cancel(OrderId(1)), Decimal::ZERO);
}

#[test]
fn scenario_4_replace_loses_time_priority() {
    let mut ob = book();
    ob.add(limit(1, Side::Buy, "50", "9.95", TimeInForce::Gtc));
    ob.add(limit(2, Side::Buy, "50", "9.95", TimeInForce::Gtc));

    let (ok, trades) = ob.replace(OrderId(1), Some(dec("9.96")), None, None);
    assert!(ok);
    assert!(trades.is_empty());
    assert_eq!(ob.depth_at_price(Side::Buy, dec("9.96")), dec("50"));
    assert_eq!(ob.depth_at_price(Side::Buy, dec("9.95")), dec("50"));

    let trades = ob.add(limit(3, Side::Sell, "50", "9.96", TimeInForce::Gtc));
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].maker_id, OrderId(1));
}

#[test]
fn scenario_5_ioc_residual_discard() {
    let mut ob = book();
    ob.add(limit(1, Side::Sell, "50", "10.00", TimeInForce::Gtc));
    let trades = ob.add(limit(2, Side::Buy, "100", "10.00", TimeInForce::Ioc));

    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].qty, dec("50"));
    assert_eq!(ob.depth_at_price(Side::Buy, dec("10.00")), Decimal::ZERO);
    assert_eq!(ob.cancel(OrderId(2)), Decimal::ZERO);
}

#[test]
fn scenario_6_fok_kill() {
    let mut ob = book();
    ob.add(limit(1, Side::Sell, "50", "10.00", TimeInForce::Gtc));
    let trades = ob.add(limit(2, Side::Buy, "100", "12.00", TimeInForce::Fok));

    assert!(trades.is_empty());
    assert_eq!(ob.depth_at_price(Side::Sell, dec("10.00")), dec("50"));
    assert_eq!(ob.cancel(OrderId(2)), Decimal::ZERO);
}
