//! Prometheus metrics for the subscription manager

use lazy_static::lazy_static;
use prometheus::{register_counter_vec, register_int_gauge_vec, CounterVec, IntGaugeVec};

lazy_static! {
    /// Total subscriptions opened
    pub static ref SUBSCRIBE_TOTAL: CounterVec = register_counter_vec!(
        "subscriptions_subscribe_total",
        "Total subscriptions opened",
        &["kind", "status"]
    )
    .unwrap();

    /// Total subscriptions cancelled
    pub static ref CANCEL_TOTAL: CounterVec = register_counter_vec!(
        "subscriptions_cancel_total",
        "Total subscriptions cancelled",
        &["kind", "status"]
    )
    .unwrap();

    /// Currently live subscriptions
    pub static ref ACTIVE_SUBSCRIPTIONS: IntGaugeVec = register_int_gauge_vec!(
        "subscriptions_active",
        "Currently live subscriptions",
        &["kind"]
    )
    .unwrap();
}
