use bridgewatch::metrics::{MetricServicePublisher, PublishOutcome};
use bridgewatch_prometheus::PrometheusPublisher;
use prometheus::Registry;

fn gauge_value(registry: &Registry, metric: &str) -> f64 {
    let metric_families = registry.gather();
    let family = metric_families.iter().find(|mf| mf.get_name() == "bridgewatch_metric");

    if let Some(family) = family {
        if let Some(m) = family.get_metric().iter().find(|m| {
            m.get_label().iter().any(|l| l.name() == "metric" && l.value() == metric)
        }) {
            if let Some(g) = m.get_gauge().as_ref() {
                return g.value();
            }
        }
    }
    f64::NAN
}

fn counter_value(registry: &Registry, metric: &str) -> f64 {
    let metric_families = registry.gather();
    let family =
        metric_families.iter().find(|mf| mf.get_name() == "bridgewatch_increments_total");

    if let Some(family) = family {
        if let Some(m) = family.get_metric().iter().find(|m| {
            m.get_label().iter().any(|l| l.name() == "metric" && l.value() == metric)
        }) {
            if let Some(c) = m.get_counter().as_ref() {
                return c.value();
            }
        }
    }
    0.0
}

#[test]
fn numeric_metrics_are_scrapable() {
    let registry = Registry::new();
    let publisher =
        PrometheusPublisher::new(registry.clone()).expect("failed to create publisher");

    assert!(publisher.publish_numeric("conferences", 4).is_published());
    assert!(publisher.publish_numeric("channels", 12).is_published());
    assert!(publisher.publish_numeric("conferences", 3).is_published());

    assert_eq!(gauge_value(&registry, "conferences"), 3.0);
    assert_eq!(gauge_value(&registry, "channels"), 12.0);
}

#[test]
fn incremental_metrics_accumulate_across_calls() {
    let registry = Registry::new();
    let publisher =
        PrometheusPublisher::new(registry.clone()).expect("failed to create publisher");

    assert_eq!(counter_value(&registry, "conferences_expired"), 0.0);
    assert!(publisher.publish_incremental("conferences_expired", 1).is_published());
    assert!(publisher.publish_incremental("conferences_expired", 1).is_published());
    assert_eq!(counter_value(&registry, "conferences_expired"), 2.0);
}

#[test]
fn transaction_durations_reach_the_histogram() {
    let registry = Registry::new();
    let publisher =
        PrometheusPublisher::new(registry.clone()).expect("failed to create publisher");

    assert!(publisher.start_measured_transaction("conference_length", "c1").is_published());
    assert!(publisher.start_measured_transaction("conference_length", "c2").is_published());
    assert!(publisher.end_measured_transaction("conference_length", "c1").is_published());
    assert!(publisher.end_measured_transaction("conference_length", "c2").is_published());

    let metric_families = registry.gather();
    let family = metric_families
        .iter()
        .find(|mf| mf.get_name() == "bridgewatch_transaction_seconds")
        .expect("histogram registered");
    assert_eq!(family.get_metric()[0].get_histogram().get_sample_count(), 2);
}

#[test]
fn string_metrics_report_unsupported_without_poisoning_state() {
    let registry = Registry::new();
    let publisher =
        PrometheusPublisher::new(registry.clone()).expect("failed to create publisher");

    assert!(matches!(
        publisher.publish_string("channel_start", "198.51.100.7"),
        PublishOutcome::Unsupported
    ));
    // The publisher keeps working after an unsupported call.
    assert!(publisher.publish_numeric("conferences", 1).is_published());
}
