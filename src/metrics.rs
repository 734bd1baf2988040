use crate::utils::errors::Result;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Prometheus metrics for the relay, kept on a crate-local registry.
#[derive(Clone)]
pub struct RelayMetrics {
    registry: Registry,
    pub relayed: IntCounterVec,
    pub confirmation_seconds: Histogram,
}

impl RelayMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let relayed = IntCounterVec::new(
            Opts::new(
                "parrot_relay_transactions_total",
                "Relayed transactions by action and outcome",
            ),
            &["action", "outcome"],
        )?;
        registry.register(Box::new(relayed.clone()))?;

        let confirmation_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "parrot_relay_confirmation_seconds",
                "Time from submission to confirmation",
            )
            .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        )?;
        registry.register(Box::new(confirmation_seconds.clone()))?;

        Ok(Self {
            registry,
            relayed,
            confirmation_seconds,
        })
    }

    pub fn record_relay(&self, action: &str, outcome: &str) {
        self.relayed.with_label_values(&[action, outcome]).inc();
    }

    /// Render the registry in Prometheus text exposition format.
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| anyhow::anyhow!("metrics encoding was not UTF-8: {e}").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_render() {
        let metrics = RelayMetrics::new().unwrap();
        metrics.record_relay("createContent", "confirmed");
        metrics.record_relay("vote", "failed");
        metrics.confirmation_seconds.observe(1.2);

        let rendered = metrics.render().unwrap();
        assert!(rendered.contains("parrot_relay_transactions_total"));
        assert!(rendered.contains("parrot_relay_confirmation_seconds"));
    }
}
