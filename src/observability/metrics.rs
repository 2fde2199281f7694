use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub orders_placed_total: IntCounter,
    pub status_advances_total: IntCounterVec,
    pub status_advance_failures_total: IntCounter,
    pub animation_ticks_total: IntCounter,
    pub agent_en_route: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let orders_placed_total =
            IntCounter::new("orders_placed_total", "Total orders placed at checkout")
                .expect("valid orders_placed_total metric");

        let status_advances_total = IntCounterVec::new(
            Opts::new(
                "status_advances_total",
                "Status advancement writes requested, by target status",
            ),
            &["to_status"],
        )
        .expect("valid status_advances_total metric");

        let status_advance_failures_total = IntCounter::new(
            "status_advance_failures_total",
            "Status advancement writes that failed",
        )
        .expect("valid status_advance_failures_total metric");

        let animation_ticks_total = IntCounter::new(
            "animation_ticks_total",
            "Delivery agent animation ticks processed",
        )
        .expect("valid animation_ticks_total metric");

        let agent_en_route = IntGauge::new(
            "agent_en_route",
            "Whether the delivery agent animation is currently running",
        )
        .expect("valid agent_en_route metric");

        registry
            .register(Box::new(orders_placed_total.clone()))
            .expect("register orders_placed_total");
        registry
            .register(Box::new(status_advances_total.clone()))
            .expect("register status_advances_total");
        registry
            .register(Box::new(status_advance_failures_total.clone()))
            .expect("register status_advance_failures_total");
        registry
            .register(Box::new(animation_ticks_total.clone()))
            .expect("register animation_ticks_total");
        registry
            .register(Box::new(agent_en_route.clone()))
            .expect("register agent_en_route");

        Self {
            registry,
            orders_placed_total,
            status_advances_total,
            status_advance_failures_total,
            animation_ticks_total,
            agent_en_route,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}
