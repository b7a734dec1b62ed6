use opentelemetry::{KeyValue, metrics::UpDownCounter};
use std::sync::LazyLock;

static STATDS: LazyLock<UpDownCounter<i64>> = LazyLock::new(|| {
    logfire::i64_up_down_counter("parrot_shop_statds")
        .with_description("Parrot shop client statistics")
        .with_unit("attempt")
        .build()
});

fn incr_statds(metric: String, value: String) {
    STATDS.add(1, &[KeyValue::new(metric, value)]);
}

pub fn incr_bird_action_statds(action: &str) {
    incr_statds("bird_action".to_string(), action.into())
}

pub fn incr_api_error_statds(kind: &str) {
    incr_statds("api_error".to_string(), kind.into())
}
