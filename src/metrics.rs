use std::{
    collections::HashMap,
    sync::{Mutex, OnceLock},
};

static METRICS: OnceLock<Mutex<MetricsState>> = OnceLock::new();

struct MetricsState {
    connect_ok: u64,
    connect_err: u64,
    disconnect_total: u64,
    transfer_ok: u64,
    transfer_err: u64,
    chain_switch_ok: u64,
    chain_switch_err: u64,
    chain_add_ok: u64,
    chain_add_err: u64,
    // 按事件类型统计调和次数
    events: HashMap<&'static str, u64>,
}

fn state() -> &'static Mutex<MetricsState> {
    METRICS.get_or_init(|| {
        Mutex::new(MetricsState {
            connect_ok: 0,
            connect_err: 0,
            disconnect_total: 0,
            transfer_ok: 0,
            transfer_err: 0,
            chain_switch_ok: 0,
            chain_switch_err: 0,
            chain_add_ok: 0,
            chain_add_err: 0,
            events: HashMap::new(),
        })
    })
}

fn lock() -> std::sync::MutexGuard<'static, MetricsState> {
    match state().lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(), // 避免因锁污染导致 panic
    }
}

pub fn inc_connect_ok() {
    lock().connect_ok += 1;
}

pub fn inc_connect_err() {
    lock().connect_err += 1;
}

pub fn inc_disconnect() {
    lock().disconnect_total += 1;
}

pub fn inc_transfer_ok() {
    lock().transfer_ok += 1;
}

pub fn inc_transfer_err() {
    lock().transfer_err += 1;
}

pub fn inc_chain_switch_ok() {
    lock().chain_switch_ok += 1;
}

pub fn inc_chain_switch_err() {
    lock().chain_switch_err += 1;
}

pub fn inc_chain_add_ok() {
    lock().chain_add_ok += 1;
}

pub fn inc_chain_add_err() {
    lock().chain_add_err += 1;
}

pub fn inc_event(event_type: &'static str) {
    let mut s = lock();
    *s.events.entry(event_type).or_insert(0) += 1;
}

pub fn render_prometheus() -> String {
    let s = lock();
    let mut out = String::new();

    out.push_str("# HELP linkcore_connect_total Wallet connect attempts\n");
    out.push_str("# TYPE linkcore_connect_total counter\n");
    out.push_str(&format!(
        "linkcore_connect_total{{result=\"ok\"}} {}\n",
        s.connect_ok
    ));
    out.push_str(&format!(
        "linkcore_connect_total{{result=\"err\"}} {}\n",
        s.connect_err
    ));

    out.push_str("# HELP linkcore_disconnect_total Local session disconnects\n");
    out.push_str("# TYPE linkcore_disconnect_total counter\n");
    out.push_str(&format!("linkcore_disconnect_total {}\n", s.disconnect_total));

    out.push_str("# HELP linkcore_transfer_total Native transfer submissions\n");
    out.push_str("# TYPE linkcore_transfer_total counter\n");
    out.push_str(&format!(
        "linkcore_transfer_total{{result=\"ok\"}} {}\n",
        s.transfer_ok
    ));
    out.push_str(&format!(
        "linkcore_transfer_total{{result=\"err\"}} {}\n",
        s.transfer_err
    ));

    out.push_str("# HELP linkcore_chain_switch_total Chain switch requests\n");
    out.push_str("# TYPE linkcore_chain_switch_total counter\n");
    out.push_str(&format!(
        "linkcore_chain_switch_total{{result=\"ok\"}} {}\n",
        s.chain_switch_ok
    ));
    out.push_str(&format!(
        "linkcore_chain_switch_total{{result=\"err\"}} {}\n",
        s.chain_switch_err
    ));

    out.push_str("# HELP linkcore_chain_add_total Chain registration requests\n");
    out.push_str("# TYPE linkcore_chain_add_total counter\n");
    out.push_str(&format!(
        "linkcore_chain_add_total{{result=\"ok\"}} {}\n",
        s.chain_add_ok
    ));
    out.push_str(&format!(
        "linkcore_chain_add_total{{result=\"err\"}} {}\n",
        s.chain_add_err
    ));

    out.push_str("# HELP linkcore_wallet_events_total Wallet events reconciled\n");
    out.push_str("# TYPE linkcore_wallet_events_total counter\n");
    for (event_type, count) in s.events.iter() {
        out.push_str(&format!(
            "linkcore_wallet_events_total{{type=\"{}\"}} {}\n",
            event_type, count
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_contains_metric_families() {
        inc_connect_ok();
        inc_event("ChainChanged");
        let rendered = render_prometheus();
        assert!(rendered.contains("linkcore_connect_total"));
        assert!(rendered.contains("linkcore_wallet_events_total{type=\"ChainChanged\"}"));
    }
}
