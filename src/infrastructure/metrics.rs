// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MetricsSettings;
use crate::domain::services::crawl_service::{
    DETAIL_FAILURES_TOTAL, NOTICES_INSERTED_TOTAL, NOTICES_UPDATED_TOTAL,
};
use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 初始化指标导出
///
/// 未启用或监听地址无效时不安装导出器，计数器调用保持为空操作。
///
/// # 返回值
///
/// 是否成功安装了 Prometheus 导出器
pub fn init_metrics(settings: &MetricsSettings) -> bool {
    if !settings.enabled {
        return false;
    }

    let addr: SocketAddr = match settings.listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address '{}': {}", settings.listen_addr, e);
            return false;
        }
    };

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return false;
    }

    describe_counter!(NOTICES_INSERTED_TOTAL, "Total number of notices inserted");
    describe_counter!(
        NOTICES_UPDATED_TOTAL,
        "Total number of existing notices whose fields changed"
    );
    describe_counter!(
        DETAIL_FAILURES_TOTAL,
        "Total number of detail page fetches that failed"
    );

    info!("Metrics exporter listening on {}", addr);
    true
}
