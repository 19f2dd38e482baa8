use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    ansible::Remediator,
    config::RemediationConfig,
    metrics::{ALERTS_RECEIVED_TOTAL, REMEDIATIONS_TRIGGERED_TOTAL, REMEDIATION_FAILURES_TOTAL},
    Result,
};

// Alertmanager webhook payload structures. Only `alerts` matters for
// dispatch; the envelope fields are optional so a minimal payload parses.
#[derive(Debug, Deserialize, Serialize)]
pub struct AlertmanagerWebhook {
    #[serde(default)]
    pub receiver: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub alerts: Vec<AlertmanagerAlert>,
    #[serde(default, rename = "groupLabels")]
    pub group_labels: HashMap<String, String>,
    #[serde(default, rename = "commonLabels")]
    pub common_labels: HashMap<String, String>,
    #[serde(default, rename = "commonAnnotations")]
    pub common_annotations: HashMap<String, String>,
    #[serde(default, rename = "externalURL")]
    pub external_url: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default, rename = "groupKey")]
    pub group_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AlertmanagerAlert {
    pub status: AlertStatus,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub annotations: HashMap<String, String>,
    #[serde(default, rename = "startsAt")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "endsAt")]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "generatorURL")]
    pub generator_url: Option<String>,
    #[serde(default)]
    pub fingerprint: Option<String>,
}

impl AlertmanagerAlert {
    pub fn alert_name(&self) -> Option<&str> {
        self.labels.get("alertname").map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Firing,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No firing alert matched the configured trigger.
    NoAction,
    /// The playbook ran; `output` is its captured stdout.
    Remediated { output: String },
}

/// Filters incoming alert batches and hands matches to the remediator.
pub struct AlertDispatcher {
    remediator: Arc<dyn Remediator>,
    trigger_alert: String,
    service_name: String,
}

impl AlertDispatcher {
    pub fn new(config: &RemediationConfig, remediator: Arc<dyn Remediator>) -> Self {
        Self {
            remediator,
            trigger_alert: config.trigger_alert.clone(),
            service_name: config.service_name.clone(),
        }
    }

    /// Handles one webhook delivery. Only the first record that is firing and
    /// carries the trigger alert name starts a remediation; the rest of the
    /// batch is ignored.
    pub async fn dispatch(&self, body: &[u8]) -> Result<DispatchOutcome> {
        let payload: AlertmanagerWebhook = serde_json::from_slice(body)?;

        info!("Webhook received {} alerts", payload.alerts.len());
        ALERTS_RECEIVED_TOTAL.inc_by(payload.alerts.len() as u64);

        for alert in &payload.alerts {
            info!(
                alert = alert.alert_name().unwrap_or("<unnamed>"),
                status = ?alert.status,
                "Processing alert"
            );

            if alert.status == AlertStatus::Firing
                && alert.alert_name() == Some(self.trigger_alert.as_str())
            {
                info!(
                    service = %self.service_name,
                    "Firing alert matched trigger, starting self-healing"
                );
                let output = self.run_remediation().await?;
                return Ok(DispatchOutcome::Remediated { output });
            }
        }

        Ok(DispatchOutcome::NoAction)
    }

    /// Manual trigger: restarts the configured service without looking at any
    /// alert payload.
    pub async fn trigger_direct(&self) -> Result<String> {
        info!(service = %self.service_name, "Direct remediation requested");
        self.run_remediation().await
    }

    async fn run_remediation(&self) -> Result<String> {
        REMEDIATIONS_TRIGGERED_TOTAL.inc();
        match self.remediator.restart_service(&self.service_name).await {
            Ok(output) => Ok(output),
            Err(e) => {
                REMEDIATION_FAILURES_TOTAL.inc();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_payload_parses() {
        let payload: AlertmanagerWebhook = serde_json::from_str(
            r#"{"alerts":[{"labels":{"alertname":"NodeExporterDown"},"status":"firing"}]}"#,
        )
        .unwrap();

        assert_eq!(payload.alerts.len(), 1);
        assert_eq!(payload.alerts[0].status, AlertStatus::Firing);
        assert_eq!(payload.alerts[0].alert_name(), Some("NodeExporterDown"));
    }

    #[test]
    fn full_alertmanager_payload_parses() {
        let payload: AlertmanagerWebhook = serde_json::from_str(
            r#"{
                "receiver": "selfheal",
                "status": "firing",
                "version": "4",
                "groupKey": "{}:{alertname=\"NodeExporterDown\"}",
                "groupLabels": {"alertname": "NodeExporterDown"},
                "commonLabels": {"alertname": "NodeExporterDown", "severity": "critical"},
                "commonAnnotations": {"summary": "node-exporter is down"},
                "externalURL": "http://alertmanager:9093",
                "alerts": [{
                    "status": "resolved",
                    "labels": {"alertname": "NodeExporterDown"},
                    "annotations": {"summary": "node-exporter is down"},
                    "startsAt": "2024-03-01T12:00:00Z",
                    "endsAt": "2024-03-01T12:05:00Z",
                    "generatorURL": "http://prometheus:9090/graph",
                    "fingerprint": "c4c8ff2cbf1b7a86"
                }]
            }"#,
        )
        .unwrap();

        let alert = &payload.alerts[0];
        assert_eq!(alert.status, AlertStatus::Resolved);
        assert!(alert.starts_at.is_some());
        assert!(alert.ends_at.is_some());
    }

    #[test]
    fn missing_alerts_key_defaults_to_empty_batch() {
        let payload: AlertmanagerWebhook = serde_json::from_str(r#"{"status":"firing"}"#).unwrap();
        assert!(payload.alerts.is_empty());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result = serde_json::from_str::<AlertmanagerWebhook>(
            r#"{"alerts":[{"labels":{},"status":"pending"}]}"#,
        );
        assert!(result.is_err());
    }
}
