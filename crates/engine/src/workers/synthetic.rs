// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Synthetic Spot Worker: one per configured synthetic index. Every 10s,
//! validates the market is open, reads each component's spot price, and
//! publishes the weighted sum under `truth:spot:{SYNTH}`.

use std::sync::Arc;

use chainfeed_bus::{Bus, Ttl};
use chainfeed_core::{keys, Clock, SyntheticComponent};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::workers::market_state::validate_market_state;

const SYNTHETIC_CYCLE_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpotValidation {
    Ok,
    Skipped,
    Partial,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticSpotPayload {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub symbol: String,
    pub spot: Option<f64>,
    pub source: &'static str,
    pub validation: SpotValidation,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
}

/// Pure weighted sum: `Σ weight_i × multiplier_i × spot(component_i)`.
pub fn compute_synthetic_spot(components: &[SyntheticComponent], spots: &std::collections::HashMap<String, f64>) -> Option<f64> {
    let mut total = 0.0;
    for component in components {
        let spot = *spots.get(&component.symbol)?;
        total += component.weight * component.multiplier * spot;
    }
    Some(total)
}

pub struct SyntheticSpotWorker<B: Bus, C: Clock> {
    name: String,
    components: Vec<SyntheticComponent>,
    bus: Arc<B>,
    clock: C,
    tz: Tz,
}

impl<B: Bus, C: Clock> SyntheticSpotWorker<B, C> {
    pub fn new(name: impl Into<String>, components: Vec<SyntheticComponent>, bus: Arc<B>, clock: C) -> Self {
        Self { name: name.into(), components, bus, clock, tz: chrono_tz::America::New_York }
    }

    pub fn spawn(self, cancel: CancellationToken) -> tokio::task::JoinHandle<()>
    where
        B: 'static,
        C: 'static,
    {
        tokio::spawn(async move {
            let interval = std::time::Duration::from_secs(SYNTHETIC_CYCLE_SECS);
            loop {
                self.run_cycle().await;
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
        })
    }

    async fn run_cycle(&self) {
        use chrono::TimeZone;
        let now_utc = self.clock.now_utc();
        let now_et = self.tz.from_utc_datetime(&now_utc.naive_utc());
        let validation = validate_market_state(now_et, &self.name);
        if !validation.valid {
            self.publish(SpotValidation::Skipped, None, Vec::new()).await;
            return;
        }

        let mut spots = std::collections::HashMap::new();
        let mut missing = Vec::new();
        for component in &self.components {
            match self.read_spot(&component.symbol).await {
                Some(spot) => {
                    spots.insert(component.symbol.clone(), spot);
                }
                None => missing.push(component.symbol.clone()),
            }
        }

        if !missing.is_empty() {
            warn!(synthetic = %self.name, missing = ?missing, "missing component spots, skipping cycle");
            self.publish(SpotValidation::Partial, None, missing).await;
            return;
        }

        let Some(spot) = compute_synthetic_spot(&self.components, &spots) else {
            self.publish(SpotValidation::Partial, None, Vec::new()).await;
            return;
        };

        self.publish(SpotValidation::Ok, Some(spot), Vec::new()).await;
        info!(synthetic = %self.name, spot, "published synthetic spot");
    }

    async fn read_spot(&self, symbol: &str) -> Option<f64> {
        let key = format!("truth:feed:{symbol}:snapshot");
        let raw = self.bus.get(&key).await.ok().flatten()?;
        let value: serde_json::Value = serde_json::from_str(&raw).ok()?;
        value.get("spot").and_then(serde_json::Value::as_f64)
    }

    async fn publish(&self, validation: SpotValidation, spot: Option<f64>, missing: Vec<String>) {
        let payload = SyntheticSpotPayload {
            timestamp: self.clock.now_utc(),
            symbol: self.name.clone(),
            spot,
            source: "synthetic",
            validation,
            missing,
        };
        let Ok(json) = serde_json::to_string(&payload) else { return };
        if let Err(err) = self.bus.set(&keys::synthetic_spot(&self.name), json, Some(Ttl::seconds(15))).await {
            warn!(synthetic = %self.name, error = %err, "failed to publish synthetic spot");
        }
    }
}

#[cfg(test)]
#[path = "synthetic_tests.rs"]
mod tests;
