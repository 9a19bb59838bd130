use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

use super::{ChartSettings, EngineSnapshot};

pub const CHART_SETTINGS_JSON_SCHEMA_V1: u32 = 1;
pub const ENGINE_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSettingsJsonContractV1 {
    pub schema_version: u32,
    pub settings: ChartSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: EngineSnapshot,
}

impl ChartSettings {
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = ChartSettingsJsonContractV1 {
            schema_version: CHART_SETTINGS_JSON_SCHEMA_V1,
            settings: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidSettings(format!("failed to serialize settings contract v1: {e}"))
        })
    }

    /// Accepts either bare settings or the versioned v1 envelope.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        // Bare settings accept any object, so dispatch on `schema_version`.
        let value: serde_json::Value = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidSettings(format!("failed to parse settings json payload: {e}"))
        })?;
        if value.get("schema_version").is_none() {
            return serde_json::from_value(value).map_err(|e| {
                ChartError::InvalidSettings(format!("failed to parse settings: {e}"))
            });
        }
        let payload: ChartSettingsJsonContractV1 = serde_json::from_value(value).map_err(|e| {
            ChartError::InvalidSettings(format!("failed to parse settings contract: {e}"))
        })?;
        if payload.schema_version != CHART_SETTINGS_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidSettings(format!(
                "unsupported settings schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.settings)
    }
}

impl EngineSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = EngineSnapshotJsonContractV1 {
            schema_version: ENGINE_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<EngineSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: EngineSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != ENGINE_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}
