// SPDX-FileCopyrightText: 2026 Rekindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Atomic JSON file read/write helpers for the state stores.

use std::path::Path;

use rekindle_core::RekindleError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Read and deserialize a JSON file.
///
/// A missing file is `Ok(None)`; unreadable or unparsable content is an
/// error so callers can decide whether to start fresh.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, RekindleError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let value = serde_json::from_slice(&bytes).map_err(|e| RekindleError::Persistence {
                source: Box::new(e),
            })?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(RekindleError::Persistence {
            source: Box::new(e),
        }),
    }
}

/// Serialize a value and write it atomically (temp file + rename).
///
/// A partially written file is never observable: readers either see the
/// previous content or the new content.
pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), RekindleError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|e| RekindleError::Persistence {
        source: Box::new(e),
    })?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| RekindleError::Persistence {
                source: Box::new(e),
            })?;
    }

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &bytes)
        .await
        .map_err(|e| RekindleError::Persistence {
            source: Box::new(e),
        })?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| RekindleError::Persistence {
            source: Box::new(e),
        })?;

    Ok(())
}
