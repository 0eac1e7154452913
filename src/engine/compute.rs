// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use crate::engine::{FittedState, Mode};
use crate::errors::{ExecutionError, FrameError};
use crate::frame::{Column, Table};
use crate::observability::messages::feature::{FeatureComputed, FeatureFailed, FeatureFitted};
use crate::observability::messages::StructuredLog;
use crate::registry::{Compute, FeatureDefinition, FeatureInputs};

/// Output of one feature computation.
#[derive(Debug)]
pub struct ComputedFeature {
    pub column: Column,
    /// Parameters learned by a stateful feature during a fit
    pub learned: Option<serde_json::Value>,
}

/// Run a single feature's computation.
///
/// Shared by every executor. Stateless features ignore `mode`. Stateful
/// features fit then apply in `Fit` mode and apply the params stored in
/// `fitted` in `Transform` mode. The produced column must have one value per
/// dataset row. Errors and panics raised by the computation both come back as
/// `Computation` for this feature.
pub fn compute_feature(
    definition: &FeatureDefinition,
    dataset: &Table,
    dependencies: &HashMap<String, Arc<Column>>,
    mode: Mode,
    fitted: &FittedState,
) -> Result<ComputedFeature, ExecutionError> {
    let feature = definition.name();
    let started = Instant::now();
    let inputs = FeatureInputs::new(feature, dataset, dependencies);

    let params = match (definition.compute(), mode) {
        (Compute::Stateful(_), Mode::Transform) => {
            Some(fitted.get(feature).ok_or_else(|| ExecutionError::NotFitted {
                feature: feature.to_string(),
            })?)
        }
        _ => None,
    };

    // A panicking computation fails this feature like any other error
    let result = panic::catch_unwind(AssertUnwindSafe(|| match (definition.compute(), params) {
        (Compute::Stateless(compute), _) => compute.as_ref()(&inputs).map(|column| (column, None)),
        (Compute::Stateful(estimator), None) => estimator
            .fit_apply(&inputs)
            .map(|(column, params)| (column, Some(params))),
        (Compute::Stateful(estimator), Some(params)) => estimator
            .apply_value(&inputs, params)
            .map(|column| (column, None)),
    }))
    .unwrap_or_else(|payload| Err(panic_error(payload.as_ref())));

    let checked = result.and_then(|(column, learned)| {
        if column.len() != dataset.num_rows() {
            return Err(FrameError::LengthMismatch {
                column: feature.to_string(),
                expected: dataset.num_rows(),
                actual: column.len(),
            }
            .into());
        }
        Ok((column, learned))
    });

    let (column, learned) = match checked {
        Ok(output) => output,
        Err(source) => {
            FeatureFailed {
                feature,
                mode: mode.as_str(),
                error: &*source,
            }
            .log();
            return Err(ExecutionError::Computation {
                feature: feature.to_string(),
                mode,
                source,
            });
        }
    };

    FeatureComputed {
        feature,
        mode: mode.as_str(),
        rows: column.len(),
        null_count: column.null_count(),
        duration: started.elapsed(),
    }
    .log();
    if learned.is_some() {
        FeatureFitted {
            feature,
            rows: dataset.num_rows(),
        }
        .log();
    }

    Ok(ComputedFeature { column, learned })
}

/// Turn a panic payload into the error reported for the panicking feature
pub(crate) fn panic_error(payload: &(dyn Any + Send)) -> anyhow::Error {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    anyhow::anyhow!("computation panicked: {}", message)
}
