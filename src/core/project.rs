use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::core::mapper::ViewportMapper;
use crate::core::Sample;
use crate::error::EngineResult;

/// A visible sample projected into pixel coordinates, with its domain
/// values carried along for hit-testing and labeling by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
    pub time: f64,
    pub price: f64,
    pub volume: u64,
}

/// Projects visible samples into deterministic render geometry.
///
/// The function is pure and side-effect free so it can be used both in
/// rendering and in regression tests.
pub fn project_samples(
    samples: &[Sample],
    mapper: ViewportMapper,
) -> EngineResult<Vec<SamplePoint>> {
    #[cfg(feature = "parallel-projection")]
    {
        let projected: Vec<EngineResult<SamplePoint>> = samples
            .par_iter()
            .map(|sample| project_single_sample(*sample, mapper))
            .collect();
        projected.into_iter().collect()
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        let mut out = Vec::with_capacity(samples.len());
        for sample in samples {
            out.push(project_single_sample(*sample, mapper)?);
        }
        Ok(out)
    }
}

fn project_single_sample(sample: Sample, mapper: ViewportMapper) -> EngineResult<SamplePoint> {
    Ok(SamplePoint {
        x: mapper.time_to_x(sample.time)?,
        y: mapper.price_to_y(sample.price)?,
        time: sample.time,
        price: sample.price,
        volume: sample.volume,
    })
}
