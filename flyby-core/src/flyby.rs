use chrono::{DateTime, Utc};
use tracing::info;

use crate::{
    error::Result,
    model::{CaptureQuery, Coordinate, Prediction},
    predict::predict_next_capture,
    provider::ImageryProvider,
};

/// Fetch the capture history of `coordinate` and predict the next capture after `now`.
///
/// `now` is both the `end` of the history query and the instant the
/// projection must pass.
pub async fn flyby(
    provider: &dyn ImageryProvider,
    coordinate: Coordinate,
    now: DateTime<Utc>,
    begin: Option<DateTime<Utc>>,
) -> Result<Prediction> {
    let query = CaptureQuery { coordinate, end: now, begin };
    let captures = provider.fetch_captures(&query).await?;

    let prediction = predict_next_capture(&captures, now)?;
    info!(
        latitude = coordinate.latitude(),
        longitude = coordinate.longitude(),
        next_capture = %prediction.next_capture,
        "predicted next capture"
    );

    Ok(prediction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::FlybyError,
        model::CaptureSet,
    };
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct FixedProvider {
        captures: Vec<DateTime<Utc>>,
        seen: Mutex<Vec<CaptureQuery>>,
    }

    #[async_trait]
    impl ImageryProvider for FixedProvider {
        async fn fetch_captures(&self, query: &CaptureQuery) -> Result<CaptureSet> {
            self.seen.lock().unwrap().push(query.clone());
            Ok(CaptureSet::from_dates(self.captures.iter().copied()))
        }
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn flyby_queries_up_to_now_and_projects_past_it() {
        let provider =
            FixedProvider { captures: vec![day(1), day(3), day(5)], ..Default::default() };
        let coordinate = Coordinate::new(48.858093, 2.294694).unwrap();

        let prediction = flyby(&provider, coordinate, day(10), None).await.expect("prediction");
        assert_eq!(prediction.next_capture, day(11));

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].end, day(10));
        assert_eq!(seen[0].coordinate, coordinate);
    }

    #[tokio::test]
    async fn flyby_surfaces_zero_interval() {
        let provider = FixedProvider { captures: vec![day(2), day(2)], ..Default::default() };
        let coordinate = Coordinate::new(0.0, 0.0).unwrap();

        let err = flyby(&provider, coordinate, day(10), None).await.unwrap_err();
        assert!(matches!(err, FlybyError::ZeroInterval));
    }
}
