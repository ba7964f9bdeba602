//! Snapshot fetching for the Sunflower Land API.
//!
//! This module provides the [`FarmFetcher`] struct that requests a farm and turns
//! the raw API response into a [`FarmSnapshot`].

use log::{debug, error, info};

use crate::farm::{
    FetchError, SnapshotSource,
    requester::Requester,
    response_structs::FarmDetail,
    structs::{Beehive, FarmSnapshot, InstanceKind, IslandEvent, ResourceInstance},
};

/// Builds farm snapshots from the Sunflower Land API.
///
/// It interacts with the API through a [Requester] implementation and converts
/// each collection of the response into the internal representation. Instance
/// order is preserved.
///
/// # Examples
///
/// ```no_run
/// let requester = FarmRequester::new("https://api.sunflower-land.com", "sfl.key", Duration::from_secs(10))?;
/// let fetcher = FarmFetcher::new(requester);
/// let snapshot = fetcher.fetch_farm_snapshot("23270").await?;
/// ```
pub struct FarmFetcher<R: Requester> {
    /// Requester to interact with the Sunflower Land API
    requester: R,
}

impl<R: Requester> FarmFetcher<R> {
    /// Create a new [FarmFetcher].
    pub fn new(requester: R) -> Self {
        FarmFetcher { requester }
    }

    /// Converts the `farm` object of a response into a [`FarmSnapshot`].
    fn convert_farm(&self, farm_id: &str, detail: FarmDetail) -> FarmSnapshot {
        let crops = detail
            .crops
            .into_iter()
            .map(|(id, plot)| {
                let (crop_name, action_at) = match plot.crop {
                    Some(crop) => (crop.name, crop.planted_at),
                    None => (None, None),
                };
                ResourceInstance {
                    id,
                    kind: InstanceKind::Crop,
                    action_at,
                    crop_name,
                }
            })
            .collect();

        let trees = detail
            .trees
            .into_iter()
            .map(|(id, tree)| ResourceInstance {
                id,
                kind: InstanceKind::Tree,
                action_at: tree.wood.and_then(|wood| wood.chopped_at),
                crop_name: None,
            })
            .collect();

        let stones = detail
            .stones
            .into_iter()
            .map(|(id, stone)| ResourceInstance {
                id,
                kind: InstanceKind::Stone,
                action_at: stone.stone.and_then(|mined| mined.mined_at),
                crop_name: None,
            })
            .collect();

        let beehives = detail
            .beehives
            .into_iter()
            .map(|(id, hive)| Beehive {
                id,
                swarm: hive.swarm,
                flowers_attached_until: hive
                    .flowers
                    .into_iter()
                    .filter_map(|flower| flower.attached_until)
                    .collect(),
            })
            .collect();

        let floating_island = detail
            .floating_island
            .map(|island| island.schedule)
            .unwrap_or_default()
            .into_iter()
            .map(|event| IslandEvent {
                start_at: event.start_at,
                end_at: event.end_at,
            })
            .collect();

        FarmSnapshot {
            farm_id: farm_id.to_owned(),
            crops,
            trees,
            stones,
            beehives,
            floating_island,
        }
    }
}

impl<R: Requester> SnapshotSource for FarmFetcher<R> {
    async fn fetch_farm_snapshot(&self, farm_id: &str) -> Result<FarmSnapshot, FetchError> {
        let response = match self.requester.get_farm(farm_id).await {
            Ok(response) => response,
            Err(e) => {
                error!("error while requesting farm {}: {}", farm_id, e);
                return Err(e);
            }
        };

        let snapshot = self.convert_farm(farm_id, response.farm);
        info!("fetched farm snapshot {}", snapshot);
        debug!("snapshot {:?}", snapshot);

        Ok(snapshot)
    }
}
