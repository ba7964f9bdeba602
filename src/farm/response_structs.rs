//! Response structures for the Sunflower Land community API.
//!
//! This module contains structures for deserializing the JSON returned by
//! `/community/farms/{farmId}`. Only the fields the readiness engine reads are
//! declared; boosts and every other field are ignored.

use std::{fmt, marker::PhantomData};

use serde::{
    Deserialize, Deserializer,
    de::{self, MapAccess, Visitor},
};

use crate::farm::structs::RawTimestamp;

/// Top level body of `/community/farms/{farmId}`.
#[derive(Deserialize, Debug, Default)]
pub struct FarmResponse {
    #[serde(default)]
    pub farm: FarmDetail,
}

/// The `farm` object. Every collection is keyed by instance id.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct FarmDetail {
    #[serde(default, deserialize_with = "ordered_entries")]
    pub crops: Vec<(String, PlotDetail)>,
    #[serde(default, deserialize_with = "ordered_entries")]
    pub trees: Vec<(String, TreeDetail)>,
    #[serde(default, deserialize_with = "ordered_entries")]
    pub stones: Vec<(String, StoneDetail)>,
    #[serde(default, deserialize_with = "ordered_entries")]
    pub beehives: Vec<(String, BeehiveDetail)>,
    pub floating_island: Option<FloatingIslandDetail>,
}

/// A crop plot, `crop` is absent when nothing is planted.
#[derive(Deserialize, Debug, Default)]
pub struct PlotDetail {
    pub crop: Option<CropDetail>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CropDetail {
    pub name: Option<String>,
    pub planted_at: Option<RawTimestamp>,
}

#[derive(Deserialize, Debug, Default)]
pub struct TreeDetail {
    pub wood: Option<WoodDetail>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct WoodDetail {
    pub chopped_at: Option<RawTimestamp>,
}

#[derive(Deserialize, Debug, Default)]
pub struct StoneDetail {
    pub stone: Option<MinedDetail>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct MinedDetail {
    pub mined_at: Option<RawTimestamp>,
}

#[derive(Deserialize, Debug, Default)]
pub struct BeehiveDetail {
    #[serde(default)]
    pub swarm: bool,
    #[serde(default)]
    pub flowers: Vec<FlowerDetail>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct FlowerDetail {
    pub attached_until: Option<RawTimestamp>,
}

#[derive(Deserialize, Debug, Default)]
pub struct FloatingIslandDetail {
    #[serde(default)]
    pub schedule: Vec<IslandEventDetail>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct IslandEventDetail {
    pub start_at: Option<RawTimestamp>,
    pub end_at: Option<RawTimestamp>,
}

impl fmt::Display for FarmDetail {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "crops={}, trees={}, stones={}, beehives={}",
            self.crops.len(),
            self.trees.len(),
            self.stones.len(),
            self.beehives.len()
        )
    }
}

/// Deserializes a JSON object into `(key, value)` pairs in document order.
///
/// `null` is accepted and yields no entries.
fn ordered_entries<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct EntriesVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
        type Value = Vec<(String, T)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an object keyed by instance id")
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, T>()? {
                entries.push((key, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_any(EntriesVisitor(PhantomData))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collections_keep_document_order() {
        let body = r#"{"farm": {"trees": {
            "9": {"wood": {"choppedAt": 1}},
            "2": {"wood": {"choppedAt": 2}},
            "5": {"wood": {}}
        }}}"#;

        let response: FarmResponse = serde_json::from_str(body).unwrap();
        let ids: Vec<&str> = response
            .farm
            .trees
            .iter()
            .map(|(id, _)| id.as_str())
            .collect();
        assert_eq!(ids, vec!["9", "2", "5"]);
        assert!(response.farm.trees[2].1.wood.as_ref().unwrap().chopped_at.is_none());
    }

    #[test]
    fn test_missing_and_null_collections_are_empty() {
        let response: FarmResponse =
            serde_json::from_str(r#"{"farm": {"crops": null}}"#).unwrap();
        assert!(response.farm.crops.is_empty());
        assert!(response.farm.stones.is_empty());
        assert!(response.farm.floating_island.is_none());

        let response: FarmResponse = serde_json::from_str("{}").unwrap();
        assert!(response.farm.beehives.is_empty());
    }

    #[test]
    fn test_boost_fields_are_ignored() {
        let body = r#"{"farm": {"crops": {"1": {"crop": {
            "name": "Potato", "plantedAt": 1000000, "boostedTime": 60000, "amount": 2
        }}}}}"#;

        let response: FarmResponse = serde_json::from_str(body).unwrap();
        let crop = response.farm.crops[0].1.crop.as_ref().unwrap();
        assert_eq!(crop.name.as_deref(), Some("Potato"));
        assert_eq!(crop.planted_at, Some(RawTimestamp::Number(1_000_000.0)));
    }

    #[test]
    fn test_beehive_and_island() {
        let body = r#"{"farm": {
            "beehives": {"h1": {"swarm": true, "flowers": [{"attachedUntil": 5}, {}]}},
            "floatingIsland": {"schedule": [{"startAt": 10, "endAt": 20}]}
        }}"#;

        let response: FarmResponse = serde_json::from_str(body).unwrap();
        let (id, hive) = &response.farm.beehives[0];
        assert_eq!(id, "h1");
        assert!(hive.swarm);
        assert_eq!(hive.flowers.len(), 2);
        assert!(hive.flowers[1].attached_until.is_none());

        let schedule = response.farm.floating_island.unwrap().schedule;
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].end_at, Some(RawTimestamp::Number(20.0)));
    }
}
