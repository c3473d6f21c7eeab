//! Shipping cost resolution.
//!
//! The shop service owns the canonical region/fee table; every lookup
//! tries it first. On any failure (network error, non-2xx, timeout) the
//! hardcoded table below answers instead, so checkout keeps working while
//! the shipping endpoint is degraded. The table must stay consistent with
//! the service's catalog; drift is not detected automatically.

use amara_core::types::{Price, RegionId};
use tracing::instrument;

use crate::shop_api::{Region, ShopApiClient};

/// The 27 delivery governorates and their flat fees in whole pounds.
///
/// Mirrors the shop service's canonical table.
const FALLBACK_TABLE: &[(i32, &str, i64)] = &[
    (1, "Cairo", 30),
    (2, "Giza", 30),
    (3, "Alexandria", 40),
    (4, "Dakahlia", 50),
    (5, "Red Sea", 80),
    (6, "Beheira", 45),
    (7, "Fayoum", 55),
    (8, "Gharbia", 45),
    (9, "Ismailia", 50),
    (10, "Monufia", 40),
    (11, "Minya", 60),
    (12, "Qalyubia", 35),
    (13, "New Valley", 100),
    (14, "Suez", 50),
    (15, "Aswan", 90),
    (16, "Assiut", 70),
    (17, "Beni Suef", 55),
    (18, "Port Said", 60),
    (19, "Damietta", 50),
    (20, "Sharqia", 45),
    (21, "South Sinai", 120),
    (22, "Kafr El Sheikh", 50),
    (23, "Matrouh", 100),
    (24, "Luxor", 85),
    (25, "Qena", 75),
    (26, "North Sinai", 110),
    (27, "Sohag", 65),
];

/// The static region catalog used when the service is unreachable.
#[must_use]
pub fn fallback_regions() -> Vec<Region> {
    FALLBACK_TABLE
        .iter()
        .map(|&(id, name, fee)| Region {
            id: RegionId::new(id),
            name: name.to_string(),
            fee: Price::from_pounds(fee),
        })
        .collect()
}

/// The static fee for a region, zero for an unknown ID.
///
/// Zero mirrors the service's own answer for an unknown region; the
/// checkout summary renders it as "not yet resolved".
#[must_use]
pub fn fallback_fee(region_id: RegionId) -> Price {
    FALLBACK_TABLE
        .iter()
        .find(|&&(id, _, _)| id == region_id.as_i32())
        .map_or(Price::ZERO, |&(_, _, fee)| Price::from_pounds(fee))
}

/// A resolution outcome plus whether the fallback path answered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    /// The resolved value.
    pub value: T,
    /// True when the service was unreachable and the static table answered.
    pub degraded: bool,
}

/// Fetch the region catalog, falling back to the static table.
#[instrument(skip(client))]
pub async fn region_catalog(client: &ShopApiClient) -> Resolved<Vec<Region>> {
    match client.list_regions().await {
        Ok(regions) => Resolved {
            value: regions,
            degraded: false,
        },
        Err(e) => {
            tracing::warn!("region catalog unavailable, using fallback table: {e}");
            Resolved {
                value: fallback_regions(),
                degraded: true,
            }
        }
    }
}

/// Resolve the shipping fee for a region, falling back to the static table.
#[instrument(skip(client), fields(region_id = %region_id))]
pub async fn shipping_fee(client: &ShopApiClient, region_id: RegionId) -> Resolved<Price> {
    match client.shipping_cost(region_id).await {
        Ok(fee) => Resolved {
            value: fee,
            degraded: false,
        },
        Err(e) => {
            tracing::warn!("shipping cost unavailable, using fallback table: {e}");
            Resolved {
                value: fallback_fee(region_id),
                degraded: true,
            }
        }
    }
}
