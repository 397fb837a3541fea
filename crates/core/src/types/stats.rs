//! Visit and lead counters shown on the admin dashboard.

use serde::{Deserialize, Deserializer, Serialize};

/// Storefront analytics counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Incremented once per new visitor session.
    #[serde(default, deserialize_with = "whole_count")]
    pub total_visits: u64,
    /// Incremented on every checkout attempt.
    #[serde(default, deserialize_with = "whole_count")]
    pub leads_generated: u64,
    /// Number of products in the store; derived, never written.
    #[serde(default, deserialize_with = "whole_count")]
    pub active_products: u64,
}

/// Read a counter that may have been stored as a float (`3.0`).
///
/// Fractions are truncated; negative values read as zero.
fn whole_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Whole(u64),
        Float(f64),
    }

    Ok(match Count::deserialize(deserializer)? {
        Count::Whole(count) => count,
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Count::Float(count) => count.max(0.0) as u64,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_float_counters_read_as_whole_numbers() {
        let stats: Result<Stats, _> =
            serde_json::from_value(json!({ "totalVisits": 3.0, "leadsGenerated": 7 }));
        let Ok(stats) = stats else {
            panic!("float counters should deserialize");
        };
        assert_eq!(stats.total_visits, 3);
        assert_eq!(stats.leads_generated, 7);
        assert_eq!(stats.active_products, 0);
    }

    #[test]
    fn test_negative_counter_reads_as_zero() {
        let stats: Result<Stats, _> = serde_json::from_value(json!({ "totalVisits": -2 }));
        assert_eq!(stats.map(|s| s.total_visits).ok(), Some(0));
    }
}
