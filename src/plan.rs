//! Survivor selection and deletion-plan building.
//!
//! For each cluster with more than one member, the most recently updated
//! record survives; everything else is marked for deletion. The similarity
//! persisted for each deleted member is measured against the keeper: the
//! audit trail answers "how similar is this to what we kept", not "how
//! similar is this to whatever pulled it into the cluster".

use crate::models::{ClusterPlan, DeduplicationPlan, PlannedDeletion, Record};
use crate::similarity::{record_similarity, DedupeParams};

/// Build the deletion plan from the cluster partition.
///
/// Singleton clusters produce no entry. The keeper is never in its own
/// deletion list.
pub fn build_plan(
    records: &[Record],
    clusters: &[Vec<usize>],
    params: &DedupeParams,
) -> DeduplicationPlan {
    let mut plan = DeduplicationPlan::default();

    for members in clusters {
        if members.len() < 2 {
            continue;
        }

        let ordered = order_by_recency(records, members);
        let keeper = ordered[0];

        let deletions = ordered[1..]
            .iter()
            .map(|&index| PlannedDeletion {
                index,
                similarity_to_keeper: keeper_similarity(records, keeper, index, params),
            })
            .collect();

        plan.clusters.push(ClusterPlan { keeper, deletions });
    }

    plan
}

/// Members sorted keeper-first: `updated_at` desc, then `created_at` desc,
/// then `id` asc so the order is reproducible even on full timestamp ties.
fn order_by_recency(records: &[Record], members: &[usize]) -> Vec<usize> {
    let mut ordered = members.to_vec();
    ordered.sort_by(|&x, &y| {
        records[y]
            .updated_at
            .cmp(&records[x].updated_at)
            .then(records[y].created_at.cmp(&records[x].created_at))
            .then(records[x].id.cmp(&records[y].id))
    });
    ordered
}

/// Similarity of `index` specifically to the cluster keeper, recomputed
/// even when the pair was never directly compared during edge finding.
fn keeper_similarity(
    records: &[Record],
    keeper: usize,
    index: usize,
    params: &DedupeParams,
) -> f64 {
    let k = &records[keeper];
    let m = &records[index];
    if !k.fingerprint.is_empty() && k.fingerprint == m.fingerprint {
        return 1.0;
    }
    record_similarity(k, m, params)
}
