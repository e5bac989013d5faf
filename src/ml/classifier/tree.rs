//! Regression trees over sparse rows.
//!
//! Trees are grown depth-first on squared error. A row goes left when its
//! value for the split feature is `<= threshold`; absent entries count as
//! zero, so every split also places the implicit zeros.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::ml::sparse::{SparseMatrix, SparseVector};

/// Tree growth limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
}

/// A node in a regression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    /// Predicted value for a row.
    pub fn predict(&self, row: &SparseVector) -> f64 {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row.get(*feature) <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Depth of the deepest leaf; a single leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    gain: f64,
}

/// Grow a tree fitting `targets`. Leaf values come from `leaf_value`,
/// called with the sample indices that reach the leaf.
pub(crate) fn grow<F>(
    features: &SparseMatrix,
    targets: &[f64],
    params: TreeParams,
    leaf_value: &F,
) -> TreeNode
where
    F: Fn(&[usize]) -> f64,
{
    let samples: Vec<usize> = (0..features.n_rows()).collect();
    grow_node(features, targets, &samples, 0, params, leaf_value)
}

fn grow_node<F>(
    features: &SparseMatrix,
    targets: &[f64],
    samples: &[usize],
    depth: usize,
    params: TreeParams,
    leaf_value: &F,
) -> TreeNode
where
    F: Fn(&[usize]) -> f64,
{
    if depth >= params.max_depth || samples.len() < params.min_samples_split.max(2) {
        return TreeNode::Leaf {
            value: leaf_value(samples),
        };
    }

    let Some(best) = find_best_split(features, targets, samples) else {
        return TreeNode::Leaf {
            value: leaf_value(samples),
        };
    };

    let (left, right): (Vec<usize>, Vec<usize>) = samples
        .iter()
        .partition(|&&i| features.row(i).get(best.feature) <= best.threshold);

    log::trace!(
        "split depth {} on feature {} at {:.4} (gain {:.6}): {} | {}",
        depth,
        best.feature,
        best.threshold,
        best.gain,
        left.len(),
        right.len()
    );

    TreeNode::Split {
        feature: best.feature,
        threshold: best.threshold,
        left: Box::new(grow_node(
            features,
            targets,
            &left,
            depth + 1,
            params,
            leaf_value,
        )),
        right: Box::new(grow_node(
            features,
            targets,
            &right,
            depth + 1,
            params,
            leaf_value,
        )),
    }
}

fn find_best_split(
    features: &SparseMatrix,
    targets: &[f64],
    samples: &[usize],
) -> Option<BestSplit> {
    let n = samples.len() as f64;
    let total: f64 = samples.iter().map(|&i| targets[i]).sum();
    let parent_score = total * total / n;

    // Stored entries per feature among this node's samples.
    let mut columns: AHashMap<usize, Vec<(f64, f64)>> = AHashMap::new();
    for &i in samples {
        for (feature, value) in features.row(i).iter() {
            columns.entry(feature).or_default().push((value, targets[i]));
        }
    }
    let mut candidate_features: Vec<usize> = columns.keys().copied().collect();
    candidate_features.sort_unstable();

    let mut best: Option<BestSplit> = None;
    for feature in candidate_features {
        let mut entries = columns.remove(&feature).unwrap_or_default();

        // Implicit zeros form one group.
        let stored_sum: f64 = entries.iter().map(|&(_, t)| t).sum();
        let zero_count = samples.len() - entries.len();
        let mut groups: Vec<(f64, usize, f64)> = Vec::with_capacity(entries.len() + 1);
        if zero_count > 0 {
            groups.push((0.0, zero_count, total - stored_sum));
        }

        entries.sort_by(|a, b| a.0.total_cmp(&b.0));
        for (value, target) in entries {
            match groups.last_mut() {
                Some(last) if last.0 == value => {
                    last.1 += 1;
                    last.2 += target;
                }
                _ => groups.push((value, 1, target)),
            }
        }
        groups.sort_by(|a, b| a.0.total_cmp(&b.0));
        let groups = merge_equal(groups);

        let mut left_count = 0usize;
        let mut left_sum = 0.0;
        for pair in groups.windows(2) {
            let (value, count, sum) = pair[0];
            left_count += count;
            left_sum += sum;
            let right_count = samples.len() - left_count;
            let right_sum = total - left_sum;

            let gain = left_sum * left_sum / left_count as f64
                + right_sum * right_sum / right_count as f64
                - parent_score;
            if gain > best.as_ref().map_or(1e-12, |b| b.gain) {
                best = Some(BestSplit {
                    feature,
                    threshold: (value + pair[1].0) / 2.0,
                    gain,
                });
            }
        }
    }
    best
}

fn merge_equal(groups: Vec<(f64, usize, f64)>) -> Vec<(f64, usize, f64)> {
    let mut merged: Vec<(f64, usize, f64)> = Vec::with_capacity(groups.len());
    for group in groups {
        match merged.last_mut() {
            Some(last) if last.0 == group.0 => {
                last.1 += group.1;
                last.2 += group.2;
            }
            _ => merged.push(group),
        }
    }
    merged
}
