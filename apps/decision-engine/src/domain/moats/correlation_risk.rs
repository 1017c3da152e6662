//! Correlation-risk scorer.

use serde::{Deserialize, Serialize};

use super::MoatResult;
use crate::domain::portfolio::Portfolio;
use crate::domain::shared::Ticker;
use crate::domain::simulation::ReturnHistorySet;
use crate::domain::simulation::stats::pearson;

/// Clustering thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationRiskSettings {
    /// Pairs at or above this correlation are linked into a cluster.
    pub pair_threshold: f64,
    /// Clusters at or above this combined weight are flagged.
    pub concentration_threshold: f64,
    /// Minimum aligned observations per pair.
    pub min_overlap: usize,
}

impl Default for CorrelationRiskSettings {
    fn default() -> Self {
        Self {
            pair_threshold: 0.8,
            concentration_threshold: 0.4,
            min_overlap: 20,
        }
    }
}

/// Highly correlated positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationCluster {
    /// Members in portfolio order.
    pub tickers: Vec<Ticker>,
    /// Combined portfolio weight.
    pub combined_weight: f64,
    /// Mean pairwise correlation inside the cluster.
    pub mean_correlation: f64,
}

/// Correlation structure of the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationReport {
    /// Row/column labels of `matrix`.
    pub tickers: Vec<Ticker>,
    /// Pairwise Pearson correlations; 0.0 where undefined.
    pub matrix: Vec<Vec<f64>>,
    /// Observations used.
    pub overlap: usize,
    /// Clusters over the concentration threshold.
    pub flagged_clusters: Vec<CorrelationCluster>,
    /// Weight-averaged pairwise correlation, floored at zero.
    pub score: f64,
    /// Tickers left out for lack of history.
    pub skipped: Vec<Ticker>,
}

/// Disjoint-set forest over matrix indices.
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = i;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra.max(rb)] = ra.min(rb);
        }
    }
}

/// Score the portfolio's correlation concentration.
#[must_use]
pub fn assess(
    portfolio: &Portfolio,
    histories: &ReturnHistorySet,
    settings: &CorrelationRiskSettings,
) -> MoatResult<CorrelationReport> {
    let mut tickers = Vec::new();
    let mut weights = Vec::new();
    let mut skipped = Vec::new();
    for position in portfolio.positions() {
        if histories.is_usable(&position.ticker, settings.min_overlap.max(2)) {
            tickers.push(position.ticker.clone());
            weights.push(position.weight);
        } else {
            skipped.push(position.ticker.clone());
        }
    }

    if tickers.len() < 2 {
        return MoatResult::not_applicable(format!(
            "need at least two positions with {} overlapping observations, found {}",
            settings.min_overlap,
            tickers.len()
        ));
    }

    let series: Vec<&[f64]> = tickers
        .iter()
        .filter_map(|t| histories.get(t))
        .map(|h| h.returns.as_slice())
        .collect();
    let overlap = series.iter().map(|s| s.len()).min().unwrap_or(0);
    let aligned: Vec<&[f64]> = series.iter().map(|s| &s[s.len() - overlap..]).collect();

    let n = tickers.len();
    let mut matrix = vec![vec![0.0; n]; n];
    let mut forest = UnionFind::new(n);
    let (mut weighted_sum, mut weight_total) = (0.0, 0.0);

    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let rho = pearson(aligned[i], aligned[j]).unwrap_or(0.0);
            matrix[i][j] = rho;
            matrix[j][i] = rho;

            let pair_weight = weights[i] * weights[j];
            weighted_sum += pair_weight * rho;
            weight_total += pair_weight;

            if rho >= settings.pair_threshold {
                forest.union(i, j);
            }
        }
    }

    let score = if weight_total > 0.0 {
        (weighted_sum / weight_total).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut group_of_root: Vec<Option<usize>> = vec![None; n];
    for i in 0..n {
        let root = forest.find(i);
        match group_of_root[root] {
            Some(group) => groups[group].push(i),
            None => {
                group_of_root[root] = Some(groups.len());
                groups.push(vec![i]);
            }
        }
    }

    let flagged_clusters: Vec<CorrelationCluster> = groups
        .into_iter()
        .filter(|members| members.len() > 1)
        .map(|members| {
            let combined_weight = members.iter().map(|&i| weights[i]).sum();
            let mut pairs = Vec::new();
            for (k, &a) in members.iter().enumerate() {
                for &b in &members[k + 1..] {
                    pairs.push(matrix[a][b]);
                }
            }
            CorrelationCluster {
                tickers: members.iter().map(|&i| tickers[i].clone()).collect(),
                combined_weight,
                mean_correlation: pairs.iter().sum::<f64>() / pairs.len() as f64,
            }
        })
        .filter(|cluster| cluster.combined_weight >= settings.concentration_threshold)
        .collect();

    let report = CorrelationReport {
        tickers,
        matrix,
        overlap,
        flagged_clusters,
        score,
        skipped,
    };

    if report.flagged_clusters.is_empty() {
        MoatResult::not_applicable_with(
            format!(
                "no correlated cluster reaches {:.0}% of portfolio weight",
                settings.concentration_threshold * 100.0
            ),
            report,
        )
    } else {
        let largest = report
            .flagged_clusters
            .iter()
            .map(|c| c.combined_weight)
            .fold(0.0, f64::max);
        MoatResult::applicable(
            format!(
                "{} correlated cluster(s) flagged; largest holds {:.0}% of portfolio weight",
                report.flagged_clusters.len(),
                largest * 100.0
            ),
            report,
        )
    }
}
