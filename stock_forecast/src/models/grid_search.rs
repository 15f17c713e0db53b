//! SVR with hyper-parameters chosen by grid search
//!
//! Every combination of the candidate `C`, `gamma` and `epsilon` values is
//! scored by its mean absolute error (in price units) over forward-chaining
//! folds: each fold trains on an expanding prefix of the training set and
//! validates on the block right after it, so the model is always scored on
//! dates it has not seen. Candidates are visited in a fixed order and only a
//! strictly better score replaces the current best, which keeps the search
//! deterministic. The winner is refitted on the whole training set.

use crate::error::{ForecastError, Result};
use crate::models::svr::{FittedSvr, SvrRegressor};
use crate::models::{ensure_distinct_features, FittedModel, Regressor};
use crate::preparation::TrainingSet;
use forecast_math::{forecast_accuracy, SvrParams};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::debug;

/// Candidate values and fold count for the search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSearch {
    #[serde(rename = "C")]
    pub c: Vec<f64>,
    pub gamma: Vec<f64>,
    pub epsilon: Vec<f64>,
    /// Number of forward-chaining folds
    pub folds: usize,
}

impl Default for GridSearch {
    fn default() -> Self {
        Self {
            c: vec![0.1, 1.0, 10.0, 100.0],
            gamma: vec![0.001, 0.01, 0.1, 1.0],
            epsilon: vec![0.01, 0.1, 0.5],
            folds: 5,
        }
    }
}

/// Best candidate found by a search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome {
    pub params: SvrParams,
    /// Mean absolute error across folds
    pub score: f64,
}

impl GridSearch {
    pub fn validate(&self) -> Result<()> {
        if self.c.is_empty() || self.gamma.is_empty() || self.epsilon.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "grid search needs at least one candidate for C, gamma and epsilon".to_string(),
            ));
        }
        if self.folds == 0 {
            return Err(ForecastError::InvalidParameter(
                "grid search needs at least one fold".to_string(),
            ));
        }
        Ok(())
    }

    /// All parameter combinations, `C` outermost and `epsilon` innermost
    pub fn candidates(&self, base: &SvrParams) -> Vec<SvrParams> {
        let mut out = Vec::with_capacity(self.c.len() * self.gamma.len() * self.epsilon.len());
        for &c in &self.c {
            for &gamma in &self.gamma {
                for &epsilon in &self.epsilon {
                    out.push(SvrParams {
                        c,
                        gamma,
                        epsilon,
                        ..*base
                    });
                }
            }
        }
        out
    }

    /// `(train_end, test_range)` pairs for `n` samples; training always
    /// covers `0..train_end` and holds at least two samples.
    pub fn fold_ranges(&self, n: usize) -> Vec<(usize, Range<usize>)> {
        let block = (n / (self.folds + 1)).max(1);
        let mut ranges = Vec::new();
        for fold in 1..=self.folds {
            let train_end = fold * block;
            if train_end >= n {
                break;
            }
            if train_end < 2 {
                continue;
            }
            let test_end = if fold == self.folds {
                n
            } else {
                ((fold + 1) * block).min(n)
            };
            ranges.push((train_end, train_end..test_end));
        }
        ranges
    }
}

/// SVR regressor that tunes itself with a [`GridSearch`]
#[derive(Debug, Clone)]
pub struct GridSearchSvr {
    name: String,
    grid: GridSearch,
    /// Kernel, tolerance and iteration cap shared by every candidate
    base: SvrParams,
}

impl GridSearchSvr {
    pub fn new(grid: GridSearch, base: SvrParams) -> Result<Self> {
        grid.validate()?;
        for params in grid.candidates(&base) {
            params
                .validate()
                .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;
        }

        Ok(Self {
            name: format!(
                "SVR grid search ({} candidates, {} folds)",
                grid.c.len() * grid.gamma.len() * grid.epsilon.len(),
                grid.folds
            ),
            grid,
            base,
        })
    }

    /// Score every candidate and return the best one
    pub fn search(&self, training: &TrainingSet) -> Result<SearchOutcome> {
        let folds = self.grid.fold_ranges(training.len());
        if folds.is_empty() {
            return Err(ForecastError::InsufficientData(format!(
                "grid search needs at least 3 observations, got {}",
                training.len()
            )));
        }

        let mut best: Option<SearchOutcome> = None;
        for params in self.grid.candidates(&self.base) {
            let score = self.score(&params, training, &folds);
            debug!(c = params.c, gamma = params.gamma, epsilon = params.epsilon, score, "scored candidate");
            if best.map_or(true, |b| score < b.score) {
                best = Some(SearchOutcome { params, score });
            }
        }

        match best {
            Some(outcome) if outcome.score.is_finite() => Ok(outcome),
            _ => Err(ForecastError::ModelFit(
                "no grid search candidate could be fitted".to_string(),
            )),
        }
    }

    /// Mean absolute error over all folds, infinite if any fold fails
    fn score(&self, params: &SvrParams, training: &TrainingSet, folds: &[(usize, Range<usize>)]) -> f64 {
        let regressor = match SvrRegressor::new(*params) {
            Ok(r) => r,
            Err(_) => return f64::INFINITY,
        };

        let mut total = 0.0;
        for (train_end, test) in folds {
            let fold_mae = training.slice(0..*train_end).and_then(|head| {
                let fitted = regressor.fit(&head)?;
                let predicted: Vec<f64> = training.features()[test.clone()]
                    .iter()
                    .map(|&x| fitted.evaluate(x))
                    .collect();
                let accuracy = forecast_accuracy(&predicted, &training.targets()[test.clone()])?;
                Ok(accuracy.mae)
            });
            match fold_mae {
                Ok(mae) if mae.is_finite() => total += mae,
                _ => return f64::INFINITY,
            }
        }
        total / folds.len() as f64
    }
}

impl Regressor for GridSearchSvr {
    type Fitted = FittedSvr;

    fn fit(&self, training: &TrainingSet) -> Result<FittedSvr> {
        ensure_distinct_features(training)?;
        let outcome = self.search(training)?;
        debug!(
            c = outcome.params.c,
            gamma = outcome.params.gamma,
            epsilon = outcome.params.epsilon,
            score = outcome.score,
            "grid search selected parameters"
        );
        SvrRegressor::new(outcome.params)?.fit(training)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
