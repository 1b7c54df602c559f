//! Python bindings.
//!
//! Rows cross the boundary as JSON in the shape the storage layer returns
//! them; summaries come back as JSON strings ready to serve.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::bracket::Bracket;
use crate::config::EngineConfig;
use crate::error::BracketError;
use crate::leaderboard::build_leaderboard;
use crate::pick::PickSet;
use crate::policy::ScoringPolicy;
use crate::recompute::recompute_all;
use crate::result::ResultIndex;
use crate::scoring::{evaluate, BracketEvaluation};
use crate::stats::{aggregate, alive_summary, MatchupTable};

fn value_error(e: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn to_json<T: Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value).map_err(value_error)
}

fn brackets_and_results(brackets_json: &str, results_json: &str, version: u64) -> PyResult<(Vec<Bracket>, ResultIndex)> {
    let brackets = Bracket::list_from_json(brackets_json).map_err(value_error)?;
    let results = ResultIndex::from_json(results_json).map_err(value_error)?;
    Ok((brackets, results.with_version(version)))
}

fn policy_or_default(policy: Option<&ScoringPolicy>) -> ScoringPolicy {
    policy.cloned().unwrap_or_default()
}

/// Evaluate one bracket's predictions against the recorded results.
///
/// Predictions that are not valid JSON are treated like any other
/// malformed bracket: as no picks at all.
#[pyfunction]
#[pyo3(signature = (predictions_json, results_json, policy = None))]
fn evaluate_bracket(
    predictions_json: &str,
    results_json: &str,
    policy: Option<&ScoringPolicy>,
) -> PyResult<BracketEvaluation> {
    let predictions: Value = serde_json::from_str(predictions_json).unwrap_or_else(|e| {
        warn!(error = %e, "predictions are not valid JSON");
        Value::Null
    });
    let results = ResultIndex::from_json(results_json).map_err(value_error)?;
    Ok(evaluate(&PickSet::from_value(&predictions), &results, &policy_or_default(policy)))
}

/// Leaderboard as JSON.
#[pyfunction]
#[pyo3(signature = (brackets_json, results_json, policy = None))]
fn leaderboard_json(brackets_json: &str, results_json: &str, policy: Option<&ScoringPolicy>) -> PyResult<String> {
    let (brackets, results) = brackets_and_results(brackets_json, results_json, 0)?;
    to_json(&build_leaderboard(&brackets, &results, &policy_or_default(policy)))
}

/// Pick statistics as JSON. `config_toml` supplies the edition's pairings.
#[pyfunction]
#[pyo3(signature = (brackets_json, config_toml = None))]
fn stats_json(brackets_json: &str, config_toml: Option<&str>) -> PyResult<String> {
    let brackets = Bracket::list_from_json(brackets_json).map_err(value_error)?;
    let matchups = match config_toml {
        Some(toml) => EngineConfig::from_toml_str(toml)
            .map_err(BracketError::from)
            .map_err(value_error)?
            .matchups,
        None => MatchupTable::default(),
    };
    to_json(&aggregate(&brackets, &matchups))
}

/// Alive counts as JSON.
#[pyfunction]
#[pyo3(signature = (brackets_json, results_json, policy = None))]
fn alive_summary_json(brackets_json: &str, results_json: &str, policy: Option<&ScoringPolicy>) -> PyResult<String> {
    let (brackets, results) = brackets_and_results(brackets_json, results_json, 0)?;
    to_json(&alive_summary(&brackets, &results, &policy_or_default(policy)))
}

/// `(bracket_id, score)` pairs for the storage layer to write back.
#[pyfunction]
#[pyo3(signature = (brackets_json, results_json, policy = None, results_version = 0))]
fn recompute_scores(
    brackets_json: &str,
    results_json: &str,
    policy: Option<&ScoringPolicy>,
    results_version: u64,
) -> PyResult<Vec<(i64, u32)>> {
    let (brackets, results) = brackets_and_results(brackets_json, results_json, results_version)?;
    Ok(recompute_all(&brackets, &results, &policy_or_default(policy))
        .into_iter()
        .map(|u| (u.bracket_id, u.score))
        .collect())
}

/// Python module definition
#[pymodule]
fn bracket_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Classes
    m.add_class::<ScoringPolicy>()?;
    m.add_class::<BracketEvaluation>()?;

    // Functions
    m.add_function(wrap_pyfunction!(evaluate_bracket, m)?)?;
    m.add_function(wrap_pyfunction!(leaderboard_json, m)?)?;
    m.add_function(wrap_pyfunction!(stats_json, m)?)?;
    m.add_function(wrap_pyfunction!(alive_summary_json, m)?)?;
    m.add_function(wrap_pyfunction!(recompute_scores, m)?)?;

    Ok(())
}
