//! Two-phase anti-pattern detection.
//!
//! The compiler only produces query text. This module drives the protocol that
//! text is designed for, against any [`QueryExecutor`]:
//!
//! 1. If there is a predecessor query, run it first. No rows means the target of a
//!    missing edge is not in the graph at all, which already confirms the
//!    anti-pattern, so the full query is skipped.
//! 2. Otherwise run the full query. Rows present means the anti-pattern was found.
//!
//! Connections, retries and timeouts belong to the executor.

use std::error::Error;
use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::catalogue::{Catalogue, CatalogueError};
use crate::compiler::{self, CompiledPattern};

/// Runs query text against a graph store.
pub trait QueryExecutor {
    type Error: Error + 'static;

    /// Execute `query` and return the number of rows it produced.
    fn row_count(&mut self, query: &str) -> Result<usize, Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Predecessor,
    Full,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Predecessor => f.write_str("predecessor"),
            Phase::Full => f.write_str("full"),
        }
    }
}

#[derive(Error, Debug)]
#[error("{phase} query failed: {source}")]
pub struct DetectError<E: Error + 'static> {
    pub phase: Phase,
    #[source]
    pub source: E,
}

/// Outcome of running a compiled pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Detection {
    pub found: bool,
    /// The query whose result settled the outcome
    pub decided_by: Phase,
    pub queries_run: usize,
}

/// Run the two-phase protocol for a compiled pattern.
pub fn detect<X: QueryExecutor>(
    compiled: &CompiledPattern,
    executor: &mut X,
) -> Result<Detection, DetectError<X::Error>> {
    let mut queries_run = 0;

    if let Some(predecessor) = &compiled.predecessor {
        let rows = executor
            .row_count(predecessor)
            .map_err(|source| DetectError {
                phase: Phase::Predecessor,
                source,
            })?;
        queries_run += 1;

        if rows == 0 {
            debug!("predecessor query found no target vertices");
            return Ok(Detection {
                found: true,
                decided_by: Phase::Predecessor,
                queries_run,
            });
        }
        debug!(rows, "predecessor query found target vertices");
    }

    let rows = executor
        .row_count(&compiled.query)
        .map_err(|source| DetectError {
            phase: Phase::Full,
            source,
        })?;
    queries_run += 1;

    Ok(Detection {
        found: rows > 0,
        decided_by: Phase::Full,
        queries_run,
    })
}

/// A detection compared against the expected outcome for a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub pattern: String,
    pub detection: Detection,
    pub expected: bool,
}

impl Verdict {
    pub fn is_correct(&self) -> bool {
        self.detection.found == self.expected
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} - {} ({} query)",
            if self.is_correct() { "Correct" } else { "Incorrect" },
            self.pattern,
            if self.detection.found { "detected" } else { "not detected" },
            self.detection.decided_by
        )
    }
}

/// Check a graph against expected outcomes for a set of catalogue patterns.
///
/// `expectations` pairs a pattern id with whether it should be detected.
pub fn check_expectations<X: QueryExecutor>(
    catalogue: &Catalogue,
    expectations: &[(&str, bool)],
    executor: &mut X,
) -> Result<Vec<Verdict>, Box<dyn Error>> {
    let mut verdicts = Vec::with_capacity(expectations.len());

    for (id, expected) in expectations {
        let entry = catalogue
            .get(id)
            .ok_or_else(|| CatalogueError::UnknownPattern { id: id.to_string() })?;
        let compiled = compiler::compile(&entry.template);
        let detection = detect(&compiled, executor)?;

        let verdict = Verdict {
            pattern: entry.id.clone(),
            detection,
            expected: *expected,
        };
        info!(
            pattern = %verdict.pattern,
            found = detection.found,
            expected = *expected,
            correct = verdict.is_correct(),
            "checked anti-pattern"
        );
        verdicts.push(verdict);
    }

    Ok(verdicts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{ABUSING_OPT, DOUBLE_OPT, MISSING_REVERSAL};
    use rstest::{fixture, rstest};
    use std::collections::HashMap;

    #[derive(Debug, Error)]
    #[error("connection refused")]
    struct ConnectionRefused;

    /// Answers queries from a fixed table and records what was run.
    #[derive(Default)]
    struct ScriptedExecutor {
        rows: HashMap<String, usize>,
        fail_on: Option<String>,
        executed: Vec<String>,
    }

    impl ScriptedExecutor {
        fn answer(mut self, query: &str, rows: usize) -> Self {
            self.rows.insert(query.to_string(), rows);
            self
        }
    }

    impl QueryExecutor for ScriptedExecutor {
        type Error = ConnectionRefused;

        fn row_count(&mut self, query: &str) -> Result<usize, Self::Error> {
            self.executed.push(query.to_string());
            if self.fail_on.as_deref() == Some(query) {
                return Err(ConnectionRefused);
            }
            Ok(self.rows.get(query).copied().unwrap_or(0))
        }
    }

    #[fixture]
    fn catalogue() -> Catalogue {
        Catalogue::builtin().unwrap()
    }

    fn compiled(catalogue: &Catalogue, id: &str) -> CompiledPattern {
        compiler::compile(&catalogue.get(id).unwrap().template)
    }

    #[rstest]
    fn test_single_phase_found(catalogue: Catalogue) {
        let pattern = compiled(&catalogue, DOUBLE_OPT);
        let mut executor = ScriptedExecutor::default().answer(&pattern.query, 2);

        let detection = detect(&pattern, &mut executor).unwrap();
        assert_eq!(
            detection,
            Detection {
                found: true,
                decided_by: Phase::Full,
                queries_run: 1
            }
        );
        assert_eq!(executor.executed, vec![pattern.query.clone()]);
    }

    #[rstest]
    fn test_single_phase_not_found(catalogue: Catalogue) {
        let pattern = compiled(&catalogue, ABUSING_OPT);
        let mut executor = ScriptedExecutor::default();

        let detection = detect(&pattern, &mut executor).unwrap();
        assert!(!detection.found);
        assert_eq!(detection.decided_by, Phase::Full);
    }

    #[rstest]
    fn test_empty_predecessor_confirms_without_full_query(catalogue: Catalogue) {
        let pattern = compiled(&catalogue, MISSING_REVERSAL);
        let mut executor = ScriptedExecutor::default();

        let detection = detect(&pattern, &mut executor).unwrap();
        assert!(detection.found);
        assert_eq!(detection.decided_by, Phase::Predecessor);
        assert_eq!(detection.queries_run, 1);
        assert_eq!(executor.executed, vec![pattern.predecessor.clone().unwrap()]);
    }

    #[rstest]
    #[case(0, false)]
    #[case(3, true)]
    fn test_full_query_is_authoritative_after_predecessor(
        catalogue: Catalogue,
        #[case] full_rows: usize,
        #[case] found: bool,
    ) {
        let pattern = compiled(&catalogue, MISSING_REVERSAL);
        let predecessor = pattern.predecessor.clone().unwrap();
        let mut executor = ScriptedExecutor::default()
            .answer(&predecessor, 1)
            .answer(&pattern.query, full_rows);

        let detection = detect(&pattern, &mut executor).unwrap();
        assert_eq!(detection.found, found);
        assert_eq!(detection.decided_by, Phase::Full);
        assert_eq!(executor.executed, vec![predecessor, pattern.query.clone()]);
    }

    #[rstest]
    fn test_executor_error_reports_phase(catalogue: Catalogue) {
        let pattern = compiled(&catalogue, MISSING_REVERSAL);
        let mut executor = ScriptedExecutor {
            fail_on: pattern.predecessor.clone(),
            ..Default::default()
        };

        let err = detect(&pattern, &mut executor).unwrap_err();
        assert_eq!(err.phase, Phase::Predecessor);
        assert_eq!(err.to_string(), "predecessor query failed: connection refused");
    }

    #[rstest]
    fn test_check_expectations(catalogue: Catalogue) {
        let double_opt = compiled(&catalogue, DOUBLE_OPT);
        let mut executor = ScriptedExecutor::default().answer(&double_opt.query, 1);

        let verdicts = check_expectations(
            &catalogue,
            &[(DOUBLE_OPT, true), (ABUSING_OPT, true), (MISSING_REVERSAL, true)],
            &mut executor,
        )
        .unwrap();

        assert_eq!(verdicts.len(), 3);
        assert!(verdicts[0].is_correct());
        assert!(!verdicts[1].is_correct());
        assert!(verdicts[2].is_correct());
        assert_eq!(
            verdicts[0].to_string(),
            "[Correct] apDoubleOpt - detected (full query)"
        );
        assert_eq!(
            verdicts[1].to_string(),
            "[Incorrect] apAbusingOpt - not detected (full query)"
        );
        assert_eq!(
            verdicts[2].to_string(),
            "[Correct] apMissingReversal - detected (predecessor query)"
        );
    }

    #[rstest]
    fn test_check_expectations_unknown_pattern(catalogue: Catalogue) {
        let mut executor = ScriptedExecutor::default();
        let result = check_expectations(&catalogue, &[("apNope", true)], &mut executor);
        assert!(result.unwrap_err().to_string().contains("apNope"));
        assert!(executor.executed.is_empty());
    }
}
