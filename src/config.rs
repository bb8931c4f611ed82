//! Settings for building an alignment hypergraph.
use crate::error::{Error, Result};
use crate::hypergraph::InsertMode;

/// How much structure the comparator explores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlignConfig {
    /// Maximum number of variables per mapping. `None` allows as many as the larger DAG has
    /// nodes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub variable_budget: Option<usize>,
    /// Maximum distance from a subgraph root to its nodes. `None` is unbounded.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_depth: Option<usize>,
    /// Insertion policy of the built hypergraph. The comparator itself resolves duplicate
    /// hyperedges by weight in both modes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub insert_mode: InsertMode,
}

impl AlignConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the variable budget. Zero is rejected when the hypergraph is built.
    pub fn variable_budget(mut self, budget: usize) -> Self {
        self.variable_budget = Some(budget);
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn insert_mode(mut self, mode: InsertMode) -> Self {
        self.insert_mode = mode;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.variable_budget == Some(0) {
            return Err(Error::invalid("incorrect number of variables to assign"));
        }
        Ok(())
    }

    /// Parse a configuration such as `{"variable_budget": 2, "max_depth": 3}`.
    ///
    /// Missing fields take their defaults. Negative numbers and a zero budget are
    /// [`Error::InvalidArgument`].
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self> {
        #[derive(serde::Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Raw {
            #[serde(default)]
            variable_budget: Option<i64>,
            #[serde(default)]
            max_depth: Option<i64>,
            #[serde(default)]
            insert_mode: InsertMode,
        }

        fn non_negative(field: &str, value: Option<i64>) -> Result<Option<usize>> {
            value
                .map(|v| {
                    usize::try_from(v)
                        .map_err(|_| Error::invalid(format!("{field} must not be negative: {v}")))
                })
                .transpose()
        }

        let raw: Raw = serde_json::from_str(json)
            .map_err(|e| Error::invalid(format!("malformed configuration: {e}")))?;
        let config = AlignConfig {
            variable_budget: non_negative("variable_budget", raw.variable_budget)?,
            max_depth: non_negative("max_depth", raw.max_depth)?,
            insert_mode: raw.insert_mode,
        };
        config.validate()?;
        Ok(config)
    }
}
