use serde::Deserialize;
use serde::Serialize;

use nk_domainlevel::LONG_LENGTH;
use nk_domainlevel::SHORT_LENGTH;

use crate::compiler::to_pretty_json;
use crate::error::SchemeError;

/// Settings of a compilation.
///
/// Every field has a default, so a partial JSON object is a valid
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Nucleotide length of domains issued by `short()`.
    pub short_length: usize,
    /// Nucleotide length of domains issued by `long()`.
    pub long_length: usize,
    /// Split reversible reactions before the scheme sees them.
    pub split_reversible: bool,
    /// Class that builds formal species from their names.
    pub formal_class: String,
    /// Module that translates a single reaction.
    pub reaction_module: String,
    /// Module that translates the whole network.
    pub main_module: String,
    /// Maximal number of nested scheme calls.
    pub max_depth: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            short_length: SHORT_LENGTH,
            long_length: LONG_LENGTH,
            split_reversible: false,
            formal_class: "formal".to_string(),
            reaction_module: "reaction".to_string(),
            main_module: "main".to_string(),
            max_depth: 1024,
        }
    }
}

impl CompilerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, SchemeError> {
        serde_json::from_str(json).map_err(|err| SchemeError::Config(err.to_string()))
    }

    pub fn to_json_string(&self) -> Result<String, SchemeError> {
        to_pretty_json(self)
    }
}
