use std::fmt;

/// Errors raised at registry/authoring time.
///
/// Everything described as "soft-failure" or "data integrity" in the battle
/// pipeline itself never reaches this type: those are modeled as `Option`
/// plus a logged warning. `BattleError` only covers the fail-fast tier —
/// problems with the *content* a battle is built from, not problems that
/// arise while a battle is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleError {
    /// Two enemy packs tried to register the same id with different data.
    DuplicateEnemyPack { pack_id: String },
    /// A pack's `register` entry point never ran (content authoring bug).
    MissingRegisterEntryPoint { pack_id: String },
    /// Registry bootstrap failed to load or parse its backing data.
    RegistryLoad { source: String },
}

impl fmt::Display for BattleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleError::DuplicateEnemyPack { pack_id } => {
                write!(f, "enemy pack '{pack_id}' registered more than once with mismatched data")
            }
            BattleError::MissingRegisterEntryPoint { pack_id } => {
                write!(f, "enemy pack '{pack_id}' has no register entry point")
            }
            BattleError::RegistryLoad { source } => {
                write!(f, "failed to load battle registry: {source}")
            }
        }
    }
}

impl std::error::Error for BattleError {}

pub type BattleResult<T> = Result<T, BattleError>;
