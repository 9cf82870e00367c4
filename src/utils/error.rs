use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitterError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Player '{name}' not found in roster")]
    UnknownPlayer { name: String },

    #[error("Player '{name}' is already on team {team}")]
    DuplicatePlayer { name: String, team: String },

    #[error("Not enough players: need at least {required}, got {actual}")]
    NotEnoughPlayers { required: usize, actual: usize },

    #[error("Need at least 2 teams to compare, got {actual}")]
    NotEnoughTeams { actual: usize },

    #[error("Not enough team labels: {required} teams but only {available} labels")]
    NotEnoughTeamLabels { required: usize, available: usize },

    #[error(
        "Team size imbalance: sizes range from {min} to {max}. Difference must not exceed 1 player."
    )]
    TeamSizeImbalance { min: usize, max: usize },

    #[error("Tuning error: {message}")]
    TuningError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Validation,
    DegenerateInput,
    Invariant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SplitterError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::Io,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::UnknownPlayer { .. } => ErrorCategory::Validation,
            Self::NotEnoughPlayers { .. }
            | Self::NotEnoughTeams { .. }
            | Self::NotEnoughTeamLabels { .. }
            | Self::TuningError { .. } => ErrorCategory::DegenerateInput,
            Self::DuplicatePlayer { .. } | Self::TeamSizeImbalance { .. } => {
                ErrorCategory::Invariant
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Io => ErrorSeverity::Medium,
            ErrorCategory::Configuration
            | ErrorCategory::Validation
            | ErrorCategory::DegenerateInput => ErrorSeverity::High,
            // a broken invariant is a bug in the distributor or the balancer
            ErrorCategory::Invariant => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::IoError(_) => {
                "Check that the file exists and that you have permission to access it"
            }
            Self::SerializationError(_) => {
                "Check that the roster is a JSON array of {name, role, skill} objects"
            }
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration file or command line flags",
            Self::UnknownPlayer { .. } => {
                "Add the player to the roster or fix the spelling in the players file"
            }
            Self::NotEnoughPlayers { .. } => "Select more players for the session",
            Self::NotEnoughTeams { .. } => "Split into 2 or 4 teams",
            Self::NotEnoughTeamLabels { .. } => "Add more labels under [teams] in the config",
            Self::TuningError { .. } => "Add at least two players of the same role to the roster",
            Self::DuplicatePlayer { .. } | Self::TeamSizeImbalance { .. } => {
                "Report this run together with its seed so it can be reproduced"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("Could not read or write data: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Validation => format!("Invalid player selection: {}", self),
            ErrorCategory::DegenerateInput => format!("Cannot split these players: {}", self),
            ErrorCategory::Invariant => format!("Internal error: {}", self),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl From<toml::de::Error> for SplitterError {
    fn from(e: toml::de::Error) -> Self {
        SplitterError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, SplitterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_player_is_validation_error() {
        let err = SplitterError::UnknownPlayer {
            name: "Pele".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("Pele"));
    }

    #[test]
    fn test_size_imbalance_is_critical() {
        let err = SplitterError::TeamSizeImbalance { min: 6, max: 8 };
        assert_eq!(err.category(), ErrorCategory::Invariant);
        assert_eq!(err.exit_code(), 3);
        assert!(err.user_friendly_message().starts_with("Internal error"));
    }
}
