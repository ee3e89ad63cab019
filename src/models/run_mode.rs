use std::fmt;
use std::str::FromStr;

/// Whether file operations are performed or only logged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    Active,
    #[default]
    Dry,
}

impl RunMode {
    /// Menu choice from the mode prompt: 1 is active, 2 is dry
    pub fn from_choice(choice: i64) -> Option<Self> {
        match choice {
            1 => Some(RunMode::Active),
            2 => Some(RunMode::Dry),
            _ => None,
        }
    }

    pub fn is_dry(self) -> bool {
        self == RunMode::Dry
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Active => f.write_str("active"),
            RunMode::Dry => f.write_str("dry"),
        }
    }
}

impl FromStr for RunMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" | "1" => Ok(RunMode::Active),
            "dry" | "dry-run" | "2" => Ok(RunMode::Dry),
            other => anyhow::bail!("Unknown run mode '{}', expected 'active' or 'dry'", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_choice() {
        assert_eq!(RunMode::from_choice(1), Some(RunMode::Active));
        assert_eq!(RunMode::from_choice(2), Some(RunMode::Dry));
        assert_eq!(RunMode::from_choice(0), None);
        assert_eq!(RunMode::from_choice(-2), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Active".parse::<RunMode>().unwrap(), RunMode::Active);
        assert_eq!(" dry ".parse::<RunMode>().unwrap(), RunMode::Dry);
        assert!("maybe".parse::<RunMode>().is_err());
    }
}
