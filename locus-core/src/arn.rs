//! ARN - Amazon Resource Name parsing
//!
//! Format: `arn:partition:service:region:account-id:resource`.
//! The resource section keeps any further `:` characters.

use std::fmt;
use std::str::FromStr;

const ARN_PREFIX: &str = "arn:";
const ARN_SECTIONS: usize = 6;

/// ARN parse error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArnError {
    #[error("arn: invalid prefix")]
    InvalidPrefix,

    #[error("arn: not enough sections")]
    NotEnoughSections,
}

/// Parsed Amazon Resource Name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arn {
    /// Partition (e.g., "aws", "aws-cn")
    pub partition: String,
    /// Service namespace (e.g., "s3-outposts", "datasync")
    pub service: String,
    pub region: String,
    pub account_id: String,
    /// Everything after the fifth `:`
    pub resource: String,
}

impl FromStr for Arn {
    type Err = ArnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.starts_with(ARN_PREFIX) {
            return Err(ArnError::InvalidPrefix);
        }

        let sections: Vec<&str> = s.splitn(ARN_SECTIONS, ':').collect();
        if sections.len() != ARN_SECTIONS {
            return Err(ArnError::NotEnoughSections);
        }

        Ok(Self {
            partition: sections[1].to_string(),
            service: sections[2].to_string(),
            region: sections[3].to_string(),
            account_id: sections[4].to_string(),
            resource: sections[5].to_string(),
        })
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}",
            self.partition, self.service, self.region, self.account_id, self.resource
        )
    }
}
