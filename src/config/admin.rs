use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::admin::SpaceSchema;
use crate::Error;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdminConfig {
    /// Admin tool invoked as `<program> add-space -h <host> -p <port>`
    #[serde(default = "default_program")]
    pub program: String,

    /// Space registered with the service layer before the test command runs
    #[serde(default = "SpaceSchema::wtf_metadata")]
    pub space: SpaceSchema,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            space: SpaceSchema::wtf_metadata(),
        }
    }
}

impl AdminConfig {
    pub fn validate(&self) -> Result<()> {
        if self.program.is_empty() {
            return Err(Error::Config(ConfigError::Message(
                "admin.program cannot be empty".into(),
            )));
        }
        self.space.validate()
    }
}

fn default_program() -> String {
    "hyperdex".to_string()
}
