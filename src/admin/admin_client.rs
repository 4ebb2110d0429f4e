use std::ffi::OsString;
use std::process::Stdio;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;
use tracing::info;

use super::SpaceSchema;
use crate::AdminError;
use crate::Result;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait AdminClient: Send + Sync {
    /// Registers `schema` with the coordinator; fails if it is rejected or
    /// the coordinator cannot be reached.
    async fn add_space(
        &self,
        schema: &SpaceSchema,
    ) -> Result<()>;
}

/// Drives the service layer's command-line admin tool:
/// `<program> add-space -h <host> -p <port>` with the space definition on
/// stdin.
pub struct CommandAdminClient {
    program: String,
    host: String,
    port: u16,
    env: Vec<(String, OsString)>,
}

impl CommandAdminClient {
    pub fn new(
        program: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        env: Vec<(String, OsString)>,
    ) -> Self {
        Self {
            program: program.into(),
            host: host.into(),
            port,
            env,
        }
    }

    fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[async_trait]
impl AdminClient for CommandAdminClient {
    async fn add_space(
        &self,
        schema: &SpaceSchema,
    ) -> Result<()> {
        let addr = self.addr();
        let definition = schema.to_string();
        debug!(%addr, %definition, "add-space");

        let mut child = Command::new(&self.program)
            .arg("add-space")
            .arg("-h")
            .arg(&self.host)
            .arg("-p")
            .arg(self.port.to_string())
            .env_clear()
            .envs(self.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| AdminError::Unreachable {
                addr: addr.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A tool that exits early closes the pipe; its status tells the story
            if let Err(e) = stdin.write_all(definition.as_bytes()).await {
                debug!(%addr, "add-space stdin closed early: {}", e);
            }
            drop(stdin);
        }

        let output = child.wait_with_output().await.map_err(|source| AdminError::Unreachable {
            addr: addr.clone(),
            source,
        })?;

        if !output.status.success() {
            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(AdminError::Rejected {
                addr,
                status: output.status.code(),
                output: text.trim().to_string(),
            }
            .into());
        }

        info!(%addr, space = %schema.name, "space registered");
        Ok(())
    }
}
