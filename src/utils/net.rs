use tokio::net::TcpStream;

use crate::Result;

/// Succeeds once something accepts TCP connections on `host:port`.
pub(crate) async fn connect_once(
    host: &str,
    port: u16,
) -> Result<()> {
    TcpStream::connect((host, port)).await?;
    Ok(())
}
