//! Common test utilities for integration tests.
//!
//! Provides `TestNamespace` for isolated network namespace testing,
//! helpers to run a listening connection inside it, and macros for
//! conditional test execution.

use std::io;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;
use std::sync::Once;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use rtnl::netlink::{Config, Connection, ListenRequest, Message, MessageStream};
use rtnl::{Error, Result};
use tokio::task::JoinHandle;

/// How long a test waits for any single message.
pub const WAIT: Duration = Duration::from_secs(5);

/// Global counter for unique namespace names.
static NAMESPACE_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Generate a unique namespace name for this test.
fn unique_ns_name(prefix: &str) -> String {
    let id = NAMESPACE_COUNTER.fetch_add(1, Ordering::SeqCst);
    let pid = std::process::id();
    format!("rtnl-test-{}-{}-{}", prefix, pid, id)
}

/// Install a `RUST_LOG`-driven subscriber once per test binary.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A test network namespace with automatic cleanup.
///
/// Created with `ip netns add`, so it only contains a `lo` that is down.
/// The namespace is deleted when the struct is dropped.
pub struct TestNamespace {
    name: String,
}

impl TestNamespace {
    /// Create a new test namespace with a unique name.
    pub fn new(prefix: &str) -> Result<Self> {
        let name = unique_ns_name(prefix);

        let status = Command::new("ip")
            .args(["netns", "add", &name])
            .status()
            .map_err(|e| Error::Io(io::Error::from(e.kind())))?;

        if !status.success() {
            return Err(Error::InvalidMessage(format!(
                "failed to create namespace: {}",
                name
            )));
        }

        Ok(Self { name })
    }

    /// Path of the namespace file `ip netns` bind-mounted.
    pub fn path(&self) -> PathBuf {
        PathBuf::from("/run/netns").join(&self.name)
    }

    /// A config opening sockets inside this namespace.
    pub fn config(&self) -> Config {
        Config::new().namespace(self.path())
    }

    /// Open a connection in this namespace and start listening.
    pub fn listen(
        &self,
        config: Config,
        requests: &'static [ListenRequest],
    ) -> Result<(Arc<Connection>, MessageStream, JoinHandle<Result<()>>)> {
        let (conn, stream) = Connection::open(config.namespace(self.path()))?;
        let conn = Arc::new(conn);
        let listener = tokio::spawn({
            let conn = Arc::clone(&conn);
            async move { conn.listen(requests).await }
        });
        Ok((conn, stream, listener))
    }

    /// Run a command in the namespace and return its output.
    pub fn exec(&self, cmd: &str, args: &[&str]) -> Result<String> {
        let output = Command::new("ip")
            .args(["netns", "exec", &self.name, cmd])
            .args(args)
            .output()
            .map_err(|e| Error::Io(io::Error::from(e.kind())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::InvalidMessage(format!(
                "command failed: {} {:?}: {}",
                cmd, args, stderr
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Add a dummy interface in this namespace using ip command.
    pub fn add_dummy(&self, name: &str) -> Result<()> {
        self.exec("ip", &["link", "add", name, "type", "dummy"])?;
        Ok(())
    }

    /// Bring an interface up using ip command.
    pub fn link_up(&self, name: &str) -> Result<()> {
        self.exec("ip", &["link", "set", name, "up"])?;
        Ok(())
    }

    /// Add an IP address using ip command.
    pub fn add_addr(&self, dev: &str, addr: &str) -> Result<()> {
        self.exec("ip", &["addr", "add", addr, "dev", dev])?;
        Ok(())
    }

    /// Interface index of `dev`, read from sysfs inside the namespace.
    pub fn ifindex(&self, dev: &str) -> Result<u32> {
        let path = format!("/sys/class/net/{dev}/ifindex");
        let out = self.exec("cat", &[&path])?;
        out.trim()
            .parse()
            .map_err(|_| Error::InvalidMessage(format!("bad ifindex for {dev}: {out}")))
    }
}

impl Drop for TestNamespace {
    fn drop(&mut self) {
        let _ = Command::new("ip")
            .args(["netns", "del", &self.name])
            .status();
    }
}

/// Next message on `stream`, failing the test after [`WAIT`].
pub async fn next(stream: &mut MessageStream) -> Message {
    tokio::time::timeout(WAIT, stream.recv())
        .await
        .expect("timed out waiting for a message")
        .expect("message stream ended")
}

/// Skip messages until `pick` accepts one.
pub async fn next_matching<T>(
    stream: &mut MessageStream,
    mut pick: impl FnMut(Message) -> Option<T>,
) -> T {
    loop {
        if let Some(found) = pick(next(stream).await) {
            return found;
        }
    }
}

/// Check if running as root.
pub fn is_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

/// Skip the test if not running as root.
///
/// Use this at the beginning of integration tests that require root privileges.
#[macro_export]
macro_rules! require_root {
    () => {
        if !crate::common::is_root() {
            eprintln!("Skipping test: requires root");
            return Ok(());
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_ns_name() {
        let name1 = unique_ns_name("test");
        let name2 = unique_ns_name("test");
        assert_ne!(name1, name2);
        assert!(name1.starts_with("rtnl-test-test-"));
    }
}
