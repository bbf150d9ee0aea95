#![allow(unused)]

use std::path::Path;
use std::path::PathBuf;
use std::process::Output;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use assert_cmd::Command;

use tempfile::TempDir;

use crate::common::MockKeyServer;

/// Runs `hkp` against a keyserver on localhost.
///
/// Every instance has its own keyserver, and its own configuration
/// file, which points to that keyserver.
pub struct Hkp {
    base: TempDir,
    server: MockKeyServer,
    config: PathBuf,
    scratch: AtomicUsize,
}

impl Hkp {
    /// Starts a keyserver and writes a configuration file using it.
    pub fn new() -> Self {
        Self::with_config("")
    }

    /// Like [`Hkp::new`], but appends `extra` to the configuration
    /// file.
    pub fn with_config(extra: &str) -> Self {
        let base = TempDir::new().expect("can create a temporary directory");
        let server = MockKeyServer::start_in_background();

        let config = base.path().join("config.toml");
        std::fs::write(&config, format!("\
[network]
keyserver = \"{}\"
{}", server.url(), extra))
            .expect("can write the configuration file");

        Hkp {
            base,
            server,
            config,
            scratch: 0.into(),
        }
    }

    /// Returns the keyserver.
    pub fn server(&self) -> &MockKeyServer {
        &self.server
    }

    /// Returns the configuration file.
    pub fn config_file(&self) -> &Path {
        &self.config
    }

    /// Returns a new scratch file.
    ///
    /// The file is guaranteed to not exist, but it isn't actually
    /// created.
    pub fn scratch_file(&self, name: &str) -> PathBuf {
        loop {
            let i = self.scratch.fetch_add(1, Ordering::Relaxed);
            let file = self.base.path().join(format!("{}-{}", i, name));
            if ! file.exists() {
                return file;
            }
        }
    }

    /// Returns a command for running `hkp` using our configuration.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("hkp")
            .expect("can run hkp");
        cmd.env("HKP_CONFIG", &self.config);
        cmd
    }

    /// Returns a command with the given arguments.
    pub fn command_args<'a, A>(&self, args: A) -> Command
    where A: AsRef<[&'a str]>
    {
        let mut cmd = self.command();
        cmd.args(args.as_ref());
        cmd
    }

    /// Runs the command.  If `expect` is `Some`, asserts that the
    /// command succeeds or fails as per the boolean.
    pub fn run<E>(&self, mut cmd: Command, expect: E) -> Output
        where E: Into<Option<bool>>
    {
        eprintln!("Running: {:?}", cmd);
        let output = cmd.output().expect("can run command");
        let expect = expect.into();
        match (output.status.success(), expect) {
            (true, Some(true)) | (false, Some(false)) | (_, None) => {
                eprintln!("stdout: {}", String::from_utf8_lossy(&output.stdout));
                eprintln!("stderr: {}", String::from_utf8_lossy(&output.stderr));
            }
            (got, expected) => {
                let expected = expected.unwrap_or(got);

                panic!(
                    "Running {:?}: {}, but should have {}:\n\
                     stdout: {}\n\
                     stderr: {}",
                    cmd,
                    if got { "succeeded" } else { "failed" },
                    if expected { "succeeded" } else { "failed" },
                    &String::from_utf8_lossy(&output.stdout),
                    &String::from_utf8_lossy(&output.stderr));
            }
        }
        output
    }

    /// Retrieves a key, returning stdout.
    pub fn get(&self, args: &[&str], key_id: &str) -> String {
        self.get_maybe(args, key_id).expect("can retrieve the key")
    }

    /// Retrieves a key.
    ///
    /// On failure, returns stderr.
    pub fn get_maybe(&self, args: &[&str], key_id: &str)
                     -> Result<String, String>
    {
        let mut cmd = self.command();
        cmd.args(["get", key_id]);
        cmd.args(args);
        Self::result(self.run(cmd, None))
    }

    /// Searches for keys, returning stdout.
    pub fn search(&self, args: &[&str], query: &str) -> String {
        self.search_maybe(args, query).expect("can search")
    }

    /// Searches for keys.
    ///
    /// On failure, returns stderr.
    pub fn search_maybe(&self, args: &[&str], query: &str)
                        -> Result<String, String>
    {
        let mut cmd = self.command();
        cmd.args(["search", query]);
        cmd.args(args);
        Self::result(self.run(cmd, None))
    }

    /// Sends key material, returning stdout.
    pub fn send(&self, args: &[&str], stdin: &str) -> String {
        self.send_maybe(args, stdin).expect("can send")
    }

    /// Sends key material read from stdin.
    ///
    /// On failure, returns stderr.
    pub fn send_maybe(&self, args: &[&str], stdin: &str)
                      -> Result<String, String>
    {
        let mut cmd = self.command();
        cmd.arg("send");
        cmd.args(args);
        cmd.write_stdin(stdin);
        Self::result(self.run(cmd, None))
    }

    fn result(output: Output) -> Result<String, String> {
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(String::from_utf8_lossy(&output.stderr).into_owned())
        }
    }
}
