//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a silo command with a hermetic environment.
    ///
    /// Dummy static credentials and a pinned region keep the AWS SDK's
    /// config chain away from profile files and instance metadata.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("silo").expect("failed to find silo binary");
        cmd.env("HOME", self.home.path());
        // Windows uses USERPROFILE instead of HOME for home directory
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("AWS_ACCESS_KEY_ID", "testing");
        cmd.env("AWS_SECRET_ACCESS_KEY", "testing");
        cmd.env("AWS_REGION", "us-east-1");
        cmd.env("AWS_EC2_METADATA_DISABLED", "true");
        cmd.env("SILO_ACTOR", "test-actor");
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Shortcut for `silo create --name <name> --value <value> --kind <kind>`.
    pub fn create(&self, name: &str, value: &str, kind: &str) -> Output {
        self.cmd()
            .args(["create", "--name", name, "--value", value, "--kind", kind])
            .output()
            .expect("failed to run silo create")
    }

    /// Shortcut for `silo delete --name <name> --kind <kind> --yes`.
    pub fn delete_yes(&self, name: &str, kind: &str) -> Output {
        self.cmd()
            .args(["delete", "--name", name, "--kind", kind, "--yes"])
            .output()
            .expect("failed to run silo delete")
    }

    /// Shortcut for `silo describe --name <name> --kind <kind>`.
    pub fn describe(&self, name: &str, kind: &str) -> Output {
        self.cmd()
            .args(["describe", "--name", name, "--kind", kind])
            .output()
            .expect("failed to run silo describe")
    }

    /// Shortcut for `silo list --actor <actor>`.
    pub fn list(&self, actor: &str) -> Output {
        self.cmd()
            .args(["list", "--actor", actor])
            .output()
            .expect("failed to run silo list")
    }

    /// Shortcut for `silo list --actor <actor> --json`.
    pub fn list_json(&self, actor: &str) -> Output {
        self.cmd()
            .args(["list", "--actor", actor, "--json"])
            .output()
            .expect("failed to run silo list --json")
    }
}
