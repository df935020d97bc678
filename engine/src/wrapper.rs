// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::dag::NodeId;
use std::io;
use std::path::Path;

/// Builder for the generated wrapper script a task is submitted as. The
/// fully-composed command line is serialized into a small `sh` script so
/// the queue stages and schedules it like any other input file.
#[derive(Debug)]
pub struct BatchWrapper {
    prefix: String,
    commands: Vec<String>,
}

impl BatchWrapper {
    /// `prefix` names the generated script, e.g. `./resource_monitor`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            commands: Vec::new(),
        }
    }

    pub fn cmd(&mut self, command: &str) {
        self.commands.push(command.to_string());
    }

    /// Write the script into `dir` and return the name the task should
    /// invoke it by, `{prefix}_{node}.sh`. The name is relative to the
    /// workflow working directory, as the queue expects.
    pub fn write(&self, dir: &Path, node: NodeId) -> io::Result<String> {
        let name = format!("{}_{node}.sh", self.prefix);
        let path = dir.join(name.trim_start_matches("./"));

        let mut script = String::from("#!/bin/sh\n");
        for command in &self.commands {
            script.push_str(command);
            script.push('\n');
        }
        std::fs::write(&path, script)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
        }

        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_write_script() {
        let dir = tempfile::tempdir().unwrap();
        let mut wrapper = BatchWrapper::new("./resource_monitor");
        wrapper.cmd("monitor -o r-7 -- /bin/echo hello");

        let name = wrapper.write(dir.path(), 7).unwrap();
        assert_eq!(name, "./resource_monitor_7.sh");

        let contents = fs::read_to_string(dir.path().join("resource_monitor_7.sh")).unwrap();
        assert_eq!(contents, "#!/bin/sh\nmonitor -o r-7 -- /bin/echo hello\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_script_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let mut wrapper = BatchWrapper::new("./resource_monitor");
        wrapper.cmd("/bin/true");

        wrapper.write(dir.path(), 1).unwrap();
        let mode = fs::metadata(dir.path().join("resource_monitor_1.sh"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o111, 0o111);
    }

    #[test]
    fn test_write_multiple_commands_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut wrapper = BatchWrapper::new("./w");
        wrapper.cmd("first");
        wrapper.cmd("second");

        wrapper.write(dir.path(), 2).unwrap();
        let contents = fs::read_to_string(dir.path().join("w_2.sh")).unwrap();
        assert_eq!(contents, "#!/bin/sh\nfirst\nsecond\n");
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let mut wrapper = BatchWrapper::new("./w");
        wrapper.cmd("/bin/true");
        assert!(wrapper.write(Path::new("/nonexistent/dir"), 1).is_err());
    }
}
