use std::process::Command;
use std::str;
use tempfile::TempDir;

/// CLI interface tests
#[cfg(test)]
mod cli_tests {
    use super::*;

    fn tdsgrab() -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_tdsgrab"));
        command.env_remove("RUST_LOG");
        command
    }

    #[test]
    fn test_cli_help() {
        let output = tdsgrab().arg("--help").output().expect("Failed to execute command");

        let stdout = str::from_utf8(&output.stdout).expect("Invalid UTF-8");
        assert!(output.status.success());
        assert!(stdout.contains("Usage:"));
        assert!(stdout.contains("--port"));
        assert!(stdout.contains("--baud"));
        assert!(stdout.contains("--flow"));
        assert!(stdout.contains("--list"));
        assert!(stdout.contains("19200"));
    }

    #[test]
    fn test_cli_version() {
        let output = tdsgrab().arg("-v").output().expect("Failed to execute command");

        let stdout = str::from_utf8(&output.stdout).expect("Invalid UTF-8");
        assert!(output.status.success());
        assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_cli_missing_filename() {
        let output = tdsgrab().output().expect("Failed to execute command");
        assert!(!output.status.success());
    }

    #[test]
    fn test_cli_invalid_flow() {
        let output = tdsgrab()
            .args(["--flow", "sideways", "out.bin"])
            .output()
            .expect("Failed to execute command");
        assert!(!output.status.success());
    }

    #[test]
    fn test_cli_missing_device_creates_no_file() {
        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("screen.bmp");

        let output = tdsgrab()
            .args(["-q", "-p", "/dev/tdsgrab-no-such-device"])
            .arg(&destination)
            .output()
            .expect("Failed to execute command");

        let stdout = str::from_utf8(&output.stdout).expect("Invalid UTF-8");
        assert_eq!(output.status.code(), Some(1));
        assert!(stdout.contains("Unable to connect to serial device"));
        assert!(!stdout.contains("Waiting for data"));
        assert!(!destination.exists());
    }

    #[test]
    fn test_cli_zero_baud_is_invalid_config() {
        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("screen.bmp");

        let output = tdsgrab()
            .args(["-q", "-b", "0", "-p", "/dev/tdsgrab-no-such-device"])
            .arg(&destination)
            .output()
            .expect("Failed to execute command");

        assert_eq!(output.status.code(), Some(2));
        assert!(!destination.exists());
    }

    #[test]
    fn test_cli_non_standard_baud_warns() {
        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("screen.bmp");

        let output = tdsgrab()
            .args(["-q", "-b", "115200", "-p", "/dev/tdsgrab-no-such-device"])
            .arg(&destination)
            .output()
            .expect("Failed to execute command");

        let stdout = str::from_utf8(&output.stdout).expect("Invalid UTF-8");
        assert!(stdout.contains("Non-standard baud rate 115200"));
        assert_eq!(output.status.code(), Some(1));
    }

    #[test]
    fn test_cli_json_errors() {
        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("screen.bmp");

        let output = tdsgrab()
            .args(["-q", "-o", "json", "-p", "/dev/tdsgrab-no-such-device"])
            .arg(&destination)
            .output()
            .expect("Failed to execute command");

        let stdout = str::from_utf8(&output.stdout).expect("Invalid UTF-8");
        let line = stdout.lines().last().expect("no output");
        let value: serde_json::Value = serde_json::from_str(line).expect("not JSON");
        assert_eq!(value["level"], "error");
    }

    #[test]
    fn test_cli_missing_config_file() {
        let temp_dir = TempDir::new().unwrap();

        let output = tdsgrab()
            .arg("-c")
            .arg(temp_dir.path().join("absent.toml"))
            .arg(temp_dir.path().join("screen.bmp"))
            .output()
            .expect("Failed to execute command");

        assert_eq!(output.status.code(), Some(2));
    }

    #[test]
    fn test_cli_list_ignores_broken_config() {
        let home = TempDir::new().unwrap();
        let config_dir = home.path().join(".config").join("tdsgrab");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(config_dir.join("config.toml"), "[link\nflow = ").unwrap();

        let output = tdsgrab()
            .env("HOME", home.path())
            .args(["-q", "-l"])
            .output()
            .expect("Failed to execute command");

        let stdout = str::from_utf8(&output.stdout).expect("Invalid UTF-8");
        assert_ne!(output.status.code(), Some(2));
        assert!(!stdout.contains("config file"));
    }
}
