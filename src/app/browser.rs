//! Open a URL in the system's default browser.

use std::process::{Command, Stdio};

fn browser_command(url: &str) -> Command {
    if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", "", url]);
        command
    } else if cfg!(target_os = "macos") {
        let mut command = Command::new("open");
        command.arg(url);
        command
    } else {
        let mut command = Command::new("xdg-open");
        command.arg(url);
        command
    }
}

/// Launch the default browser on `url`. Returns `true` when the launcher started.
pub fn open_browser(url: &str) -> bool {
    let spawned = browser_command(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    match spawned {
        Ok(_) => true,
        Err(err) => {
            log::warn!("cannot open browser on {url}: {err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_carries_the_url() {
        let command = browser_command("http://localhost:8000/");
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args.last().and_then(|arg| arg.to_str()), Some("http://localhost:8000/"));
    }
}
