use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How the streaming process is invoked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Executable to run, looked up on `PATH` when not absolute
    pub executable: PathBuf,

    /// Arguments placed before `-i <address>`
    pub before_options: Vec<String>,

    /// Arguments placed between the input and the channel
    pub options: Vec<String>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("ffmpeg"),
            before_options: [
                "-reconnect",
                "1",
                "-reconnect_streamed",
                "1",
                "-reconnect_delay_max",
                "5",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            options: vec!["-vn".to_string()],
        }
    }
}

impl OutputSettings {
    /// Full argument list for streaming `address` to `channel`
    pub fn arguments(&self, address: &str, channel: &str) -> Vec<String> {
        let mut args = Vec::with_capacity(self.before_options.len() + self.options.len() + 3);
        args.extend(self.before_options.iter().cloned());
        args.push("-i".to_string());
        args.push(address.to_string());
        args.extend(self.options.iter().cloned());
        args.push(channel.to_string());
        args
    }
}
